use thiserror::Error;

/// Configuration for a signomial program solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    reltol: f64,
    iteration_limit: usize,
    mutate_gp: bool,
    verbosity: u8,
}

/// Errors that can occur when validating a signomial solve config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("reltol must be finite and non-negative")]
    RelTol,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(1e-4, 50).unwrap()
    }
}

impl Config {
    /// Creates a new config with incremental relinearization enabled and
    /// verbosity 1.
    ///
    /// # Errors
    ///
    /// Returns an error if `reltol` is negative or non-finite.
    pub fn new(reltol: f64, iteration_limit: usize) -> Result<Self, ConfigError> {
        if !reltol.is_finite() || reltol < 0.0 {
            return Err(ConfigError::RelTol);
        }

        Ok(Self {
            reltol,
            iteration_limit,
            mutate_gp: true,
            verbosity: 1,
        })
    }

    /// Enables or disables incremental relinearization of the GP.
    ///
    /// It only applies to problems without external functions or local
    /// constraints. Results are the same either way.
    #[must_use]
    pub fn with_mutate_gp(self, mutate_gp: bool) -> Self {
        Self { mutate_gp, ..self }
    }

    /// Sets how much is logged: 0 is silent, 1 logs start and finish, 2 and
    /// above log every iteration.
    #[must_use]
    pub fn with_verbosity(self, verbosity: u8) -> Self {
        Self { verbosity, ..self }
    }

    /// Returns the relative cost improvement at which iteration stops.
    #[must_use]
    pub fn reltol(&self) -> f64 {
        self.reltol
    }

    /// Returns the number of GP solves allowed before giving up.
    #[must_use]
    pub fn iteration_limit(&self) -> usize {
        self.iteration_limit
    }

    #[must_use]
    pub fn mutate_gp(&self) -> bool {
        self.mutate_gp
    }

    #[must_use]
    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }
}
