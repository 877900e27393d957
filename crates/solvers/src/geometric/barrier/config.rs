use thiserror::Error;

/// Configuration for the barrier solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_iters: usize,
    max_newton_steps: usize,
    gap_tol: f64,
}

/// Errors that can occur when validating a barrier solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("gap_tol must be finite and positive")]
    GapTol,

    #[error("max_newton_steps must be at least one")]
    NewtonSteps,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(100, 200, 1e-9).unwrap()
    }
}

impl Config {
    /// Creates a new config with a validated gap tolerance.
    ///
    /// # Errors
    ///
    /// Returns an error if `gap_tol` is not finite and positive, or if
    /// `max_newton_steps` is zero.
    pub fn new(max_iters: usize, max_newton_steps: usize, gap_tol: f64) -> Result<Self, ConfigError> {
        if !gap_tol.is_finite() || gap_tol <= 0.0 {
            return Err(ConfigError::GapTol);
        }
        if max_newton_steps == 0 {
            return Err(ConfigError::NewtonSteps);
        }

        Ok(Self {
            max_iters,
            max_newton_steps,
            gap_tol,
        })
    }

    /// Returns the maximum number of outer barrier iterations per phase.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the maximum number of Newton steps per centering.
    #[must_use]
    pub fn max_newton_steps(&self) -> usize {
        self.max_newton_steps
    }

    /// Returns the duality gap at which the optimality phase stops.
    #[must_use]
    pub fn gap_tol(&self) -> f64 {
        self.gap_tol
    }
}
