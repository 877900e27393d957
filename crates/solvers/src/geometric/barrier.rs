//! Log-barrier interior-point solver for geometric programs.
//!
//! # Algorithm
//!
//! In log space `y = ln x`, each posynomial becomes a convex log-sum-exp
//! function `g(y)` and each monomial equality a linear equation. The
//! equalities are eliminated up front: `y = y_p + N z`, where `y_p` is a
//! particular solution and `N` spans the null space. Constraints that become
//! constant are checked once and dropped.
//!
//! The solve then runs in two phases, each a sequence of centerings with a
//! growing barrier parameter `t`:
//!
//! 1. **Feasibility**: minimize `s` subject to `gᵢ(z) <= s`. Stops as soon as
//!    `s < 0`. The program is infeasible once the duality bound `s - m/t` is
//!    positive, or the gap closes with `s >= 0`.
//! 2. **Optimality**: minimize `t·g₀(z) - Σ ln(-gᵢ(z))` until `m/t` reaches
//!    the configured gap tolerance.
//!
//! Each centering is a damped Newton method with a backtracking line search.
//! The dual value of constraint `i` is recovered as `1 / (t·(-gᵢ))`.
//!
//! When the program carries an approximation point, its values seed the
//! first iterate.
//!
//! # Observer Events
//!
//! The solver emits one [`Event`] per centering. Observers can return
//! [`Action::StopEarly`] to halt. See [`Action`] for what each phase returns.

mod action;
mod centering;
mod config;
mod error;
mod event;
mod log_sum_exp;
mod newton;
mod path;
mod reduce;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::{Event, Phase};

use locus_core::{GeometricProgram, GpSolver, Observer, SolveOutcome};
use tracing::debug;

/// A barrier solver with a fixed configuration, usable as a [`GpSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Barrier {
    config: Config,
}

impl Barrier {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl GpSolver for Barrier {
    type Error = Error;

    fn solve(&self, gp: &GeometricProgram) -> Result<SolveOutcome, Error> {
        solve_unobserved(gp, &self.config)
    }
}

/// Solves a geometric program with the barrier method.
///
/// The observer receives an [`Event`] after each centering.
/// See the [module docs](self) for details.
///
/// # Errors
///
/// Returns an error if the program's standard form holds a coefficient that
/// is not positive and finite. Infeasible and unbounded programs are reported
/// as [`SolveOutcome::Infeasible`].
pub fn solve<Obs>(
    gp: &GeometricProgram,
    config: &Config,
    observer: Obs,
) -> Result<SolveOutcome, Error>
where
    Obs: Observer<Event, Action>,
{
    let outcome = path::follow(gp, config, observer)?;
    match &outcome {
        SolveOutcome::Solved(solution) => debug!(
            cost = solution.cost,
            newton_steps = solution.iterations,
            "barrier solve finished"
        ),
        SolveOutcome::Infeasible(failure) => debug!(%failure, "barrier solve failed"),
    }
    Ok(outcome)
}

/// Solves a geometric program without observer support.
///
/// This is a convenience wrapper around [`solve`] that uses a no-op observer.
///
/// # Errors
///
/// Returns an error if the program's standard form holds a coefficient that
/// is not positive and finite.
pub fn solve_unobserved(gp: &GeometricProgram, config: &Config) -> Result<SolveOutcome, Error> {
    solve(gp, config, ())
}
