use thiserror::Error;

use crate::VarMap;

use super::GeometricProgram;

/// A convex solver for geometric programs.
///
/// Solvers report infeasibility and numerical breakdown through
/// [`SolveOutcome::Infeasible`], so callers can recover. `Err` is reserved for
/// problems the solver cannot accept at all.
///
/// Closures `Fn(&GeometricProgram) -> Result<SolveOutcome, E>` are solvers.
pub trait GpSolver {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Solves `gp`.
    ///
    /// # Errors
    ///
    /// Returns an error if the solver cannot accept the program.
    fn solve(&self, gp: &GeometricProgram) -> Result<SolveOutcome, Self::Error>;
}

impl<F, E> GpSolver for F
where
    F: Fn(&GeometricProgram) -> Result<SolveOutcome, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn solve(&self, gp: &GeometricProgram) -> Result<SolveOutcome, E> {
        self(gp)
    }
}

/// The outcome of one GP solve.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Solved(GpSolution),
    Infeasible(Failure),
}

/// A solved geometric program.
#[derive(Debug, Clone, PartialEq)]
pub struct GpSolution {
    /// Optimal value of each free variable.
    pub primal: VarMap,

    /// Optimal cost.
    pub cost: f64,

    /// Dual value of each constraint posynomial, in slot order after the cost.
    pub sensitivities: Vec<f64>,

    /// Name of the solver that produced the solution.
    pub solver: String,

    /// Solver iteration count.
    pub iterations: usize,
}

/// Why a GP solve produced no solution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Failure {
    #[error("program is infeasible (phase I objective {phase_one_objective})")]
    Infeasible { phase_one_objective: f64 },

    #[error("program is unbounded")]
    Unbounded,

    #[error("numerical failure: {reason}")]
    Numerical { reason: String },

    #[error("interrupted before a feasible point was found")]
    Interrupted,
}
