use std::time::Duration;

use locus_core::GpSolution;

/// Indicates how the solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The relative cost improvement fell to the configured tolerance, or the
    /// problem needed only one exact GP solve.
    Converged,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of a signomial solve.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Final solver status.
    pub status: Status,

    /// The last accepted GP result.
    pub result: GpSolution,

    /// Final cost, or `None` if the last result came from restoration.
    pub cost: Option<f64>,

    /// Relative cost change over the last iteration, if comparable.
    pub rel_improvement: Option<f64>,

    /// Wall-clock time of the whole solve.
    pub soltime: Duration,

    /// GP solves, counting restoration solves.
    pub gp_solves: usize,

    /// Iteration count when the solver finished.
    pub iters: usize,
}
