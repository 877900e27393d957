use locus_core::GpSolution;

/// Emitted once per iteration, after its GP (and any restoration) is solved.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// One-based iteration number.
    pub iteration: usize,

    /// GP solves so far, counting restoration solves.
    pub gp_solves: usize,

    /// Cost of this iteration, or `None` if it needed restoration.
    pub cost: Option<f64>,

    /// Relative cost change from the previous iteration, once two
    /// consecutive iterations have comparable costs.
    pub rel_improvement: Option<f64>,

    /// The accepted GP result. Its primal is the next approximation point.
    pub result: &'a GpSolution,

    /// Whether the result came from feasibility restoration.
    pub restored: bool,
}
