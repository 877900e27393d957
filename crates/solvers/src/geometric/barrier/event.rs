/// Which barrier problem a centering step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Searching for a strictly feasible point.
    Feasibility,

    /// Minimizing the cost from a strictly feasible point.
    Optimality,
}

/// Emitted once per centering, after the Newton iterations finish.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub phase: Phase,

    /// Outer barrier iteration within the phase, starting at 1.
    pub outer: usize,

    /// Barrier parameter used for this centering.
    pub t: f64,

    /// The maximum constraint violation in log space during feasibility,
    /// or the cost during optimality.
    pub objective: f64,

    /// Duality gap bound `m / t`.
    pub gap: f64,

    /// Newton steps taken by this centering.
    pub newton_steps: usize,
}
