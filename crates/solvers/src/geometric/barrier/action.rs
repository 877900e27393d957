/// Actions an observer can take during a barrier solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver early.
    ///
    /// During the optimality phase, the current central point is returned as
    /// the solution. During the feasibility phase, no feasible point is known
    /// yet and the solve fails with [`Failure::Interrupted`].
    ///
    /// [`Failure::Interrupted`]: locus_core::Failure::Interrupted
    StopEarly,
}
