/// Actions an observer can take during a signomial solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop after the current iteration and return its result.
    StopEarly,
}
