//! An observer that records solver progress as `tracing` events.

use locus_core::Observer;
use tracing::debug;

use crate::traits::{HasIteration, HasObjective};

/// Emits one `debug` record per event and never intervenes.
///
/// Works with any solver whose events carry an iteration and an objective.
/// Install a `tracing` subscriber to see the records.
#[derive(Debug, Clone, Copy)]
pub struct Trace {
    solver: &'static str,
}

impl Trace {
    /// Creates an observer whose records carry `solver` as a field.
    #[must_use]
    pub fn new(solver: &'static str) -> Self {
        Self { solver }
    }
}

impl<E: HasIteration + HasObjective, A> Observer<E, A> for Trace {
    fn observe(&mut self, event: &E) -> Option<A> {
        debug!(
            solver = self.solver,
            iteration = event.iteration(),
            objective = event.objective(),
            "solver progress"
        );
        None
    }
}
