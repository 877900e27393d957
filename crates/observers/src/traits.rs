//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types, so one
//! observer can watch both GP centerings and SP iterations.
//!
//! # Example
//!
//! ```rust
//! use locus_core::Observer;
//! use locus_observers::traits::{CanStopEarly, HasObjective};
//!
//! /// Stops once the objective falls below a target.
//! struct Target(f64);
//!
//! impl<E: HasObjective, A: CanStopEarly> Observer<E, A> for Target {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         (event.objective() < self.0).then(A::stop_early)
//!     }
//! }
//! ```

use locus_solvers::{geometric::barrier, signomial};

/// An event that carries an objective value.
pub trait HasObjective {
    /// Returns the objective for this event.
    ///
    /// Returns `f64::NAN` when the event has no comparable objective.
    fn objective(&self) -> f64;
}

/// An event that carries a one-based iteration number.
pub trait HasIteration {
    fn iteration(&self) -> usize;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

// --- barrier ---

impl HasObjective for barrier::Event {
    /// The phase I slack during feasibility, the cost during optimality.
    fn objective(&self) -> f64 {
        self.objective
    }
}

impl HasIteration for barrier::Event {
    fn iteration(&self) -> usize {
        self.outer
    }
}

impl CanStopEarly for barrier::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

// --- signomial ---

impl HasObjective for signomial::Event<'_> {
    /// The iteration's cost, or `NAN` for a restored iteration.
    fn objective(&self) -> f64 {
        self.cost.unwrap_or(f64::NAN)
    }
}

impl HasIteration for signomial::Event<'_> {
    fn iteration(&self) -> usize {
        self.iteration
    }
}

impl CanStopEarly for signomial::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
