//! Geometric programs, their solver-facing layout, and the solver contract.
//!
//! A [`GeometricProgram`] is the unit of work handed to a [`GpSolver`]. Solvers
//! read it through its [`StandardForm`], a flat row layout in the style of
//! conventional GP solvers, and answer with a [`SolveOutcome`].

mod geometric;
mod solver;
mod standard_form;

pub use geometric::GeometricProgram;
pub use solver::{Failure, GpSolution, GpSolver, SolveOutcome};
pub use standard_form::{SparseExponents, StandardForm};
