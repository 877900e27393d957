//! Core types for sequential signomial programming.
//!
//! This crate defines the shared abstractions the solvers and observers
//! build on:
//!
//! - [`VarKey`], [`Monomial`], [`Posynomial`], [`Signomial`]: immutable
//!   expressions over positive variables
//! - [`Constraint`] and its one-time [`Convexity`] classification
//! - [`GeometricProgram`] and its solver-facing [`StandardForm`]
//! - [`GpSolver`]: the contract for convex GP solvers
//! - [`Observer`]: receives solver events and optionally returns control actions

mod constraint;
mod error;
mod nomial;
mod observer;
mod program;

pub use constraint::{
    Constraint, Convexity, LocalConstraint, MonomialEquality, PosynomialInequality,
    SignomialInequality,
};
pub use error::Error;
pub use nomial::{Exponents, Monomial, Posynomial, Signomial, VarKey, VarMap, check_values};
pub use observer::Observer;
pub use program::{
    Failure, GeometricProgram, GpSolution, GpSolver, SolveOutcome, SparseExponents, StandardForm,
};
