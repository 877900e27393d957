//! Solvers for geometric programs.
//!
//! A geometric program becomes convex under the change of variables
//! `y = ln x`: each posynomial turns into a log-sum-exp function and each
//! monomial equality into a linear equation. Solvers in this module work in
//! that log space and implement [`GpSolver`].
//!
//! # Solvers
//!
//! - [`barrier`]: a primal log-barrier interior-point method
//!
//! [`GpSolver`]: locus_core::GpSolver

pub mod barrier;
