//! Solvers for geometric and signomial programs.
//!
//! # Modules
//!
//! - [`geometric`]: convex solvers for geometric programs
//! - [`signomial`]: sequential convex approximation of signomial programs

pub mod geometric;
pub mod signomial;
