//! Sequential GP approximation of signomial programs.
//!
//! # Algorithm
//!
//! A signomial constraint `less <= greater` is convex except for its greater
//! side. Each iteration replaces the greater side with its weighted
//! geometric-mean monomial bound at the current point, which turns the
//! constraint into the GP constraint `less / bound <= 1`. The bound never
//! exceeds the greater side, so each GP is a conservative restriction of the
//! problem that is exact at the point it was built about.
//!
//! The solution of one GP becomes the point for the next. Iteration stops
//! once the relative cost improvement between two consecutive solved GPs is
//! at most `reltol`.
//!
//! If an approximation is infeasible, its constraints are relaxed by a shared
//! slack variable that is heavily penalized in the cost (see [`relax`]). The
//! relaxed solution then seeds the next iteration. A restored iteration has
//! no comparable cost, so two solved iterations must follow it before the
//! solve can converge.
//!
//! # Limitations
//!
//! - **Local only**: the result is a local optimum that depends on the
//!   starting point
//! - **Iteration limit**: exceeding it is an error, not a partial result
//!
//! # Observer Events
//!
//! The solve emits one [`Event`] per iteration. Observers can return
//! [`Action::StopEarly`] to finish with the latest result.

mod action;
mod assembler;
mod config;
mod error;
mod event;
mod external;
mod iteration;
mod program;
mod restorer;
mod solution;


pub use action::Action;
pub use assembler::Assembler;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use external::ExternalFunction;
pub use iteration::{Iteration, IterationOutcome};
pub use program::{Builder, SignomialProgram};
pub use restorer::{Relaxation, relax};
pub use solution::{Solution, Status};
