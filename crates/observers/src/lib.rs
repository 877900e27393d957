//! Reusable observers for locus solvers.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work across the barrier GP solver and the signomial program solver.
//!
//! # Modules
//!
//! - [`traits`]: capability traits for cross-solver observers
//!   ([`HasObjective`], [`HasIteration`], [`CanStopEarly`])
//! - [`trace`]: [`Trace`], which records solver progress with `tracing`
//!
//! [`Observer`]: locus_core::Observer
//! [`HasObjective`]: traits::HasObjective
//! [`HasIteration`]: traits::HasIteration
//! [`CanStopEarly`]: traits::CanStopEarly
//! [`Trace`]: trace::Trace

pub mod trace;
pub mod traits;
