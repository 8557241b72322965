//! # fleetops-core
//!
//! Domain models and pure computations for the fleetops school-transport
//! backend: recurring schedules and their expansion into dated occurrences,
//! trips, driver/supervisor-to-vehicle assignment windows, leave requests,
//! and the replacement-candidate scoring policy.
//!
//! Everything in this crate is synchronous and side-effect free; storage and
//! orchestration live in the sibling `fleetops-store`, `fleetops-service`
//! and `fleetops-worker` crates.

pub mod conflict;
pub mod errors;
pub mod models;
pub mod recurrence;
pub mod scoring;
