//! # fleetops-store
//!
//! Storage port for the fleetops backend: one repository trait per
//! aggregate, an in-memory reference implementation, and mock repositories
//! for tests.
//!
//! The traits return [`fleetops_core::errors::OpsResult`] so conflict and
//! not-found outcomes keep their kind across the boundary instead of
//! collapsing into an opaque storage error. Two invariants are owned by the
//! store, not by callers, because check-then-act in application code is not
//! safe once more than one process writes:
//!
//! - the trip materialization key `(route_id, schedule_id, service_date)` is
//!   a unique index — duplicate inserts report
//!   [`repositories::TripInsert::Duplicate`];
//! - at most one open-ended, Approved, primary assignment may exist per
//!   vehicle — violating inserts and approvals fail with a conflict.
//!
//! A durable backend must provide the same two guarantees (unique index,
//! compare-and-swap) to be a valid replacement for [`memory::MemoryStore`].

pub mod memory;
pub mod mock;
pub mod repositories;

pub use memory::MemoryStore;
