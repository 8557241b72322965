//! # fleetops-service
//!
//! The service boundary of the fleetops backend. Each module implements one
//! group of transport-facing operations as async functions over a shared
//! [`OpsState`]:
//!
//! - **trips**: expand a schedule into dated trips over a range, the rolling
//!   automatic generator, and the trip-execution operations
//! - **assignments**: the driver/supervisor-to-vehicle assignment lifecycle
//!   and conflict detection for a vehicle over a time range
//! - **replacements**: replacement-candidate ranking and caching for leave
//!   requests
//! - **config**: environment-driven service configuration
//!
//! The HTTP layer that fronts these operations, authentication, and the
//! durable storage backend are deliberately not part of this workspace; the
//! service talks to storage through the `fleetops-store` repository traits
//! and reports failures through [`fleetops_core::errors::OpsError`] so every
//! caller must handle each error kind.

/// Configuration module for service settings
pub mod config;
/// Assignment lifecycle and conflict detection
pub mod assignments;
/// Replacement-suggestion operations
pub mod replacements;
/// Trip generation and execution operations
pub mod trips;

use std::sync::Arc;

use fleetops_core::recurrence::AcademicCalendar;
use fleetops_core::scoring::ScoringPolicy;
use fleetops_store::MemoryStore;
use fleetops_store::repositories::{
    AssignmentRepository, DirectoryRepository, LeaveRepository, RouteRepository,
    ScheduleRepository, TripRepository,
};

/// Shared dependencies handed to every operation: the storage port, the
/// academic calendar, and the replacement scoring policy. Repositories are
/// trait objects so tests can swap mocks in per field.
pub struct OpsState {
    pub schedules: Arc<dyn ScheduleRepository>,
    pub routes: Arc<dyn RouteRepository>,
    pub trips: Arc<dyn TripRepository>,
    pub assignments: Arc<dyn AssignmentRepository>,
    pub leaves: Arc<dyn LeaveRepository>,
    pub directory: Arc<dyn DirectoryRepository>,
    pub calendar: Arc<dyn AcademicCalendar>,
    pub scoring: Arc<dyn ScoringPolicy>,
}

impl OpsState {
    /// Wires every repository to one in-memory store.
    pub fn with_memory_store(
        store: MemoryStore,
        calendar: Arc<dyn AcademicCalendar>,
        scoring: Arc<dyn ScoringPolicy>,
    ) -> Self {
        let store = Arc::new(store);
        Self {
            schedules: store.clone(),
            routes: store.clone(),
            trips: store.clone(),
            assignments: store.clone(),
            leaves: store.clone(),
            directory: store,
            calendar,
            scoring,
        }
    }
}
