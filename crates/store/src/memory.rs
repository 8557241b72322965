//! In-memory reference implementation of the repository traits.
//!
//! All state lives behind one `tokio::sync::RwLock`, so every check-then-act
//! sequence (trip key uniqueness, the per-vehicle open-ended-primary slot)
//! runs atomically with the write that depends on it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use fleetops_core::errors::{OpsError, OpsResult};
use fleetops_core::models::assignment::{
    AssignmentStatus, AssignmentWindow, PrincipalKind, ResourceAssignment,
};
use fleetops_core::models::directory::{Driver, Supervisor, Vehicle};
use fleetops_core::models::leave::{LeaveRequest, LeaveStatus};
use fleetops_core::models::route::{Route, RouteSchedule};
use fleetops_core::models::schedule::Schedule;
use fleetops_core::models::trip::{Trip, TripKey};

use crate::repositories::{
    AssignmentRepository, DirectoryRepository, LeaveRepository, RouteRepository,
    ScheduleRepository, TripInsert, TripRepository,
};

#[derive(Default)]
struct MemoryState {
    schedules: HashMap<Uuid, Schedule>,
    route_schedules: HashMap<Uuid, RouteSchedule>,
    routes: HashMap<Uuid, Route>,
    trips: HashMap<Uuid, Trip>,
    /// Unique index over the trip materialization key.
    trip_keys: HashMap<TripKey, Uuid>,
    assignments: HashMap<Uuid, ResourceAssignment>,
    /// vehicle id -> the one Approved open-ended primary assignment.
    primary_slots: HashMap<Uuid, Uuid>,
    leaves: HashMap<Uuid, LeaveRequest>,
    drivers: HashMap<Uuid, Driver>,
    vehicles: HashMap<Uuid, Vehicle>,
    supervisors: HashMap<Uuid, Supervisor>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScheduleRepository for MemoryStore {
    async fn create_schedule(&self, schedule: Schedule) -> OpsResult<Schedule> {
        schedule.validate()?;
        tracing::debug!(schedule_id = %schedule.id, name = %schedule.name, "creating schedule");
        let mut state = self.inner.write().await;
        state.schedules.insert(schedule.id, schedule.clone());
        Ok(schedule)
    }

    async fn get_schedule_by_id(&self, id: Uuid) -> OpsResult<Option<Schedule>> {
        let state = self.inner.read().await;
        Ok(state.schedules.get(&id).cloned())
    }

    async fn list_schedule_ids_with_active_routes(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> OpsResult<Vec<Uuid>> {
        let state = self.inner.read().await;
        let mut ids: Vec<Uuid> = state
            .route_schedules
            .values()
            .filter(|binding| {
                binding.active_from <= to
                    && binding.active_to.map_or(true, |active_to| from <= active_to)
            })
            .map(|binding| binding.schedule_id)
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn create_route_schedule(&self, binding: RouteSchedule) -> OpsResult<RouteSchedule> {
        let mut state = self.inner.write().await;
        if !state.schedules.contains_key(&binding.schedule_id) {
            return Err(OpsError::NotFound(format!(
                "Schedule with ID {} not found",
                binding.schedule_id
            )));
        }
        if !state.routes.contains_key(&binding.route_id) {
            return Err(OpsError::NotFound(format!(
                "Route with ID {} not found",
                binding.route_id
            )));
        }
        state.route_schedules.insert(binding.id, binding.clone());
        Ok(binding)
    }

    async fn list_route_schedules_by_schedule_id(
        &self,
        schedule_id: Uuid,
    ) -> OpsResult<Vec<RouteSchedule>> {
        let state = self.inner.read().await;
        let mut bindings: Vec<RouteSchedule> = state
            .route_schedules
            .values()
            .filter(|binding| binding.schedule_id == schedule_id)
            .cloned()
            .collect();
        bindings.sort_by_key(|binding| binding.id);
        Ok(bindings)
    }
}

#[async_trait]
impl RouteRepository for MemoryStore {
    async fn create_route(&self, route: Route) -> OpsResult<Route> {
        let mut state = self.inner.write().await;
        state.routes.insert(route.id, route.clone());
        Ok(route)
    }

    async fn get_route_by_id(&self, id: Uuid) -> OpsResult<Option<Route>> {
        let state = self.inner.read().await;
        Ok(state.routes.get(&id).cloned())
    }
}

#[async_trait]
impl TripRepository for MemoryStore {
    async fn insert_trip(&self, trip: Trip) -> OpsResult<TripInsert> {
        let key = trip.key();
        let mut state = self.inner.write().await;
        if let Some(existing_id) = state.trip_keys.get(&key) {
            let existing = state
                .trips
                .get(existing_id)
                .cloned()
                .ok_or_else(|| OpsError::Internal("trip index points at a missing trip".into()))?;
            tracing::debug!(trip_id = %existing.id, service_date = %key.service_date,
                "trip already materialized for key, skipping");
            return Ok(TripInsert::Duplicate(existing));
        }
        state.trip_keys.insert(key, trip.id);
        state.trips.insert(trip.id, trip.clone());
        tracing::debug!(trip_id = %trip.id, route_id = %trip.route_id,
            service_date = %trip.service_date, "trip created");
        Ok(TripInsert::Inserted(trip))
    }

    async fn get_trip_by_id(&self, id: Uuid) -> OpsResult<Option<Trip>> {
        let state = self.inner.read().await;
        Ok(state.trips.get(&id).cloned())
    }

    async fn get_trip_by_key(&self, key: TripKey) -> OpsResult<Option<Trip>> {
        let state = self.inner.read().await;
        Ok(state
            .trip_keys
            .get(&key)
            .and_then(|id| state.trips.get(id))
            .cloned())
    }

    async fn list_trips_for_route_between(
        &self,
        route_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> OpsResult<Vec<Trip>> {
        let state = self.inner.read().await;
        let mut trips: Vec<Trip> = state
            .trips
            .values()
            .filter(|trip| trip.route_id == route_id && trip.intersects(start, end))
            .cloned()
            .collect();
        trips.sort_by_key(|trip| (trip.planned_start, trip.id));
        Ok(trips)
    }

    async fn update_trip(&self, trip: Trip) -> OpsResult<Trip> {
        let mut state = self.inner.write().await;
        if !state.trips.contains_key(&trip.id) {
            return Err(OpsError::NotFound(format!(
                "Trip with ID {} not found",
                trip.id
            )));
        }
        state.trips.insert(trip.id, trip.clone());
        Ok(trip)
    }
}

#[async_trait]
impl AssignmentRepository for MemoryStore {
    async fn insert_assignment(
        &self,
        assignment: ResourceAssignment,
    ) -> OpsResult<ResourceAssignment> {
        assignment.validate()?;
        let mut state = self.inner.write().await;
        if assignment.is_open_ended_primary() && assignment.status == AssignmentStatus::Approved {
            if let Some(existing_id) = state.primary_slots.get(&assignment.vehicle_id) {
                return Err(OpsError::Conflict(format!(
                    "Vehicle {} already has an approved open-ended primary assignment ({})",
                    assignment.vehicle_id, existing_id
                )));
            }
            state
                .primary_slots
                .insert(assignment.vehicle_id, assignment.id);
        }
        tracing::debug!(assignment_id = %assignment.id, vehicle_id = %assignment.vehicle_id,
            "assignment created");
        state.assignments.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    async fn get_assignment_by_id(&self, id: Uuid) -> OpsResult<Option<ResourceAssignment>> {
        let state = self.inner.read().await;
        Ok(state.assignments.get(&id).cloned())
    }

    async fn approve_assignment(&self, id: Uuid) -> OpsResult<ResourceAssignment> {
        let mut state = self.inner.write().await;
        let mut updated = state
            .assignments
            .get(&id)
            .cloned()
            .ok_or_else(|| OpsError::NotFound(format!("Assignment with ID {} not found", id)))?;
        updated.approve()?;
        if updated.is_open_ended_primary() {
            if let Some(existing_id) = state.primary_slots.get(&updated.vehicle_id) {
                if *existing_id != id {
                    return Err(OpsError::Conflict(format!(
                        "Vehicle {} already has an approved open-ended primary assignment ({})",
                        updated.vehicle_id, existing_id
                    )));
                }
            }
            state.primary_slots.insert(updated.vehicle_id, id);
        }
        state.assignments.insert(id, updated.clone());
        tracing::debug!(assignment_id = %id, "assignment approved");
        Ok(updated)
    }

    async fn reject_assignment(&self, id: Uuid, reason: &str) -> OpsResult<ResourceAssignment> {
        let mut state = self.inner.write().await;
        let mut updated = state
            .assignments
            .get(&id)
            .cloned()
            .ok_or_else(|| OpsError::NotFound(format!("Assignment with ID {} not found", id)))?;
        updated.reject(reason)?;
        state.assignments.insert(id, updated.clone());
        tracing::debug!(assignment_id = %id, "assignment rejected");
        Ok(updated)
    }

    async fn cancel_assignment(&self, id: Uuid, reason: &str) -> OpsResult<ResourceAssignment> {
        let mut state = self.inner.write().await;
        let mut updated = state
            .assignments
            .get(&id)
            .cloned()
            .ok_or_else(|| OpsError::NotFound(format!("Assignment with ID {} not found", id)))?;
        updated.cancel(reason)?;
        if state.primary_slots.get(&updated.vehicle_id) == Some(&id) {
            state.primary_slots.remove(&updated.vehicle_id);
        }
        state.assignments.insert(id, updated.clone());
        tracing::debug!(assignment_id = %id, "assignment cancelled");
        Ok(updated)
    }

    async fn list_assignments_for_vehicle_between(
        &self,
        vehicle_id: Uuid,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> OpsResult<Vec<ResourceAssignment>> {
        let query = AssignmentWindow::new(start, end);
        let state = self.inner.read().await;
        let mut assignments: Vec<ResourceAssignment> = state
            .assignments
            .values()
            .filter(|assignment| {
                assignment.vehicle_id == vehicle_id && assignment.window().overlaps(&query)
            })
            .cloned()
            .collect();
        assignments.sort_by_key(|assignment| (assignment.start_time, assignment.id));
        Ok(assignments)
    }

    async fn list_assignments_for_principal_between(
        &self,
        principal: PrincipalKind,
        principal_id: Uuid,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> OpsResult<Vec<ResourceAssignment>> {
        let query = AssignmentWindow::new(start, end);
        let state = self.inner.read().await;
        let mut assignments: Vec<ResourceAssignment> = state
            .assignments
            .values()
            .filter(|assignment| {
                assignment.principal == principal
                    && assignment.principal_id == principal_id
                    && assignment.window().overlaps(&query)
            })
            .cloned()
            .collect();
        assignments.sort_by_key(|assignment| (assignment.start_time, assignment.id));
        Ok(assignments)
    }
}

#[async_trait]
impl LeaveRepository for MemoryStore {
    async fn create_leave_request(&self, request: LeaveRequest) -> OpsResult<LeaveRequest> {
        request.validate()?;
        let mut state = self.inner.write().await;
        state.leaves.insert(request.id, request.clone());
        tracing::debug!(leave_request_id = %request.id, driver_id = %request.driver_id,
            "leave request created");
        Ok(request)
    }

    async fn get_leave_request_by_id(&self, id: Uuid) -> OpsResult<Option<LeaveRequest>> {
        let state = self.inner.read().await;
        Ok(state.leaves.get(&id).cloned())
    }

    async fn set_leave_status(&self, id: Uuid, status: LeaveStatus) -> OpsResult<LeaveRequest> {
        let mut state = self.inner.write().await;
        let request = state
            .leaves
            .get_mut(&id)
            .ok_or_else(|| OpsError::NotFound(format!("Leave request with ID {} not found", id)))?;
        request.status = status;
        Ok(request.clone())
    }

    async fn list_pending_needing_suggestion(
        &self,
        now: DateTime<Utc>,
        freshness: Duration,
        limit: usize,
    ) -> OpsResult<Vec<LeaveRequest>> {
        let state = self.inner.read().await;
        let mut requests: Vec<LeaveRequest> = state
            .leaves
            .values()
            .filter(|request| request.needs_suggestion(now, freshness))
            .cloned()
            .collect();
        requests.sort_by_key(|request| (request.created_at, request.id));
        requests.truncate(limit);
        Ok(requests)
    }

    async fn cache_suggestion(
        &self,
        id: Uuid,
        driver_id: Option<Uuid>,
        vehicle_id: Option<Uuid>,
        generated_at: DateTime<Utc>,
    ) -> OpsResult<LeaveRequest> {
        let mut state = self.inner.write().await;
        let request = state
            .leaves
            .get_mut(&id)
            .ok_or_else(|| OpsError::NotFound(format!("Leave request with ID {} not found", id)))?;
        request.suggested_replacement_driver_id = driver_id;
        request.suggested_replacement_vehicle_id = vehicle_id;
        request.suggestion_generated_at = Some(generated_at);
        Ok(request.clone())
    }

    async fn list_approved_leaves_for_driver_between(
        &self,
        driver_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> OpsResult<Vec<LeaveRequest>> {
        let state = self.inner.read().await;
        let mut requests: Vec<LeaveRequest> = state
            .leaves
            .values()
            .filter(|request| {
                request.driver_id == driver_id
                    && request.status == LeaveStatus::Approved
                    && request.start_date <= end_date
                    && start_date <= request.end_date
            })
            .cloned()
            .collect();
        requests.sort_by_key(|request| (request.start_date, request.id));
        Ok(requests)
    }
}

#[async_trait]
impl DirectoryRepository for MemoryStore {
    async fn upsert_driver(&self, driver: Driver) -> OpsResult<Driver> {
        let mut state = self.inner.write().await;
        state.drivers.insert(driver.id, driver.clone());
        Ok(driver)
    }

    async fn get_driver_by_id(&self, id: Uuid) -> OpsResult<Option<Driver>> {
        let state = self.inner.read().await;
        Ok(state.drivers.get(&id).cloned())
    }

    async fn list_active_drivers(&self) -> OpsResult<Vec<Driver>> {
        let state = self.inner.read().await;
        let mut drivers: Vec<Driver> = state
            .drivers
            .values()
            .filter(|driver| driver.is_active())
            .cloned()
            .collect();
        drivers.sort_by_key(|driver| driver.id);
        Ok(drivers)
    }

    async fn upsert_vehicle(&self, vehicle: Vehicle) -> OpsResult<Vehicle> {
        let mut state = self.inner.write().await;
        state.vehicles.insert(vehicle.id, vehicle.clone());
        Ok(vehicle)
    }

    async fn get_vehicle_by_id(&self, id: Uuid) -> OpsResult<Option<Vehicle>> {
        let state = self.inner.read().await;
        Ok(state.vehicles.get(&id).cloned())
    }

    async fn list_active_vehicles(&self) -> OpsResult<Vec<Vehicle>> {
        let state = self.inner.read().await;
        let mut vehicles: Vec<Vehicle> = state
            .vehicles
            .values()
            .filter(|vehicle| vehicle.is_active)
            .cloned()
            .collect();
        vehicles.sort_by_key(|vehicle| vehicle.id);
        Ok(vehicles)
    }

    async fn upsert_supervisor(&self, supervisor: Supervisor) -> OpsResult<Supervisor> {
        let mut state = self.inner.write().await;
        state.supervisors.insert(supervisor.id, supervisor.clone());
        Ok(supervisor)
    }

    async fn get_supervisor_by_id(&self, id: Uuid) -> OpsResult<Option<Supervisor>> {
        let state = self.inner.read().await;
        Ok(state.supervisors.get(&id).cloned())
    }
}
