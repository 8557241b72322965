//! Assignment lifecycle and conflict detection.
//!
//! Status transitions are validated on the model; the per-vehicle
//! open-ended-primary invariant is enforced inside the store so a violation
//! fails with a conflict at the write boundary instead of silently replacing
//! the existing assignment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fleetops_core::conflict;
use fleetops_core::errors::{OpsError, OpsResult};
use fleetops_core::models::assignment::{PrincipalKind, ResourceAssignment};
use fleetops_core::models::conflict::AssignmentConflict;

use crate::OpsState;

/// Request shape for a new driver- or supervisor-to-vehicle binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAssignment {
    pub principal: PrincipalKind,
    pub principal_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_primary_driver: bool,
}

/// Creates a Pending assignment after checking the principal and vehicle
/// exist in the directory.
pub async fn request_assignment(
    state: &OpsState,
    new: NewAssignment,
) -> OpsResult<ResourceAssignment> {
    state
        .directory
        .get_vehicle_by_id(new.vehicle_id)
        .await?
        .ok_or_else(|| OpsError::NotFound(format!("Vehicle with ID {} not found", new.vehicle_id)))?;

    match new.principal {
        PrincipalKind::Driver => {
            state
                .directory
                .get_driver_by_id(new.principal_id)
                .await?
                .ok_or_else(|| {
                    OpsError::NotFound(format!("Driver with ID {} not found", new.principal_id))
                })?;
        }
        PrincipalKind::Supervisor => {
            state
                .directory
                .get_supervisor_by_id(new.principal_id)
                .await?
                .ok_or_else(|| {
                    OpsError::NotFound(format!("Supervisor with ID {} not found", new.principal_id))
                })?;
        }
    }

    let assignment = ResourceAssignment::new(
        new.principal,
        new.principal_id,
        new.vehicle_id,
        new.start_time,
        new.end_time,
        new.is_primary_driver,
        Utc::now(),
    )?;

    state.assignments.insert_assignment(assignment).await
}

pub async fn approve_assignment(state: &OpsState, id: Uuid) -> OpsResult<ResourceAssignment> {
    state.assignments.approve_assignment(id).await
}

pub async fn reject_assignment(
    state: &OpsState,
    id: Uuid,
    reason: &str,
) -> OpsResult<ResourceAssignment> {
    state.assignments.reject_assignment(id, reason).await
}

pub async fn cancel_assignment(
    state: &OpsState,
    id: Uuid,
    reason: &str,
) -> OpsResult<ResourceAssignment> {
    state.assignments.cancel_assignment(id, reason).await
}

/// Reports every overlapping Pending/Approved assignment pair for the
/// vehicle within `[range_start, range_end)`, with severity derived from the
/// trips and distinct students caught in each overlap window.
pub async fn detect_assignment_conflicts(
    state: &OpsState,
    vehicle_id: Uuid,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> OpsResult<Vec<AssignmentConflict>> {
    if range_end <= range_start {
        return Err(OpsError::Validation(format!(
            "Conflict range is inverted: {} >= {}",
            range_start, range_end
        )));
    }

    let vehicle = state
        .directory
        .get_vehicle_by_id(vehicle_id)
        .await?
        .ok_or_else(|| OpsError::NotFound(format!("Vehicle with ID {} not found", vehicle_id)))?;

    let assignments = state
        .assignments
        .list_assignments_for_vehicle_between(vehicle_id, range_start, Some(range_end))
        .await?;

    let mut conflicts = Vec::new();
    for (i, j) in conflict::find_overlapping_pairs(&assignments) {
        let Some(overlap) = assignments[i].window().overlap_with(&assignments[j].window()) else {
            continue;
        };

        let severity = match vehicle.route_id {
            Some(route_id) => {
                // Clamp the overlap to the queried range before counting.
                let start = overlap.start.max(range_start);
                let end = overlap.end.unwrap_or(range_end).min(range_end);
                let trips = state
                    .trips
                    .list_trips_for_route_between(route_id, start, end)
                    .await?;
                let mut students: Vec<Uuid> =
                    trips.iter().flat_map(|trip| trip.student_ids()).collect();
                students.sort();
                students.dedup();
                conflict::severity(trips.len(), students.len())
            }
            None => conflict::severity(0, 0),
        };

        conflicts.push(AssignmentConflict {
            first: assignments[i].clone(),
            second: assignments[j].clone(),
            overlap,
            severity,
        });
    }

    Ok(conflicts)
}
