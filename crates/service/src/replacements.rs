//! Replacement-candidate ranking for leave requests.
//!
//! The candidate pool is filtered hard (active employment, working hours
//! covering every affected trip, no approved leave, no occupying assignment
//! in the window) and then ranked by the configured scoring policy. The best
//! candidate is cached onto the leave request; an empty pool is a definitive
//! `NoCandidates` outcome that still stamps the freshness marker so the
//! background loop does not immediately reprocess the request.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use fleetops_core::conflict::occupies_vehicle;
use fleetops_core::errors::{OpsError, OpsResult};
use fleetops_core::models::assignment::{
    AssignmentStatus, AssignmentWindow, PrincipalKind, ResourceAssignment,
};
use fleetops_core::models::directory::{Driver, Vehicle};
use fleetops_core::models::leave::{LeaveRequest, LeaveStatus};
use fleetops_core::models::suggestion::{Suggestion, SuggestionOutcome};
use fleetops_core::models::trip::Trip;
use fleetops_core::scoring::{ScoringContext, rank_suggestions};

use crate::OpsState;

/// How far around the leave window a candidate's own assignments count as
/// disruption.
const DISRUPTION_LOOKAROUND_DAYS: i64 = 3;

/// Builds the ranked suggestion list for a Pending, auto-replacement leave
/// request, caching the best candidate (or a no-candidate stamp) onto it.
pub async fn build_suggestions(
    state: &OpsState,
    leave_request_id: Uuid,
    now: DateTime<Utc>,
) -> OpsResult<SuggestionOutcome> {
    let leave = state
        .leaves
        .get_leave_request_by_id(leave_request_id)
        .await?
        .ok_or_else(|| {
            OpsError::NotFound(format!("Leave request with ID {} not found", leave_request_id))
        })?;

    if leave.status != LeaveStatus::Pending {
        return Err(OpsError::Validation(format!(
            "Leave request {} is not pending; suggestions apply to pending requests only",
            leave.id
        )));
    }
    if !leave.auto_replacement_enabled {
        return Err(OpsError::Validation(format!(
            "Leave request {} does not have automatic replacement enabled",
            leave.id
        )));
    }

    let window = leave.window_utc();

    // The leaving driver's approved assignments in the window tell us which
    // vehicle needs covering and which trips are affected.
    let driver_assignments: Vec<ResourceAssignment> = state
        .assignments
        .list_assignments_for_principal_between(
            PrincipalKind::Driver,
            leave.driver_id,
            window.start,
            window.end,
        )
        .await?
        .into_iter()
        .filter(|assignment| assignment.status == AssignmentStatus::Approved)
        .collect();

    let affected_trips = collect_affected_trips(state, &driver_assignments, &window).await?;

    let Some(vehicle) = pick_replacement_vehicle(state, &driver_assignments, &window).await? else {
        tracing::info!(leave_request_id = %leave.id, "no replacement vehicle available");
        state
            .leaves
            .cache_suggestion(leave.id, None, None, now)
            .await?;
        return Ok(SuggestionOutcome::NoCandidates);
    };

    let mut suggestions = Vec::new();
    for candidate in state.directory.list_active_drivers().await? {
        if candidate.id == leave.driver_id {
            continue;
        }
        if !covers_all_trips(&candidate, &affected_trips) {
            continue;
        }

        let approved_leaves = state
            .leaves
            .list_approved_leaves_for_driver_between(candidate.id, leave.start_date, leave.end_date)
            .await?;
        if !approved_leaves.is_empty() {
            continue;
        }

        let overlapping = state
            .assignments
            .list_assignments_for_principal_between(
                PrincipalKind::Driver,
                candidate.id,
                window.start,
                window.end,
            )
            .await?;
        if overlapping.iter().any(occupies_vehicle) {
            continue;
        }

        let lookaround = Duration::days(DISRUPTION_LOOKAROUND_DAYS);
        let nearby = state
            .assignments
            .list_assignments_for_principal_between(
                PrincipalKind::Driver,
                candidate.id,
                window.start - lookaround,
                window.end.map(|end| end + lookaround),
            )
            .await?;

        let ctx = ScoringContext {
            driver: &candidate,
            vehicle: &vehicle,
            affected_trips: &affected_trips,
            assignments_nearby: nearby.len(),
        };
        let score = state.scoring.score(&ctx);
        suggestions.push(Suggestion {
            driver_id: candidate.id,
            vehicle_id: vehicle.id,
            score,
            reason: format!(
                "covers {} affected trip(s) on vehicle {}",
                affected_trips.len(),
                vehicle.registration
            ),
        });
    }

    if suggestions.is_empty() {
        tracing::info!(leave_request_id = %leave.id, "no replacement candidates after filtering");
        state
            .leaves
            .cache_suggestion(leave.id, None, None, now)
            .await?;
        return Ok(SuggestionOutcome::NoCandidates);
    }

    let ranked = rank_suggestions(suggestions);
    if let Some(best) = ranked.first() {
        tracing::info!(
            leave_request_id = %leave.id,
            driver_id = %best.driver_id,
            vehicle_id = %best.vehicle_id,
            score = best.score,
            "replacement suggestion cached"
        );
        state
            .leaves
            .cache_suggestion(leave.id, Some(best.driver_id), Some(best.vehicle_id), now)
            .await?;
    }

    Ok(SuggestionOutcome::Ranked(ranked))
}

/// Materializes the cached suggestion as a Pending primary-driver assignment
/// over the leave window.
pub async fn accept_suggestion(
    state: &OpsState,
    leave_request_id: Uuid,
) -> OpsResult<ResourceAssignment> {
    let leave = state
        .leaves
        .get_leave_request_by_id(leave_request_id)
        .await?
        .ok_or_else(|| {
            OpsError::NotFound(format!("Leave request with ID {} not found", leave_request_id))
        })?;

    let (driver_id, vehicle_id) = cached_suggestion(&leave)?;
    let window = leave.window_utc();

    let assignment = ResourceAssignment::new(
        PrincipalKind::Driver,
        driver_id,
        vehicle_id,
        window.start,
        window.end,
        true,
        Utc::now(),
    )?;

    state.assignments.insert_assignment(assignment).await
}

fn cached_suggestion(leave: &LeaveRequest) -> OpsResult<(Uuid, Uuid)> {
    match (
        leave.suggested_replacement_driver_id,
        leave.suggested_replacement_vehicle_id,
    ) {
        (Some(driver_id), Some(vehicle_id)) => Ok((driver_id, vehicle_id)),
        _ => Err(OpsError::NotFound(format!(
            "Leave request {} has no cached replacement suggestion",
            leave.id
        ))),
    }
}

async fn collect_affected_trips(
    state: &OpsState,
    driver_assignments: &[ResourceAssignment],
    window: &AssignmentWindow,
) -> OpsResult<Vec<Trip>> {
    let mut trips: Vec<Trip> = Vec::new();
    for assignment in driver_assignments {
        let Some(vehicle) = state
            .directory
            .get_vehicle_by_id(assignment.vehicle_id)
            .await?
        else {
            continue;
        };
        let Some(route_id) = vehicle.route_id else {
            continue;
        };
        let Some(end) = window.end else {
            continue;
        };
        let found = state
            .trips
            .list_trips_for_route_between(route_id, window.start, end)
            .await?;
        trips.extend(found);
    }
    trips.sort_by_key(|trip| (trip.planned_start, trip.id));
    trips.dedup_by_key(|trip| trip.id);
    Ok(trips)
}

/// The replacement takes over the leaving driver's vehicle when there is
/// one (primary bindings first, then earliest start). Otherwise fall back to
/// the lowest-id active vehicle that is free in the window.
async fn pick_replacement_vehicle(
    state: &OpsState,
    driver_assignments: &[ResourceAssignment],
    window: &AssignmentWindow,
) -> OpsResult<Option<Vehicle>> {
    let mut ordered: Vec<&ResourceAssignment> = driver_assignments.iter().collect();
    ordered.sort_by_key(|assignment| {
        (
            !assignment.is_primary_driver,
            assignment.start_time,
            assignment.id,
        )
    });

    for assignment in ordered {
        if let Some(vehicle) = state
            .directory
            .get_vehicle_by_id(assignment.vehicle_id)
            .await?
        {
            if vehicle.is_active {
                return Ok(Some(vehicle));
            }
        }
    }

    for vehicle in state.directory.list_active_vehicles().await? {
        let occupied = state
            .assignments
            .list_assignments_for_vehicle_between(vehicle.id, window.start, window.end)
            .await?
            .iter()
            .any(occupies_vehicle);
        if !occupied {
            return Ok(Some(vehicle));
        }
    }

    Ok(None)
}

fn covers_all_trips(candidate: &Driver, affected_trips: &[Trip]) -> bool {
    affected_trips.iter().all(|trip| {
        candidate.works_during(
            trip.service_date,
            trip.planned_start.time(),
            trip.planned_end.time(),
        )
    })
}
