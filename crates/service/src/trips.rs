//! Trip generation and execution.
//!
//! Generation is idempotent end to end: the store's unique materialization
//! key makes re-running a range a no-op for dates that already have trips,
//! so overlapping orchestrator cycles and manual regenerations are safe.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use fleetops_core::errors::{OpsError, OpsResult};
use fleetops_core::models::route::Route;
use fleetops_core::models::trip::{
    AttendanceRecord, GeneratedTrips, Trip, TripGenerationSummary, TripKey, VehicleLocation,
};
use fleetops_core::recurrence;

use crate::OpsState;

/// Materializes trips for one schedule over `[start_date, end_date]`.
///
/// For every route binding active on an occurrence date, a trip is created
/// with the route's current ordered stop snapshot and the occurrence's
/// planned times; dates already materialized are returned as-is.
pub async fn generate_trips_from_schedule(
    state: &OpsState,
    schedule_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> OpsResult<GeneratedTrips> {
    let schedule = state
        .schedules
        .get_schedule_by_id(schedule_id)
        .await?
        .ok_or_else(|| OpsError::NotFound(format!("Schedule with ID {} not found", schedule_id)))?;

    let bindings = state
        .schedules
        .list_route_schedules_by_schedule_id(schedule_id)
        .await?;

    let occurrences =
        recurrence::generate_dates(&schedule, start_date, end_date, state.calendar.as_ref())?;

    // Fetch each bound route once; the stop snapshot comes from here.
    let mut routes: HashMap<Uuid, Route> = HashMap::new();
    for binding in &bindings {
        if !routes.contains_key(&binding.route_id) {
            let route = state
                .routes
                .get_route_by_id(binding.route_id)
                .await?
                .ok_or_else(|| {
                    OpsError::NotFound(format!("Route with ID {} not found", binding.route_id))
                })?;
            routes.insert(binding.route_id, route);
        }
    }

    let now = Utc::now();
    let mut trips = Vec::new();
    let mut newly_created = 0;

    for binding in &bindings {
        let Some(route) = routes.get(&binding.route_id) else {
            continue;
        };
        for occurrence in &occurrences {
            if !binding.is_active_on(occurrence.date) {
                continue;
            }
            let key = TripKey {
                route_id: binding.route_id,
                schedule_id,
                service_date: occurrence.date,
            };
            let planned_start = occurrence.date.and_time(occurrence.start_time).and_utc();
            let planned_end = occurrence.date.and_time(occurrence.end_time).and_utc();
            let trip = Trip::scheduled(key, planned_start, planned_end, route, now);
            let inserted = state.trips.insert_trip(trip).await?;
            if inserted.was_inserted() {
                newly_created += 1;
            }
            trips.push(inserted.into_trip());
        }
    }

    tracing::info!(
        schedule_id = %schedule_id,
        trips = trips.len(),
        newly_created,
        "generated trips for schedule"
    );

    Ok(GeneratedTrips {
        trips,
        newly_created,
    })
}

/// Runs generation for every schedule with an active route binding over the
/// rolling horizon `[today, today + days_ahead]`.
///
/// A failing schedule is logged with its id and skipped; it never aborts the
/// batch. The next cycle is the retry mechanism.
pub async fn generate_all_trips(
    state: &OpsState,
    today: NaiveDate,
    days_ahead: i64,
) -> OpsResult<TripGenerationSummary> {
    let horizon_end = today + Duration::days(days_ahead);
    let schedule_ids = state
        .schedules
        .list_schedule_ids_with_active_routes(today, horizon_end)
        .await?;

    let mut summary = TripGenerationSummary::default();
    for schedule_id in schedule_ids {
        match generate_trips_from_schedule(state, schedule_id, today, horizon_end).await {
            Ok(batch) => {
                summary.schedules_processed += 1;
                summary.trips_generated += batch.newly_created;
            }
            Err(err) => {
                tracing::error!(
                    schedule_id = %schedule_id,
                    error = %err,
                    "trip generation failed for schedule; continuing with remaining schedules"
                );
            }
        }
    }

    Ok(summary)
}

async fn load_trip(state: &OpsState, trip_id: Uuid) -> OpsResult<Trip> {
    state
        .trips
        .get_trip_by_id(trip_id)
        .await?
        .ok_or_else(|| OpsError::NotFound(format!("Trip with ID {} not found", trip_id)))
}

pub async fn start_trip(state: &OpsState, trip_id: Uuid, now: DateTime<Utc>) -> OpsResult<Trip> {
    let mut trip = load_trip(state, trip_id).await?;
    trip.start(now)?;
    state.trips.update_trip(trip).await
}

pub async fn complete_trip(state: &OpsState, trip_id: Uuid, now: DateTime<Utc>) -> OpsResult<Trip> {
    let mut trip = load_trip(state, trip_id).await?;
    trip.complete(now)?;
    state.trips.update_trip(trip).await
}

pub async fn cancel_trip(state: &OpsState, trip_id: Uuid) -> OpsResult<Trip> {
    let mut trip = load_trip(state, trip_id).await?;
    trip.cancel()?;
    state.trips.update_trip(trip).await
}

pub async fn update_trip_location(
    state: &OpsState,
    trip_id: Uuid,
    location: VehicleLocation,
) -> OpsResult<Trip> {
    let mut trip = load_trip(state, trip_id).await?;
    trip.record_location(location)?;
    state.trips.update_trip(trip).await
}

pub async fn record_attendance(
    state: &OpsState,
    trip_id: Uuid,
    record: AttendanceRecord,
) -> OpsResult<Trip> {
    let mut trip = load_trip(state, trip_id).await?;
    trip.record_attendance(record)?;
    state.trips.update_trip(trip).await
}
