use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use fleetops_core::errors::OpsError;
use fleetops_core::models::assignment::{PrincipalKind, ResourceAssignment};
use fleetops_core::models::leave::{LeaveRequest, LeaveStatus};
use fleetops_core::models::route::{PickupPoint, Route, RouteSchedule};
use fleetops_core::models::schedule::Schedule;
use fleetops_core::models::trip::{Trip, TripKey};
use fleetops_store::MemoryStore;
use fleetops_store::repositories::{
    AssignmentRepository, LeaveRepository, RouteRepository, ScheduleRepository, TripRepository,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

fn sample_schedule() -> Schedule {
    Schedule {
        id: Uuid::new_v4(),
        name: "Morning run".to_string(),
        days_of_week: vec![Weekday::Mon, Weekday::Thu],
        default_start_time: time(7, 0),
        default_end_time: time(8, 0),
        effective_from: date(2024, 3, 4),
        effective_to: Some(date(2024, 3, 31)),
        overrides: Vec::new(),
        created_at: Utc::now(),
    }
}

fn sample_route() -> Route {
    Route {
        id: Uuid::new_v4(),
        name: "North loop".to_string(),
        stops: vec![PickupPoint {
            id: Uuid::new_v4(),
            name: "Library".to_string(),
            sequence: 1,
            latitude: 51.5,
            longitude: -0.1,
            student_ids: vec![Uuid::new_v4()],
        }],
        created_at: Utc::now(),
    }
}

fn open_ended_primary(vehicle_id: Uuid, start: DateTime<Utc>) -> ResourceAssignment {
    ResourceAssignment::new(
        PrincipalKind::Driver,
        Uuid::new_v4(),
        vehicle_id,
        start,
        None,
        true,
        Utc::now(),
    )
    .expect("assignment should validate")
}

fn leave_request(driver_id: Uuid, created_at: DateTime<Utc>) -> LeaveRequest {
    LeaveRequest {
        id: Uuid::new_v4(),
        driver_id,
        start_date: date(2024, 3, 10),
        end_date: date(2024, 3, 12),
        status: LeaveStatus::Pending,
        reason: None,
        auto_replacement_enabled: true,
        suggested_replacement_driver_id: None,
        suggested_replacement_vehicle_id: None,
        suggestion_generated_at: None,
        created_at,
    }
}

async fn seed_trip(store: &MemoryStore, key: TripKey) -> Trip {
    let route = sample_route();
    let trip = Trip::scheduled(key, at(4, 7), at(4, 8), &route, Utc::now());
    store
        .insert_trip(trip)
        .await
        .expect("insert should succeed")
        .into_trip()
}

#[tokio::test]
async fn test_trip_key_is_unique() {
    let store = MemoryStore::new();
    let key = TripKey {
        route_id: Uuid::new_v4(),
        schedule_id: Uuid::new_v4(),
        service_date: date(2024, 3, 4),
    };

    let first = seed_trip(&store, key).await;

    let route = sample_route();
    let duplicate = Trip::scheduled(key, at(4, 7), at(4, 8), &route, Utc::now());
    let second = store.insert_trip(duplicate).await.expect("insert");

    assert!(!second.was_inserted());
    // The existing trip is returned, not a new one.
    assert_eq!(second.into_trip().id, first.id);

    let found = store
        .get_trip_by_key(key)
        .await
        .expect("lookup")
        .expect("trip exists");
    assert_eq!(found.id, first.id);
}

#[tokio::test]
async fn test_second_open_ended_primary_is_rejected() {
    let store = MemoryStore::new();
    let vehicle_id = Uuid::new_v4();

    let mut first = open_ended_primary(vehicle_id, at(1, 0));
    first.approve().expect("approve");
    store.insert_assignment(first).await.expect("insert first");

    let mut second = open_ended_primary(vehicle_id, at(5, 0));
    second.approve().expect("approve");
    let result = store.insert_assignment(second).await;

    assert!(matches!(result, Err(OpsError::Conflict(_))));
}

#[tokio::test]
async fn test_approving_second_open_ended_primary_is_rejected() {
    let store = MemoryStore::new();
    let vehicle_id = Uuid::new_v4();

    let first = store
        .insert_assignment(open_ended_primary(vehicle_id, at(1, 0)))
        .await
        .expect("insert first");
    let second = store
        .insert_assignment(open_ended_primary(vehicle_id, at(5, 0)))
        .await
        .expect("insert second");

    // Both pending is fine; the invariant bites at approval.
    store
        .approve_assignment(first.id)
        .await
        .expect("approve first");
    let result = store.approve_assignment(second.id).await;
    assert!(matches!(result, Err(OpsError::Conflict(_))));

    // Cancelling the holder frees the slot.
    store
        .cancel_assignment(first.id, "driver left")
        .await
        .expect("cancel");
    store
        .approve_assignment(second.id)
        .await
        .expect("approve after slot freed");
}

#[tokio::test]
async fn test_reject_requires_pending() {
    let store = MemoryStore::new();
    let vehicle_id = Uuid::new_v4();

    let assignment = store
        .insert_assignment(open_ended_primary(vehicle_id, at(1, 0)))
        .await
        .expect("insert");
    store
        .approve_assignment(assignment.id)
        .await
        .expect("approve");

    let result = store.reject_assignment(assignment.id, "too late").await;
    assert!(matches!(result, Err(OpsError::Validation(_))));
}

#[tokio::test]
async fn test_vehicle_range_query_includes_open_ended() {
    let store = MemoryStore::new();
    let vehicle_id = Uuid::new_v4();

    let open_ended = store
        .insert_assignment(open_ended_primary(vehicle_id, at(1, 0)))
        .await
        .expect("insert");

    let bounded = ResourceAssignment::new(
        PrincipalKind::Supervisor,
        Uuid::new_v4(),
        vehicle_id,
        at(2, 6),
        Some(at(2, 10)),
        false,
        Utc::now(),
    )
    .expect("assignment");
    store.insert_assignment(bounded).await.expect("insert");

    // A bounded query far in the future still sees the open-ended window.
    let found = store
        .list_assignments_for_vehicle_between(vehicle_id, at(20, 0), Some(at(21, 0)))
        .await
        .expect("query");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, open_ended.id);

    // A query over both windows sees both, ordered by start.
    let found = store
        .list_assignments_for_vehicle_between(vehicle_id, at(1, 0), Some(at(3, 0)))
        .await
        .expect("query");
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].id, open_ended.id);
}

#[tokio::test]
async fn test_pending_needing_suggestion_selection() {
    let store = MemoryStore::new();
    let now = at(9, 12);

    let stale_older = store
        .create_leave_request(leave_request(Uuid::new_v4(), at(1, 0)))
        .await
        .expect("create");
    let stale_newer = store
        .create_leave_request(leave_request(Uuid::new_v4(), at(2, 0)))
        .await
        .expect("create");

    let mut fresh = leave_request(Uuid::new_v4(), at(3, 0));
    fresh.suggestion_generated_at = Some(now - Duration::minutes(10));
    store.create_leave_request(fresh).await.expect("create");

    let mut disabled = leave_request(Uuid::new_v4(), at(4, 0));
    disabled.auto_replacement_enabled = false;
    store.create_leave_request(disabled).await.expect("create");

    let selected = store
        .list_pending_needing_suggestion(now, Duration::hours(2), 3)
        .await
        .expect("selection");

    let ids: Vec<Uuid> = selected.iter().map(|request| request.id).collect();
    assert_eq!(ids, vec![stale_older.id, stale_newer.id]);

    // The limit caps the batch, oldest first.
    let selected = store
        .list_pending_needing_suggestion(now, Duration::hours(2), 1)
        .await
        .expect("selection");
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id, stale_older.id);
}

#[tokio::test]
async fn test_cache_suggestion_stamps_freshness() {
    let store = MemoryStore::new();
    let now = at(9, 12);

    let request = store
        .create_leave_request(leave_request(Uuid::new_v4(), at(1, 0)))
        .await
        .expect("create");

    let driver_id = Uuid::new_v4();
    let vehicle_id = Uuid::new_v4();
    let updated = store
        .cache_suggestion(request.id, Some(driver_id), Some(vehicle_id), now)
        .await
        .expect("cache");

    assert_eq!(updated.suggested_replacement_driver_id, Some(driver_id));
    assert_eq!(updated.suggested_replacement_vehicle_id, Some(vehicle_id));
    assert_eq!(updated.suggestion_generated_at, Some(now));

    // A no-candidate pass clears the pair but still stamps.
    let updated = store
        .cache_suggestion(request.id, None, None, now + Duration::hours(3))
        .await
        .expect("cache");
    assert_eq!(updated.suggested_replacement_driver_id, None);
    assert!(!updated.needs_suggestion(now + Duration::hours(4), Duration::hours(2)));
}

#[tokio::test]
async fn test_schedule_validation_happens_at_creation() {
    let store = MemoryStore::new();
    let mut schedule = sample_schedule();
    schedule.days_of_week.clear();

    let result = store.create_schedule(schedule).await;
    assert!(matches!(result, Err(OpsError::Validation(_))));
}

#[tokio::test]
async fn test_route_schedule_requires_known_entities() {
    let store = MemoryStore::new();
    let schedule = store
        .create_schedule(sample_schedule())
        .await
        .expect("create schedule");

    let binding = RouteSchedule {
        id: Uuid::new_v4(),
        route_id: Uuid::new_v4(),
        schedule_id: schedule.id,
        active_from: date(2024, 3, 1),
        active_to: None,
        created_at: Utc::now(),
    };
    let result = store.create_route_schedule(binding).await;
    assert!(matches!(result, Err(OpsError::NotFound(_))));
}

#[tokio::test]
async fn test_active_route_listing_respects_windows() {
    let store = MemoryStore::new();
    let schedule = store
        .create_schedule(sample_schedule())
        .await
        .expect("create schedule");
    let route = store.create_route(sample_route()).await.expect("create route");

    store
        .create_route_schedule(RouteSchedule {
            id: Uuid::new_v4(),
            route_id: route.id,
            schedule_id: schedule.id,
            active_from: date(2024, 3, 1),
            active_to: Some(date(2024, 3, 15)),
            created_at: Utc::now(),
        })
        .await
        .expect("create binding");

    let active = store
        .list_schedule_ids_with_active_routes(date(2024, 3, 10), date(2024, 3, 20))
        .await
        .expect("query");
    assert_eq!(active, vec![schedule.id]);

    let inactive = store
        .list_schedule_ids_with_active_routes(date(2024, 3, 16), date(2024, 3, 20))
        .await
        .expect("query");
    assert!(inactive.is_empty());
}
