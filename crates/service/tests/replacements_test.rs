mod support;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

use fleetops_core::errors::OpsError;
use fleetops_core::models::assignment::AssignmentStatus;
use fleetops_core::models::leave::LeaveStatus;
use fleetops_core::models::suggestion::SuggestionOutcome;
use fleetops_service::replacements;
use fleetops_service::trips;
use fleetops_store::MemoryStore;
use fleetops_store::repositories::LeaveRepository;

use support::{
    date, full_week_driver, mon_thu_schedule, ops_state, pending_leave, route_with_students,
    seed_approved_assignment, seed_driver, seed_leave, seed_schedule_with_route, seed_vehicle,
    time, vehicle_on_route,
};

#[tokio::test]
async fn test_free_candidate_is_suggested_and_cached() {
    let store = MemoryStore::new();
    let state = ops_state(&store);
    let now = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();

    // Route with trips inside the leave window (Mon 2024-03-11 among them).
    let (schedule_id, route_id) = seed_schedule_with_route(
        &store,
        mon_thu_schedule(),
        route_with_students(2),
        date(2024, 3, 1),
    )
    .await;
    trips::generate_trips_from_schedule(&state, schedule_id, date(2024, 3, 1), date(2024, 3, 31))
        .await
        .expect("generation");

    let vehicle = seed_vehicle(&store, vehicle_on_route(Some(route_id), 30)).await;
    let other_vehicle = seed_vehicle(&store, vehicle_on_route(None, 30)).await;

    let leaving = seed_driver(&store, full_week_driver("Dana", time(5, 0), time(15, 0))).await;
    let free = seed_driver(&store, full_week_driver("Egon", time(6, 0), time(9, 0))).await;
    let busy = seed_driver(&store, full_week_driver("Femi", time(6, 0), time(9, 0))).await;

    // The leaving driver holds the vehicle; the busy candidate is booked
    // elsewhere across the window.
    seed_approved_assignment(
        &store,
        leaving.id,
        vehicle.id,
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        None,
        true,
    )
    .await;
    seed_approved_assignment(
        &store,
        busy.id,
        other_vehicle.id,
        Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap(),
        Some(Utc.with_ymd_and_hms(2024, 3, 14, 0, 0, 0).unwrap()),
        false,
    )
    .await;

    let leave = seed_leave(
        &store,
        pending_leave(leaving.id, date(2024, 3, 10), date(2024, 3, 12)),
    )
    .await;

    let outcome = replacements::build_suggestions(&state, leave.id, now)
        .await
        .expect("suggestion pass");

    let SuggestionOutcome::Ranked(suggestions) = outcome else {
        panic!("expected a ranked outcome");
    };
    // The booked candidate is excluded from the pool entirely.
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].driver_id, free.id);
    assert_eq!(suggestions[0].vehicle_id, vehicle.id);

    let cached = store
        .get_leave_request_by_id(leave.id)
        .await
        .expect("lookup")
        .expect("leave exists");
    assert_eq!(cached.suggested_replacement_driver_id, Some(free.id));
    assert_eq!(cached.suggested_replacement_vehicle_id, Some(vehicle.id));
    assert_eq!(cached.suggestion_generated_at, Some(now));
}

#[tokio::test]
async fn test_ranking_is_stable_across_runs() {
    let store = MemoryStore::new();
    let state = ops_state(&store);
    let now = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();

    let vehicle = seed_vehicle(&store, vehicle_on_route(None, 30)).await;
    let leaving = seed_driver(&store, full_week_driver("Dana", time(5, 0), time(15, 0))).await;
    // Two interchangeable candidates with identical hours and no bookings.
    let first = seed_driver(&store, full_week_driver("Egon", time(6, 0), time(9, 0))).await;
    let second = seed_driver(&store, full_week_driver("Femi", time(6, 0), time(9, 0))).await;

    seed_approved_assignment(
        &store,
        leaving.id,
        vehicle.id,
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        None,
        true,
    )
    .await;

    let leave = seed_leave(
        &store,
        pending_leave(leaving.id, date(2024, 3, 10), date(2024, 3, 12)),
    )
    .await;

    let SuggestionOutcome::Ranked(first_run) = replacements::build_suggestions(&state, leave.id, now)
        .await
        .expect("first run")
    else {
        panic!("expected a ranked outcome");
    };
    let SuggestionOutcome::Ranked(second_run) =
        replacements::build_suggestions(&state, leave.id, now)
            .await
            .expect("second run")
    else {
        panic!("expected a ranked outcome");
    };

    assert_eq!(first_run.len(), 2);
    let order: Vec<_> = first_run.iter().map(|s| s.driver_id).collect();
    let rerun_order: Vec<_> = second_run.iter().map(|s| s.driver_id).collect();
    assert_eq!(order, rerun_order);

    // Equal scores break ties by the lower driver id.
    let mut expected = vec![first.id, second.id];
    expected.sort();
    assert_eq!(order, expected);
}

#[tokio::test]
async fn test_empty_pool_is_a_definitive_outcome() {
    let store = MemoryStore::new();
    let state = ops_state(&store);
    let now = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();

    let vehicle = seed_vehicle(&store, vehicle_on_route(None, 30)).await;
    let leaving = seed_driver(&store, full_week_driver("Dana", time(5, 0), time(15, 0))).await;
    seed_approved_assignment(
        &store,
        leaving.id,
        vehicle.id,
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        None,
        true,
    )
    .await;

    let leave = seed_leave(
        &store,
        pending_leave(leaving.id, date(2024, 3, 10), date(2024, 3, 12)),
    )
    .await;

    let outcome = replacements::build_suggestions(&state, leave.id, now)
        .await
        .expect("suggestion pass");
    assert!(matches!(outcome, SuggestionOutcome::NoCandidates));

    // The freshness stamp is still written so the loop does not renotify.
    let cached = store
        .get_leave_request_by_id(leave.id)
        .await
        .expect("lookup")
        .expect("leave exists");
    assert_eq!(cached.suggested_replacement_driver_id, None);
    assert_eq!(cached.suggestion_generated_at, Some(now));
}

#[tokio::test]
async fn test_suggestions_require_pending_auto_replacement() {
    let store = MemoryStore::new();
    let state = ops_state(&store);
    let now = Utc::now();
    let leaving = seed_driver(&store, full_week_driver("Dana", time(5, 0), time(15, 0))).await;

    let mut approved = pending_leave(leaving.id, date(2024, 3, 10), date(2024, 3, 12));
    approved.status = LeaveStatus::Approved;
    let approved = seed_leave(&store, approved).await;
    let result = replacements::build_suggestions(&state, approved.id, now).await;
    assert!(matches!(result, Err(OpsError::Validation(_))));

    let mut manual = pending_leave(leaving.id, date(2024, 3, 10), date(2024, 3, 12));
    manual.auto_replacement_enabled = false;
    let manual = seed_leave(&store, manual).await;
    let result = replacements::build_suggestions(&state, manual.id, now).await;
    assert!(matches!(result, Err(OpsError::Validation(_))));
}

#[tokio::test]
async fn test_accept_suggestion_materializes_assignment() {
    let store = MemoryStore::new();
    let state = ops_state(&store);
    let now = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();

    let vehicle = seed_vehicle(&store, vehicle_on_route(None, 30)).await;
    let leaving = seed_driver(&store, full_week_driver("Dana", time(5, 0), time(15, 0))).await;
    let candidate = seed_driver(&store, full_week_driver("Egon", time(6, 0), time(9, 0))).await;
    seed_approved_assignment(
        &store,
        leaving.id,
        vehicle.id,
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        None,
        true,
    )
    .await;

    let leave = seed_leave(
        &store,
        pending_leave(leaving.id, date(2024, 3, 10), date(2024, 3, 12)),
    )
    .await;

    // Accepting before any suggestion exists is a not-found.
    let result = replacements::accept_suggestion(&state, leave.id).await;
    assert!(matches!(result, Err(OpsError::NotFound(_))));

    replacements::build_suggestions(&state, leave.id, now)
        .await
        .expect("suggestion pass");

    let assignment = replacements::accept_suggestion(&state, leave.id)
        .await
        .expect("accept");

    assert_eq!(assignment.principal_id, candidate.id);
    assert_eq!(assignment.vehicle_id, vehicle.id);
    assert_eq!(assignment.status, AssignmentStatus::Pending);
    assert!(assignment.is_primary_driver);
    assert_eq!(
        assignment.start_time,
        Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()
    );
    assert_eq!(
        assignment.end_time,
        Some(Utc.with_ymd_and_hms(2024, 3, 13, 0, 0, 0).unwrap())
    );
}
