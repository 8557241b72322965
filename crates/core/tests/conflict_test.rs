use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

use fleetops_core::conflict::{find_overlapping_pairs, occupies_vehicle, severity};
use fleetops_core::models::assignment::{
    AssignmentStatus, AssignmentWindow, PrincipalKind, ResourceAssignment,
};

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
}

fn assignment(
    start_hour: u32,
    end_hour: Option<u32>,
    status: AssignmentStatus,
) -> ResourceAssignment {
    ResourceAssignment {
        id: Uuid::new_v4(),
        principal: PrincipalKind::Driver,
        principal_id: Uuid::new_v4(),
        vehicle_id: Uuid::new_v4(),
        start_time: at(start_hour),
        end_time: end_hour.map(at),
        is_primary_driver: false,
        status,
        status_reason: None,
        created_at: Utc::now(),
    }
}

#[rstest]
// Disjoint.
#[case(0, Some(2), 3, Some(5), false)]
// Touching half-open windows share no instant.
#[case(0, Some(2), 2, Some(4), false)]
// Plain overlap.
#[case(0, Some(3), 2, Some(5), true)]
// Containment.
#[case(0, Some(10), 2, Some(4), true)]
// Open end swallows everything after its start.
#[case(0, None, 5, Some(6), true)]
// Two open-ended windows always overlap.
#[case(0, None, 8, None, true)]
// Open-ended second window starting after the first ends.
#[case(0, Some(2), 3, None, false)]
fn test_overlap_follows_interval_formula(
    #[case] a_start: u32,
    #[case] a_end: Option<u32>,
    #[case] b_start: u32,
    #[case] b_end: Option<u32>,
    #[case] expected: bool,
) {
    let a = AssignmentWindow::new(at(a_start), a_end.map(at));
    let b = AssignmentWindow::new(at(b_start), b_end.map(at));

    assert_eq!(a.overlaps(&b), expected);
    // Symmetry.
    assert_eq!(b.overlaps(&a), expected);

    // The formula itself, with open ends as +infinity.
    let a_before_b_end = b_end.map_or(true, |end| a_start < end);
    let b_before_a_end = a_end.map_or(true, |end| b_start < end);
    assert_eq!(expected, a_before_b_end && b_before_a_end);
}

#[test]
fn test_find_overlapping_pairs_reports_each_pair_once() {
    let assignments = vec![
        assignment(0, Some(4), AssignmentStatus::Approved),
        assignment(2, Some(6), AssignmentStatus::Approved),
        assignment(5, None, AssignmentStatus::Pending),
        assignment(10, Some(12), AssignmentStatus::Approved),
    ];

    let pairs = find_overlapping_pairs(&assignments);
    // (0,1): plain overlap; (1,2): 5..6 against open end; (2,3): open end
    // covers 10..12.
    assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 3)]);
}

#[test]
fn test_rejected_and_cancelled_assignments_never_conflict() {
    let rejected = assignment(0, Some(4), AssignmentStatus::Rejected);
    let cancelled = assignment(0, Some(4), AssignmentStatus::Cancelled);
    let approved = assignment(1, Some(3), AssignmentStatus::Approved);

    assert!(!occupies_vehicle(&rejected));
    assert!(!occupies_vehicle(&cancelled));
    assert!(occupies_vehicle(&approved));

    let pairs = find_overlapping_pairs(&[rejected, cancelled, approved]);
    assert!(pairs.is_empty());
}

#[test]
fn test_severity_scales_with_trips_and_students() {
    let none = severity(0, 0);
    let light = severity(1, 5);
    let heavy = severity(3, 40);

    assert_eq!(none.score, 0.0);
    assert_eq!(light.trips_affected, 1);
    assert_eq!(light.students_affected, 5);
    assert!(light.score > none.score);
    assert!(heavy.score > light.score);
    // Trips dominate students.
    assert!(severity(2, 0).score > severity(1, 9).score);
}

#[test]
fn test_overlap_window_of_open_ended_pair() {
    let bounded = AssignmentWindow::new(at(2), Some(at(6)));
    let open = AssignmentWindow::new(at(4), None);

    let overlap = bounded.overlap_with(&open).expect("overlap exists");
    assert_eq!(overlap.start, at(4));
    assert_eq!(overlap.end, Some(at(6)));

    let open_pair = AssignmentWindow::new(at(1), None)
        .overlap_with(&AssignmentWindow::new(at(3), None))
        .expect("open-ended windows overlap");
    assert_eq!(open_pair.start, at(3));
    assert_eq!(open_pair.end, None);
}
