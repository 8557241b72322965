//! Pairwise overlap detection for assignment windows.
//!
//! The detector is pure: it takes the already-fetched assignments for a
//! vehicle and reports every overlapping pair. Severity is attached by the
//! caller once trip and student counts for the overlap window are known.

use crate::models::assignment::{AssignmentStatus, ResourceAssignment};
use crate::models::conflict::ConflictSeverity;

/// Statuses that can double-book a vehicle. Rejected and cancelled
/// assignments never conflict.
pub fn occupies_vehicle(assignment: &ResourceAssignment) -> bool {
    matches!(
        assignment.status,
        AssignmentStatus::Pending | AssignmentStatus::Approved
    )
}

/// Reports every overlapping pair among `assignments`, as index pairs
/// `(i, j)` with `i < j`. Overlap is `a.start < b.end && b.start < a.end`
/// with open ends treated as +infinity.
pub fn find_overlapping_pairs(assignments: &[ResourceAssignment]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..assignments.len() {
        if !occupies_vehicle(&assignments[i]) {
            continue;
        }
        for j in (i + 1)..assignments.len() {
            if !occupies_vehicle(&assignments[j]) {
                continue;
            }
            if assignments[i].window().overlaps(&assignments[j].window()) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Scores an overlap from the trips and distinct students caught inside it.
/// Trips dominate; students refine.
pub fn severity(trips_affected: usize, students_affected: usize) -> ConflictSeverity {
    ConflictSeverity {
        trips_affected,
        students_affected,
        score: trips_affected as f64 * 10.0 + students_affected as f64,
    }
}
