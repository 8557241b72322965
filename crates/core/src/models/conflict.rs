use serde::{Deserialize, Serialize};

use crate::models::assignment::{AssignmentWindow, ResourceAssignment};

/// Derived state, never persisted: a pair of assignments double-booking the
/// same vehicle, with the severity of the overlap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentConflict {
    pub first: ResourceAssignment,
    pub second: ResourceAssignment,
    pub overlap: AssignmentWindow,
    pub severity: ConflictSeverity,
}

/// Severity is a function of the trips and distinct students caught inside
/// the overlap window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConflictSeverity {
    pub trips_affected: usize,
    pub students_affected: usize,
    pub score: f64,
}
