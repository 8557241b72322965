use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{OpsError, OpsResult};

/// Who is being bound to the vehicle. Driver and supervisor assignments share
/// the interval and lifecycle logic; only drivers can be primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrincipalKind {
    Driver,
    Supervisor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

/// Half-open time interval `[start, end)`; a missing end means the window is
/// open-ended (still active).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentWindow {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

impl AssignmentWindow {
    pub fn new(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn is_open_ended(&self) -> bool {
        self.end.is_none()
    }

    /// Two windows overlap iff `a.start < b.end && b.start < a.end`, where an
    /// open end compares as +infinity.
    pub fn overlaps(&self, other: &AssignmentWindow) -> bool {
        let self_before_other_end = match other.end {
            Some(end) => self.start < end,
            None => true,
        };
        let other_before_self_end = match self.end {
            Some(end) => other.start < end,
            None => true,
        };
        self_before_other_end && other_before_self_end
    }

    /// The intersection of two overlapping windows; `None` if they do not
    /// overlap.
    pub fn overlap_with(&self, other: &AssignmentWindow) -> Option<AssignmentWindow> {
        if !self.overlaps(other) {
            return None;
        }
        let start = self.start.max(other.start);
        let end = match (self.end, other.end) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        };
        Some(AssignmentWindow { start, end })
    }
}

/// A time-bounded binding of a driver or supervisor to a vehicle.
///
/// At most one open-ended, Approved, primary assignment may exist per vehicle
/// at any instant; the storage layer enforces that invariant at insert and
/// approve time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceAssignment {
    pub id: Uuid,
    pub principal: PrincipalKind,
    pub principal_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_primary_driver: bool,
    pub status: AssignmentStatus,
    pub status_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ResourceAssignment {
    pub fn new(
        principal: PrincipalKind,
        principal_id: Uuid,
        vehicle_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
        is_primary_driver: bool,
        now: DateTime<Utc>,
    ) -> OpsResult<Self> {
        let assignment = Self {
            id: Uuid::new_v4(),
            principal,
            principal_id,
            vehicle_id,
            start_time,
            end_time,
            is_primary_driver,
            status: AssignmentStatus::Pending,
            status_reason: None,
            created_at: now,
        };
        assignment.validate()?;
        Ok(assignment)
    }

    pub fn validate(&self) -> OpsResult<()> {
        if let Some(end_time) = self.end_time {
            if end_time <= self.start_time {
                return Err(OpsError::Validation(format!(
                    "Assignment window is inverted: {} >= {}",
                    self.start_time, end_time
                )));
            }
        }
        if self.principal == PrincipalKind::Supervisor && self.is_primary_driver {
            return Err(OpsError::Validation(
                "Supervisor assignments cannot be flagged primary driver".to_string(),
            ));
        }
        Ok(())
    }

    pub fn window(&self) -> AssignmentWindow {
        AssignmentWindow::new(self.start_time, self.end_time)
    }

    /// True for the assignment shape the per-vehicle uniqueness invariant
    /// applies to.
    pub fn is_open_ended_primary(&self) -> bool {
        self.principal == PrincipalKind::Driver && self.is_primary_driver && self.end_time.is_none()
    }

    pub fn approve(&mut self) -> OpsResult<()> {
        if self.status != AssignmentStatus::Pending {
            return Err(OpsError::Validation(format!(
                "Assignment {} cannot be approved from status {:?}",
                self.id, self.status
            )));
        }
        self.status = AssignmentStatus::Approved;
        self.status_reason = None;
        Ok(())
    }

    pub fn reject(&mut self, reason: &str) -> OpsResult<()> {
        if self.status != AssignmentStatus::Pending {
            return Err(OpsError::Validation(format!(
                "Assignment {} cannot be rejected from status {:?}",
                self.id, self.status
            )));
        }
        if reason.trim().is_empty() {
            return Err(OpsError::Validation(
                "Rejecting an assignment requires a reason".to_string(),
            ));
        }
        self.status = AssignmentStatus::Rejected;
        self.status_reason = Some(reason.to_string());
        Ok(())
    }

    pub fn cancel(&mut self, reason: &str) -> OpsResult<()> {
        if self.status != AssignmentStatus::Approved {
            return Err(OpsError::Validation(format!(
                "Assignment {} cannot be cancelled from status {:?}",
                self.id, self.status
            )));
        }
        if reason.trim().is_empty() {
            return Err(OpsError::Validation(
                "Cancelling an assignment requires a reason".to_string(),
            ));
        }
        self.status = AssignmentStatus::Cancelled;
        self.status_reason = Some(reason.to_string());
        Ok(())
    }
}
