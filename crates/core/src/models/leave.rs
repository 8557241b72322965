use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{OpsError, OpsResult};
use crate::models::assignment::AssignmentWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

/// A driver's request for time off over an inclusive date range, optionally
/// feeding the automatic replacement-suggestion loop.
///
/// `suggestion_generated_at` doubles as the idempotency marker for that loop:
/// a request is only reprocessed once the marker is older than the freshness
/// window, so overlapping or restarted cycles do not renotify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: LeaveStatus,
    pub reason: Option<String>,
    pub auto_replacement_enabled: bool,
    pub suggested_replacement_driver_id: Option<Uuid>,
    pub suggested_replacement_vehicle_id: Option<Uuid>,
    pub suggestion_generated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl LeaveRequest {
    pub fn validate(&self) -> OpsResult<()> {
        if self.end_date < self.start_date {
            return Err(OpsError::Validation(format!(
                "Leave range is inverted: {} > {}",
                self.start_date, self.end_date
            )));
        }
        Ok(())
    }

    /// The leave interval as a half-open UTC window covering whole days.
    pub fn window_utc(&self) -> AssignmentWindow {
        let start = self
            .start_date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always a valid time")
            .and_utc();
        let end = (self.end_date + Duration::days(1))
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always a valid time")
            .and_utc();
        AssignmentWindow::new(start, Some(end))
    }

    pub fn covers_date(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Whether the replacement loop should (re)process this request.
    pub fn needs_suggestion(&self, now: DateTime<Utc>, freshness: Duration) -> bool {
        if self.status != LeaveStatus::Pending || !self.auto_replacement_enabled {
            return false;
        }
        match self.suggestion_generated_at {
            None => true,
            Some(generated_at) => now - generated_at > freshness,
        }
    }
}
