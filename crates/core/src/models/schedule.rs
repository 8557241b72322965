use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{OpsError, OpsResult};

/// A recurring service pattern: days of week with default run times, bounded
/// by an effective window, plus per-date overrides.
///
/// `overrides` is an ordered edit log; when two entries target the same date
/// the later one wins. Overrides dated outside the effective window are
/// ignored entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub name: String,
    pub days_of_week: Vec<Weekday>,
    pub default_start_time: NaiveTime,
    pub default_end_time: NaiveTime,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
    pub overrides: Vec<TimeOverride>,
    pub created_at: DateTime<Utc>,
}

/// A per-date exception to the recurrence pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeOverride {
    pub date: NaiveDate,
    pub action: OverrideAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OverrideAction {
    /// Drop the occurrence for this date even if the pattern matches.
    Skip,
    /// Run on this date with these times, whether or not the pattern matches.
    Reschedule {
        start_time: NaiveTime,
        end_time: NaiveTime,
    },
}

impl Schedule {
    /// Checks the recurrence definition before it is stored. A schedule that
    /// fails here is rejected at creation time; expansion assumes a valid
    /// schedule.
    pub fn validate(&self) -> OpsResult<()> {
        if self.days_of_week.is_empty() {
            return Err(OpsError::Validation(
                "Schedule must recur on at least one day of the week".to_string(),
            ));
        }
        if self.default_start_time >= self.default_end_time {
            return Err(OpsError::Validation(format!(
                "Schedule start time {} must be before end time {}",
                self.default_start_time, self.default_end_time
            )));
        }
        if let Some(effective_to) = self.effective_to {
            if effective_to < self.effective_from {
                return Err(OpsError::Validation(format!(
                    "Schedule effective window is inverted: {} > {}",
                    self.effective_from, effective_to
                )));
            }
        }
        for over in &self.overrides {
            if let OverrideAction::Reschedule {
                start_time,
                end_time,
            } = &over.action
            {
                if start_time >= end_time {
                    return Err(OpsError::Validation(format!(
                        "Override for {} has an inverted time range",
                        over.date
                    )));
                }
            }
        }
        Ok(())
    }

    /// The override in force for `date`, if any. Later entries shadow earlier
    /// ones; overrides outside the effective window never apply.
    pub fn override_for(&self, date: NaiveDate) -> Option<&OverrideAction> {
        if date < self.effective_from {
            return None;
        }
        if let Some(effective_to) = self.effective_to {
            if date > effective_to {
                return None;
            }
        }
        self.overrides
            .iter()
            .rev()
            .find(|over| over.date == date)
            .map(|over| &over.action)
    }

    pub fn recurs_on(&self, weekday: Weekday) -> bool {
        self.days_of_week.contains(&weekday)
    }
}
