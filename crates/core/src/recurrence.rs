//! Recurrence expansion: turns a [`Schedule`] definition into concrete dated
//! occurrences over a requested range.
//!
//! Expansion is a pure walk over calendar days. A day produces an occurrence
//! iff its weekday matches the pattern or a reschedule override names it,
//! it is not skip-overridden, and the academic calendar does not mark it a
//! holiday. `is_date_matching` answers membership for a single date and is
//! consistent with `generate_dates` by construction: both go through
//! [`resolve_date`].

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::{OpsError, OpsResult};
use crate::models::schedule::{OverrideAction, Schedule};

/// Holiday / school-day predicate consumed by the expansion. Implementations
/// answer from already-fetched data; no I/O happens inside the engine.
pub trait AcademicCalendar: Send + Sync {
    fn is_school_holiday(&self, date: NaiveDate) -> bool;
}

/// Calendar backed by an explicit set of holiday dates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolidayCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: dates.into_iter().collect(),
        }
    }
}

impl AcademicCalendar for HolidayCalendar {
    fn is_school_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }
}

/// Calendar with no holidays at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl AcademicCalendar for NoHolidays {
    fn is_school_holiday(&self, _date: NaiveDate) -> bool {
        false
    }
}

/// One expanded occurrence of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

fn resolve_date(
    schedule: &Schedule,
    date: NaiveDate,
    calendar: &dyn AcademicCalendar,
) -> Option<(NaiveTime, NaiveTime)> {
    if date < schedule.effective_from {
        return None;
    }
    if let Some(effective_to) = schedule.effective_to {
        if date > effective_to {
            return None;
        }
    }
    if calendar.is_school_holiday(date) {
        return None;
    }
    match schedule.override_for(date) {
        Some(OverrideAction::Skip) => None,
        Some(OverrideAction::Reschedule {
            start_time,
            end_time,
        }) => Some((*start_time, *end_time)),
        None => {
            if schedule.recurs_on(date.weekday()) {
                Some((schedule.default_start_time, schedule.default_end_time))
            } else {
                None
            }
        }
    }
}

/// Expands `schedule` over `[range_start, range_end]` (both inclusive) into
/// an ordered list of occurrences, strictly increasing by date and bounded by
/// the range and the schedule's effective window.
pub fn generate_dates(
    schedule: &Schedule,
    range_start: NaiveDate,
    range_end: NaiveDate,
    calendar: &dyn AcademicCalendar,
) -> OpsResult<Vec<Occurrence>> {
    if range_start > range_end {
        return Err(OpsError::Validation(format!(
            "Generation range is inverted: {} > {}",
            range_start, range_end
        )));
    }

    let first = range_start.max(schedule.effective_from);
    let last = match schedule.effective_to {
        Some(effective_to) => range_end.min(effective_to),
        None => range_end,
    };

    let mut occurrences = Vec::new();
    for date in first.iter_days().take_while(|date| *date <= last) {
        if let Some((start_time, end_time)) = resolve_date(schedule, date, calendar) {
            occurrences.push(Occurrence {
                date,
                start_time,
                end_time,
            });
        }
    }
    Ok(occurrences)
}

/// Membership test matching `generate_dates`: true iff expanding a range that
/// contains `date` would produce an occurrence on it.
pub fn is_date_matching(
    schedule: &Schedule,
    date: NaiveDate,
    calendar: &dyn AcademicCalendar,
) -> bool {
    resolve_date(schedule, date, calendar).is_some()
}
