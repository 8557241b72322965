use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentStatus {
    Active,
    Suspended,
    Terminated,
}

/// Weekly working window for one weekday, in UTC wall-clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub day_of_week: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl WorkingHours {
    pub fn covers(&self, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> bool {
        self.day_of_week == date.weekday() && self.start_time <= start && end <= self.end_time
    }

    pub fn span_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub employment_status: EmploymentStatus,
    pub working_hours: Vec<WorkingHours>,
    pub created_at: DateTime<Utc>,
}

impl Driver {
    pub fn is_active(&self) -> bool {
        self.employment_status == EmploymentStatus::Active
    }

    /// Whether any working window covers `[start, end]` on `date`.
    pub fn works_during(&self, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> bool {
        self.working_hours
            .iter()
            .any(|hours| hours.covers(date, start, end))
    }

    pub fn working_span_minutes(&self, weekday: Weekday) -> Option<i64> {
        self.working_hours
            .iter()
            .filter(|hours| hours.day_of_week == weekday)
            .map(WorkingHours::span_minutes)
            .max()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub registration: String,
    pub capacity: u32,
    /// Route this vehicle is dedicated to, if any.
    pub route_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supervisor {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
