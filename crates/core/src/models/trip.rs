use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{OpsError, OpsResult};
use crate::models::route::Route;

/// Materialization key for a trip. At most one trip may exist per key; the
/// storage layer enforces this as a unique index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripKey {
    pub route_id: Uuid,
    pub schedule_id: Uuid,
    pub service_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// One concrete, dated run of a route. Created by the trip generator with a
/// snapshot of the route's stops as they were at generation time; later stop
/// edits on the route do not rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub route_id: Uuid,
    pub schedule_id: Uuid,
    pub service_date: NaiveDate,
    pub planned_start: DateTime<Utc>,
    pub planned_end: DateTime<Utc>,
    pub actual_start: Option<DateTime<Utc>>,
    pub actual_end: Option<DateTime<Utc>>,
    pub status: TripStatus,
    pub stops: Vec<TripStop>,
    pub attendance: Vec<AttendanceRecord>,
    pub last_location: Option<VehicleLocation>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripStop {
    pub pickup_point_id: Uuid,
    pub name: String,
    pub sequence: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub student_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub student_id: Uuid,
    pub pickup_point_id: Uuid,
    pub present: bool,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Aggregate result of an automatic generation pass over all schedules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripGenerationSummary {
    pub schedules_processed: usize,
    pub trips_generated: usize,
}

/// Result of generating one schedule over a range: every trip covering the
/// range (created now or materialized earlier) plus how many are new.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedTrips {
    pub trips: Vec<Trip>,
    pub newly_created: usize,
}

impl Trip {
    /// Builds a freshly scheduled trip, snapshotting the route's current
    /// ordered stop list.
    pub fn scheduled(
        key: TripKey,
        planned_start: DateTime<Utc>,
        planned_end: DateTime<Utc>,
        route: &Route,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            route_id: key.route_id,
            schedule_id: key.schedule_id,
            service_date: key.service_date,
            planned_start,
            planned_end,
            actual_start: None,
            actual_end: None,
            status: TripStatus::Scheduled,
            stops: route
                .stops
                .iter()
                .map(|stop| TripStop {
                    pickup_point_id: stop.id,
                    name: stop.name.clone(),
                    sequence: stop.sequence,
                    latitude: stop.latitude,
                    longitude: stop.longitude,
                    student_ids: stop.student_ids.clone(),
                })
                .collect(),
            attendance: Vec::new(),
            last_location: None,
            created_at: now,
        }
    }

    pub fn key(&self) -> TripKey {
        TripKey {
            route_id: self.route_id,
            schedule_id: self.schedule_id,
            service_date: self.service_date,
        }
    }

    /// True when the planned window intersects `[start, end)`.
    pub fn intersects(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.planned_start < end && start < self.planned_end
    }

    /// Distinct students on the trip's stop snapshot.
    pub fn student_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self
            .stops
            .iter()
            .flat_map(|stop| stop.student_ids.iter().copied())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> OpsResult<()> {
        if self.status != TripStatus::Scheduled {
            return Err(OpsError::Validation(format!(
                "Trip {} cannot start from status {:?}",
                self.id, self.status
            )));
        }
        self.status = TripStatus::InProgress;
        self.actual_start = Some(now);
        Ok(())
    }

    pub fn complete(&mut self, now: DateTime<Utc>) -> OpsResult<()> {
        if self.status != TripStatus::InProgress {
            return Err(OpsError::Validation(format!(
                "Trip {} cannot complete from status {:?}",
                self.id, self.status
            )));
        }
        self.status = TripStatus::Completed;
        self.actual_end = Some(now);
        Ok(())
    }

    pub fn cancel(&mut self) -> OpsResult<()> {
        match self.status {
            TripStatus::Scheduled | TripStatus::InProgress => {
                self.status = TripStatus::Cancelled;
                Ok(())
            }
            status => Err(OpsError::Validation(format!(
                "Trip {} cannot be cancelled from status {:?}",
                self.id, status
            ))),
        }
    }

    pub fn record_location(&mut self, location: VehicleLocation) -> OpsResult<()> {
        if self.status != TripStatus::InProgress {
            return Err(OpsError::Validation(format!(
                "Trip {} is not in progress; location updates are not accepted",
                self.id
            )));
        }
        self.last_location = Some(location);
        Ok(())
    }

    pub fn record_attendance(&mut self, record: AttendanceRecord) -> OpsResult<()> {
        if self.status != TripStatus::InProgress {
            return Err(OpsError::Validation(format!(
                "Trip {} is not in progress; attendance is not accepted",
                self.id
            )));
        }
        // One record per student per trip; a re-scan replaces the first one.
        self.attendance
            .retain(|existing| existing.student_id != record.student_id);
        self.attendance.push(record);
        Ok(())
    }
}
