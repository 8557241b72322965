use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A service route with its ordered pickup points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: Uuid,
    pub name: String,
    pub stops: Vec<PickupPoint>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupPoint {
    pub id: Uuid,
    pub name: String,
    pub sequence: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub student_ids: Vec<Uuid>,
}

/// Binding of a route to a schedule, with its own activation window. A
/// schedule may serve several routes through separate bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSchedule {
    pub id: Uuid,
    pub route_id: Uuid,
    pub schedule_id: Uuid,
    pub active_from: NaiveDate,
    pub active_to: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Route {
    /// Distinct students served by the route across all stops.
    pub fn student_count(&self) -> usize {
        let mut ids: Vec<Uuid> = self
            .stops
            .iter()
            .flat_map(|stop| stop.student_ids.iter().copied())
            .collect();
        ids.sort();
        ids.dedup();
        ids.len()
    }
}

impl RouteSchedule {
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        if date < self.active_from {
            return false;
        }
        match self.active_to {
            Some(active_to) => date <= active_to,
            None => true,
        }
    }
}
