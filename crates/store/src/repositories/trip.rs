use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fleetops_core::errors::OpsResult;
use fleetops_core::models::trip::{Trip, TripKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a trip insert against the unique materialization key. The
/// generator treats `Duplicate` as "already materialized" and moves on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TripInsert {
    Inserted(Trip),
    Duplicate(Trip),
}

impl TripInsert {
    pub fn into_trip(self) -> Trip {
        match self {
            TripInsert::Inserted(trip) | TripInsert::Duplicate(trip) => trip,
        }
    }

    pub fn was_inserted(&self) -> bool {
        matches!(self, TripInsert::Inserted(_))
    }
}

#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Inserts a trip unless one already exists for its key. The check and
    /// the write are atomic; concurrent generators cannot both insert.
    async fn insert_trip(&self, trip: Trip) -> OpsResult<TripInsert>;

    async fn get_trip_by_id(&self, id: Uuid) -> OpsResult<Option<Trip>>;

    async fn get_trip_by_key(&self, key: TripKey) -> OpsResult<Option<Trip>>;

    /// Trips on `route_id` whose planned window intersects `[start, end)`.
    async fn list_trips_for_route_between(
        &self,
        route_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> OpsResult<Vec<Trip>>;

    /// Full-row replacement keyed by `trip.id`; used by the trip-execution
    /// operations.
    async fn update_trip(&self, trip: Trip) -> OpsResult<Trip>;
}
