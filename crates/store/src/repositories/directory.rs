use async_trait::async_trait;
use fleetops_core::errors::OpsResult;
use fleetops_core::models::directory::{Driver, Supervisor, Vehicle};
use uuid::Uuid;

/// Read-mostly facts about drivers, vehicles and supervisors. The upserts
/// exist for seeding and for mirroring an external HR/fleet system.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    async fn upsert_driver(&self, driver: Driver) -> OpsResult<Driver>;

    async fn get_driver_by_id(&self, id: Uuid) -> OpsResult<Option<Driver>>;

    async fn list_active_drivers(&self) -> OpsResult<Vec<Driver>>;

    async fn upsert_vehicle(&self, vehicle: Vehicle) -> OpsResult<Vehicle>;

    async fn get_vehicle_by_id(&self, id: Uuid) -> OpsResult<Option<Vehicle>>;

    async fn list_active_vehicles(&self) -> OpsResult<Vec<Vehicle>>;

    async fn upsert_supervisor(&self, supervisor: Supervisor) -> OpsResult<Supervisor>;

    async fn get_supervisor_by_id(&self, id: Uuid) -> OpsResult<Option<Supervisor>>;
}
