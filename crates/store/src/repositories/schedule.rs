use async_trait::async_trait;
use chrono::NaiveDate;
use fleetops_core::errors::OpsResult;
use fleetops_core::models::route::RouteSchedule;
use fleetops_core::models::schedule::Schedule;
use uuid::Uuid;

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Persists a new schedule. Runs [`Schedule::validate`] first; a
    /// malformed recurrence pattern is rejected before any write.
    async fn create_schedule(&self, schedule: Schedule) -> OpsResult<Schedule>;

    async fn get_schedule_by_id(&self, id: Uuid) -> OpsResult<Option<Schedule>>;

    /// Ids of schedules with at least one route binding whose activation
    /// window intersects the inclusive date range.
    async fn list_schedule_ids_with_active_routes(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> OpsResult<Vec<Uuid>>;

    async fn create_route_schedule(&self, binding: RouteSchedule) -> OpsResult<RouteSchedule>;

    async fn list_route_schedules_by_schedule_id(
        &self,
        schedule_id: Uuid,
    ) -> OpsResult<Vec<RouteSchedule>>;
}
