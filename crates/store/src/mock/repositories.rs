use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use mockall::mock;
use uuid::Uuid;

use fleetops_core::errors::OpsResult;
use fleetops_core::models::assignment::{PrincipalKind, ResourceAssignment};
use fleetops_core::models::directory::{Driver, Supervisor, Vehicle};
use fleetops_core::models::leave::{LeaveRequest, LeaveStatus};
use fleetops_core::models::route::{Route, RouteSchedule};
use fleetops_core::models::schedule::Schedule;
use fleetops_core::models::trip::{Trip, TripKey};

use crate::repositories::{
    AssignmentRepository, DirectoryRepository, LeaveRepository, RouteRepository,
    ScheduleRepository, TripInsert, TripRepository,
};

// Mock repositories for testing

mock! {
    pub ScheduleRepo {}

    #[async_trait]
    impl ScheduleRepository for ScheduleRepo {
        async fn create_schedule(&self, schedule: Schedule) -> OpsResult<Schedule>;
        async fn get_schedule_by_id(&self, id: Uuid) -> OpsResult<Option<Schedule>>;
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
}

mock! {
    pub RouteRepo {}

    #[async_trait]
    impl RouteRepository for RouteRepo {
        async fn create_route(&self, route: Route) -> OpsResult<Route>;
        async fn get_route_by_id(&self, id: Uuid) -> OpsResult<Option<Route>>;
    }
}

mock! {
    pub TripRepo {}

    #[async_trait]
    impl TripRepository for TripRepo {
        async fn insert_trip(&self, trip: Trip) -> OpsResult<TripInsert>;
        async fn get_trip_by_id(&self, id: Uuid) -> OpsResult<Option<Trip>>;
        async fn get_trip_by_key(&self, key: TripKey) -> OpsResult<Option<Trip>>;
        async fn list_trips_for_route_between(
            &self,
            route_id: Uuid,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> OpsResult<Vec<Trip>>;
        async fn update_trip(&self, trip: Trip) -> OpsResult<Trip>;
    }
}

mock! {
    pub AssignmentRepo {}

    #[async_trait]
    impl AssignmentRepository for AssignmentRepo {
        async fn insert_assignment(
            &self,
            assignment: ResourceAssignment,
        ) -> OpsResult<ResourceAssignment>;
        async fn get_assignment_by_id(&self, id: Uuid) -> OpsResult<Option<ResourceAssignment>>;
        async fn approve_assignment(&self, id: Uuid) -> OpsResult<ResourceAssignment>;
        async fn reject_assignment(&self, id: Uuid, reason: &str) -> OpsResult<ResourceAssignment>;
        async fn cancel_assignment(&self, id: Uuid, reason: &str) -> OpsResult<ResourceAssignment>;
        async fn list_assignments_for_vehicle_between(
            &self,
            vehicle_id: Uuid,
            start: DateTime<Utc>,
            end: Option<DateTime<Utc>>,
        ) -> OpsResult<Vec<ResourceAssignment>>;
        async fn list_assignments_for_principal_between(
            &self,
            principal: PrincipalKind,
            principal_id: Uuid,
            start: DateTime<Utc>,
            end: Option<DateTime<Utc>>,
        ) -> OpsResult<Vec<ResourceAssignment>>;
    }
}

mock! {
    pub LeaveRepo {}

    #[async_trait]
    impl LeaveRepository for LeaveRepo {
        async fn create_leave_request(&self, request: LeaveRequest) -> OpsResult<LeaveRequest>;
        async fn get_leave_request_by_id(&self, id: Uuid) -> OpsResult<Option<LeaveRequest>>;
        async fn set_leave_status(&self, id: Uuid, status: LeaveStatus) -> OpsResult<LeaveRequest>;
        async fn list_pending_needing_suggestion(
            &self,
            now: DateTime<Utc>,
            freshness: Duration,
            limit: usize,
        ) -> OpsResult<Vec<LeaveRequest>>;
        async fn cache_suggestion(
            &self,
            id: Uuid,
            driver_id: Option<Uuid>,
            vehicle_id: Option<Uuid>,
            generated_at: DateTime<Utc>,
        ) -> OpsResult<LeaveRequest>;
        async fn list_approved_leaves_for_driver_between(
            &self,
            driver_id: Uuid,
            start_date: NaiveDate,
            end_date: NaiveDate,
        ) -> OpsResult<Vec<LeaveRequest>>;
    }
}

mock! {
    pub DirectoryRepo {}

    #[async_trait]
    impl DirectoryRepository for DirectoryRepo {
        async fn upsert_driver(&self, driver: Driver) -> OpsResult<Driver>;
        async fn get_driver_by_id(&self, id: Uuid) -> OpsResult<Option<Driver>>;
        async fn list_active_drivers(&self) -> OpsResult<Vec<Driver>>;
        async fn upsert_vehicle(&self, vehicle: Vehicle) -> OpsResult<Vehicle>;
        async fn get_vehicle_by_id(&self, id: Uuid) -> OpsResult<Option<Vehicle>>;
        async fn list_active_vehicles(&self) -> OpsResult<Vec<Vehicle>>;
        async fn upsert_supervisor(&self, supervisor: Supervisor) -> OpsResult<Supervisor>;
        async fn get_supervisor_by_id(&self, id: Uuid) -> OpsResult<Option<Supervisor>>;
    }
}
