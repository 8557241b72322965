#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use uuid::Uuid;

use fleetops_core::models::assignment::{PrincipalKind, ResourceAssignment};
use fleetops_core::models::directory::{Driver, EmploymentStatus, Vehicle, WorkingHours};
use fleetops_core::models::leave::{LeaveRequest, LeaveStatus};
use fleetops_core::models::route::{PickupPoint, Route, RouteSchedule};
use fleetops_core::models::schedule::Schedule;
use fleetops_core::recurrence::NoHolidays;
use fleetops_core::scoring::WeightedScoringPolicy;
use fleetops_service::OpsState;
use fleetops_store::MemoryStore;
use fleetops_store::repositories::{
    AssignmentRepository, DirectoryRepository, LeaveRepository, RouteRepository,
    ScheduleRepository,
};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// State wired to `store` with no holidays and default scoring weights. The
/// store handle stays usable for seeding and inspection since clones share
/// storage.
pub fn ops_state(store: &MemoryStore) -> OpsState {
    OpsState::with_memory_store(
        store.clone(),
        Arc::new(NoHolidays),
        Arc::new(WeightedScoringPolicy::default()),
    )
}

pub fn mon_thu_schedule() -> Schedule {
    Schedule {
        id: Uuid::new_v4(),
        name: "Morning run".to_string(),
        days_of_week: vec![Weekday::Mon, Weekday::Thu],
        default_start_time: time(7, 0),
        default_end_time: time(8, 0),
        effective_from: date(2024, 3, 4),
        effective_to: Some(date(2024, 3, 31)),
        overrides: Vec::new(),
        created_at: Utc::now(),
    }
}

pub fn route_with_students(students_per_stop: usize) -> Route {
    let stop = |name: &str, sequence: u32| PickupPoint {
        id: Uuid::new_v4(),
        name: name.to_string(),
        sequence,
        latitude: 51.5 + sequence as f64 * 0.01,
        longitude: -0.1,
        student_ids: (0..students_per_stop).map(|_| Uuid::new_v4()).collect(),
    };
    Route {
        id: Uuid::new_v4(),
        name: "North loop".to_string(),
        stops: vec![stop("Library", 1), stop("Market square", 2)],
        created_at: Utc::now(),
    }
}

pub fn binding(route_id: Uuid, schedule_id: Uuid, active_from: NaiveDate) -> RouteSchedule {
    RouteSchedule {
        id: Uuid::new_v4(),
        route_id,
        schedule_id,
        active_from,
        active_to: None,
        created_at: Utc::now(),
    }
}

/// A driver working every day of the week over the given window.
pub fn full_week_driver(name: &str, start: NaiveTime, end: NaiveTime) -> Driver {
    let days = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];
    Driver {
        id: Uuid::new_v4(),
        name: name.to_string(),
        employment_status: EmploymentStatus::Active,
        working_hours: days
            .into_iter()
            .map(|day_of_week| WorkingHours {
                day_of_week,
                start_time: start,
                end_time: end,
            })
            .collect(),
        created_at: Utc::now(),
    }
}

pub fn vehicle_on_route(route_id: Option<Uuid>, capacity: u32) -> Vehicle {
    Vehicle {
        id: Uuid::new_v4(),
        registration: "BUS-042".to_string(),
        capacity,
        route_id,
        is_active: true,
        created_at: Utc::now(),
    }
}

pub fn pending_leave(driver_id: Uuid, start_date: NaiveDate, end_date: NaiveDate) -> LeaveRequest {
    LeaveRequest {
        id: Uuid::new_v4(),
        driver_id,
        start_date,
        end_date,
        status: LeaveStatus::Pending,
        reason: None,
        auto_replacement_enabled: true,
        suggested_replacement_driver_id: None,
        suggested_replacement_vehicle_id: None,
        suggestion_generated_at: None,
        created_at: Utc::now(),
    }
}

/// Seeds an Approved assignment for `principal_id` on `vehicle_id`.
pub async fn seed_approved_assignment(
    store: &MemoryStore,
    principal_id: Uuid,
    vehicle_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    is_primary_driver: bool,
) -> ResourceAssignment {
    let mut assignment = ResourceAssignment::new(
        PrincipalKind::Driver,
        principal_id,
        vehicle_id,
        start_time,
        end_time,
        is_primary_driver,
        Utc::now(),
    )
    .expect("assignment should validate");
    assignment.approve().expect("approve");
    store
        .insert_assignment(assignment)
        .await
        .expect("insert assignment")
}

/// Seeds schedule + route + binding and returns their ids.
pub async fn seed_schedule_with_route(
    store: &MemoryStore,
    schedule: Schedule,
    route: Route,
    active_from: NaiveDate,
) -> (Uuid, Uuid) {
    let schedule = store
        .create_schedule(schedule)
        .await
        .expect("create schedule");
    let route = store.create_route(route).await.expect("create route");
    store
        .create_route_schedule(binding(route.id, schedule.id, active_from))
        .await
        .expect("create binding");
    (schedule.id, route.id)
}

pub async fn seed_driver(store: &MemoryStore, driver: Driver) -> Driver {
    store.upsert_driver(driver).await.expect("upsert driver")
}

pub async fn seed_vehicle(store: &MemoryStore, vehicle: Vehicle) -> Vehicle {
    store.upsert_vehicle(vehicle).await.expect("upsert vehicle")
}

pub async fn seed_leave(store: &MemoryStore, request: LeaveRequest) -> LeaveRequest {
    store
        .create_leave_request(request)
        .await
        .expect("create leave request")
}
