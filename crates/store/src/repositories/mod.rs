pub mod assignment;
pub mod directory;
pub mod leave;
pub mod route;
pub mod schedule;
pub mod trip;

pub use assignment::AssignmentRepository;
pub use directory::DirectoryRepository;
pub use leave::LeaveRepository;
pub use route::RouteRepository;
pub use schedule::ScheduleRepository;
pub use trip::{TripInsert, TripRepository};
