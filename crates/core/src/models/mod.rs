pub mod assignment;
pub mod conflict;
pub mod directory;
pub mod events;
pub mod leave;
pub mod route;
pub mod schedule;
pub mod suggestion;
pub mod trip;
