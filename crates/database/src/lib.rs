pub mod connection;
pub mod error;
pub mod repositories;

pub use connection::{Database, DatabaseConfig};
pub use error::{DatabaseError, Result};
pub use repositories::{
    calendar::CalendarRepository,
    comments::CommentRepository,
    projects::ProjectRepository,
    tasks::{TaskRepository, MY_TASKS_LIMIT},
};
