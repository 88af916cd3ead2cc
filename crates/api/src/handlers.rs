pub mod calendar;
pub mod comments;
pub mod health;
pub mod projects;
pub mod tasks;
