//! State containers. Each keeps `loading`, the last error message, and its data
//! behind a `tokio::sync::RwLock` so one store can be shared across tasks.

mod calendar;
mod comments;
mod dashboard;
mod projects;
mod tasks;

pub use calendar::{CalendarStore, CalendarView};
pub use comments::CommentsStore;
pub use dashboard::DashboardStore;
pub use projects::ProjectsStore;
pub use tasks::TasksStore;

use crate::error::{ClientError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
    /// Set after the first successful load
    pub initialized: bool,
}

impl<T> StoreState<T> {
    pub(crate) fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub(crate) fn settle(&mut self, result: Result<T>) {
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = data;
                self.initialized = true;
            }
            Err(e) => self.fail(&e),
        }
    }

    pub(crate) fn fail(&mut self, error: &ClientError) {
        tracing::warn!("Store request failed: {}", error);
        self.error = Some(error.to_string());
    }
}
