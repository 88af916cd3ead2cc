use crate::client::ApiClient;
use crate::stores::{CalendarStore, CommentsStore, DashboardStore, ProjectsStore, TasksStore};
use std::sync::Arc;

/// Every store of the app, sharing one client. Built once and handed to the UI.
pub struct AppContext {
    pub client: Arc<ApiClient>,
    pub projects: Arc<ProjectsStore>,
    pub tasks: TasksStore,
    pub comments: CommentsStore,
    pub calendar: CalendarStore,
    pub dashboard: DashboardStore,
}

impl AppContext {
    pub fn new(client: ApiClient) -> Self {
        let client = Arc::new(client);
        Self {
            projects: Arc::new(ProjectsStore::new(client.clone())),
            tasks: TasksStore::new(client.clone()),
            comments: CommentsStore::new(client.clone()),
            calendar: CalendarStore::new(client.clone()),
            dashboard: DashboardStore::new(client.clone()),
            client,
        }
    }

    /// Load the stores shown on the landing screens
    pub async fn init(&self) {
        tokio::join!(self.projects.init(), self.dashboard.init());
    }
}
