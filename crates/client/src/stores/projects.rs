use super::StoreState;
use crate::client::ApiClient;
use crate::debounce::Debouncer;
use std::sync::Arc;
use tigger_models::{CreateProject, Project, ProjectSummary, UpdateProject};
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct ProjectsStore {
    client: Arc<ApiClient>,
    state: RwLock<StoreState<Vec<ProjectSummary>>>,
    current: RwLock<Option<Project>>,
    query: RwLock<Option<String>>,
    debouncer: Debouncer,
}

impl ProjectsStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: RwLock::new(StoreState::default()),
            current: RwLock::new(None),
            query: RwLock::new(None),
            debouncer: Debouncer::default(),
        }
    }

    pub async fn snapshot(&self) -> StoreState<Vec<ProjectSummary>> {
        self.state.read().await.clone()
    }

    pub async fn current(&self) -> Option<Project> {
        self.current.read().await.clone()
    }

    pub async fn init(&self) {
        if self.state.read().await.initialized {
            return;
        }
        self.refresh().await;
    }

    /// Reload the list with the active search query
    pub async fn refresh(&self) {
        let query = self.query.read().await.clone();
        self.state.write().await.start();
        let result = self.client.list_projects(query.as_deref()).await;
        self.state.write().await.settle(result);
    }

    /// Search-as-you-type. Only the last query of a burst reaches the server.
    pub async fn search(self: &Arc<Self>, query: &str) {
        let query = query.trim();
        *self.query.write().await = (!query.is_empty()).then(|| query.to_string());

        let store = Arc::clone(self);
        self.debouncer
            .call(async move { store.refresh().await })
            .await;
    }

    pub async fn fetch_project(&self, project_id: Uuid) -> Option<Project> {
        match self.client.get_project(project_id).await {
            Ok(project) => {
                *self.current.write().await = Some(project.clone());
                Some(project)
            }
            Err(e) => {
                self.state.write().await.fail(&e);
                None
            }
        }
    }

    pub async fn create(&self, request: &CreateProject) -> Option<Project> {
        match self.client.create_project(request).await {
            Ok(project) => {
                self.refresh().await;
                Some(project)
            }
            Err(e) => {
                self.state.write().await.fail(&e);
                None
            }
        }
    }

    pub async fn update(&self, project_id: Uuid, request: &UpdateProject) -> Option<Project> {
        match self.client.update_project(project_id, request).await {
            Ok(project) => {
                {
                    let mut current = self.current.write().await;
                    if current.as_ref().map(|p| p.project_id) == Some(project_id) {
                        *current = Some(project.clone());
                    }
                }
                self.refresh().await;
                Some(project)
            }
            Err(e) => {
                self.state.write().await.fail(&e);
                None
            }
        }
    }

    pub async fn delete(&self, project_id: Uuid) -> bool {
        match self.client.delete_project(project_id).await {
            Ok(()) => {
                let mut state = self.state.write().await;
                state.data.retain(|p| p.project.project_id != project_id);
                state.error = None;
                drop(state);

                let mut current = self.current.write().await;
                if current.as_ref().map(|p| p.project_id) == Some(project_id) {
                    *current = None;
                }
                true
            }
            Err(e) => {
                self.state.write().await.fail(&e);
                false
            }
        }
    }
}
