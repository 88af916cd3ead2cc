use super::StoreState;
use crate::client::ApiClient;
use crate::error::Result;
use crate::kanban::{DropLocation, KanbanBoard};
use crate::optimistic::optimistic;
use std::sync::Arc;
use tigger_models::{CreateTask, Task, TaskListQuery, TaskStatus, UpdateTask};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Tasks of the project currently on screen
pub struct TasksStore {
    client: Arc<ApiClient>,
    state: RwLock<StoreState<Vec<Task>>>,
    project_id: RwLock<Option<Uuid>>,
}

impl TasksStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: RwLock::new(StoreState::default()),
            project_id: RwLock::new(None),
        }
    }

    pub async fn snapshot(&self) -> StoreState<Vec<Task>> {
        self.state.read().await.clone()
    }

    pub async fn board(&self) -> KanbanBoard {
        KanbanBoard::from_tasks(&self.state.read().await.data)
    }

    /// Load the project's tasks unless they are already loaded
    pub async fn init(&self, project_id: Uuid) {
        let current = *self.project_id.read().await;
        let initialized = self.state.read().await.initialized;
        if current != Some(project_id) || !initialized {
            self.load(project_id).await;
        }
    }

    pub async fn refresh(&self) {
        let project_id = *self.project_id.read().await;
        if let Some(project_id) = project_id {
            self.load(project_id).await;
        }
    }

    async fn load(&self, project_id: Uuid) {
        *self.project_id.write().await = Some(project_id);
        self.state.write().await.start();

        let filter = TaskListQuery {
            project_id: Some(project_id),
            ..Default::default()
        };
        let result = self.client.list_tasks(&filter).await;
        self.state.write().await.settle(result);
    }

    pub async fn create(&self, request: &CreateTask) -> Option<Task> {
        match self.client.create_task(request).await {
            Ok(task) => {
                let current = *self.project_id.read().await;
                let mut state = self.state.write().await;
                if current == Some(task.project_id) {
                    state.data.push(task.clone());
                }
                state.error = None;
                Some(task)
            }
            Err(e) => {
                self.state.write().await.fail(&e);
                None
            }
        }
    }

    /// Set the status locally and return the previous one, or `None` if the task is unknown.
    pub async fn update_status_optimistic(&self, task_id: Uuid, status: TaskStatus) -> Option<TaskStatus> {
        let mut state = self.state.write().await;
        let task = state.data.iter_mut().find(|t| t.id == task_id)?;
        Some(std::mem::replace(&mut task.status, status))
    }

    pub async fn rollback_status(&self, task_id: Uuid, previous: TaskStatus) {
        let mut state = self.state.write().await;
        if let Some(task) = state.data.iter_mut().find(|t| t.id == task_id) {
            task.status = previous;
        }
    }

    pub async fn sync_status(&self, project_id: Uuid, task_id: Uuid, status: TaskStatus) -> Result<u64> {
        self.client
            .update_task(project_id, task_id, &UpdateTask::status_only(status))
            .await
    }

    /// Move a task to `status` right away, then confirm with the server.
    /// Returns false and restores the old status if the server refuses.
    pub async fn move_task(&self, task_id: Uuid, status: TaskStatus) -> bool {
        let Some(project_id) = *self.project_id.read().await else {
            return false;
        };

        let result = optimistic(
            self.update_status_optimistic(task_id, status),
            || self.sync_status(project_id, task_id, status),
            |previous| self.rollback_status(task_id, previous),
        )
        .await;

        match result {
            Ok(Some(_)) => {
                self.state.write().await.error = None;
                true
            }
            Ok(None) => false,
            Err(e) => {
                self.state.write().await.fail(&e);
                false
            }
        }
    }

    /// Kanban drag end
    pub async fn drop_task(
        &self,
        task_id: Uuid,
        source: DropLocation,
        destination: Option<DropLocation>,
    ) -> bool {
        match KanbanBoard::drop_status(source, destination) {
            Some(status) => self.move_task(task_id, status).await,
            None => false,
        }
    }

    pub async fn delete(&self, task_id: Uuid) -> bool {
        let Some(project_id) = *self.project_id.read().await else {
            return false;
        };

        match self.client.delete_task(project_id, task_id).await {
            Ok(()) => {
                let mut state = self.state.write().await;
                state.data.retain(|t| t.id != task_id);
                state.error = None;
                true
            }
            Err(e) => {
                self.state.write().await.fail(&e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::testing::{serve, task};
    use axum::http::StatusCode;
    use axum::routing::{get, patch, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    fn router(tasks: Vec<Task>, accept_patch: bool) -> Router {
        let project_id = tasks[0].project_id;
        Router::new()
            .route(
                "/api/tasks/",
                post(move || async move {
                    (
                        StatusCode::CREATED,
                        Json(json!({ "success": true, "data": task(project_id, TaskStatus::Todo) })),
                    )
                }),
            )
            .route(
                "/api/tasks/all",
                get(move || {
                    let tasks = tasks.clone();
                    async move { Json(json!({ "success": true, "data": tasks })) }
                }),
            )
            .route(
                "/api/tasks/:task_id",
                patch(move |Json(body): Json<Value>| async move {
                    assert_eq!(body, json!({ "status": "Done" }));
                    if accept_patch {
                        (
                            StatusCode::OK,
                            Json(json!({ "success": true, "data": 1, "message": "Task updated successfully" })),
                        )
                    } else {
                        (
                            StatusCode::FORBIDDEN,
                            Json(json!({ "success": false, "message": "You are only allowed to update task status" })),
                        )
                    }
                }),
            )
    }

    async fn store(accept_patch: bool) -> (TasksStore, Uuid, Uuid) {
        let project_id = Uuid::new_v4();
        let todo = task(project_id, TaskStatus::Todo);
        let task_id = todo.id;

        let client = Arc::new(ApiClient::new(&serve(router(vec![todo], accept_patch)).await));
        let store = TasksStore::new(client);
        store.init(project_id).await;
        (store, project_id, task_id)
    }

    fn status_of(state: &StoreState<Vec<Task>>, task_id: Uuid) -> TaskStatus {
        state.data.iter().find(|t| t.id == task_id).unwrap().status
    }

    #[tokio::test]
    async fn test_move_confirmed() {
        let (store, _, task_id) = store(true).await;

        assert!(store.move_task(task_id, TaskStatus::Done).await);

        let state = store.snapshot().await;
        assert_eq!(status_of(&state, task_id), TaskStatus::Done);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_move_rolled_back_on_failure() {
        let (store, _, task_id) = store(false).await;

        assert!(!store.move_task(task_id, TaskStatus::Done).await);

        let state = store.snapshot().await;
        assert_eq!(status_of(&state, task_id), TaskStatus::Todo);
        assert_eq!(
            state.error.as_deref(),
            Some("You are only allowed to update task status")
        );
    }

    #[tokio::test]
    async fn test_unknown_task_not_sent() {
        let (store, _, _) = store(false).await;

        assert!(!store.move_task(Uuid::new_v4(), TaskStatus::Done).await);
        assert!(store.snapshot().await.error.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_store_calls_complete() {
        let (store, project_id, _) = store(true).await;
        let store = Arc::new(store);

        let mut handles = Vec::new();
        for _ in 0..20 {
            let s = store.clone();
            handles.push(tokio::spawn(async move { s.init(project_id).await }));
            let s = store.clone();
            handles.push(tokio::spawn(async move { s.refresh().await }));
            let s = store.clone();
            handles.push(tokio::spawn(async move {
                s.create(&create_request(project_id)).await;
            }));
        }

        let all = async {
            for handle in handles {
                handle.await.unwrap();
            }
        };
        tokio::time::timeout(std::time::Duration::from_secs(10), all)
            .await
            .expect("store calls deadlocked");

        let state = store.snapshot().await;
        assert!(state.initialized);
        assert!(state.error.is_none());
    }

    fn create_request(project_id: Uuid) -> CreateTask {
        serde_json::from_value(json!({
            "title": "Follow up",
            "description": "Check the release notes",
            "due_date": "2026-06-01",
            "projectId": project_id
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_drop_on_same_slot_is_noop() {
        let (store, _, task_id) = store(true).await;
        let slot = DropLocation {
            status: TaskStatus::Todo,
            index: 0,
        };

        assert!(!store.drop_task(task_id, slot, Some(slot)).await);
        assert_eq!(status_of(&store.snapshot().await, task_id), TaskStatus::Todo);

        let done = DropLocation {
            status: TaskStatus::Done,
            index: 0,
        };
        assert!(store.drop_task(task_id, slot, Some(done)).await);
        assert_eq!(store.board().await.column(TaskStatus::Done).len(), 1);
    }
}
