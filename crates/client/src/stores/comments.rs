use super::StoreState;
use crate::client::ApiClient;
use std::sync::Arc;
use tigger_models::{Comment, CreateComment, UpdateComment};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Comment thread of one task
pub struct CommentsStore {
    client: Arc<ApiClient>,
    state: RwLock<StoreState<Vec<Comment>>>,
    task_id: RwLock<Option<Uuid>>,
}

impl CommentsStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: RwLock::new(StoreState::default()),
            task_id: RwLock::new(None),
        }
    }

    pub async fn snapshot(&self) -> StoreState<Vec<Comment>> {
        self.state.read().await.clone()
    }

    pub async fn load(&self, task_id: Uuid) {
        *self.task_id.write().await = Some(task_id);
        self.state.write().await.start();
        let result = self.client.list_comments(task_id).await;
        self.state.write().await.settle(result);
    }

    pub async fn refresh(&self) {
        let task_id = *self.task_id.read().await;
        if let Some(task_id) = task_id {
            self.load(task_id).await;
        }
    }

    pub async fn create(&self, content: &str) -> Option<Comment> {
        let task_id = (*self.task_id.read().await)?;
        let request = CreateComment {
            task_id,
            content: content.to_string(),
        };

        match self.client.create_comment(&request).await {
            Ok(comment) => {
                let mut state = self.state.write().await;
                state.data.push(comment.clone());
                state.error = None;
                Some(comment)
            }
            Err(e) => {
                self.state.write().await.fail(&e);
                None
            }
        }
    }

    pub async fn update(&self, comment_id: Uuid, content: &str) -> Option<Comment> {
        let request = UpdateComment {
            content: content.to_string(),
        };

        match self.client.update_comment(comment_id, &request).await {
            Ok(comment) => {
                let mut state = self.state.write().await;
                if let Some(existing) = state.data.iter_mut().find(|c| c.id == comment_id) {
                    *existing = comment.clone();
                }
                state.error = None;
                Some(comment)
            }
            Err(e) => {
                self.state.write().await.fail(&e);
                None
            }
        }
    }

    pub async fn delete(&self, comment_id: Uuid) -> bool {
        match self.client.delete_comment(comment_id).await {
            Ok(()) => {
                let mut state = self.state.write().await;
                state.data.retain(|c| c.id != comment_id);
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
    use crate::stores::testing::serve;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use chrono::Utc;
    use serde_json::{json, Value};

    fn comment(task_id: Uuid, content: &str, author: &str) -> Comment {
        Comment {
            id: Uuid::new_v4(),
            task_id,
            content: content.into(),
            author: author.into(),
            created_by: author.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_thread_lifecycle() {
        let task_id = Uuid::new_v4();
        let existing = comment(task_id, "First!", "user_2");

        let listed = vec![existing.clone()];
        let router = Router::new()
            .route(
                "/api/comments/:id",
                get(move || {
                    let listed = listed.clone();
                    async move { Json(json!({ "success": true, "data": listed })) }
                })
                .put(|| async {
                    (
                        StatusCode::FORBIDDEN,
                        Json(json!({ "success": false, "message": "You can only edit your own comments" })),
                    )
                }),
            )
            .route(
                "/api/comments/",
                post(move |Json(body): Json<Value>| async move {
                    let content = body["content"].as_str().unwrap_or_default().to_string();
                    (
                        StatusCode::CREATED,
                        Json(json!({ "success": true, "data": comment(task_id, &content, "user_1") })),
                    )
                }),
            );

        let client = Arc::new(ApiClient::new(&serve(router).await));
        let store = CommentsStore::new(client);

        store.load(task_id).await;
        assert_eq!(store.snapshot().await.data.len(), 1);

        let created = store.create("Looks good").await.unwrap();
        assert_eq!(created.content, "Looks good");
        assert_eq!(store.snapshot().await.data.len(), 2);

        assert!(store.update(existing.id, "edited").await.is_none());
        let state = store.snapshot().await;
        assert_eq!(state.error.as_deref(), Some("You can only edit your own comments"));
        assert_eq!(state.data[0].content, "First!");
    }
}
