use crate::error::{ClientError, Result};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tigger_models::{
    ApiResponse, CalendarEvents, CalendarQuery, Comment, CreateComment, CreateProject,
    CreateTask, DashboardSummary, MyTask, Project, ProjectQuery, ProjectSummary, Task,
    TaskListQuery, TaskScopeQuery, UpdateComment, UpdateProject, UpdateTask,
};
use uuid::Uuid;

/// HTTP client for the `/api` surface. Every call unwraps the
/// `{success, data, message}` envelope.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    session_token: Option<String>,
    http_client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    pub fn with_http_client(base_url: &str, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session_token: None,
            http_client,
        }
    }

    /// Send the session token as a bearer credential on every request
    pub fn with_session(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.session_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<ApiResponse<T>> {
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        match serde_json::from_slice::<ApiResponse<T>>(&bytes) {
            Ok(envelope) if status.is_success() && envelope.success => Ok(envelope),
            Ok(envelope) => Err(ClientError::Server {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| format!("Request failed with status {}", status)),
            }),
            Err(e) => {
                tracing::debug!("Undecodable response ({}): {}", status, e);
                // Error envelopes carry no data, so retry the decode without it
                let message = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&bytes)
                    .ok()
                    .and_then(|envelope| envelope.message)
                    .unwrap_or_else(|| format!("Request failed with status {}", status));
                Err(ClientError::Server {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        self.send(builder).await?.data.ok_or(ClientError::MissingData)
    }

    async fn json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.data(self.request(method, path).json(body)).await
    }

    async fn delete(&self, path: &str, scope: Option<&TaskScopeQuery>) -> Result<()> {
        let mut builder = self.request(Method::DELETE, path);
        if let Some(scope) = scope {
            builder = builder.query(scope);
        }
        self.send::<serde_json::Value>(builder).await.map(|_| ())
    }

    // Projects

    pub async fn list_projects(&self, query: Option<&str>) -> Result<Vec<ProjectSummary>> {
        let params = ProjectQuery {
            query: query.map(str::to_string),
        };
        self.data(self.request(Method::GET, "/api/projects/all").query(&params))
            .await
    }

    pub async fn get_project(&self, project_id: Uuid) -> Result<Project> {
        self.data(self.request(Method::GET, &format!("/api/projects/{}", project_id)))
            .await
    }

    pub async fn create_project(&self, request: &CreateProject) -> Result<Project> {
        self.json(Method::POST, "/api/projects/", request).await
    }

    pub async fn update_project(&self, project_id: Uuid, request: &UpdateProject) -> Result<Project> {
        self.json(Method::PUT, &format!("/api/projects/{}", project_id), request)
            .await
    }

    pub async fn delete_project(&self, project_id: Uuid) -> Result<()> {
        self.delete(&format!("/api/projects/{}", project_id), None).await
    }

    pub async fn dashboard(&self) -> Result<DashboardSummary> {
        self.data(self.request(Method::GET, "/api/projects/dashboard"))
            .await
    }

    // Tasks

    pub async fn list_tasks(&self, filter: &TaskListQuery) -> Result<Vec<Task>> {
        self.data(self.request(Method::GET, "/api/tasks/all").query(filter))
            .await
    }

    pub async fn my_tasks(&self) -> Result<Vec<MyTask>> {
        self.data(self.request(Method::GET, "/api/tasks/my")).await
    }

    pub async fn create_task(&self, request: &CreateTask) -> Result<Task> {
        self.json(Method::POST, "/api/tasks/", request).await
    }

    /// PATCH a task; returns the number of rows the server changed
    pub async fn update_task(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        request: &UpdateTask,
    ) -> Result<u64> {
        let builder = self
            .request(Method::PATCH, &format!("/api/tasks/{}", task_id))
            .query(&TaskScopeQuery { project_id })
            .json(request);
        self.data(builder).await
    }

    pub async fn delete_task(&self, project_id: Uuid, task_id: Uuid) -> Result<()> {
        self.delete(
            &format!("/api/tasks/{}", task_id),
            Some(&TaskScopeQuery { project_id }),
        )
        .await
    }

    // Comments

    pub async fn list_comments(&self, task_id: Uuid) -> Result<Vec<Comment>> {
        self.data(self.request(Method::GET, &format!("/api/comments/{}", task_id)))
            .await
    }

    pub async fn create_comment(&self, request: &CreateComment) -> Result<Comment> {
        self.json(Method::POST, "/api/comments/", request).await
    }

    pub async fn update_comment(&self, comment_id: Uuid, request: &UpdateComment) -> Result<Comment> {
        self.json(Method::PUT, &format!("/api/comments/{}", comment_id), request)
            .await
    }

    pub async fn delete_comment(&self, comment_id: Uuid) -> Result<()> {
        self.delete(&format!("/api/comments/{}", comment_id), None).await
    }

    // Calendar

    pub async fn calendar_events(&self, query: &CalendarQuery) -> Result<CalendarEvents> {
        self.data(self.request(Method::GET, "/api/calendar/events").query(query))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use crate::stores::testing::serve;
    use serde_json::json;

    #[test]
    fn test_base_url_trimmed() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_server_message_surfaces() {
        let router = Router::new().route(
            "/api/projects/all",
            get(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "success": false, "message": "No organization selected" })),
                )
            }),
        );
        let client = ApiClient::new(&serve(router).await);

        let err = client.list_projects(None).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "No organization selected");
    }

    #[tokio::test]
    async fn test_data_unwrapped() {
        let router = Router::new().route(
            "/api/tasks/my",
            get(|| async { Json(json!({ "success": true, "data": [] })) }),
        );
        let client = ApiClient::new(&serve(router).await).with_session("token");

        let tasks = client.my_tasks().await.unwrap();
        assert!(tasks.is_empty());
    }
}
