use super::{like_pattern, search_term};
use crate::error::{DatabaseError, Result};
use sqlx::PgPool;
use tigger_models::{CreateTask, Task, TaskListQuery, TaskWithProject, UpdateTask};
use uuid::Uuid;

/// How many tasks `list_assigned` returns
pub const MY_TASKS_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, created_by: &str, request: &CreateTask) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (
                project_id, title, description, due_date, status, type, priority, assignee, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(request.project_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.due_date)
        .bind(request.status)
        .bind(request.task_type)
        .bind(request.priority)
        .bind(&request.assignee)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    /// Get a task of a project. The caller has already scoped the project to the org.
    pub async fn get(&self, project_id: Uuid, task_id: Uuid) -> Result<Task> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1 AND project_id = $2")
            .bind(task_id)
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Task", &task_id.to_string()))
    }

    /// Get a task through its project's organization
    pub async fn get_in_org(&self, org_id: &str, task_id: Uuid) -> Result<Task> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT t.*
            FROM tasks t
            JOIN projects p ON p.project_id = t.project_id
            WHERE t.id = $1 AND p.org_id = $2
            "#,
        )
        .bind(task_id)
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Task", &task_id.to_string()))
    }

    /// Tasks of one project, filtered by the optional search term and exact filters.
    pub async fn list(&self, project_id: Uuid, filter: &TaskListQuery) -> Result<Vec<Task>> {
        let pattern = search_term(filter.query.as_deref()).map(like_pattern);

        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT *
            FROM tasks
            WHERE project_id = $1
              AND ($2::text IS NULL OR title ILIKE $2 OR description ILIKE $2)
              AND ($3::task_status IS NULL OR status = $3)
              AND ($4::task_type IS NULL OR type = $4)
              AND ($5::priority_level IS NULL OR priority = $5)
            ORDER BY created_at
            "#,
        )
        .bind(project_id)
        .bind(pattern)
        .bind(filter.status)
        .bind(filter.task_type)
        .bind(filter.priority)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Tasks assigned to a user across the organization, most recently updated first
    pub async fn list_assigned(&self, org_id: &str, user_id: &str) -> Result<Vec<TaskWithProject>> {
        let tasks = sqlx::query_as::<_, TaskWithProject>(
            r#"
            SELECT t.*, p.name AS project_name
            FROM tasks t
            JOIN projects p ON p.project_id = t.project_id
            WHERE p.org_id = $1 AND t.assignee = $2
            ORDER BY t.updated_at DESC
            LIMIT $3
            "#,
        )
        .bind(org_id)
        .bind(user_id)
        .bind(MY_TASKS_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Apply the submitted fields and return the number of rows touched.
    /// Concurrent writers are last-write-wins.
    pub async fn update(&self, project_id: Uuid, task_id: Uuid, request: &UpdateTask) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE tasks SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                due_date = COALESCE($5, due_date),
                status = COALESCE($6, status),
                type = COALESCE($7, type),
                priority = COALESCE($8, priority),
                assignee = COALESCE($9, assignee),
                updated_at = NOW()
            WHERE id = $1 AND project_id = $2
            "#,
        )
        .bind(task_id)
        .bind(project_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.due_date)
        .bind(request.status)
        .bind(request.task_type)
        .bind(request.priority)
        .bind(&request.assignee)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(&self, project_id: Uuid, task_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND project_id = $2")
            .bind(task_id)
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Task", &task_id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DatabaseConfig, ProjectRepository};
    use serde_json::json;
    use tigger_models::{CreateProject, TaskStatus};

    async fn seed() -> (TaskRepository, String, Uuid) {
        let db = Database::new(DatabaseConfig::from_env()).await.unwrap();
        let org = format!("org_{}", Uuid::new_v4());
        let request: CreateProject = serde_json::from_value(json!({
            "name": "Board",
            "start_date": "2024-03-01",
            "end_date": "2024-03-31",
            "project_manager": "user_pm"
        }))
        .unwrap();
        let project = ProjectRepository::new(db.pool().clone())
            .create(&org, "user_admin", &request)
            .await
            .unwrap();
        (TaskRepository::new(db.pool().clone()), org, project.project_id)
    }

    fn task_request(project_id: Uuid, title: &str) -> CreateTask {
        serde_json::from_value(json!({
            "title": title,
            "description": "Something to do",
            "due_date": "2024-03-15",
            "assignee": "user_me",
            "projectId": project_id
        }))
        .unwrap()
    }

    #[tokio::test]
    #[ignore] // Only run with database available
    async fn test_status_update_counts_rows() {
        let (repo, _org, project_id) = seed().await;
        let task = repo.create("user_pm", &task_request(project_id, "Write tests")).await.unwrap();

        let affected = repo
            .update(project_id, task.id, &UpdateTask::status_only(TaskStatus::InProgress))
            .await
            .unwrap();
        assert_eq!(affected, 1);
        assert_eq!(repo.get(project_id, task.id).await.unwrap().status, TaskStatus::InProgress);

        let missing = repo
            .update(project_id, Uuid::new_v4(), &UpdateTask::status_only(TaskStatus::Done))
            .await
            .unwrap();
        assert_eq!(missing, 0);
    }

    #[tokio::test]
    #[ignore] // Only run with database available
    async fn test_filters_and_assigned() {
        let (repo, org, project_id) = seed().await;
        repo.create("user_pm", &task_request(project_id, "Fix login")).await.unwrap();
        repo.create("user_pm", &task_request(project_id, "Ship release")).await.unwrap();

        let filter = TaskListQuery {
            query: Some("LOGIN".into()),
            ..Default::default()
        };
        assert_eq!(repo.list(project_id, &filter).await.unwrap().len(), 1);

        let filter = TaskListQuery {
            status: Some(TaskStatus::Done),
            ..Default::default()
        };
        assert!(repo.list(project_id, &filter).await.unwrap().is_empty());

        let mine = repo.list_assigned(&org, "user_me").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].project_name, "Board");
    }
}
