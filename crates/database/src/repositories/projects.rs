use super::{like_pattern, search_term};
use crate::error::{DatabaseError, Result};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use tigger_models::{
    CreateProject, Project, ProjectSummary, ProjectWithTasks, Task, UpdateProject,
};
use uuid::Uuid;

/// Project row plus task counters from the listing query
#[derive(Debug, FromRow)]
struct ProjectStatsRow {
    #[sqlx(flatten)]
    project: Project,
    total_tasks: i64,
    completed_tasks: i64,
}

impl From<ProjectStatsRow> for ProjectSummary {
    fn from(row: ProjectStatsRow) -> Self {
        ProjectSummary::new(row.project, row.total_tasks, row.completed_tasks)
    }
}

#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Project CRUD
    // ========================================================================

    /// Create a project. A clash on (org, name, manager, dates) is `DuplicateEntry`.
    pub async fn create(
        &self,
        org_id: &str,
        created_by: &str,
        request: &CreateProject,
    ) -> Result<Project> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (
                org_id, name, description, priority, status,
                start_date, end_date, project_manager, team_members, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(org_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.priority)
        .bind(request.status)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.project_manager)
        .bind(&request.team_members)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    /// Get a project inside an organization
    pub async fn get(&self, org_id: &str, project_id: Uuid) -> Result<Project> {
        sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE org_id = $1 AND project_id = $2",
        )
        .bind(org_id)
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Project", &project_id.to_string()))
    }

    /// List projects with task counters, most recently updated first.
    ///
    /// A search term matches name, description, status, priority and manager
    /// case-insensitively, or a team member exactly.
    pub async fn list(&self, org_id: &str, query: Option<&str>) -> Result<Vec<ProjectSummary>> {
        let term = search_term(query);
        let pattern = term.map(like_pattern);

        let rows = sqlx::query_as::<_, ProjectStatsRow>(
            r#"
            SELECT p.*,
                   COUNT(t.id) AS total_tasks,
                   COUNT(t.id) FILTER (WHERE t.status = 'Done') AS completed_tasks
            FROM projects p
            LEFT JOIN tasks t ON t.project_id = p.project_id
            WHERE p.org_id = $1
              AND (
                $2::text IS NULL
                OR p.name ILIKE $2
                OR p.description ILIKE $2
                OR p.status::text ILIKE $2
                OR p.priority::text ILIKE $2
                OR p.project_manager ILIKE $2
                OR $3 = ANY(p.team_members)
              )
            GROUP BY p.project_id
            ORDER BY p.updated_at DESC
            "#,
        )
        .bind(org_id)
        .bind(pattern)
        .bind(term)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProjectSummary::from).collect())
    }

    /// Apply the submitted fields; absent ones keep their stored value.
    pub async fn update(
        &self,
        org_id: &str,
        project_id: Uuid,
        request: &UpdateProject,
    ) -> Result<Project> {
        sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                priority = COALESCE($5, priority),
                status = COALESCE($6, status),
                start_date = COALESCE($7, start_date),
                end_date = COALESCE($8, end_date),
                project_manager = COALESCE($9, project_manager),
                team_members = COALESCE($10, team_members),
                updated_at = NOW()
            WHERE org_id = $1 AND project_id = $2
            RETURNING *
            "#,
        )
        .bind(org_id)
        .bind(project_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.priority)
        .bind(request.status)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.project_manager)
        .bind(&request.team_members)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Project", &project_id.to_string()))
    }

    /// Delete a project. Tasks and their comments go with it.
    pub async fn delete(&self, org_id: &str, project_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM projects WHERE org_id = $1 AND project_id = $2")
            .bind(org_id)
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Project", &project_id.to_string()));
        }
        Ok(())
    }

    // ========================================================================
    // Dashboard
    // ========================================================================

    /// Every project of the organization with all of its tasks
    pub async fn list_with_tasks(&self, org_id: &str) -> Result<Vec<ProjectWithTasks>> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE org_id = $1 ORDER BY updated_at DESC",
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;

        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT t.*
            FROM tasks t
            JOIN projects p ON p.project_id = t.project_id
            WHERE p.org_id = $1
            ORDER BY t.created_at
            "#,
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_project: HashMap<Uuid, Vec<Task>> = HashMap::new();
        for task in tasks {
            by_project.entry(task.project_id).or_default().push(task);
        }

        Ok(projects
            .into_iter()
            .map(|project| {
                let tasks = by_project.remove(&project.project_id).unwrap_or_default();
                ProjectWithTasks { project, tasks }
            })
            .collect())
    }
}
