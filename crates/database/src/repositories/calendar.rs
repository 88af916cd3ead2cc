use crate::error::Result;
use sqlx::PgPool;
use tigger_models::{CalendarEvents, CalendarWindow, Project, TaskWithProject};

/// Reads projects and tasks that fall into a calendar window
#[derive(Clone)]
pub struct CalendarRepository {
    pool: PgPool,
}

impl CalendarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Projects starting inside, ending inside, or spanning the window
    pub async fn projects_in_window(
        &self,
        org_id: &str,
        window: &CalendarWindow,
    ) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT *
            FROM projects
            WHERE org_id = $1
              AND (
                (start_date BETWEEN $2 AND $3)
                OR (end_date BETWEEN $2 AND $3)
                OR (start_date <= $2 AND end_date >= $3)
              )
            ORDER BY start_date
            "#,
        )
        .bind(org_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    /// Tasks due inside the window, inclusive on both ends
    pub async fn tasks_in_window(
        &self,
        org_id: &str,
        window: &CalendarWindow,
    ) -> Result<Vec<TaskWithProject>> {
        let tasks = sqlx::query_as::<_, TaskWithProject>(
            r#"
            SELECT t.*, p.name AS project_name
            FROM tasks t
            JOIN projects p ON p.project_id = t.project_id
            WHERE p.org_id = $1
              AND t.due_date BETWEEN $2 AND $3
            ORDER BY t.due_date
            "#,
        )
        .bind(org_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    pub async fn events(&self, org_id: &str, window: &CalendarWindow) -> Result<CalendarEvents> {
        let projects = self.projects_in_window(org_id, window).await?;
        let tasks = self.tasks_in_window(org_id, window).await?;
        Ok(CalendarEvents::from_rows(&projects, &tasks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DatabaseConfig, ProjectRepository, TaskRepository};
    use chrono::NaiveDate;
    use serde_json::json;
    use tigger_models::{CalendarQuery, CreateProject, CreateTask};
    use uuid::Uuid;

    fn task_request(project_id: Uuid, title: &str, due_date: &str) -> CreateTask {
        serde_json::from_value(json!({
            "title": title,
            "description": "Calendar entry",
            "due_date": due_date,
            "projectId": project_id
        }))
        .unwrap()
    }

    #[tokio::test]
    #[ignore] // Only run with database available
    async fn test_events_in_march() {
        let db = Database::new(DatabaseConfig::from_env()).await.unwrap();
        let org = format!("org_{}", Uuid::new_v4());

        let projects = ProjectRepository::new(db.pool().clone());
        let spanning: CreateProject = serde_json::from_value(json!({
            "name": "Migration",
            "start_date": "2024-02-15",
            "end_date": "2024-04-10",
            "project_manager": "user_pm"
        }))
        .unwrap();
        let later: CreateProject = serde_json::from_value(json!({
            "name": "Summer launch",
            "start_date": "2024-05-01",
            "end_date": "2024-06-30",
            "project_manager": "user_pm"
        }))
        .unwrap();
        let project = projects.create(&org, "user_admin", &spanning).await.unwrap();
        projects.create(&org, "user_admin", &later).await.unwrap();

        let tasks = TaskRepository::new(db.pool().clone());
        let inside = tasks
            .create("user_pm", &task_request(project.project_id, "Cut over", "2024-03-15"))
            .await
            .unwrap();
        tasks
            .create("user_pm", &task_request(project.project_id, "Retrospective", "2024-04-01"))
            .await
            .unwrap();

        let window = CalendarWindow::from_query(
            &CalendarQuery {
                start_date: Some("2024-03-01".into()),
                end_date: Some("2024-03-31".into()),
            },
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .unwrap();

        let events = CalendarRepository::new(db.pool().clone())
            .events(&org, &window)
            .await
            .unwrap();

        assert_eq!(events.projects.len(), 1);
        assert_eq!(events.projects[0].id, project.project_id);
        assert_eq!(events.tasks.len(), 1);
        assert_eq!(events.tasks[0].id, inside.id);
        assert_eq!(events.tasks[0].project_name, "Migration");
    }

    #[tokio::test]
    #[ignore] // Only run with database available
    async fn test_events_scoped_to_org() {
        let db = Database::new(DatabaseConfig::from_env()).await.unwrap();
        let request: CreateProject = serde_json::from_value(json!({
            "name": "Elsewhere",
            "start_date": "2024-03-01",
            "end_date": "2024-03-31",
            "project_manager": "user_pm"
        }))
        .unwrap();
        ProjectRepository::new(db.pool().clone())
            .create(&format!("org_{}", Uuid::new_v4()), "user_admin", &request)
            .await
            .unwrap();

        let window = CalendarWindow::month_of(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        let events = CalendarRepository::new(db.pool().clone())
            .events(&format!("org_{}", Uuid::new_v4()), &window)
            .await
            .unwrap();
        assert!(events.projects.is_empty());
        assert!(events.tasks.is_empty());
    }
}
