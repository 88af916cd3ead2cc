//! Per-organization dashboard summary.
//!
//! Computed in one pass over every project of the org and its tasks. Nothing is
//! cached; the handler loads fresh rows on each request.

use crate::project::{Priority, Project, ProjectStatus, ProjectSummary};
use crate::task::{Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum entries in each dashboard list
pub const DASHBOARD_LIST_LIMIT: usize = 5;

/// A project together with all of its tasks
#[derive(Debug, Clone)]
pub struct ProjectWithTasks {
    pub project: Project,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardTask {
    pub id: Uuid,
    pub title: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(rename = "projectId")]
    pub project_id: Uuid,
    #[serde(rename = "projectName")]
    pub project_name: String,
}

impl DashboardTask {
    fn from_task(task: &Task, project: &Project) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            project_id: project.project_id,
            project_name: project.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_projects: usize,
    pub completed_projects: usize,
    pub active_projects: usize,
    pub total_tasks: usize,
    pub my_tasks: Vec<DashboardTask>,
    pub my_tasks_count: usize,
    pub overdue_tasks: Vec<DashboardTask>,
    pub overdue_count: usize,
    pub recent_projects: Vec<ProjectSummary>,
}

impl DashboardSummary {
    pub fn compute(mut projects: Vec<ProjectWithTasks>, user_id: &str, now: DateTime<Utc>) -> Self {
        projects.sort_by(|a, b| b.project.updated_at.cmp(&a.project.updated_at));

        let mut summary = DashboardSummary {
            total_projects: projects.len(),
            completed_projects: 0,
            active_projects: 0,
            total_tasks: 0,
            my_tasks: Vec::new(),
            my_tasks_count: 0,
            overdue_tasks: Vec::new(),
            overdue_count: 0,
            recent_projects: Vec::new(),
        };

        for entry in projects {
            match entry.project.status {
                ProjectStatus::Completed => summary.completed_projects += 1,
                ProjectStatus::Active => summary.active_projects += 1,
                _ => {}
            }

            let mut done = 0i64;
            for task in &entry.tasks {
                summary.total_tasks += 1;
                if task.status == TaskStatus::Done {
                    done += 1;
                }

                if task.assignee.as_deref() == Some(user_id) {
                    summary.my_tasks_count += 1;
                    if summary.my_tasks.len() < DASHBOARD_LIST_LIMIT {
                        summary.my_tasks.push(DashboardTask::from_task(task, &entry.project));
                    }
                }

                if task.is_overdue(now) {
                    summary.overdue_count += 1;
                    if summary.overdue_tasks.len() < DASHBOARD_LIST_LIMIT {
                        summary
                            .overdue_tasks
                            .push(DashboardTask::from_task(task, &entry.project));
                    }
                }
            }

            if summary.recent_projects.len() < DASHBOARD_LIST_LIMIT {
                let total = entry.tasks.len() as i64;
                summary
                    .recent_projects
                    .push(ProjectSummary::new(entry.project, total, done));
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskType;
    use chrono::Duration;

    fn project(name: &str, status: ProjectStatus, updated_days_ago: i64) -> Project {
        let now = Utc::now();
        Project {
            project_id: Uuid::new_v4(),
            org_id: "org_1".into(),
            name: name.into(),
            description: None,
            priority: Priority::Low,
            status,
            start_date: now - Duration::days(30),
            end_date: now + Duration::days(30),
            project_manager: "user_pm".into(),
            team_members: vec![],
            created_by: "user_admin".into(),
            created_at: now - Duration::days(60),
            updated_at: now - Duration::days(updated_days_ago),
        }
    }

    fn task(project: &Project, status: TaskStatus, assignee: Option<&str>, due_in_days: i64) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            project_id: project.project_id,
            title: "Task".into(),
            description: None,
            due_date: Some(now + Duration::days(due_in_days)),
            status,
            task_type: TaskType::Task,
            priority: Priority::Medium,
            assignee: assignee.map(str::to_string),
            created_by: "user_pm".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_completion_rates() {
        let empty = project("Empty", ProjectStatus::Planning, 1);
        let partial = project("Partial", ProjectStatus::Active, 0);
        let tasks = vec![
            task(&partial, TaskStatus::Done, None, 3),
            task(&partial, TaskStatus::Todo, None, 3),
            task(&partial, TaskStatus::InProgress, None, 3),
        ];

        let summary = DashboardSummary::compute(
            vec![
                ProjectWithTasks { project: empty, tasks: vec![] },
                ProjectWithTasks { project: partial, tasks },
            ],
            "user_me",
            Utc::now(),
        );

        assert_eq!(summary.total_projects, 2);
        assert_eq!(summary.active_projects, 1);
        assert_eq!(summary.total_tasks, 3);
        // most recently updated first
        assert_eq!(summary.recent_projects[0].project.name, "Partial");
        assert_eq!(summary.recent_projects[0].completion_rate, 33);
        assert_eq!(summary.recent_projects[1].completion_rate, 0);
    }

    #[test]
    fn test_my_and_overdue_tasks() {
        let p = project("Ops", ProjectStatus::Completed, 0);
        let tasks = vec![
            task(&p, TaskStatus::Todo, Some("user_me"), -2),
            task(&p, TaskStatus::Done, Some("user_me"), -2),
            task(&p, TaskStatus::InProgress, Some("user_other"), -1),
            task(&p, TaskStatus::Todo, Some("user_me"), 5),
        ];

        let summary = DashboardSummary::compute(
            vec![ProjectWithTasks { project: p, tasks }],
            "user_me",
            Utc::now(),
        );

        assert_eq!(summary.completed_projects, 1);
        assert_eq!(summary.my_tasks_count, 3);
        assert_eq!(summary.overdue_count, 2);
        assert!(summary.overdue_tasks.iter().all(|t| t.status != TaskStatus::Done));
        assert_eq!(summary.my_tasks[0].project_name, "Ops");
    }

    #[test]
    fn test_lists_capped() {
        let mut projects = Vec::new();
        for i in 0..7 {
            let p = project(&format!("P{}", i), ProjectStatus::Active, i);
            let tasks = (0..2).map(|_| task(&p, TaskStatus::Todo, Some("user_me"), -1)).collect();
            projects.push(ProjectWithTasks { project: p, tasks });
        }

        let summary = DashboardSummary::compute(projects, "user_me", Utc::now());

        assert_eq!(summary.total_projects, 7);
        assert_eq!(summary.recent_projects.len(), DASHBOARD_LIST_LIMIT);
        assert_eq!(summary.my_tasks.len(), DASHBOARD_LIST_LIMIT);
        assert_eq!(summary.overdue_tasks.len(), DASHBOARD_LIST_LIMIT);
        assert_eq!(summary.my_tasks_count, 14);
        assert_eq!(summary.recent_projects[0].project.name, "P0");
    }

    #[test]
    fn test_camel_case_keys() {
        let summary = DashboardSummary::compute(vec![], "user_me", Utc::now());
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["totalProjects"], 0);
        assert!(value["recentProjects"].as_array().unwrap().is_empty());
    }
}
