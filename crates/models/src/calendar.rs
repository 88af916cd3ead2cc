//! Calendar projection of projects and tasks into one event shape.

use crate::dates::{self, DayBound};
use crate::project::{Priority, Project, ProjectStatus};
use crate::task::{TaskStatus, TaskType, TaskWithProject};
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw `?startDate=&endDate=` query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarQuery {
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

/// Inclusive time window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CalendarWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        if start > end {
            return None;
        }
        Some(Self { start, end })
    }

    /// First instant of the month through the last instant of its last day.
    pub fn month_of(date: NaiveDate) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(first);
        Self {
            start: dates::day_bound(first, DayBound::Start),
            end: dates::day_bound(last, DayBound::End),
        }
    }

    /// Resolve a query, defaulting each missing bound to the month containing `today`.
    /// Returns `Err` with a message when a bound is unparseable or the window is inverted.
    pub fn from_query(query: &CalendarQuery, today: NaiveDate) -> Result<Self, String> {
        let month = Self::month_of(today);

        let start = match query.start_date.as_deref() {
            Some(raw) => dates::parse_with_bound(raw, DayBound::Start)
                .ok_or_else(|| "Invalid startDate".to_string())?,
            None => month.start,
        };
        let end = match query.end_date.as_deref() {
            Some(raw) => dates::parse_with_bound(raw, DayBound::End)
                .ok_or_else(|| "Invalid endDate".to_string())?,
            None => month.end,
        };

        Self::new(start, end).ok_or_else(|| "startDate cannot be after endDate".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEvent {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: ProjectStatus,
    pub priority: Priority,
    pub link: String,
}

impl From<&Project> for ProjectEvent {
    fn from(project: &Project) -> Self {
        Self {
            id: project.project_id,
            kind: "project".to_string(),
            title: project.name.clone(),
            description: project.description.clone(),
            start_date: project.start_date,
            end_date: project.end_date,
            status: project.status,
            priority: project.priority,
            link: format!("/projects/{}", project.project_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEvent {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub task_type: TaskType,
    pub date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub project_id: Uuid,
    pub project_name: String,
    pub assignee: Option<String>,
    pub link: String,
}

impl From<&TaskWithProject> for TaskEvent {
    fn from(row: &TaskWithProject) -> Self {
        let task = &row.task;
        Self {
            id: task.id,
            kind: "task".to_string(),
            title: task.title.clone(),
            task_type: task.task_type,
            date: task.due_date,
            status: task.status,
            priority: task.priority,
            project_id: task.project_id,
            project_name: row.project_name.clone(),
            assignee: task.assignee.clone(),
            link: format!("/projects/{}?tab=tasks", task.project_id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvents {
    pub projects: Vec<ProjectEvent>,
    pub tasks: Vec<TaskEvent>,
}

impl CalendarEvents {
    pub fn from_rows(projects: &[Project], tasks: &[TaskWithProject]) -> Self {
        Self {
            projects: projects.iter().map(ProjectEvent::from).collect(),
            tasks: tasks.iter().map(TaskEvent::from).collect(),
        }
    }
}
