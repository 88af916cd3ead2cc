use crate::dates;
use crate::normalize::{collapse_whitespace, trim_in_place, Normalize};
use crate::project::Priority;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Kanban column a task sits in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    #[default]
    Todo,
    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In Progress")]
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "Todo",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_type")]
pub enum TaskType {
    #[default]
    Task,
    Bug,
    Feature,
    Improvement,
    Other,
}

fn default_task_priority() -> Priority {
    Priority::Medium
}

/// Task row. Org scoping goes through the owning project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    #[serde(rename = "projectId")]
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub task_type: TaskType,
    pub priority: Priority,
    pub assignee: Option<String>,
    pub created_by: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != TaskStatus::Done && self.due_date.map(|due| due < now).unwrap_or(false)
    }
}

/// Task joined with the name of its project
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskWithProject {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: Task,
    #[serde(rename = "projectName")]
    pub project_name: String,
}

/// Compact view for "my tasks" listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyTask {
    pub id: Uuid,
    pub title: String,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(rename = "projectId")]
    pub project_id: Uuid,
    #[serde(rename = "projectName")]
    pub project_name: String,
}

impl From<TaskWithProject> for MyTask {
    fn from(row: TaskWithProject) -> Self {
        Self {
            id: row.task.id,
            title: row.task.title,
            status: row.task.status,
            priority: row.task.priority,
            project_id: row.task.project_id,
            project_name: row.project_name,
        }
    }
}

/// Fields a task update may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    Title,
    Description,
    DueDate,
    Status,
    Type,
    Priority,
    Assignee,
}

/// Create task request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(length(min = 2, max = 100, message = "Task title must be between 2 and 100 characters"))]
    pub title: String,

    #[validate(length(min = 5, max = 1000, message = "Description must be between 5 and 1000 characters"))]
    pub description: String,

    #[serde(deserialize_with = "dates::deserialize")]
    pub due_date: DateTime<Utc>,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default, rename = "type")]
    pub task_type: TaskType,

    #[serde(default = "default_task_priority")]
    pub priority: Priority,

    #[serde(default)]
    #[validate(length(min = 1, message = "Assignee cannot be empty"))]
    pub assignee: Option<String>,

    #[serde(rename = "projectId")]
    pub project_id: Uuid,
}

impl Normalize for CreateTask {
    fn normalize(&mut self) {
        self.title = collapse_whitespace(&self.title);
        self.description = collapse_whitespace(&self.description);
        if let Some(assignee) = self.assignee.as_mut() {
            trim_in_place(assignee);
        }
    }
}

/// Update task request. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 100, message = "Task title must be between 2 and 100 characters"))]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 5, max = 1000, message = "Description must be between 5 and 1000 characters"))]
    pub description: Option<String>,

    #[serde(
        default,
        deserialize_with = "dates::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Assignee cannot be empty"))]
    pub assignee: Option<String>,
}

impl UpdateTask {
    pub fn status_only(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Fields present in the request body
    pub fn submitted_fields(&self) -> Vec<TaskField> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push(TaskField::Title);
        }
        if self.description.is_some() {
            fields.push(TaskField::Description);
        }
        if self.due_date.is_some() {
            fields.push(TaskField::DueDate);
        }
        if self.status.is_some() {
            fields.push(TaskField::Status);
        }
        if self.task_type.is_some() {
            fields.push(TaskField::Type);
        }
        if self.priority.is_some() {
            fields.push(TaskField::Priority);
        }
        if self.assignee.is_some() {
            fields.push(TaskField::Assignee);
        }
        fields
    }
}

impl Normalize for UpdateTask {
    fn normalize(&mut self) {
        if let Some(title) = self.title.as_mut() {
            *title = collapse_whitespace(title);
        }
        if let Some(description) = self.description.as_mut() {
            *description = collapse_whitespace(description);
        }
        if let Some(assignee) = self.assignee.as_mut() {
            trim_in_place(assignee);
        }
    }
}

/// `?projectId=` scope carried by single-task routes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskScopeQuery {
    #[serde(rename = "projectId")]
    pub project_id: Uuid,
}

/// Filters for task listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskListQuery {
    #[serde(rename = "projectId")]
    pub project_id: Option<Uuid>,
    pub query: Option<String>,
    pub status: Option<TaskStatus>,
    #[serde(rename = "type")]
    pub task_type: Option<TaskType>,
    pub priority: Option<Priority>,
}
