use crate::dates;
use crate::normalize::{
    collapse_whitespace, error_with_message, trim_in_place, validate_team_members, Normalize,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Priority shared by projects and tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "priority_level")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

/// Project lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    Completed,
    Hold,
    Inactive,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "Planning",
            ProjectStatus::Active => "Active",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Hold => "Hold",
            ProjectStatus::Inactive => "Inactive",
            ProjectStatus::Cancelled => "Cancelled",
        }
    }
}

/// Project row, scoped to one organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Project {
    #[serde(rename = "projectId")]
    pub project_id: Uuid,
    #[serde(rename = "orgId")]
    pub org_id: String,
    pub name: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: ProjectStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub project_manager: String,
    pub team_members: Vec<String>,
    pub created_by: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Project with task counters, as returned by listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: Project,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub completion_rate: i64,
}

impl ProjectSummary {
    pub fn new(project: Project, total_tasks: i64, completed_tasks: i64) -> Self {
        Self {
            project,
            total_tasks,
            completed_tasks,
            completion_rate: completion_rate(completed_tasks, total_tasks),
        }
    }
}

/// Percentage of done tasks, rounded half up. Zero when there are no tasks.
pub fn completion_rate(done: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    ((done as f64 * 100.0) / total as f64).round() as i64
}

fn validate_create_dates(request: &CreateProject) -> Result<(), ValidationError> {
    check_date_order(request.start_date, request.end_date)
}

fn validate_update_dates(request: &UpdateProject) -> Result<(), ValidationError> {
    match (request.start_date, request.end_date) {
        (Some(start), Some(end)) => check_date_order(start, end),
        _ => Ok(()),
    }
}

pub(crate) fn check_date_order(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if start > end {
        return Err(error_with_message(
            "date_order",
            "Start date cannot be after end date",
        ));
    }
    Ok(())
}

/// Create project request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_create_dates"))]
pub struct CreateProject {
    #[validate(length(min = 1, max = 100, message = "Project name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 1000, message = "Description is too long"))]
    pub description: String,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub status: ProjectStatus,

    #[serde(deserialize_with = "dates::deserialize")]
    pub start_date: DateTime<Utc>,

    #[serde(deserialize_with = "dates::deserialize")]
    pub end_date: DateTime<Utc>,

    #[validate(length(min = 1, message = "Project manager is required"))]
    pub project_manager: String,

    #[serde(default)]
    #[validate(custom(function = "validate_team_members"))]
    pub team_members: Vec<String>,
}

impl Normalize for CreateProject {
    fn normalize(&mut self) {
        self.name = collapse_whitespace(&self.name);
        trim_in_place(&mut self.description);
        trim_in_place(&mut self.project_manager);
        for member in self.team_members.iter_mut() {
            trim_in_place(member);
        }
    }
}

/// Update project request. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update_dates"))]
pub struct UpdateProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "Project name is required"))]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Description is too long"))]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,

    #[serde(
        default,
        deserialize_with = "dates::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(
        default,
        deserialize_with = "dates::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Project manager is required"))]
    pub project_manager: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_team_members"))]
    pub team_members: Option<Vec<String>>,
}

impl UpdateProject {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.project_manager.is_none()
            && self.team_members.is_none()
    }

    /// Check the date ordering against the stored project for partial updates.
    pub fn validate_against(&self, current: &Project) -> Result<(), ValidationError> {
        check_date_order(
            self.start_date.unwrap_or(current.start_date),
            self.end_date.unwrap_or(current.end_date),
        )
    }
}

impl Normalize for UpdateProject {
    fn normalize(&mut self) {
        if let Some(name) = self.name.as_mut() {
            *name = collapse_whitespace(name);
        }
        if let Some(description) = self.description.as_mut() {
            trim_in_place(description);
        }
        if let Some(manager) = self.project_manager.as_mut() {
            trim_in_place(manager);
        }
        if let Some(members) = self.team_members.as_mut() {
            for member in members.iter_mut() {
                trim_in_place(member);
            }
        }
    }
}

/// Query string for project listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectQuery {
    pub query: Option<String>,
}
