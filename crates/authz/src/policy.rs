//! The single authorization predicate used by every handler.
//!
//! Admin means `org:admin` or `org:moderator`. Ownership depends on the resource:
//! the project manager for projects and tasks, the author for comments.

use crate::error::{AuthzError, Result};
use crate::role::OrgRole;
use tigger_models::TaskField;

/// Caller identity as seen by the policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub user_id: String,
    pub org_id: Option<String>,
    pub role: Option<OrgRole>,
}

impl Subject {
    pub fn new(user_id: impl Into<String>, org_id: Option<String>, role: Option<OrgRole>) -> Self {
        Self {
            user_id: user_id.into(),
            org_id,
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_ref().map(OrgRole::is_admin).unwrap_or(false)
    }
}

/// What is being acted on, with the owner-like field needed for the check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource<'a> {
    /// The organization itself; creating projects, listing, dashboards, calendars
    Organization,
    Project { manager: &'a str },
    /// A task, owned through its project's manager
    Task { project_manager: &'a str },
    Comment { author: &'a str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    Read,
    Create,
    Update,
    Delete,
    ChangeProjectManager,
    /// Field-level task update with the fields present in the request
    UpdateTaskFields(&'a [TaskField]),
}

/// Decide whether `subject` may perform `action` on `resource`.
///
/// A missing organization is rejected before any ownership rule.
pub fn authorize(subject: &Subject, resource: Resource<'_>, action: Action<'_>) -> Result<()> {
    if subject.org_id.as_deref().map(str::is_empty).unwrap_or(true) {
        return Err(AuthzError::NoOrganization);
    }

    let is_admin = subject.is_admin();
    let decision = match (resource, action) {
        (_, Action::Read) => Ok(()),

        (Resource::Organization, Action::Create) => {
            require(is_admin, "You are not authorized to create a project")
        }
        (Resource::Organization, _) => Ok(()),

        (Resource::Project { .. }, Action::Create) => {
            require(is_admin, "You are not authorized to create a project")
        }
        (Resource::Project { manager }, Action::Update) => require(
            is_admin || manager == subject.user_id,
            "You are not authorized to update this project",
        ),
        (Resource::Project { .. }, Action::ChangeProjectManager) => require(
            is_admin,
            "Only admins or moderators can change the project manager",
        ),
        (Resource::Project { .. }, Action::Delete) => {
            require(is_admin, "You are not authorized to delete this project")
        }
        (Resource::Project { .. }, Action::UpdateTaskFields(_)) => {
            Err(AuthzError::InvalidRequest("No valid fields provided".to_string()))
        }

        (Resource::Task { project_manager }, action) => {
            let privileged = is_admin || project_manager == subject.user_id;
            match action {
                Action::Create => require(privileged, "You are not authorized to create a task"),
                Action::Delete => require(privileged, "You are not authorized to delete a task"),
                Action::UpdateTaskFields(fields) => task_fields(privileged, fields),
                _ => require(privileged, "You are only allowed to update task status"),
            }
        }

        (Resource::Comment { .. }, Action::Create) => Ok(()),
        (Resource::Comment { author }, Action::Delete) => require(
            is_admin || author == subject.user_id,
            "You can only delete your own comments",
        ),
        (Resource::Comment { author }, _) => require(
            is_admin || author == subject.user_id,
            "You can only edit your own comments",
        ),
    };

    if let Err(AuthzError::Forbidden(reason)) = &decision {
        tracing::debug!(user_id = %subject.user_id, ?resource, ?action, %reason, "Authorization denied");
    }
    decision
}

/// Managers and admins may touch any field; other members only `status`.
fn task_fields(privileged: bool, fields: &[TaskField]) -> Result<()> {
    if fields.is_empty() {
        return Err(AuthzError::InvalidRequest("No valid fields provided".to_string()));
    }
    if !privileged && fields.iter().any(|field| *field != TaskField::Status) {
        return Err(AuthzError::forbidden("You are only allowed to update task status"));
    }
    Ok(())
}

fn require(allowed: bool, message: &str) -> Result<()> {
    if allowed {
        Ok(())
    } else {
        Err(AuthzError::forbidden(message))
    }
}
