use crate::error::{ApiError, ApiResult, DbResultExt};
use crate::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use std::sync::Arc;
use tigger_authz::{authorize, Action, Resource};
use tigger_models::{
    ApiResponse, CreateProject, DashboardSummary, Project, ProjectQuery, ProjectSummary,
    UpdateProject,
};
use tigger_tenant::TenantContext;
use uuid::Uuid;

const DUPLICATE_PROJECT: &str =
    "A project with the same name, project manager, start date, and end date already exists";
const PROJECT_NOT_FOUND: &str = "Project not found";

/// Create a project (admins and moderators)
/// POST /api/projects/
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    tenant: TenantContext,
    ValidatedJson(request): ValidatedJson<CreateProject>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Project>>)> {
    authorize(&tenant.subject(), Resource::Organization, Action::Create)?;

    let project = state
        .projects
        .create(&tenant.org_id, &tenant.user_id, &request)
        .await
        .or_conflict(DUPLICATE_PROJECT)?;

    tracing::info!(
        project_id = %project.project_id,
        org_id = %tenant.org_id,
        "Project created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(project, "Project created successfully")),
    ))
}

/// List or search the organization's projects
/// GET /api/projects/all?query=
pub async fn get_all_projects(
    State(state): State<Arc<AppState>>,
    tenant: TenantContext,
    ApiQuery(query): ApiQuery<ProjectQuery>,
) -> ApiResult<Json<ApiResponse<Vec<ProjectSummary>>>> {
    authorize(&tenant.subject(), Resource::Organization, Action::Read)?;

    let projects = state
        .projects
        .list(&tenant.org_id, query.query.as_deref())
        .await?;

    Ok(Json(ApiResponse::ok(projects)))
}

/// GET /api/projects/dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    tenant: TenantContext,
) -> ApiResult<Json<ApiResponse<DashboardSummary>>> {
    authorize(&tenant.subject(), Resource::Organization, Action::Read)?;

    let projects = state.projects.list_with_tasks(&tenant.org_id).await?;
    let summary = DashboardSummary::compute(projects, &tenant.user_id, Utc::now());

    Ok(Json(ApiResponse::ok(summary)))
}

/// GET /api/projects/:projectId
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    tenant: TenantContext,
    ApiPath(project_id): ApiPath<Uuid>,
) -> ApiResult<Json<ApiResponse<Project>>> {
    let project = state
        .projects
        .get(&tenant.org_id, project_id)
        .await
        .or_not_found(PROJECT_NOT_FOUND)?;

    authorize(
        &tenant.subject(),
        Resource::Project {
            manager: &project.project_manager,
        },
        Action::Read,
    )?;

    Ok(Json(ApiResponse::ok(project)))
}

/// Update a project (admins, moderators, or its manager)
/// PUT /api/projects/:projectId
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    tenant: TenantContext,
    ApiPath(project_id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateProject>,
) -> ApiResult<Json<ApiResponse<Project>>> {
    let project = state
        .projects
        .get(&tenant.org_id, project_id)
        .await
        .or_not_found(PROJECT_NOT_FOUND)?;

    let subject = tenant.subject();
    let resource = Resource::Project {
        manager: &project.project_manager,
    };
    authorize(&subject, resource, Action::Update)?;

    if request.is_empty() {
        return Err(ApiError::bad_request("No valid fields provided for update"));
    }
    if request.project_manager.is_some() {
        authorize(&subject, resource, Action::ChangeProjectManager)?;
    }
    request
        .validate_against(&project)
        .map_err(|e| ApiError::from_validation(&e))?;

    let updated = state
        .projects
        .update(&tenant.org_id, project_id, &request)
        .await
        .or_conflict(DUPLICATE_PROJECT)?;

    tracing::info!(project_id = %project_id, user_id = %tenant.user_id, "Project updated");

    Ok(Json(ApiResponse::ok_with_message(
        updated,
        "Project updated successfully",
    )))
}

/// Delete a project and everything under it (admins and moderators)
/// DELETE /api/projects/:projectId
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    tenant: TenantContext,
    ApiPath(project_id): ApiPath<Uuid>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let project = state
        .projects
        .get(&tenant.org_id, project_id)
        .await
        .or_not_found(PROJECT_NOT_FOUND)?;

    authorize(
        &tenant.subject(),
        Resource::Project {
            manager: &project.project_manager,
        },
        Action::Delete,
    )?;

    state
        .projects
        .delete(&tenant.org_id, project_id)
        .await
        .or_not_found(PROJECT_NOT_FOUND)?;

    tracing::info!(project_id = %project_id, user_id = %tenant.user_id, "Project deleted");

    Ok(Json(ApiResponse::message("Project deleted successfully")))
}
