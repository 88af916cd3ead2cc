use crate::error::{ApiError, ApiResult, DbResultExt};
use crate::extract::{normalize_and_validate, ApiJson, ApiPath, ApiQuery, ValidatedJson};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tigger_authz::{authorize, Action, Resource};
use tigger_models::{
    ApiResponse, CreateTask, MyTask, Project, Task, TaskListQuery, TaskScopeQuery, UpdateTask,
};
use tigger_tenant::TenantContext;
use uuid::Uuid;

const PROJECT_NOT_FOUND: &str = "Project not found";
const TASK_NOT_FOUND: &str = "Task not found";

async fn load_project(state: &AppState, tenant: &TenantContext, project_id: Uuid) -> ApiResult<Project> {
    state
        .projects
        .get(&tenant.org_id, project_id)
        .await
        .or_not_found(PROJECT_NOT_FOUND)
}

/// Create a task (admins, moderators, or the project's manager)
/// POST /api/tasks/
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    tenant: TenantContext,
    ValidatedJson(request): ValidatedJson<CreateTask>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Task>>)> {
    let project = load_project(&state, &tenant, request.project_id).await?;

    authorize(
        &tenant.subject(),
        Resource::Task {
            project_manager: &project.project_manager,
        },
        Action::Create,
    )?;

    let task = state.tasks.create(&tenant.user_id, &request).await?;

    tracing::info!(task_id = %task.id, project_id = %project.project_id, "Task created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(task, "Task created successfully")),
    ))
}

/// GET /api/tasks/all?projectId=&query=&status=&type=&priority=
pub async fn get_all_tasks(
    State(state): State<Arc<AppState>>,
    tenant: TenantContext,
    ApiQuery(filter): ApiQuery<TaskListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Task>>>> {
    let project_id = filter
        .project_id
        .ok_or_else(|| ApiError::bad_request("projectId is required"))?;
    let project = load_project(&state, &tenant, project_id).await?;

    authorize(
        &tenant.subject(),
        Resource::Task {
            project_manager: &project.project_manager,
        },
        Action::Read,
    )?;

    let tasks = state.tasks.list(project.project_id, &filter).await?;
    Ok(Json(ApiResponse::ok(tasks)))
}

/// Tasks assigned to the caller across the organization
/// GET /api/tasks/my
pub async fn get_my_tasks(
    State(state): State<Arc<AppState>>,
    tenant: TenantContext,
) -> ApiResult<Json<ApiResponse<Vec<MyTask>>>> {
    authorize(&tenant.subject(), Resource::Organization, Action::Read)?;

    let tasks = state
        .tasks
        .list_assigned(&tenant.org_id, &tenant.user_id)
        .await?;

    Ok(Json(ApiResponse::ok(
        tasks.into_iter().map(MyTask::from).collect(),
    )))
}

/// GET /api/tasks/:taskId?projectId=
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    tenant: TenantContext,
    ApiPath(task_id): ApiPath<Uuid>,
    ApiQuery(scope): ApiQuery<TaskScopeQuery>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    let project = load_project(&state, &tenant, scope.project_id).await?;

    authorize(
        &tenant.subject(),
        Resource::Task {
            project_manager: &project.project_manager,
        },
        Action::Read,
    )?;

    let task = state
        .tasks
        .get(project.project_id, task_id)
        .await
        .or_not_found(TASK_NOT_FOUND)?;

    Ok(Json(ApiResponse::ok(task)))
}

/// Field permissions are decided on the submitted field names, before any value is validated.
fn authorize_update(
    tenant: &TenantContext,
    project_manager: &str,
    request: UpdateTask,
) -> ApiResult<UpdateTask> {
    let fields = request.submitted_fields();
    authorize(
        &tenant.subject(),
        Resource::Task { project_manager },
        Action::UpdateTaskFields(&fields),
    )?;
    normalize_and_validate(request)
}

/// Update a task. Members other than admins and the manager may only move its status.
/// PUT|PATCH /api/tasks/:taskId?projectId=
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    tenant: TenantContext,
    ApiPath(task_id): ApiPath<Uuid>,
    ApiQuery(scope): ApiQuery<TaskScopeQuery>,
    ApiJson(request): ApiJson<UpdateTask>,
) -> ApiResult<Json<ApiResponse<u64>>> {
    let project = load_project(&state, &tenant, scope.project_id).await?;
    let request = authorize_update(&tenant, &project.project_manager, request)?;

    let affected = state
        .tasks
        .update(project.project_id, task_id, &request)
        .await?;

    if affected == 0 {
        return Err(ApiError::not_found(TASK_NOT_FOUND));
    }

    tracing::debug!(task_id = %task_id, user_id = %tenant.user_id, "Task updated");

    Ok(Json(ApiResponse::ok_with_message(
        affected,
        "Task updated successfully",
    )))
}

/// Delete a task (admins, moderators, or the project's manager)
/// DELETE /api/tasks/:taskId?projectId=
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    tenant: TenantContext,
    ApiPath(task_id): ApiPath<Uuid>,
    ApiQuery(scope): ApiQuery<TaskScopeQuery>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let project = load_project(&state, &tenant, scope.project_id).await?;

    authorize(
        &tenant.subject(),
        Resource::Task {
            project_manager: &project.project_manager,
        },
        Action::Delete,
    )?;

    state
        .tasks
        .delete(project.project_id, task_id)
        .await
        .or_not_found(TASK_NOT_FOUND)?;

    tracing::info!(task_id = %task_id, user_id = %tenant.user_id, "Task deleted");

    Ok(Json(ApiResponse::message("Task deleted successfully")))
}
