use crate::error::{ApiResult, DbResultExt};
use crate::extract::{ApiPath, ValidatedJson};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tigger_authz::{authorize, Action, Resource};
use tigger_models::{ApiResponse, Comment, CreateComment, UpdateComment};
use tigger_tenant::TenantContext;
use uuid::Uuid;

const TASK_NOT_FOUND: &str = "Task not found";
const COMMENT_NOT_FOUND: &str = "Comment not found";

/// POST /api/comments/
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    tenant: TenantContext,
    ValidatedJson(request): ValidatedJson<CreateComment>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Comment>>)> {
    authorize(
        &tenant.subject(),
        Resource::Comment {
            author: &tenant.user_id,
        },
        Action::Create,
    )?;

    state
        .tasks
        .get_in_org(&tenant.org_id, request.task_id)
        .await
        .or_not_found(TASK_NOT_FOUND)?;

    let comment = state.comments.create(&tenant.user_id, &request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(comment, "Comment created successfully")),
    ))
}

/// Comments of a task, oldest first
/// GET /api/comments/:taskId
pub async fn get_comments_by_task(
    State(state): State<Arc<AppState>>,
    tenant: TenantContext,
    ApiPath(task_id): ApiPath<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<Comment>>>> {
    authorize(&tenant.subject(), Resource::Organization, Action::Read)?;

    state
        .tasks
        .get_in_org(&tenant.org_id, task_id)
        .await
        .or_not_found(TASK_NOT_FOUND)?;

    let comments = state.comments.list_for_task(task_id).await?;
    Ok(Json(ApiResponse::ok(comments)))
}

/// PUT /api/comments/:commentId
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    tenant: TenantContext,
    ApiPath(comment_id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateComment>,
) -> ApiResult<Json<ApiResponse<Comment>>> {
    let comment = state
        .comments
        .get_in_org(&tenant.org_id, comment_id)
        .await
        .or_not_found(COMMENT_NOT_FOUND)?;

    authorize(
        &tenant.subject(),
        Resource::Comment {
            author: &comment.author,
        },
        Action::Update,
    )?;

    let updated = state
        .comments
        .update_content(comment_id, &request.content)
        .await
        .or_not_found(COMMENT_NOT_FOUND)?;

    Ok(Json(ApiResponse::ok_with_message(
        updated,
        "Comment updated successfully",
    )))
}

/// DELETE /api/comments/:commentId
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    tenant: TenantContext,
    ApiPath(comment_id): ApiPath<Uuid>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let comment = state
        .comments
        .get_in_org(&tenant.org_id, comment_id)
        .await
        .or_not_found(COMMENT_NOT_FOUND)?;

    authorize(
        &tenant.subject(),
        Resource::Comment {
            author: &comment.author,
        },
        Action::Delete,
    )?;

    state
        .comments
        .delete(comment_id)
        .await
        .or_not_found(COMMENT_NOT_FOUND)?;

    Ok(Json(ApiResponse::message("Comment deleted successfully")))
}
