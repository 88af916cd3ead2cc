use crate::error::{ApiError, ApiResult};
use crate::extract::ApiQuery;
use crate::AppState;
use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;
use tigger_authz::{authorize, Action, Resource};
use tigger_models::{ApiResponse, CalendarEvents, CalendarQuery, CalendarWindow};
use tigger_tenant::TenantContext;

/// Projects and tasks inside a date window; defaults to the current month
/// GET /api/calendar/events?startDate=&endDate=
pub async fn get_calendar_events(
    State(state): State<Arc<AppState>>,
    tenant: TenantContext,
    ApiQuery(query): ApiQuery<CalendarQuery>,
) -> ApiResult<Json<ApiResponse<CalendarEvents>>> {
    authorize(&tenant.subject(), Resource::Organization, Action::Read)?;

    let window = CalendarWindow::from_query(&query, Utc::now().date_naive())
        .map_err(ApiError::bad_request)?;

    let events = state.calendar.events(&tenant.org_id, &window).await?;
    Ok(Json(ApiResponse::ok(events)))
}
