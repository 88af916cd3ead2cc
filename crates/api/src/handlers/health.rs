use axum::http::{StatusCode, Uri};
use axum::Json;
use serde::{Deserialize, Serialize};
use tigger_models::ApiResponse;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthData {
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteNotFound {
    pub success: bool,
    pub message: String,
    pub path: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<ApiResponse<HealthData>> {
    Json(ApiResponse::ok_with_message(
        HealthData {
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        "Server is up and running",
    ))
}

/// Fallback for unknown routes
pub async fn route_not_found(uri: Uri) -> (StatusCode, Json<RouteNotFound>) {
    (
        StatusCode::NOT_FOUND,
        Json(RouteNotFound {
            success: false,
            message: "The requested route does not exist".to_string(),
            path: uri.path().to_string(),
        }),
    )
}
