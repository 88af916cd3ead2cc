use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tigger_auth::AuthError;
use tigger_authz::AuthzError;
use tigger_database::DatabaseError;
use tigger_models::{first_validation_message, ApiResponse};
use validator::{ValidationError, ValidationErrors};

pub type ApiResult<T> = Result<T, ApiError>;

/// Error answered with the `{success: false, message}` envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "User is not authenticated")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    pub fn from_validation(error: &ValidationError) -> Self {
        let message = error
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "Invalid request body".to_string());
        Self::bad_request(message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::error(&self.message))).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(_) => ApiError::not_found("Resource not found"),
            DatabaseError::DuplicateEntry(_) => ApiError::conflict("Resource already exists"),
            DatabaseError::InvalidInput(message) => ApiError::bad_request(message),
            other => {
                tracing::error!("Database error: {}", other);
                ApiError::internal()
            }
        }
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::NoOrganization => ApiError::bad_request(err.to_string()),
            AuthzError::Forbidden(message) => ApiError::new(StatusCode::FORBIDDEN, message),
            AuthzError::InvalidRequest(message) => ApiError::bad_request(message),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.is_unauthenticated() {
            ApiError::unauthorized()
        } else {
            tracing::error!("Session verification misconfigured: {}", err);
            ApiError::internal()
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::bad_request(first_validation_message(&errors))
    }
}

/// Resource-specific messages for repository errors
pub trait DbResultExt<T> {
    fn or_not_found(self, message: &str) -> ApiResult<T>;
    fn or_conflict(self, message: &str) -> ApiResult<T>;
}

impl<T> DbResultExt<T> for Result<T, DatabaseError> {
    fn or_not_found(self, message: &str) -> ApiResult<T> {
        self.map_err(|err| match err {
            DatabaseError::NotFound(_) => ApiError::not_found(message),
            other => other.into(),
        })
    }

    fn or_conflict(self, message: &str) -> ApiResult<T> {
        self.map_err(|err| match err {
            DatabaseError::DuplicateEntry(_) => ApiError::conflict(message),
            other => other.into(),
        })
    }
}
