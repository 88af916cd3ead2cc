use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tigger_auth::SessionVerifier;

/// Middleware to require a verified session.
/// Inserts the caller's `Identity` into request extensions.
pub async fn require_session(
    State(sessions): State<Arc<SessionVerifier>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = sessions.verify_headers(request.headers()).map_err(|e| {
        tracing::debug!("Session rejected: {}", e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
