// Resolves the tenant from the identity the session middleware attached

use crate::context::TenantContext;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tigger_auth::Identity;
use tigger_models::ApiResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TenantRejection {
    #[error("User is not authenticated")]
    Unauthenticated,

    #[error("No organization selected")]
    NoOrganization,
}

impl TenantRejection {
    pub fn status(&self) -> StatusCode {
        match self {
            TenantRejection::Unauthenticated => StatusCode::UNAUTHORIZED,
            TenantRejection::NoOrganization => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for TenantRejection {
    fn into_response(self) -> Response {
        (self.status(), Json(ApiResponse::error(&self.to_string()))).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = TenantRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<Identity>()
            .ok_or(TenantRejection::Unauthenticated)?;

        TenantContext::from_identity(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use tigger_authz::OrgRole;

    async fn extract(identity: Option<Identity>) -> Result<TenantContext, TenantRejection> {
        let mut request = Request::builder().uri("/api/projects/all").body(()).unwrap();
        if let Some(identity) = identity {
            request.extensions_mut().insert(identity);
        }
        let (mut parts, _) = request.into_parts();
        TenantContext::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthenticated() {
        let rejection = extract(None).await.unwrap_err();
        assert_eq!(rejection, TenantRejection::Unauthenticated);
        assert_eq!(rejection.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_missing_org_is_bad_request() {
        let identity = Identity {
            user_id: "user_1".into(),
            org_id: None,
            org_role: None,
        };
        let rejection = extract(Some(identity)).await.unwrap_err();
        assert_eq!(rejection, TenantRejection::NoOrganization);
        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_context_from_identity() {
        let identity = Identity {
            user_id: "user_1".into(),
            org_id: Some("org_1".into()),
            org_role: Some(OrgRole::Moderator),
        };
        let context = extract(Some(identity)).await.unwrap();
        assert_eq!(context.org_id, "org_1");
        assert!(context.is_admin());
        assert_eq!(context.subject().org_id.as_deref(), Some("org_1"));
    }
}
