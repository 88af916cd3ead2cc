//! Verification of identity-provider session tokens.
//!
//! The provider signs a short-lived JWT and hands it to the browser in the
//! session cookie. API clients may send the same token as a bearer token.

use crate::error::{AuthError, Result};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tigger_authz::{OrgRole, Subject};

pub const DEFAULT_COOKIE_NAME: &str = "__session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_role: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Verified caller identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub org_id: Option<String>,
    pub org_role: Option<OrgRole>,
}

impl Identity {
    pub fn subject(&self) -> Subject {
        Subject::new(self.user_id.clone(), self.org_id.clone(), self.org_role.clone())
    }
}

impl From<SessionClaims> for Identity {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            org_id: claims.org_id.filter(|org| !org.is_empty()),
            org_role: claims.org_role.as_deref().map(OrgRole::parse),
        }
    }
}

/// Key material used to check session signatures
#[derive(Clone)]
pub enum SessionKey {
    /// RS256 public key in PEM form, as published by the identity provider
    PublicKeyPem(String),
    /// HS256 shared secret for local development and tests
    Secret(String),
}

#[derive(Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub key: SessionKey,
    pub leeway_seconds: u64,
}

impl SessionConfig {
    /// Reads `SESSION_JWT_PUBLIC_KEY` (preferred) or `SESSION_JWT_SECRET`.
    pub fn from_env() -> Result<Self> {
        let key = match (
            std::env::var("SESSION_JWT_PUBLIC_KEY").ok().filter(|v| !v.is_empty()),
            std::env::var("SESSION_JWT_SECRET").ok().filter(|v| !v.is_empty()),
        ) {
            // PEMs in .env files usually carry escaped newlines
            (Some(pem), _) => SessionKey::PublicKeyPem(pem.replace("\\n", "\n")),
            (None, Some(secret)) => SessionKey::Secret(secret),
            (None, None) => {
                return Err(AuthError::ConfigurationError(
                    "SESSION_JWT_PUBLIC_KEY or SESSION_JWT_SECRET must be set".to_string(),
                ))
            }
        };

        Ok(Self {
            cookie_name: std::env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| DEFAULT_COOKIE_NAME.to_string()),
            key,
            leeway_seconds: std::env::var("SESSION_LEEWAY_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        })
    }
}

pub struct SessionVerifier {
    decoding_key: DecodingKey,
    encoding_key: Option<EncodingKey>,
    algorithm: Algorithm,
    cookie_name: String,
    leeway_seconds: u64,
}

impl SessionVerifier {
    pub fn new(config: &SessionConfig) -> Result<Self> {
        let (decoding_key, encoding_key, algorithm) = match &config.key {
            SessionKey::PublicKeyPem(pem) => (
                DecodingKey::from_rsa_pem(pem.as_bytes())?,
                None,
                Algorithm::RS256,
            ),
            SessionKey::Secret(secret) => (
                DecodingKey::from_secret(secret.as_bytes()),
                Some(EncodingKey::from_secret(secret.as_bytes())),
                Algorithm::HS256,
            ),
        };

        Ok(Self {
            decoding_key,
            encoding_key,
            algorithm,
            cookie_name: config.cookie_name.clone(),
            leeway_seconds: config.leeway_seconds,
        })
    }

    /// HS256 verifier with default cookie name and leeway
    pub fn with_secret(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            encoding_key: Some(EncodingKey::from_secret(secret.as_bytes())),
            algorithm: Algorithm::HS256,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            leeway_seconds: 60,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Session token from the cookie, falling back to `Authorization: Bearer`.
    pub fn extract_token(&self, headers: &HeaderMap) -> Option<String> {
        let prefix = format!("{}=", self.cookie_name);
        let from_cookie = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .map(str::trim)
            .find_map(|pair| pair.strip_prefix(prefix.as_str()))
            .filter(|token| !token.is_empty());

        if let Some(token) = from_cookie {
            return Some(token.to_string());
        }

        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    }

    pub fn verify(&self, token: &str) -> Result<Identity> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = self.leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation)?;
        if data.claims.sub.is_empty() {
            return Err(AuthError::InvalidToken("Token has no subject".to_string()));
        }
        tracing::debug!(
            user_id = %data.claims.sub,
            org_id = ?data.claims.org_id,
            "Session verified"
        );
        Ok(data.claims.into())
    }

    pub fn verify_headers(&self, headers: &HeaderMap) -> Result<Identity> {
        let token = self.extract_token(headers).ok_or(AuthError::MissingToken)?;
        self.verify(&token)
    }

    /// Mint a session token. Only available with a shared secret.
    pub fn issue(
        &self,
        user_id: &str,
        org_id: Option<&str>,
        org_role: Option<&str>,
        ttl: Duration,
    ) -> Result<String> {
        let key = self.encoding_key.as_ref().ok_or_else(|| {
            AuthError::ConfigurationError("Token issuing requires a shared secret".to_string())
        })?;

        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            org_id: org_id.map(str::to_string),
            org_role: org_role.map(str::to_string),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        Ok(encode(&Header::new(self.algorithm), &claims, key)?)
    }
}
