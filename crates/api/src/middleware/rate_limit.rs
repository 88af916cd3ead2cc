use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tigger_cache::{Cache, FixedWindow};
use tigger_models::ApiResponse;

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests. Please slow down.";

pub struct RateLimiter {
    cache: Cache,
    window: FixedWindow,
}

impl RateLimiter {
    pub fn new(cache: Cache, window: FixedWindow) -> Self {
        Self { cache, window }
    }
}

/// Client IP from proxy headers, then the socket address
fn client_ip(request: &Request) -> String {
    forwarded_ip(request.headers())
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|h| h.to_str().ok()))
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

fn too_many_requests(retry_after: u64) -> Response {
    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(ApiResponse::error(RATE_LIMIT_MESSAGE)),
    )
        .into_response();
    response
        .headers_mut()
        .insert(RETRY_AFTER, HeaderValue::from(retry_after));
    response
}

/// Fixed-window limit shared by every `/api` route, counted per client IP
pub async fn rate_limit_api(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&request);
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    match limiter.window.hit(&limiter.cache, &ip, now).await {
        Ok(hit) if !hit.allowed => {
            tracing::warn!("Rate limit exceeded for IP: {}", ip);
            too_many_requests(hit.reset_in)
        }
        Ok(_) => next.run(request).await,
        Err(e) => {
            tracing::error!("Rate limit check error: {}", e);
            // On error, allow the request (fail open)
            next.run(request).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarded_ip() {
        let mut headers = HeaderMap::new();
        assert_eq!(forwarded_ip(&headers), None);

        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(forwarded_ip(&headers).as_deref(), Some("10.0.0.2"));

        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        assert_eq!(forwarded_ip(&headers).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_too_many_requests_response() {
        let response = too_many_requests(42);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[RETRY_AFTER], "42");
    }
}
