//! Rate limiting middleware for axum.
//!
//! This module provides middleware that enforces rate limits using the `RateLimiter` port.
//!
//! # Architecture
//!
//! The middleware checks two scopes in order:
//! 1. Per-IP rate limit
//! 2. Global rate limit (only when one is configured)
//!
//! A request denied at the IP scope never consumes a global slot.
//!
//! Rate limit status is returned in standard HTTP headers:
//! - `X-RateLimit-Limit`: Maximum requests allowed in the window
//! - `X-RateLimit-Remaining`: Requests remaining in the current window
//! - `X-RateLimit-Reset`: Unix timestamp when the window resets
//! - `Retry-After`: Seconds to wait (only on 429 response)
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::post, middleware};
//! use std::sync::Arc;
//!
//! let state = RateLimitState::new(Arc::new(InMemoryRateLimiter::with_defaults()), false);
//!
//! let app = Router::new()
//!     .route("/api/ideas/enhance", post(handler))
//!     .layer(middleware::from_fn_with_state(state, rate_limit_middleware));
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::ideas::ErrorResponse;
use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};

/// Identifier used when no client address can be determined.
const UNKNOWN_CLIENT: &str = "unknown";

/// Rate limiter middleware state.
#[derive(Clone)]
pub struct RateLimitState {
    limiter: Arc<dyn RateLimiter>,
    trust_proxy_headers: bool,
}

impl RateLimitState {
    pub fn new(limiter: Arc<dyn RateLimiter>, trust_proxy_headers: bool) -> Self {
        Self {
            limiter,
            trust_proxy_headers,
        }
    }
}

/// Standard rate limit header names.
pub mod headers {
    use super::HeaderName;

    /// Maximum requests allowed in the window.
    pub static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
    /// Requests remaining in the current window.
    pub static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
    /// Unix timestamp when the window resets.
    pub static X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
}

/// Rate limiting middleware that checks the global and per-IP limits.
///
/// This middleware:
/// 1. Extracts client IP from `ConnectInfo` (or forwarded headers when trusted)
/// 2. Checks the per-IP rate limit
/// 3. Checks the global rate limit, if one is configured
/// 4. Returns 429 Too Many Requests if any limit is exceeded
/// 5. Adds rate limit headers to allowed responses
///
/// Limiter failures fail open.
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let client_ip = extract_client_ip(
        request.headers(),
        connect_info.as_ref(),
        state.trust_proxy_headers,
    )
    .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

    let ip_status = match state.limiter.check(RateLimitKey::ip(&client_ip)).await {
        Ok(RateLimitResult::Denied(denied)) => {
            tracing::warn!(
                client_ip = %client_ip,
                retry_after_secs = denied.retry_after_secs,
                "Rate limit exceeded"
            );
            return rate_limit_response(&denied);
        }
        Ok(RateLimitResult::Allowed(status)) => Some(status),
        Err(e) => {
            tracing::warn!("Rate limiter unavailable for IP check: {}", e);
            None
        }
    };

    match state.limiter.check(RateLimitKey::global()).await {
        Ok(RateLimitResult::Denied(denied)) => {
            tracing::warn!(limit = denied.limit, "Global rate limit exceeded");
            return rate_limit_response(&denied);
        }
        Ok(RateLimitResult::Allowed(_)) | Err(RateLimitError::Unconfigured(_)) => {}
        Err(e) => {
            tracing::warn!("Rate limiter unavailable: {}", e);
        }
    }

    let mut response = next.run(request).await;

    if let Some(status) = ip_status {
        add_rate_limit_headers(&mut response, &status);
    }

    response
}

/// Extract the client IP for rate limiting.
///
/// The socket peer address is used unless `trust_proxy_headers` is set, in
/// which case `X-Forwarded-For` (first entry) and then `X-Real-IP` take
/// precedence.
fn extract_client_ip(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    trust_proxy_headers: bool,
) -> Option<String> {
    if trust_proxy_headers {
        let forwarded = headers
            .get("X-Forwarded-For")
            .and_then(|h| h.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());
        if let Some(ip) = forwarded {
            return Some(ip.to_string());
        }

        let real_ip = headers
            .get("X-Real-IP")
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());
        if let Some(ip) = real_ip {
            return Some(ip.to_string());
        }
    }

    connect_info.map(|ci| ci.0.ip().to_string())
}

/// Create a 429 Too Many Requests response.
fn rate_limit_response(denied: &RateLimitDenied) -> Response {
    let body = ErrorResponse::new(
        "RATE_LIMIT_EXCEEDED",
        "Too many requests, please try again later.",
    );
    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    let headers = response.headers_mut();
    headers.insert(
        headers::X_RATELIMIT_LIMIT.clone(),
        HeaderValue::from(denied.limit),
    );
    headers.insert(headers::X_RATELIMIT_REMAINING.clone(), HeaderValue::from(0u32));
    headers.insert(
        header::RETRY_AFTER,
        HeaderValue::from(denied.retry_after_secs),
    );

    response
}

/// Add rate limit headers to a response.
fn add_rate_limit_headers(response: &mut Response, status: &RateLimitStatus) {
    let headers = response.headers_mut();
    headers.insert(
        headers::X_RATELIMIT_LIMIT.clone(),
        HeaderValue::from(status.limit),
    );
    headers.insert(
        headers::X_RATELIMIT_REMAINING.clone(),
        HeaderValue::from(status.remaining),
    );
    headers.insert(
        headers::X_RATELIMIT_RESET.clone(),
        HeaderValue::from(status.reset_at.timestamp()),
    );
}
