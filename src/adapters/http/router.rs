//! Top-level router assembly.
//!
//! Layer order, outermost first: tracing, request timeout, CORS, security
//! headers, rate limiting. Preflight requests are answered by the CORS layer
//! and never reach the limiter.

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware, Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::application::handlers::EnhanceIdeaHandler;
use crate::config::AppConfig;
use crate::ports::RateLimiter;

use super::ideas::{ideas_router, IdeasAppState};
use super::middleware::{rate_limit_middleware, RateLimitState};

/// Builds the complete HTTP application.
pub fn build_router(
    config: &AppConfig,
    handler: Arc<EnhanceIdeaHandler>,
    limiter: Arc<dyn RateLimiter>,
) -> Router {
    let mut router = Router::new().nest("/api", ideas_router(IdeasAppState::new(handler)));

    if config.rate_limit.enabled {
        let state = RateLimitState::new(limiter, config.rate_limit.trust_proxy_headers);
        router = router.layer(middleware::from_fn_with_state(state, rate_limit_middleware));
    }

    with_security_headers(router)
        .layer(cors_layer(&config.server.cors_origins_list()))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http())
}

fn with_security_headers(router: Router) -> Router {
    router
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .expose_headers([
            HeaderName::from_static("x-ratelimit-limit"),
            HeaderName::from_static("x-ratelimit-remaining"),
            HeaderName::from_static("x-ratelimit-reset"),
            header::RETRY_AFTER,
        ])
}

