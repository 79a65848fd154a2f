//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `rate_limit` - Fixed-window request limiting per client address

pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, RateLimitState};
