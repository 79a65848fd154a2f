//! HTTP adapters - REST API implementations.
//!
//! - `ideas` - Idea enhancement endpoint
//! - `middleware` - Rate limiting
//! - `router` - Application router with CORS, security headers and tracing

pub mod ideas;
pub mod middleware;
mod router;

pub use ideas::{ideas_router, IdeasAppState};
pub use router::build_router;
