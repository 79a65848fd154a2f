//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Gemini provider, mock provider, and the AI-backed idea enhancer
//! - `email` - SMTP delivery of enhanced ideas
//! - `rate_limiter` - In-memory fixed-window limiter
//! - `http` - axum routes, middleware, and router assembly

pub mod ai;
pub mod email;
pub mod http;
pub mod rate_limiter;

pub use ai::{AiIdeaEnhancer, GeminiConfig, GeminiProvider};
pub use email::SmtpIdeaNotifier;
pub use http::build_router;
pub use rate_limiter::InMemoryRateLimiter;
