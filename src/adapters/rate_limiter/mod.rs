//! Rate limiter adapters.
//!
//! Implementations of the RateLimiter port.
//!
//! ## Available Adapters
//!
//! - `InMemoryRateLimiter` - Process-local fixed-window counters
//!
//! ## Usage
//!
//! ```ignore
//! use ideaboost::adapters::rate_limiter::InMemoryRateLimiter;
//! use ideaboost::config::RateLimitConfig;
//!
//! let limiter = InMemoryRateLimiter::new(RateLimitConfig::default());
//! ```

mod in_memory;

pub use in_memory::InMemoryRateLimiter;
