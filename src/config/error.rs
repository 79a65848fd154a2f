//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid log format: {0} (expected \"pretty\" or \"json\")")]
    InvalidLogFormat(String),

    #[error("Invalid CORS origin: {0}")]
    InvalidCorsOrigin(String),

    #[error("Invalid AI base URL")]
    InvalidAiBaseUrl,

    #[error("AI temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("Request timeout ({request}s) must exceed AI timeout plus email delivery timeout ({budget}s)")]
    TimeoutBudget { request: u64, budget: u64 },

    #[error("Rate limit window and request count must be greater than zero")]
    InvalidRateLimit,
}
