//! Rate limiting configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Fixed-window rate limit configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Whether rate limiting is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Requests allowed per client address per window
    #[serde(default = "default_requests_per_window")]
    pub requests_per_window: u32,

    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u32,

    /// Optional limit across all clients per window
    pub global_requests_per_window: Option<u32>,

    /// Honour `X-Forwarded-For` / `X-Real-IP` when identifying clients
    #[serde(default)]
    pub trust_proxy_headers: bool,

    /// Number of tracked windows above which expired entries are purged
    #[serde(default = "default_cleanup_threshold")]
    pub cleanup_threshold: usize,
}

impl RateLimitConfig {
    /// Validate rate limit configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.requests_per_window == 0 || self.window_secs == 0 {
            return Err(ValidationError::InvalidRateLimit);
        }
        if self.global_requests_per_window == Some(0) {
            return Err(ValidationError::InvalidRateLimit);
        }
        Ok(())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            requests_per_window: default_requests_per_window(),
            window_secs: default_window_secs(),
            global_requests_per_window: None,
            trust_proxy_headers: false,
            cleanup_threshold: default_cleanup_threshold(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_requests_per_window() -> u32 {
    5
}

fn default_window_secs() -> u32 {
    60
}

fn default_cleanup_threshold() -> usize {
    10_000
}
