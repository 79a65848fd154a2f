//! In-memory rate limiter implementation.
//!
//! Uses a fixed-window counter algorithm with an in-memory HashMap.
//! State is process-local and lost on restart.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::RateLimitConfig;
use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitScope,
    RateLimitStatus, RateLimiter,
};

/// In-memory fixed-window rate limiter.
///
/// Each key tracks the count of requests in its current window, which
/// resets once the window expires. Expired windows are purged when the
/// table grows past the configured cleanup threshold.
#[derive(Debug, Clone)]
pub struct InMemoryRateLimiter {
    /// Rate limit configuration.
    config: RateLimitConfig,
    /// Per-key window state.
    windows: Arc<RwLock<HashMap<String, WindowState>>>,
}

/// State for a single rate limit window.
#[derive(Debug, Clone)]
struct WindowState {
    /// Number of requests in the current window.
    count: u32,
    /// When the current window started (unix millis).
    window_start_ms: i64,
    /// Window duration in seconds.
    window_secs: u32,
}

impl WindowState {
    fn window_end_ms(&self) -> i64 {
        self.window_start_ms + i64::from(self.window_secs) * 1000
    }

    fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.window_end_ms()
    }
}

impl InMemoryRateLimiter {
    /// Create a new in-memory rate limiter.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a rate limiter with default configuration (5 requests per 60 seconds per IP).
    pub fn with_defaults() -> Self {
        Self::new(RateLimitConfig::default())
    }

    /// Number of windows currently tracked.
    pub async fn tracked_keys(&self) -> usize {
        self.windows.read().await.len()
    }

    /// Get the limit and window for a key.
    fn limits_for(&self, key: &RateLimitKey) -> Result<(u32, u32), RateLimitError> {
        match key.scope {
            RateLimitScope::Ip => Ok((self.config.requests_per_window, self.config.window_secs)),
            RateLimitScope::Global => self
                .config
                .global_requests_per_window
                .map(|limit| (limit, self.config.window_secs))
                .ok_or(RateLimitError::Unconfigured(RateLimitScope::Global)),
        }
    }

    fn now_ms() -> i64 {
        Utc::now().timestamp_millis()
    }

    fn to_datetime(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).single().unwrap_or_else(Utc::now)
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let storage_key = key.storage_key();
        let (limit, window_secs) = self.limits_for(&key)?;
        let now = Self::now_ms();

        let mut windows = self.windows.write().await;

        if windows.len() >= self.config.cleanup_threshold && !windows.contains_key(&storage_key) {
            windows.retain(|_, state| !state.is_expired(now));
        }

        // Get or create window state
        let state = windows.entry(storage_key).or_insert_with(|| WindowState {
            count: 0,
            window_start_ms: now,
            window_secs,
        });

        if state.is_expired(now) {
            state.count = 0;
            state.window_start_ms = now;
            state.window_secs = window_secs;
        }

        if state.count >= limit {
            let remaining_ms = (state.window_end_ms() - now).max(0);
            let retry_after = ((remaining_ms + 999) / 1000) as u32;

            return Ok(RateLimitResult::Denied(RateLimitDenied {
                limit,
                retry_after_secs: retry_after.max(1),
                scope: key.scope,
                message: format!(
                    "Rate limit exceeded for {}. Retry after {} seconds.",
                    key.scope,
                    retry_after.max(1)
                ),
            }));
        }

        state.count += 1;
        let remaining = limit.saturating_sub(state.count);

        Ok(RateLimitResult::Allowed(RateLimitStatus {
            limit,
            remaining,
            reset_at: Self::to_datetime(state.window_end_ms()),
            window_secs,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn limiter_with(requests_per_window: u32, window_secs: u32) -> InMemoryRateLimiter {
        InMemoryRateLimiter::new(RateLimitConfig {
            requests_per_window,
            window_secs,
            ..Default::default()
        })
    }

    // ─── Basic Functionality Tests ───────────────────────────────────

    #[tokio::test]
    async fn allows_requests_within_limit() {
        let limiter = InMemoryRateLimiter::with_defaults();
        let key = RateLimitKey::ip("192.168.1.1");

        for i in 0..5 {
            let result = limiter.check(key.clone()).await.unwrap();
            assert!(result.is_allowed(), "Request {} should be allowed", i + 1);
        }
    }

    #[tokio::test]
    async fn sixth_request_in_window_is_denied() {
        let limiter = InMemoryRateLimiter::with_defaults();
        let key = RateLimitKey::ip("192.168.1.1");

        for _ in 0..5 {
            assert!(limiter.check(key.clone()).await.unwrap().is_allowed());
        }

        let result = limiter.check(key.clone()).await.unwrap();
        match result {
            RateLimitResult::Denied(denied) => {
                assert_eq!(denied.limit, 5);
                assert!(denied.retry_after_secs > 0 && denied.retry_after_secs <= 60);
                assert_eq!(denied.scope, RateLimitScope::Ip);
            }
            other => panic!("expected denial, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn allowed_status_counts_down_remaining() {
        let limiter = limiter_with(10, 60);
        let key = RateLimitKey::ip("10.0.0.1");

        let mut remaining = Vec::new();
        for _ in 0..3 {
            match limiter.check(key.clone()).await.unwrap() {
                RateLimitResult::Allowed(status) => {
                    assert_eq!(status.limit, 10);
                    assert_eq!(status.window_secs, 60);
                    assert!(status.reset_at > Utc::now());
                    remaining.push(status.remaining);
                }
                other => panic!("expected allowance, got {:?}", other),
            }
        }
        assert_eq!(remaining, vec![9, 8, 7]);
    }

    #[tokio::test]
    async fn window_expiry_restores_quota() {
        let limiter = limiter_with(1, 1);
        let key = RateLimitKey::ip("10.0.0.3");

        assert!(limiter.check(key.clone()).await.unwrap().is_allowed());
        assert!(limiter.check(key.clone()).await.unwrap().is_denied());

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(limiter.check(key.clone()).await.unwrap().is_allowed());
    }

    // ─── Global Limit Tests ───────────────────────────────────────────

    #[tokio::test]
    async fn global_limit_is_unconfigured_by_default() {
        let limiter = InMemoryRateLimiter::with_defaults();
        let err = limiter.check(RateLimitKey::global()).await.unwrap_err();
        assert!(matches!(
            err,
            RateLimitError::Unconfigured(RateLimitScope::Global)
        ));
    }

    #[tokio::test]
    async fn global_limit_applies_to_all_requests() {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig {
            global_requests_per_window: Some(3),
            ..Default::default()
        });
        let key = RateLimitKey::global();

        for _ in 0..3 {
            assert!(limiter.check(key.clone()).await.unwrap().is_allowed());
        }
        assert!(limiter.check(key.clone()).await.unwrap().is_denied());
    }

    // ─── Different Keys Are Independent ───────────────────────────────

    #[tokio::test]
    async fn different_ips_have_independent_limits() {
        let limiter = limiter_with(3, 60);

        let key1 = RateLimitKey::ip("1.1.1.1");
        let key2 = RateLimitKey::ip("2.2.2.2");

        for _ in 0..3 {
            limiter.check(key1.clone()).await.unwrap();
        }
        assert!(limiter.check(key1.clone()).await.unwrap().is_denied());

        assert!(limiter.check(key2.clone()).await.unwrap().is_allowed());
    }

    // ─── Remaining Counter Accuracy Tests ────────────────────────────

    #[tokio::test]
    async fn remaining_decrements_correctly() {
        let limiter = limiter_with(10, 60);
        let key = RateLimitKey::ip("test-ip");

        for expected_remaining in (0..10u32).rev() {
            match limiter.check(key.clone()).await.unwrap() {
                RateLimitResult::Allowed(status) => assert_eq!(
                    status.remaining, expected_remaining,
                    "After request, remaining should be {}",
                    expected_remaining
                ),
                other => panic!("expected allowed, got {:?}", other),
            }
        }
    }

    // ─── Cleanup Tests ───────────────────────────────────────────────

    #[tokio::test]
    async fn expired_windows_are_purged_past_threshold() {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig {
            window_secs: 1,
            cleanup_threshold: 3,
            ..Default::default()
        });

        for ip in ["1.0.0.1", "1.0.0.2", "1.0.0.3"] {
            limiter.check(RateLimitKey::ip(ip)).await.unwrap();
        }
        assert_eq!(limiter.tracked_keys().await, 3);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        limiter.check(RateLimitKey::ip("1.0.0.4")).await.unwrap();

        assert_eq!(limiter.tracked_keys().await, 1);
    }

    #[tokio::test]
    async fn concurrent_checks_never_exceed_limit() {
        let limiter = InMemoryRateLimiter::with_defaults();
        let key = RateLimitKey::ip("9.9.9.9");

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let limiter = limiter.clone();
                let key = key.clone();
                tokio::spawn(async move { limiter.check(key).await.unwrap().is_allowed() })
            })
            .collect();

        let mut allowed = 0;
        for handle in handles {
            if handle.await.unwrap() {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 5);
    }
}
