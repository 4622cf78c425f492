//! In-memory rate limiter using governor crate.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter as GovernorRateLimiter};

use blog_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

/// Tracked keys above which idle entries are evicted.
const MAX_TRACKED_KEYS: usize = 10_000;

/// In-memory rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum attempts per window and key.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 20,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    /// Read `RATE_LIMIT_MAX_REQUESTS` and `RATE_LIMIT_WINDOW_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_requests),
            window: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.window),
        }
    }
}

/// Per-key GCRA rate limiter.
///
/// Limits are per-process, not shared across instances.
pub struct InMemoryRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let burst = NonZeroU32::new(config.max_requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(config.window / burst.get())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            limiter: GovernorRateLimiter::keyed(quota),
            clock: DefaultClock::default(),
        }
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        if self.limiter.len() > MAX_TRACKED_KEYS {
            self.limiter.retain_recent();
        }

        match self.limiter.check_key(&key.to_string()) {
            Ok(()) => Ok(RateLimitResult {
                allowed: true,
                retry_after: Duration::ZERO,
            }),
            Err(not_until) => Ok(RateLimitResult {
                allowed: false,
                retry_after: not_until.wait_time_from(self.clock.now()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blocks_after_burst_per_key() {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig {
            max_requests: 2,
            window: Duration::from_secs(60),
        });

        assert!(limiter.check("10.0.0.1").await.unwrap().allowed);
        assert!(limiter.check("10.0.0.1").await.unwrap().allowed);

        let blocked = limiter.check("10.0.0.1").await.unwrap();
        assert!(!blocked.allowed);
        assert!(blocked.retry_after > Duration::ZERO);

        assert!(limiter.check("10.0.0.2").await.unwrap().allowed);
    }
}
