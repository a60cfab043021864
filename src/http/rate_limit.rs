//! Client-side request throttling
//!
//! A governor token bucket in front of the store adapter's requests.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Configuration for rate limiting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimiterConfig {
    /// Maximum number of requests per second
    pub requests_per_second: u32,
    /// Burst size (max tokens in bucket)
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10,
            burst_size: 10,
        }
    }
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }
}

/// Token bucket limiter shared by the requests of one client
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a limiter. Zero rates are raised to one.
    pub fn new(config: &RateLimiterConfig) -> Self {
        let rate = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(rate).allow_burst(burst);

        Self {
            limiter: Arc::new(Governor::direct(quota)),
        }
    }

    /// Wait for the next permit
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod rate_limit_tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_rate_limiter_config_deserialize() {
        let config: RateLimiterConfig =
            serde_yaml::from_str("requests_per_second: 5\nburst_size: 2").unwrap();
        assert_eq!(config, RateLimiterConfig::new(5, 2));

        let partial: RateLimiterConfig = serde_yaml::from_str("burst_size: 3").unwrap();
        assert_eq!(partial, RateLimiterConfig::new(10, 3));
    }

    #[tokio::test]
    async fn test_rate_limiter_admits_burst_without_waiting() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(1, 5));

        let burst = async {
            for _ in 0..5 {
                limiter.wait().await;
            }
        };
        assert!(tokio::time::timeout(Duration::from_millis(200), burst)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_rate_limiter_zero_config_still_admits() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(0, 0));
        assert!(tokio::time::timeout(Duration::from_millis(200), limiter.wait())
            .await
            .is_ok());
    }
}
