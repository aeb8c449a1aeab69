//! Fixed-window rate limiting over a shared counter store.

use chrono::{DateTime, Utc};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::infrastructure::counter::{CounterError, CounterStore};

/// Outcome of one [`RateLimiter::allow`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u64,
    pub remaining: u64,
    /// Time until the current window closes.
    pub reset_after: Duration,
    pub reset_at: DateTime<Utc>,
}

impl Decision {
    fn counted(count: u64, limit: u64, reset_after: Duration) -> Self {
        Self {
            allowed: count <= limit,
            limit,
            remaining: limit.saturating_sub(count),
            reset_after,
            reset_at: reset_time(reset_after),
        }
    }

    fn fail_open(limit: u64, window: Duration) -> Self {
        Self {
            allowed: true,
            limit,
            remaining: limit,
            reset_after: window,
            reset_at: reset_time(window),
        }
    }
}

fn reset_time(after: Duration) -> DateTime<Utc> {
    let after = chrono::Duration::from_std(after).unwrap_or(chrono::Duration::zero());
    Utc::now() + after
}

/// Fixed-window counter keyed by `rate:{subject}:{resource}`.
///
/// The first increment of a window arms the key's TTL to the window length, so
/// a window starts at the first request and ends when the key expires. Bursts
/// of up to twice the limit can straddle two adjacent windows.
///
/// Counter-store failures and timeouts fail open: the request is allowed and
/// the degradation is logged and counted.
pub struct RateLimiter {
    counters: Arc<dyn CounterStore>,
    timeout: Duration,
}

impl RateLimiter {
    pub fn new(counters: Arc<dyn CounterStore>, timeout: Duration) -> Self {
        Self { counters, timeout }
    }

    /// Counts one request of `subject` against `resource` and decides whether
    /// it fits in `limit` requests per `window`.
    pub async fn allow(
        &self,
        subject: &str,
        resource: &str,
        limit: u64,
        window: Duration,
    ) -> Decision {
        let key = format!("rate:{}:{}", subject, resource);

        match tokio::time::timeout(self.timeout, self.count(&key, window)).await {
            Ok(Ok((count, reset_after))) => Decision::counted(count, limit, reset_after),
            Ok(Err(e)) => {
                warn!(key = %key, error = %e, "Counter store failed, allowing request");
                counter!("urlgate_rate_limit_fail_open_total").increment(1);
                Decision::fail_open(limit, window)
            }
            Err(_) => {
                warn!(key = %key, timeout_ms = self.timeout.as_millis() as u64, "Counter store timed out, allowing request");
                counter!("urlgate_rate_limit_fail_open_total").increment(1);
                Decision::fail_open(limit, window)
            }
        }
    }

    async fn count(&self, key: &str, window: Duration) -> Result<(u64, Duration), CounterError> {
        let count = self.counters.incr(key).await?;

        if count == 1 {
            self.counters.expire(key, window).await?;
            return Ok((count, window));
        }

        match self.counters.ttl(key).await? {
            Some(ttl) => Ok((count, ttl)),
            None => {
                // Counter without expiry: the arming EXPIRE of this window was lost.
                self.counters.expire(key, window).await?;
                Ok((count, window))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::counter::{MemoryCounterStore, MockCounterStore};

    fn limiter(counters: impl CounterStore + 'static) -> RateLimiter {
        RateLimiter::new(Arc::new(counters), Duration::from_millis(200))
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_admits_limit_then_resets() {
        let limiter = limiter(MemoryCounterStore::new());
        let window = Duration::from_secs(60);

        for i in 0..5 {
            let decision = limiter.allow("key", "/shorten", 5, window).await;
            assert!(decision.allowed, "call {} should pass", i + 1);
            assert_eq!(decision.remaining, 4 - i);
        }

        let sixth = limiter.allow("key", "/shorten", 5, window).await;
        assert!(!sixth.allowed);
        assert_eq!(sixth.remaining, 0);

        tokio::time::advance(window).await;

        let after_reset = limiter.allow("key", "/shorten", 5, window).await;
        assert!(after_reset.allowed);
        assert_eq!(after_reset.remaining, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_after_tracks_remaining_ttl() {
        let limiter = limiter(MemoryCounterStore::new());
        let window = Duration::from_secs(60);

        let first = limiter.allow("key", "/r", 10, window).await;
        assert_eq!(first.reset_after, window);

        tokio::time::advance(Duration::from_secs(20)).await;

        let second = limiter.allow("key", "/r", 10, window).await;
        assert_eq!(second.reset_after, Duration::from_secs(40));
    }

    #[tokio::test]
    async fn test_subjects_and_resources_are_counted_separately() {
        let limiter = limiter(MemoryCounterStore::new());
        let window = Duration::from_secs(60);

        assert!(limiter.allow("a", "/x", 1, window).await.allowed);
        assert!(limiter.allow("b", "/x", 1, window).await.allowed);
        assert!(limiter.allow("a", "/y", 1, window).await.allowed);
        assert!(!limiter.allow("a", "/x", 1, window).await.allowed);
    }

    #[tokio::test]
    async fn test_first_increment_arms_expiry() {
        let mut counters = MockCounterStore::new();
        counters
            .expect_incr()
            .withf(|key| key == "rate:k:/p")
            .times(1)
            .returning(|_| Ok(1));
        counters
            .expect_expire()
            .withf(|key, ttl| key == "rate:k:/p" && *ttl == Duration::from_secs(1))
            .times(1)
            .returning(|_, _| Ok(()));
        counters.expect_ttl().never();

        let decision = limiter(counters)
            .allow("k", "/p", 10, Duration::from_secs(1))
            .await;
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 9);
    }

    #[tokio::test]
    async fn test_counter_without_expiry_is_rearmed() {
        let mut counters = MockCounterStore::new();
        counters.expect_incr().returning(|_| Ok(3));
        counters.expect_ttl().times(1).returning(|_| Ok(None));
        counters.expect_expire().times(1).returning(|_, _| Ok(()));

        let decision = limiter(counters)
            .allow("k", "/p", 10, Duration::from_secs(5))
            .await;
        assert_eq!(decision.reset_after, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_store_failure_fails_open() {
        let mut counters = MockCounterStore::new();
        counters
            .expect_incr()
            .returning(|_| Err(CounterError::ConnectionError("refused".to_string())));

        let decision = limiter(counters)
            .allow("k", "/p", 5, Duration::from_secs(60))
            .await;
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_timeout_fails_open() {
        struct Hanging;

        #[async_trait::async_trait]
        impl CounterStore for Hanging {
            async fn incr(&self, _: &str) -> crate::infrastructure::counter::CounterResult<u64> {
                std::future::pending().await
            }
            async fn expire(
                &self,
                _: &str,
                _: Duration,
            ) -> crate::infrastructure::counter::CounterResult<()> {
                std::future::pending().await
            }
            async fn ttl(
                &self,
                _: &str,
            ) -> crate::infrastructure::counter::CounterResult<Option<Duration>> {
                std::future::pending().await
            }
            async fn health_check(&self) -> bool {
                false
            }
        }

        let decision = limiter(Hanging)
            .allow("k", "/p", 5, Duration::from_secs(60))
            .await;
        assert!(decision.allowed);
    }
}
