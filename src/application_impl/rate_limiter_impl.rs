use crate::application_port::{RateLimitDecision, RateLimitError, RateLimiter};
use crate::domain_port::{Clock, RateLimitStore};
use std::sync::Arc;
use std::time::Duration;

/// Fixed-window limiter: at most `max` hits per key per `window`.
pub struct FixedWindowRateLimiter {
    window: Duration,
    max: u64,
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
}

impl FixedWindowRateLimiter {
    pub fn try_new(
        window: Duration,
        max: u64,
        store: Arc<dyn RateLimitStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, RateLimitError> {
        if window.is_zero() {
            return Err(RateLimitError::Config("window must be positive".to_string()));
        }
        Ok(Self {
            window,
            max,
            store,
            clock,
        })
    }
}

#[async_trait::async_trait]
impl RateLimiter for FixedWindowRateLimiter {
    async fn consume(&self, key: &str) -> Result<RateLimitDecision, RateLimitError> {
        let entry = self.store.increment(key, self.window).await?;

        if entry.count > self.max {
            let retry_after = (entry.reset_at - self.clock.now())
                .to_std()
                .unwrap_or(Duration::ZERO);
            tracing::debug!(key, count = entry.count, "rate limit exceeded");
            return Ok(RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_at: entry.reset_at,
                retry_after: Some(retry_after),
            });
        }

        Ok(RateLimitDecision {
            allowed: true,
            remaining: self.max - entry.count,
            reset_at: entry.reset_at,
            retry_after: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_port::ManualClock;
    use crate::infra_memory::MemoryRateLimitStore;
    use chrono::Utc;

    fn limiter(max: u64) -> (Arc<ManualClock>, FixedWindowRateLimiter) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = Arc::new(MemoryRateLimitStore::new(clock.clone()));
        let limiter =
            FixedWindowRateLimiter::try_new(Duration::from_secs(60), max, store, clock.clone())
                .unwrap();
        (clock, limiter)
    }

    #[tokio::test]
    async fn allows_up_to_max_then_blocks() {
        let (_, limiter) = limiter(3);
        for expected_remaining in [2, 1, 0] {
            let d = limiter.consume("user_123").await.unwrap();
            assert!(d.allowed);
            assert_eq!(d.remaining, expected_remaining);
            assert!(d.retry_after.is_none());
        }
        let blocked = limiter.consume("user_123").await.unwrap();
        assert!(!blocked.allowed);
        assert_eq!(blocked.remaining, 0);
        assert_eq!(blocked.retry_after, Some(Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let (_, limiter) = limiter(1);
        assert!(limiter.consume("a").await.unwrap().allowed);
        assert!(!limiter.consume("a").await.unwrap().allowed);
        assert!(limiter.consume("b").await.unwrap().allowed);
    }

    #[tokio::test]
    async fn window_reset_restores_capacity() {
        let (clock, limiter) = limiter(1);
        assert!(limiter.consume("k").await.unwrap().allowed);
        clock.advance(chrono::Duration::seconds(30));
        let blocked = limiter.consume("k").await.unwrap();
        assert_eq!(blocked.retry_after, Some(Duration::from_secs(30)));
        clock.advance(chrono::Duration::seconds(30));
        assert!(limiter.consume("k").await.unwrap().allowed);
    }

    #[test]
    fn zero_window_is_rejected() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = Arc::new(MemoryRateLimitStore::new(clock.clone()));
        assert!(FixedWindowRateLimiter::try_new(Duration::ZERO, 5, store, clock).is_err());
    }
}
