use chrono::{DateTime, Utc};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u64,
    pub reset_at: DateTime<Utc>,
    /// Only set when the hit was refused.
    pub retry_after: Option<Duration>,
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("invalid rate limit configuration: {0}")]
    Config(String),
}

#[async_trait::async_trait]
pub trait RateLimiter: Send + Sync {
    async fn consume(&self, key: &str) -> Result<RateLimitDecision, RateLimitError>;
}
