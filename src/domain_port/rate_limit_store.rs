use crate::application_port::RateLimitError;
use chrono::{DateTime, Utc};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u64,
    pub reset_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Count one hit for `key`, opening a fresh window when none is running
    /// or the current one has reset.
    async fn increment(&self, key: &str, window: Duration) -> Result<RateLimitEntry, RateLimitError>;
}
