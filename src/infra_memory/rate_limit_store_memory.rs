use crate::application_port::RateLimitError;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

/// Counter windows for a single process. Not shared between instances.
pub struct MemoryRateLimitStore {
    windows: DashMap<String, RateLimitEntry>,
    clock: Arc<dyn Clock>,
}

impl MemoryRateLimitStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        MemoryRateLimitStore {
            windows: DashMap::new(),
            clock,
        }
    }
}

#[async_trait::async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn increment(&self, key: &str, window: Duration) -> Result<RateLimitEntry, RateLimitError> {
        let window = chrono::Duration::from_std(window)
            .map_err(|e| RateLimitError::Config(e.to_string()))?;
        let now = self.clock.now();
        let reset_at = now
            .checked_add_signed(window)
            .ok_or_else(|| RateLimitError::Config("window overflows the calendar".to_string()))?;

        let mut entry = self.windows.entry(key.to_string()).or_insert(RateLimitEntry {
            count: 0,
            reset_at,
        });
        if entry.reset_at <= now {
            *entry = RateLimitEntry { count: 0, reset_at };
        }
        entry.count += 1;
        Ok(*entry)
    }
}

impl ExpirySweep for MemoryRateLimitStore {
    fn name(&self) -> &'static str {
        "rate-limit-windows"
    }

    fn sweep(&self, now: DateTime<Utc>) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, w| w.reset_at > now);
        before.saturating_sub(self.windows.len())
    }
}
