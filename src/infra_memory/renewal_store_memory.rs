use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// Reference backend. Each record sits behind its shard lock, so `revoke` is a real
/// check-and-set; `refresh` relies on that to rotate at most once per token.
pub struct MemoryRenewalStore {
    records: DashMap<Jti, RenewalRecord>,
    clock: Arc<dyn Clock>,
    retention: Duration,
}

impl MemoryRenewalStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_retention(clock, Duration::zero())
    }

    /// `retention` keeps expired records around before a sweep may drop them.
    pub fn with_retention(clock: Arc<dyn Clock>, retention: Duration) -> Self {
        MemoryRenewalStore {
            records: DashMap::new(),
            clock,
            retention,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait::async_trait]
impl RenewalStore for MemoryRenewalStore {
    async fn save(&self, record: &RenewalRecord) -> Result<(), StoreError> {
        match self.records.entry(record.jti.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateJti(record.jti.clone())),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn find(&self, jti: &Jti) -> Result<Option<RenewalRecord>, StoreError> {
        Ok(self.records.get(jti).map(|r| r.value().clone()))
    }

    async fn revoke(&self, jti: &Jti) -> Result<bool, StoreError> {
        let now = self.clock.now();
        Ok(self
            .records
            .get_mut(jti)
            .is_some_and(|mut r| r.mark_revoked(now)))
    }

    async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<u64, StoreError> {
        let now = self.clock.now();
        let mut count = 0;
        for mut r in self.records.iter_mut() {
            if &r.user_id == user_id && r.mark_revoked(now) {
                count += 1;
            }
        }
        Ok(count)
    }
}

impl ExpirySweep for MemoryRenewalStore {
    fn name(&self) -> &'static str {
        "renewal-records"
    }

    fn sweep(&self, now: DateTime<Utc>) -> usize {
        let before = self.records.len();
        self.records.retain(|_, r| {
            r.expires_at
                .checked_add_signed(self.retention)
                .is_none_or(|purge_at| purge_at >= now)
        });
        before.saturating_sub(self.records.len())
    }
}
