use crate::domain_model::{Jti, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalState {
    Active,
    Revoked,
    Expired,
}

/// Server-side lifecycle record of one renewal credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalRecord {
    pub jti: Jti,
    pub user_id: UserId,
    pub token_version: u64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RenewalRecord {
    pub fn new_active(
        jti: Jti,
        user_id: UserId,
        token_version: u64,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        RenewalRecord {
            jti,
            user_id,
            token_version,
            created_at,
            expires_at,
            revoked_at: None,
        }
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Revocation wins over expiry when both hold.
    pub fn state_at(&self, now: DateTime<Utc>) -> RenewalState {
        if self.is_revoked() {
            RenewalState::Revoked
        } else if self.is_expired_at(now) {
            RenewalState::Expired
        } else {
            RenewalState::Active
        }
    }

    /// Sets `revoked_at` unless already set. Returns whether this call did it.
    pub fn mark_revoked(&mut self, at: DateTime<Utc>) -> bool {
        if self.revoked_at.is_some() {
            return false;
        }
        self.revoked_at = Some(at);
        true
    }
}
