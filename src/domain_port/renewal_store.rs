use crate::domain_model::*;

#[async_trait::async_trait]
pub trait RenewalStore: Send + Sync {
    /// Persist a new record. `jti` uniqueness is guaranteed upstream.
    async fn save(&self, record: &RenewalRecord) -> Result<(), StoreError>;

    async fn find(&self, jti: &Jti) -> Result<Option<RenewalRecord>, StoreError>;

    /// Stamp `revoked_at` if the record exists and is not yet revoked.
    /// Returns `true` only for the call that performed the transition.
    async fn revoke(&self, jti: &Jti) -> Result<bool, StoreError>;

    /// Stamp `revoked_at` on every non-revoked record of `user_id`.
    /// Returns the number of records stamped by this call.
    async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<u64, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("duplicate renewal id: {0}")]
    DuplicateJti(Jti),
    #[error("corrupt renewal record: {0}")]
    Corrupt(String),
}
