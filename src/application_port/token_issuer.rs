use crate::application_port::SessionError;
use crate::domain_model::*;
use chrono::{DateTime, Utc};

/// Mints and verifies both credential kinds under one bound policy.
#[async_trait::async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue_access_token(
        &self,
        claims: &AccessClaims,
    ) -> Result<(AccessToken, DateTime<Utc>), SessionError>;

    /// `claims.jti` must be set.
    async fn issue_renewal_token(
        &self,
        claims: &RenewalClaims,
    ) -> Result<(RenewalToken, DateTime<Utc>), SessionError>;

    async fn verify_access_token(&self, token: &str) -> Result<AccessClaims, SessionError>;

    async fn verify_renewal_token(&self, token: &str) -> Result<RenewalClaims, SessionError>;
}
