use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::{Clock, RenewalStore};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct SessionServiceConfig {
    /// Lifetime of the server-side record; the authoritative renewal boundary.
    pub renewal_ttl: TokenTtl,
}

impl Default for SessionServiceConfig {
    fn default() -> Self {
        SessionServiceConfig {
            renewal_ttl: TokenTtl::DEFAULT_RENEWAL,
        }
    }
}

pub struct RealSessionService {
    token_issuer: Arc<dyn TokenIssuer>,
    renewal_store: Arc<dyn RenewalStore>,
    clock: Arc<dyn Clock>,
    renewal_ttl: TokenTtl,
}

impl RealSessionService {
    pub fn new(
        token_issuer: Arc<dyn TokenIssuer>,
        renewal_store: Arc<dyn RenewalStore>,
        clock: Arc<dyn Clock>,
        config: SessionServiceConfig,
    ) -> Self {
        Self {
            token_issuer,
            renewal_store,
            clock,
            renewal_ttl: config.renewal_ttl,
        }
    }
}

#[async_trait::async_trait]
impl SessionService for RealSessionService {
    async fn issue_token_pair(&self, input: IssueTokenPairInput) -> Result<TokenPair, SessionError> {
        let IssueTokenPairInput {
            user_id,
            role,
            permissions,
            token_version,
        } = input;

        let jti = Jti::generate();
        let now = self.clock.now();
        let record_expires_at = now
            .checked_add_signed(self.renewal_ttl.as_chrono())
            .ok_or_else(|| {
                SessionError::ConfigInvalid(format!(
                    "renewal ttl {} overflows the calendar",
                    self.renewal_ttl
                ))
            })?;

        let (access_token, access_exp) = self
            .token_issuer
            .issue_access_token(&AccessClaims {
                user_id: user_id.clone(),
                role,
                permissions,
            })
            .await?;

        let (renewal_token, renewal_exp) = self
            .token_issuer
            .issue_renewal_token(&RenewalClaims {
                user_id: user_id.clone(),
                token_version,
                jti: Some(jti.clone()),
            })
            .await?;

        let record = RenewalRecord::new_active(
            jti.clone(),
            user_id.clone(),
            token_version,
            now,
            record_expires_at,
        );
        self.renewal_store.save(&record).await?;

        info!(%user_id, %jti, token_version, "token pair issued");

        Ok(TokenPair {
            access_token,
            renewal_token,
            access_token_expires_at: access_exp,
            renewal_token_expires_at: renewal_exp,
        })
    }

    async fn refresh(&self, renewal_token: &str) -> Result<TokenPair, SessionError> {
        let claims = self.token_issuer.verify_renewal_token(renewal_token).await?;

        let jti = claims.jti.ok_or_else(|| {
            warn!(user_id = %claims.user_id, "renewal token without jti");
            SessionError::CredentialInvalid
        })?;

        // Unknown and revoked ids report the same error.
        let record = self
            .renewal_store
            .find(&jti)
            .await?
            .ok_or(SessionError::CredentialInvalid)?;

        if record.user_id != claims.user_id {
            warn!(%jti, "renewal record owner mismatch");
            return Err(SessionError::CredentialInvalid);
        }

        match record.state_at(self.clock.now()) {
            RenewalState::Active => {}
            RenewalState::Revoked => {
                warn!(user_id = %record.user_id, %jti, "revoked renewal token presented");
                return Err(SessionError::CredentialInvalid);
            }
            RenewalState::Expired => {
                debug!(user_id = %record.user_id, %jti, "renewal record expired");
                return Err(SessionError::CredentialExpired);
            }
        }

        // Rotation: only the caller that flips the record may proceed.
        if !self.renewal_store.revoke(&jti).await? {
            warn!(user_id = %record.user_id, %jti, "lost rotation race");
            return Err(SessionError::CredentialInvalid);
        }
        debug!(user_id = %record.user_id, %jti, "renewal token rotated");

        self.issue_token_pair(
            IssueTokenPairInput::new(claims.user_id).with_token_version(claims.token_version),
        )
        .await
    }

    async fn revoke_session(&self, renewal_token: &str) -> Result<(), SessionError> {
        let claims = match self.token_issuer.verify_renewal_token(renewal_token).await {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "logout with unverifiable token ignored");
                return Ok(());
            }
        };

        if let Some(jti) = claims.jti {
            let revoked = self.renewal_store.revoke(&jti).await?;
            info!(user_id = %claims.user_id, %jti, revoked, "session revoked");
        }
        Ok(())
    }

    async fn revoke_all_sessions(&self, user_id: &UserId) -> Result<(), SessionError> {
        let count = self.renewal_store.revoke_all_for_user(user_id).await?;
        info!(%user_id, count, "all sessions revoked");
        Ok(())
    }

    async fn verify_access_token(&self, access_token: &str) -> Result<AccessClaims, SessionError> {
        self.token_issuer.verify_access_token(access_token).await
    }
}
