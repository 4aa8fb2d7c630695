use crate::application_impl::{JwtCodec, SignOptions, SigningAlgorithm, VerifyOptions};
use crate::application_port::{SessionError, TokenIssuer};
use crate::domain_model::*;
use crate::domain_port::Clock;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::warn;

pub const DEFAULT_ISSUER: &str = "session-warden";

pub const ACCESS_TOKEN_TYPE: &str = "at+jwt";
pub const RENEWAL_TOKEN_TYPE: &str = "rt+jwt";

#[derive(Debug, Clone)]
pub struct JwtIssuerConfig {
    pub access_secret: Secret,
    /// Falls back to `access_secret` when unset.
    pub renewal_secret: Option<Secret>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub access_ttl: TokenTtl,
    pub renewal_ttl: TokenTtl,
    pub algorithm: SigningAlgorithm,
}

impl JwtIssuerConfig {
    pub fn new(access_secret: Secret) -> Self {
        JwtIssuerConfig {
            access_secret,
            renewal_secret: None,
            issuer: Some(DEFAULT_ISSUER.to_string()),
            audience: None,
            access_ttl: TokenTtl::DEFAULT_ACCESS,
            renewal_ttl: TokenTtl::DEFAULT_RENEWAL,
            algorithm: SigningAlgorithm::default(),
        }
    }
}

/// Per-kind signing policy. The `typ` header keeps kinds apart even under a shared secret.
struct KindPolicy {
    secret: Secret,
    ttl: TokenTtl,
    token_type: &'static str,
}

pub struct JwtIssuer {
    codec: JwtCodec,
    access: KindPolicy,
    renewal: KindPolicy,
    issuer: Option<String>,
    audience: Option<String>,
    algorithm: SigningAlgorithm,
}

impl JwtIssuer {
    pub fn try_new(cfg: JwtIssuerConfig, clock: Arc<dyn Clock>) -> Result<Self, SessionError> {
        if cfg.access_secret.is_blank() {
            return Err(SessionError::ConfigInvalid(
                "access secret is required".to_string(),
            ));
        }
        let renewal_secret = match cfg.renewal_secret {
            Some(s) if s.is_blank() => {
                return Err(SessionError::ConfigInvalid(
                    "renewal secret is set but empty".to_string(),
                ));
            }
            Some(s) => s,
            None => cfg.access_secret.clone(),
        };
        if renewal_secret == cfg.access_secret {
            warn!("access and renewal tokens share one signing secret");
        }

        Ok(JwtIssuer {
            codec: JwtCodec::new(clock),
            access: KindPolicy {
                secret: cfg.access_secret,
                ttl: cfg.access_ttl,
                token_type: ACCESS_TOKEN_TYPE,
            },
            renewal: KindPolicy {
                secret: renewal_secret,
                ttl: cfg.renewal_ttl,
                token_type: RENEWAL_TOKEN_TYPE,
            },
            issuer: cfg.issuer,
            audience: cfg.audience,
            algorithm: cfg.algorithm,
        })
    }

    fn sign<T: Serialize>(
        &self,
        claims: &T,
        policy: &KindPolicy,
    ) -> Result<(String, DateTime<Utc>), SessionError> {
        self.codec.sign(
            claims,
            &SignOptions {
                secret: policy.secret.expose(),
                expires_in: policy.ttl,
                issuer: self.issuer.as_deref(),
                audience: self.audience.as_deref(),
                algorithm: self.algorithm,
                token_type: Some(policy.token_type),
            },
        )
    }

    fn verify<T: DeserializeOwned>(&self, token: &str, policy: &KindPolicy) -> Result<T, SessionError> {
        if token.trim().is_empty() {
            return Err(SessionError::CredentialMissing);
        }
        self.codec.verify(
            token,
            &VerifyOptions {
                secret: policy.secret.expose(),
                issuer: self.issuer.as_deref(),
                audience: self.audience.as_deref(),
                token_type: Some(policy.token_type),
            },
        )
    }
}

#[async_trait::async_trait]
impl TokenIssuer for JwtIssuer {
    async fn issue_access_token(
        &self,
        claims: &AccessClaims,
    ) -> Result<(AccessToken, DateTime<Utc>), SessionError> {
        let (token, exp_dt) = self.sign(claims, &self.access)?;
        Ok((AccessToken(token), exp_dt))
    }

    async fn issue_renewal_token(
        &self,
        claims: &RenewalClaims,
    ) -> Result<(RenewalToken, DateTime<Utc>), SessionError> {
        if claims.jti.is_none() {
            return Err(SessionError::CredentialInvalid);
        }
        let (token, exp_dt) = self.sign(claims, &self.renewal)?;
        Ok((RenewalToken(token), exp_dt))
    }

    async fn verify_access_token(&self, token: &str) -> Result<AccessClaims, SessionError> {
        self.verify(token, &self.access)
    }

    async fn verify_renewal_token(&self, token: &str) -> Result<RenewalClaims, SessionError> {
        self.verify(token, &self.renewal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_port::SystemClock;

    const TEST_SECRET: &str = "test-secret-key-that-is-long-enough-32";
    const TEST_RENEWAL_SECRET: &str = "test-refresh-secret-key-long-32x";

    fn issuer(renewal_secret: Option<&str>) -> JwtIssuer {
        let mut cfg = JwtIssuerConfig::new(Secret::new(TEST_SECRET));
        cfg.renewal_secret = renewal_secret.map(Secret::new);
        JwtIssuer::try_new(cfg, Arc::new(SystemClock)).unwrap()
    }

    fn access_claims() -> AccessClaims {
        AccessClaims {
            user_id: UserId::from("user_1"),
            role: Some("admin".to_string()),
            permissions: Some(vec!["read".to_string()]),
        }
    }

    fn renewal_claims() -> RenewalClaims {
        RenewalClaims {
            user_id: UserId::from("user_1"),
            token_version: 1,
            jti: Some(Jti::generate()),
        }
    }

    #[test]
    fn empty_secret_is_config_error() {
        let cfg = JwtIssuerConfig::new(Secret::new(""));
        let err = JwtIssuer::try_new(cfg, Arc::new(SystemClock)).err().unwrap();
        assert!(matches!(err, SessionError::ConfigInvalid(_)));

        let mut cfg = JwtIssuerConfig::new(Secret::new(TEST_SECRET));
        cfg.renewal_secret = Some(Secret::new("  "));
        let err = JwtIssuer::try_new(cfg, Arc::new(SystemClock)).err().unwrap();
        assert!(matches!(err, SessionError::ConfigInvalid(_)));
    }

    #[tokio::test]
    async fn access_token_round_trips_claims() {
        let issuer = issuer(None);
        let (token, _) = issuer.issue_access_token(&access_claims()).await.unwrap();
        let claims = issuer.verify_access_token(&token.0).await.unwrap();
        assert_eq!(claims, access_claims());
    }

    #[tokio::test]
    async fn renewal_token_round_trips_claims() {
        let issuer = issuer(Some(TEST_RENEWAL_SECRET));
        let input = renewal_claims();
        let (token, _) = issuer.issue_renewal_token(&input).await.unwrap();
        let claims = issuer.verify_renewal_token(&token.0).await.unwrap();
        assert_eq!(claims, input);
    }

    #[tokio::test]
    async fn renewal_token_requires_jti() {
        let issuer = issuer(None);
        let mut input = renewal_claims();
        input.jti = None;
        let err = issuer.issue_renewal_token(&input).await.unwrap_err();
        assert!(matches!(err, SessionError::CredentialInvalid));
    }

    #[tokio::test]
    async fn empty_token_is_missing() {
        let issuer = issuer(None);
        assert!(matches!(
            issuer.verify_access_token("").await.unwrap_err(),
            SessionError::CredentialMissing
        ));
        assert!(matches!(
            issuer.verify_renewal_token("   ").await.unwrap_err(),
            SessionError::CredentialMissing
        ));
    }

    #[tokio::test]
    async fn cross_kind_tokens_are_rejected() {
        let issuer = issuer(Some(TEST_RENEWAL_SECRET));
        let (renewal, _) = issuer.issue_renewal_token(&renewal_claims()).await.unwrap();
        let (access, _) = issuer.issue_access_token(&access_claims()).await.unwrap();

        assert!(matches!(
            issuer.verify_access_token(&renewal.0).await.unwrap_err(),
            SessionError::CredentialInvalid
        ));
        assert!(matches!(
            issuer.verify_renewal_token(&access.0).await.unwrap_err(),
            SessionError::CredentialInvalid
        ));
    }

    #[tokio::test]
    async fn shared_secret_still_separates_kinds() {
        let issuer = issuer(None);
        let (renewal, _) = issuer.issue_renewal_token(&renewal_claims()).await.unwrap();
        let (access, _) = issuer.issue_access_token(&access_claims()).await.unwrap();

        assert!(matches!(
            issuer.verify_access_token(&renewal.0).await.unwrap_err(),
            SessionError::CredentialInvalid
        ));
        assert!(matches!(
            issuer.verify_renewal_token(&access.0).await.unwrap_err(),
            SessionError::CredentialInvalid
        ));
    }

    #[tokio::test]
    async fn tokens_from_another_issuer_are_rejected() {
        let ours = issuer(None);
        let mut cfg = JwtIssuerConfig::new(Secret::new(TEST_SECRET));
        cfg.issuer = Some("someone-else".to_string());
        let theirs = JwtIssuer::try_new(cfg, Arc::new(SystemClock)).unwrap();

        let (token, _) = theirs.issue_access_token(&access_claims()).await.unwrap();
        assert!(matches!(
            ours.verify_access_token(&token.0).await.unwrap_err(),
            SessionError::CredentialInvalid
        ));
    }
}
