use crate::domain_model::*;
use crate::domain_port::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),
    #[error("credential missing")]
    CredentialMissing,
    #[error("credential expired")]
    CredentialExpired,
    #[error("credential invalid")]
    CredentialInvalid,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct IssueTokenPairInput {
    pub user_id: UserId,
    pub role: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub token_version: u64,
}

impl IssueTokenPairInput {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        IssueTokenPairInput {
            user_id: user_id.into(),
            role: None,
            permissions: None,
            token_version: 0,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = Some(permissions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_token_version(mut self, token_version: u64) -> Self {
        self.token_version = token_version;
        self
    }
}

#[async_trait::async_trait]
pub trait SessionService: Send + Sync {
    /// Entry point of the lifecycle: mint a pair and track the renewal id as active.
    async fn issue_token_pair(&self, input: IssueTokenPairInput) -> Result<TokenPair, SessionError>;

    /// Rotate: consume `renewal_token` and hand out a brand-new pair.
    async fn refresh(&self, renewal_token: &str) -> Result<TokenPair, SessionError>;

    /// Logout. Unverifiable tokens are a no-op.
    async fn revoke_session(&self, renewal_token: &str) -> Result<(), SessionError>;

    /// Logout everywhere.
    async fn revoke_all_sessions(&self, user_id: &UserId) -> Result<(), SessionError>;

    async fn verify_access_token(&self, access_token: &str) -> Result<AccessClaims, SessionError>;
}
