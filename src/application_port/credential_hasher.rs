#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("malformed password hash: {0}")]
    Malformed(String),
    #[error("internal error: {0}")]
    Internal(String),
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, HashError>;
    async fn verify_password(&self, password: &str, password_hash: &str)
    -> Result<bool, HashError>;
}
