use crate::domain_model::{Jti, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenewalToken(pub String);

/// Claims asserted by an access credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl AccessClaims {
    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_ref()
            .is_some_and(|ps| ps.iter().any(|p| p == permission))
    }
}

/// Claims asserted by a renewal credential.
///
/// `jti` is optional on the wire so a token minted without one still decodes and can be
/// rejected explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalClaims {
    pub user_id: UserId,
    #[serde(default)]
    pub token_version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<Jti>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: AccessToken,
    pub renewal_token: RenewalToken,
    pub access_token_expires_at: DateTime<Utc>,
    pub renewal_token_expires_at: DateTime<Utc>,
}
