use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-side tracking key of a renewal credential.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Jti(pub String);

impl Jti {
    #[inline]
    pub fn generate() -> Self {
        Jti(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Jti {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Jti {
    fn from(s: &str) -> Self {
        Jti(s.to_string())
    }
}
