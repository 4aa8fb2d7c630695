use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Whole-second lifetime of a credential.
///
/// Parsed from a duration expression (`"15m"`, `"7d"`, `"0s"`, `"1h 30m"`) or from a
/// bare number of seconds (`900`, `"900"`). Sub-second remainders are dropped. Lifetimes
/// above [`TokenTtl::MAX`] are rejected when parsed and clamped when built in code.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize)]
#[serde(try_from = "TtlRepr")]
pub struct TokenTtl(Duration);

#[derive(Debug, thiserror::Error)]
#[error("invalid duration expression {input:?}: {reason}")]
pub struct TtlParseError {
    input: String,
    reason: String,
}

const MAX_SECS: u64 = 100 * 365 * 24 * 60 * 60;

impl TokenTtl {
    pub const DEFAULT_ACCESS: TokenTtl = TokenTtl(Duration::from_secs(15 * 60));
    pub const DEFAULT_RENEWAL: TokenTtl = TokenTtl(Duration::from_secs(7 * 24 * 60 * 60));

    /// One hundred years.
    pub const MAX: TokenTtl = TokenTtl(Duration::from_secs(MAX_SECS));

    pub const fn from_secs(secs: u64) -> Self {
        if secs > MAX_SECS {
            TokenTtl(Duration::from_secs(MAX_SECS))
        } else {
            TokenTtl(Duration::from_secs(secs))
        }
    }

    fn try_from_secs(secs: u64, input: &str) -> Result<Self, TtlParseError> {
        if secs > MAX_SECS {
            return Err(TtlParseError {
                input: input.to_string(),
                reason: format!("exceeds maximum of {}s", MAX_SECS),
            });
        }
        Ok(TokenTtl(Duration::from_secs(secs)))
    }

    pub fn as_secs(&self) -> u64 {
        self.0.as_secs()
    }

    pub fn as_std(&self) -> Duration {
        self.0
    }

    pub fn as_chrono(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.0.as_secs() as i64)
    }
}

impl FromStr for TokenTtl {
    type Err = TtlParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = |reason: String| TtlParseError {
            input: s.to_string(),
            reason,
        };
        if trimmed.is_empty() {
            return Err(err("empty".to_string()));
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            let secs = trimmed.parse::<u64>().map_err(|e| err(e.to_string()))?;
            return TokenTtl::try_from_secs(secs, s);
        }
        let parsed = humantime::parse_duration(trimmed).map_err(|e| err(e.to_string()))?;
        TokenTtl::try_from_secs(parsed.as_secs(), s)
    }
}

impl From<Duration> for TokenTtl {
    fn from(d: Duration) -> Self {
        TokenTtl::from_secs(d.as_secs())
    }
}

impl fmt::Display for TokenTtl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", humantime::format_duration(self.0))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TtlRepr {
    Seconds(u64),
    Expr(String),
}

impl TryFrom<TtlRepr> for TokenTtl {
    type Error = TtlParseError;

    fn try_from(repr: TtlRepr) -> Result<Self, Self::Error> {
        match repr {
            TtlRepr::Seconds(secs) => TokenTtl::try_from_secs(secs, &secs.to_string()),
            TtlRepr::Expr(s) => s.parse(),
        }
    }
}
