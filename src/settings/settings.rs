use crate::application_impl::SigningAlgorithm;
use crate::domain_model::{Secret, TokenTtl};
use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub auth: Auth,
    pub store: Store,
    pub rate_limit: RateLimit,
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub access_secret: Secret,
    pub renewal_secret: Option<Secret>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    #[serde(default = "default_access_ttl")]
    pub access_ttl: TokenTtl,
    #[serde(default = "default_renewal_ttl")]
    pub renewal_ttl: TokenTtl,
    #[serde(default)]
    pub algorithm: SigningAlgorithm,
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub backend: String, // "memory" or "redis"
    pub redis_url: Option<String>,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// How long expired records linger before they are dropped.
    #[serde(default = "default_retention")]
    pub retention: TokenTtl,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval: TokenTtl,
}

#[derive(Debug, Deserialize)]
pub struct RateLimit {
    pub window: TokenTtl,
    pub max: u64,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

fn default_access_ttl() -> TokenTtl {
    TokenTtl::DEFAULT_ACCESS
}

fn default_renewal_ttl() -> TokenTtl {
    TokenTtl::DEFAULT_RENEWAL
}

fn default_key_prefix() -> String {
    "session-warden".to_string()
}

fn default_retention() -> TokenTtl {
    TokenTtl::from_secs(60 * 60)
}

fn default_sweep_interval() -> TokenTtl {
    TokenTtl::from_secs(60)
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub const ENV_PREFIX: &str = "SESSION_WARDEN";

/// File first, then `SESSION_WARDEN__SECTION__KEY` environment overrides.
pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(src: &str) -> Result<Settings> {
        Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()
            .map_err(|e| anyhow!(e))?
            .try_deserialize()
            .map_err(|e| anyhow!(e))
    }

    #[test]
    fn full_settings_parse() {
        let s = from_toml(
            r#"
            [auth]
            access_secret = "a-secret"
            renewal_secret = "r-secret"
            issuer = "svc"
            audience = "web"
            access_ttl = "5m"
            renewal_ttl = 86400
            algorithm = "HS512"

            [store]
            backend = "redis"
            redis_url = "redis://127.0.0.1/"

            [rate_limit]
            window = "15m"
            max = 100

            [log]
            filter = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(s.auth.access_ttl.as_secs(), 300);
        assert_eq!(s.auth.renewal_ttl.as_secs(), 86_400);
        assert_eq!(s.auth.algorithm, SigningAlgorithm::Hs512);
        assert_eq!(s.store.key_prefix, "session-warden");
        assert_eq!(s.rate_limit.window.as_secs(), 900);
        assert!(!format!("{:?}", s).contains("a-secret"));
    }

    #[test]
    fn defaults_apply() {
        let s = from_toml(
            r#"
            [auth]
            access_secret = "a-secret"
            [store]
            backend = "memory"
            [rate_limit]
            window = 60
            max = 10
            [log]
            filter = "info"
            "#,
        )
        .unwrap();
        assert_eq!(s.auth.access_ttl, TokenTtl::DEFAULT_ACCESS);
        assert_eq!(s.auth.renewal_ttl, TokenTtl::DEFAULT_RENEWAL);
        assert_eq!(s.auth.algorithm, SigningAlgorithm::Hs256);
        assert!(s.auth.renewal_secret.is_none());
    }

    #[test]
    fn bad_ttl_is_rejected() {
        let err = from_toml(
            r#"
            [auth]
            access_secret = "a-secret"
            access_ttl = "whenever"
            [store]
            backend = "memory"
            [rate_limit]
            window = 60
            max = 10
            [log]
            filter = "info"
            "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn missing_path_is_an_error() {
        assert!(parse_settings(Some("")).is_err());
    }
}
