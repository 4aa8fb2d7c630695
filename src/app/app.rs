use crate::app::Janitor;
use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::Settings;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Composition root: every collaborator wired from `Settings`.
pub struct App {
    pub session_service: Arc<dyn SessionService>,
    pub credential_hasher: Arc<dyn CredentialHasher>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    janitor_handle: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
}

impl App {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let retention = settings.store.retention.as_chrono();
        let mut sweep_targets: Vec<Arc<dyn ExpirySweep>> = Vec::new();

        let renewal_store: Arc<dyn RenewalStore> = match settings.store.backend.as_str() {
            "memory" => {
                let store = Arc::new(MemoryRenewalStore::with_retention(clock.clone(), retention));
                sweep_targets.push(store.clone());
                store
            }
            "redis" => {
                let url = settings
                    .store
                    .redis_url
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("store.redis_url is required for redis"))?;
                let client = redis::Client::open(url)?;
                let manager = client.get_connection_manager().await?;
                Arc::new(RedisRenewalStore::new(
                    manager,
                    settings.store.key_prefix.clone(),
                    clock.clone(),
                    retention,
                ))
            }
            other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        };

        let auth = &settings.auth;
        let token_issuer: Arc<dyn TokenIssuer> = Arc::new(JwtIssuer::try_new(
            JwtIssuerConfig {
                access_secret: auth.access_secret.clone(),
                renewal_secret: auth.renewal_secret.clone(),
                issuer: auth
                    .issuer
                    .clone()
                    .or_else(|| Some(DEFAULT_ISSUER.to_string())),
                audience: auth.audience.clone(),
                access_ttl: auth.access_ttl,
                renewal_ttl: auth.renewal_ttl,
                algorithm: auth.algorithm,
            },
            clock.clone(),
        )?);

        let session_service: Arc<dyn SessionService> = Arc::new(RealSessionService::new(
            token_issuer,
            renewal_store,
            clock.clone(),
            SessionServiceConfig {
                renewal_ttl: auth.renewal_ttl,
            },
        ));

        let rate_limit_store = Arc::new(MemoryRateLimitStore::new(clock.clone()));
        sweep_targets.push(rate_limit_store.clone());
        let rate_limiter: Arc<dyn RateLimiter> = Arc::new(FixedWindowRateLimiter::try_new(
            settings.rate_limit.window.as_std(),
            settings.rate_limit.max,
            rate_limit_store,
            clock.clone(),
        )?);

        let cancel = CancellationToken::new();
        let janitor = Janitor::try_new(
            sweep_targets,
            clock,
            settings.store.sweep_interval.as_std(),
            cancel.clone(),
        )?;
        let janitor_handle = tokio::spawn(janitor.run());

        info!(backend = %settings.store.backend, "app started");

        Ok(Self {
            session_service,
            credential_hasher: Arc::new(Argon2PasswordHasher),
            rate_limiter,
            janitor_handle: Mutex::new(Some(janitor_handle)),
            cancel,
        })
    }

    pub async fn shutdown(&self) {
        info!("app shutting down...");

        self.cancel.cancel();

        let handle = match self.janitor_handle.lock() {
            Ok(mut lock) => lock.take(),
            Err(_) => None,
        };
        if let Some(handle) = handle {
            let r = handle.await;
            info!("janitor handle dropped: {:?}", r);
        }
    }
}
