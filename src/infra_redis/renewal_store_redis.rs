use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Duration, Utc};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};
use std::collections::HashMap;
use std::sync::Arc;

const RENEWAL_SAVE: &str = include_str!("renewal_save.lua");
const RENEWAL_REVOKE: &str = include_str!("renewal_revoke.lua");
const RENEWAL_REVOKE_ALL: &str = include_str!("renewal_revoke_all.lua");

/// Production backend: one hash per jti plus a per-user index set. Check-and-revoke runs
/// as a server-side script so concurrent refreshes rotate a token at most once.
pub struct RedisRenewalStore {
    conn: ConnectionManager,
    prefix: String,
    clock: Arc<dyn Clock>,
    retention: Duration,
    save_script: Script,
    revoke_script: Script,
    revoke_all_script: Script,
}

impl RedisRenewalStore {
    pub fn new(
        conn: ConnectionManager,
        prefix: impl Into<String>,
        clock: Arc<dyn Clock>,
        retention: Duration,
    ) -> Self {
        RedisRenewalStore {
            conn,
            prefix: prefix.into(),
            clock,
            retention,
            save_script: Script::new(RENEWAL_SAVE),
            revoke_script: Script::new(RENEWAL_REVOKE),
            revoke_all_script: Script::new(RENEWAL_REVOKE_ALL),
        }
    }

    fn record_prefix(&self) -> String {
        format!("{}:rt:", self.prefix)
    }

    fn record_key(&self, jti: &Jti) -> String {
        format!("{}{}", self.record_prefix(), jti)
    }

    fn user_key(&self, user_id: &UserId) -> String {
        format!("{}:user:{}", self.prefix, user_id)
    }
}

fn backend(e: redis::RedisError) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn millis_field(fields: &HashMap<String, String>, name: &str) -> Result<DateTime<Utc>, StoreError> {
    let raw = fields
        .get(name)
        .ok_or_else(|| StoreError::Corrupt(format!("missing field {}", name)))?;
    let ms = raw
        .parse::<i64>()
        .map_err(|e| StoreError::Corrupt(format!("{}: {}", name, e)))?;
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::Corrupt(format!("{} out of range", name)))
}

pub(crate) fn record_from_fields(
    jti: &Jti,
    fields: &HashMap<String, String>,
) -> Result<RenewalRecord, StoreError> {
    let user_id = fields
        .get("user_id")
        .ok_or_else(|| StoreError::Corrupt("missing field user_id".to_string()))?;
    let token_version = fields
        .get("token_version")
        .ok_or_else(|| StoreError::Corrupt("missing field token_version".to_string()))?
        .parse::<u64>()
        .map_err(|e| StoreError::Corrupt(format!("token_version: {}", e)))?;
    let revoked_at = if fields.contains_key("revoked_at") {
        Some(millis_field(fields, "revoked_at")?)
    } else {
        None
    };

    Ok(RenewalRecord {
        jti: jti.clone(),
        user_id: UserId(user_id.clone()),
        token_version,
        created_at: millis_field(fields, "created_at")?,
        expires_at: millis_field(fields, "expires_at")?,
        revoked_at,
    })
}

#[async_trait::async_trait]
impl RenewalStore for RedisRenewalStore {
    async fn save(&self, record: &RenewalRecord) -> Result<(), StoreError> {
        let purge_at = record
            .expires_at
            .checked_add_signed(self.retention)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut conn = self.conn.clone();
        let inserted: i64 = self
            .save_script
            .key(self.record_key(&record.jti))
            .key(self.user_key(&record.user_id))
            .arg(record.jti.as_str())
            .arg(record.user_id.as_str())
            .arg(record.token_version)
            .arg(record.created_at.timestamp_millis())
            .arg(record.expires_at.timestamp_millis())
            .arg(purge_at.timestamp())
            .arg(self.clock.now().timestamp())
            .invoke_async(&mut conn)
            .await
            .map_err(backend)?;

        if inserted == 0 {
            return Err(StoreError::DuplicateJti(record.jti.clone()));
        }
        Ok(())
    }

    async fn find(&self, jti: &Jti) -> Result<Option<RenewalRecord>, StoreError> {
        let mut conn = self.conn.clone();
        let fields: HashMap<String, String> =
            conn.hgetall(self.record_key(jti)).await.map_err(backend)?;
        if fields.is_empty() {
            return Ok(None);
        }
        record_from_fields(jti, &fields).map(Some)
    }

    async fn revoke(&self, jti: &Jti) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let flipped: i64 = self
            .revoke_script
            .key(self.record_key(jti))
            .arg(self.clock.now().timestamp_millis())
            .invoke_async(&mut conn)
            .await
            .map_err(backend)?;
        Ok(flipped == 1)
    }

    async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        let count: u64 = self
            .revoke_all_script
            .key(self.user_key(user_id))
            .arg(self.clock.now().timestamp_millis())
            .arg(self.record_prefix())
            .invoke_async(&mut conn)
            .await
            .map_err(backend)?;
        Ok(count)
    }
}
