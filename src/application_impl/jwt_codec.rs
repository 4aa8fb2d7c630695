use crate::application_port::SessionError;
use crate::domain_model::TokenTtl;
use crate::domain_port::Clock;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum SigningAlgorithm {
    #[default]
    #[serde(rename = "HS256")]
    Hs256,
    #[serde(rename = "HS384")]
    Hs384,
    #[serde(rename = "HS512")]
    Hs512,
}

impl From<SigningAlgorithm> for Algorithm {
    fn from(alg: SigningAlgorithm) -> Self {
        match alg {
            SigningAlgorithm::Hs256 => Algorithm::HS256,
            SigningAlgorithm::Hs384 => Algorithm::HS384,
            SigningAlgorithm::Hs512 => Algorithm::HS512,
        }
    }
}

pub struct SignOptions<'a> {
    pub secret: &'a [u8],
    pub expires_in: TokenTtl,
    pub issuer: Option<&'a str>,
    pub audience: Option<&'a str>,
    pub algorithm: SigningAlgorithm,
    /// Written to the `typ` header.
    pub token_type: Option<&'a str>,
}

pub struct VerifyOptions<'a> {
    pub secret: &'a [u8],
    pub issuer: Option<&'a str>,
    pub audience: Option<&'a str>,
    /// When set, the `typ` header must match exactly.
    pub token_type: Option<&'a str>,
}

#[derive(Serialize)]
struct SignedEnvelope<'a, T> {
    #[serde(flatten)]
    claims: &'a T,
    iat: i64,
    exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    iss: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aud: Option<&'a str>,
}

#[derive(Deserialize)]
struct VerifiedEnvelope<T> {
    #[serde(flatten)]
    claims: T,
    exp: i64,
}

/// HMAC JWT signing and verification. Expiry is judged against the injected clock with
/// zero leeway; every failure other than expiry collapses into `CredentialInvalid`.
pub struct JwtCodec {
    clock: Arc<dyn Clock>,
}

impl JwtCodec {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        JwtCodec { clock }
    }

    pub fn sign<T: Serialize>(
        &self,
        claims: &T,
        opts: &SignOptions<'_>,
    ) -> Result<(String, DateTime<Utc>), SessionError> {
        let iat_dt = self.clock.now();
        let exp_dt = iat_dt
            .checked_add_signed(opts.expires_in.as_chrono())
            .ok_or_else(|| {
                tracing::debug!(expires_in = %opts.expires_in, "token expiry out of range");
                SessionError::CredentialInvalid
            })?;
        let mut header = Header::new(opts.algorithm.into());
        if let Some(typ) = opts.token_type {
            header.typ = Some(typ.to_string());
        }
        let envelope = SignedEnvelope {
            claims,
            iat: iat_dt.timestamp(),
            exp: exp_dt.timestamp(),
            iss: opts.issuer,
            aud: opts.audience,
        };
        let token = encode(
            &header,
            &envelope,
            &EncodingKey::from_secret(opts.secret),
        )
        .map_err(|e| {
            tracing::debug!(kind = ?e.kind(), "token signing failed");
            SessionError::CredentialInvalid
        })?;
        Ok((token, exp_dt))
    }

    pub fn verify<T: DeserializeOwned>(
        &self,
        token: &str,
        opts: &VerifyOptions<'_>,
    ) -> Result<T, SessionError> {
        let mut v = Validation::new(Algorithm::HS256);
        v.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        v.leeway = 0;
        v.validate_exp = false;
        match opts.audience {
            Some(aud) => v.set_audience(&[aud]),
            None => v.validate_aud = false,
        }
        if let Some(iss) = opts.issuer {
            v.set_issuer(&[iss]);
        }

        let data = decode::<VerifiedEnvelope<T>>(token, &DecodingKey::from_secret(opts.secret), &v)
            .map_err(|e| {
                tracing::debug!(kind = ?e.kind(), "token rejected");
                SessionError::CredentialInvalid
            })?;

        if let Some(expected) = opts.token_type {
            if data.header.typ.as_deref() != Some(expected) {
                tracing::debug!(typ = ?data.header.typ, expected, "token type mismatch");
                return Err(SessionError::CredentialInvalid);
            }
        }

        if data.claims.exp <= self.clock.now().timestamp() {
            return Err(SessionError::CredentialExpired);
        }
        Ok(data.claims.claims)
    }
}
