//! Bearer token session
//!
//! The greenhouse API issues and verifies tokens. The client only keeps the
//! token, attaches it to requests, and reads its `exp` claim so an expired
//! session fails fast instead of round-tripping to the server.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::{ClientError, ClientResult};

/// A token issued by the greenhouse API
#[derive(Debug, Clone, PartialEq)]
pub struct AuthToken {
    raw: String,
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<f64>,
}

impl AuthToken {
    /// Wrap a raw token. Opaque (non-JWT) tokens are accepted and never
    /// considered expired locally.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let expires_at = read_expiry(&raw);
        Self { raw, expires_at }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |exp| now >= exp)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Read the `exp` claim without checking the signature
fn read_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data =
        jsonwebtoken::decode::<ExpiryClaims>(raw, &DecodingKey::from_secret(&[]), &validation).ok()?;
    let exp = data.claims.exp.filter(|exp| exp.is_finite())?;
    Utc.timestamp_opt(exp.trunc() as i64, 0).single()
}

/// Login state shared by every clone of the API client
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<AuthToken>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_token(&self, token: AuthToken) {
        if let Some(expires_at) = token.expires_at() {
            tracing::debug!(%expires_at, "Session token stored");
        }
        *self.token.write().await = Some(token);
    }

    pub async fn clear(&self) {
        *self.token.write().await = None;
    }

    pub async fn is_authenticated(&self, now: DateTime<Utc>) -> bool {
        self.bearer(now).await.is_ok()
    }

    /// Token to attach to a request made at `now`
    pub async fn bearer(&self, now: DateTime<Utc>) -> ClientResult<String> {
        let guard = self.token.read().await;
        match guard.as_ref() {
            None => Err(ClientError::NotAuthenticated),
            Some(token) if token.is_expired(now) => Err(ClientError::SessionExpired),
            Some(token) => Ok(token.as_str().to_string()),
        }
    }
}
