//! Opaque bearer token issuance and resolution
//!
//! Tokens are 256 bytes from the OS random source, hex-encoded. They carry no
//! claims; the token tables map them back to a principal id and an optional
//! expiry.

use super::error::AuthError;
use super::password::PasswordService;
use crate::config::TokenConfig;
use crate::repositories::{AuthStore, CredentialStore, NewToken, TokenRecord, TokenStore};
use anyhow::anyhow;
use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::{DateTime, Duration, Utc};
use counter_auth_shared::PrincipalKind;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, info};

/// Bytes of entropy per token
pub const TOKEN_BYTES: usize = 256;

/// Token issuer and validator
///
/// Cheap to clone: the store is shared behind an `Arc`.
#[derive(Clone)]
pub struct TokenService {
    store: Arc<dyn AuthStore>,
    config: TokenConfig,
}

impl TokenService {
    pub fn new(store: Arc<dyn AuthStore>, config: TokenConfig) -> Self {
        Self { store, config }
    }

    /// Draw a fresh token from the OS random source
    pub fn generate_token() -> Result<String, AuthError> {
        let mut buffer = [0u8; TOKEN_BYTES];
        OsRng
            .try_fill_bytes(&mut buffer)
            .map_err(|e| anyhow!("Entropy source failed: {}", e))?;
        Ok(hex::encode(buffer))
    }

    /// Expiry for a token of `kind` issued at `now`
    pub fn expiry_for(&self, kind: PrincipalKind, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.config
            .ttl_secs(kind)
            .map(|secs| now + Duration::seconds(secs))
    }

    /// Exchange login credentials for a new bearer token
    ///
    /// Every call yields a new token; earlier tokens stay valid.
    pub async fn issue(
        &self,
        kind: PrincipalKind,
        login: &str,
        password: SecretString,
    ) -> Result<String, AuthError> {
        let credentials = self
            .store
            .find_by_login(kind, login)
            .await?
            .ok_or_else(|| {
                debug!(kind = %kind, "Token requested for unknown login");
                AuthError::NoSuchUser
            })?;

        let valid = PasswordService::verify_async(password, credentials.password_hash).await?;
        if !valid {
            debug!(kind = %kind, principal_id = credentials.id, "Password mismatch");
            return Err(AuthError::InvalidPassword);
        }

        self.grant(kind, credentials.id).await
    }

    /// Issue a token for an already identified principal
    ///
    /// Returns only after the token row is stored.
    pub async fn grant(&self, kind: PrincipalKind, principal_id: i64) -> Result<String, AuthError> {
        let record = NewToken {
            token: Self::generate_token()?,
            principal_id,
            expire: self.expiry_for(kind, Utc::now()),
        };
        self.store.insert_token(kind, &record).await?;

        info!(
            kind = %kind,
            principal_id,
            expire = ?record.expire,
            "Token issued"
        );
        Ok(record.token)
    }

    /// Look up a token and return its owner and raw expiry
    ///
    /// Does not judge the expiry; see [`TokenService::authenticate`].
    pub async fn resolve(&self, kind: PrincipalKind, token: &str) -> Result<TokenRecord, AuthError> {
        self.store
            .find_token(kind, token)
            .await?
            .ok_or(AuthError::NoSuchUser)
    }

    /// Resolve a token and reject it if expired
    ///
    /// The only place token expiry is enforced. Both the request middleware
    /// and the validation endpoints go through here.
    pub async fn authenticate(&self, kind: PrincipalKind, token: &str) -> Result<i64, AuthError> {
        self.authenticate_at(kind, token, Utc::now()).await
    }

    /// [`TokenService::authenticate`] against an explicit clock
    pub async fn authenticate_at(
        &self,
        kind: PrincipalKind,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<i64, AuthError> {
        let record = self.resolve(kind, token).await?;
        if record.is_expired_at(now) {
            debug!(kind = %kind, principal_id = record.principal_id, "Expired token presented");
            return Err(AuthError::Expired);
        }
        Ok(record.principal_id)
    }
}
