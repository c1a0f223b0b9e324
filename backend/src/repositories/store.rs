//! Storage contracts for principals and tokens

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use counter_auth_shared::PrincipalKind;
use std::collections::HashSet;

/// Login lookup result: just enough to verify a password
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CredentialRecord {
    pub id: i64,
    pub password_hash: String,
}

/// Principal row without its password hash
///
/// Customers always carry an empty `roles` list.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PrincipalRecord {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub created: DateTime<Utc>,
}

/// Input for creating a principal
#[derive(Debug, Clone)]
pub struct NewPrincipal {
    pub name: String,
    pub phone: String,
    pub password_hash: String,
    pub roles: Vec<String>,
}

/// Input for persisting an issued token
#[derive(Debug, Clone)]
pub struct NewToken {
    pub token: String,
    pub principal_id: i64,
    pub expire: Option<DateTime<Utc>>,
}

/// Stored token as seen by the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct TokenRecord {
    pub principal_id: i64,
    pub expire: Option<DateTime<Utc>>,
}

impl TokenRecord {
    /// A token expires at its expiry instant, not after it.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expire, Some(expire) if expire <= now)
    }
}

/// Why a principal could not be created
#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    /// The login identifier is already taken in this namespace
    #[error("{0} phone already registered")]
    Duplicate(PrincipalKind),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Principal lookups and role storage
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find the id and password hash for a login identifier
    async fn find_by_login(&self, kind: PrincipalKind, login: &str)
        -> Result<Option<CredentialRecord>>;

    /// Find a principal by id
    async fn find_by_id(&self, kind: PrincipalKind, id: i64) -> Result<Option<PrincipalRecord>>;

    /// Role set of a principal; empty for customers and unknown ids
    async fn roles_of(&self, kind: PrincipalKind, id: i64) -> Result<HashSet<String>>;

    /// Check whether a login identifier is taken within its namespace
    async fn login_exists(&self, kind: PrincipalKind, login: &str) -> Result<bool>;

    /// Create a principal; roles are dropped for customers
    ///
    /// A taken login is reported as [`CreateError::Duplicate`] even when it
    /// loses a race against a concurrent insert.
    async fn create(
        &self,
        kind: PrincipalKind,
        principal: NewPrincipal,
    ) -> std::result::Result<PrincipalRecord, CreateError>;

    /// Check that the backing storage is reachable
    async fn health_check(&self) -> Result<()>;
}

/// Token persistence, one namespace per principal kind
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persist an issued token
    async fn insert_token(&self, kind: PrincipalKind, token: &NewToken) -> Result<()>;

    /// Look up a token; `None` when it was never issued in this namespace
    async fn find_token(&self, kind: PrincipalKind, token: &str) -> Result<Option<TokenRecord>>;
}

/// Everything the auth pipeline needs from storage
pub trait AuthStore: CredentialStore + TokenStore {}

impl<T: CredentialStore + TokenStore> AuthStore for T {}
