//! Application state management
//!
//! Shared state passed to all request handlers via Axum's state extraction.
//! Built once at startup; every field is cheap to clone.

use crate::auth::{RoleAuthorizer, TokenService};
use crate::config::AppConfig;
use crate::repositories::{AuthStore, PgAuthStore};
use crate::services::PrincipalService;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Principal and token storage
    store: Arc<dyn AuthStore>,
    tokens: TokenService,
    roles: RoleAuthorizer,
    principals: PrincipalService,
}

impl AppState {
    /// Create application state over any storage backend
    pub fn new(store: Arc<dyn AuthStore>, config: AppConfig) -> Self {
        Self {
            tokens: TokenService::new(store.clone(), config.tokens),
            roles: RoleAuthorizer::new(store.clone()),
            principals: PrincipalService::new(store.clone()),
            store,
        }
    }

    /// Create application state backed by PostgreSQL
    pub fn with_pool(db: PgPool, config: AppConfig) -> Self {
        Self::new(Arc::new(PgAuthStore::new(db)), config)
    }

    #[inline]
    pub fn store(&self) -> &dyn AuthStore {
        self.store.as_ref()
    }

    /// Token issuer and validator
    #[inline]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    #[inline]
    pub fn roles(&self) -> &RoleAuthorizer {
        &self.roles
    }

    #[inline]
    pub fn principals(&self) -> &PrincipalService {
        &self.principals
    }
}
