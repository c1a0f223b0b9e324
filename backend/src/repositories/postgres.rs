//! PostgreSQL-backed principal and token storage

use super::store::{
    CreateError, CredentialRecord, CredentialStore, NewPrincipal, NewToken, PrincipalRecord, TokenRecord,
    TokenStore,
};
use crate::db;
use anyhow::Result;
use async_trait::async_trait;
use counter_auth_shared::PrincipalKind;
use sqlx::PgPool;
use std::collections::HashSet;

/// Table layout of one principal namespace
struct Tables {
    principals: &'static str,
    tokens: &'static str,
    owner_column: &'static str,
    /// Expression selected as `roles`
    roles: &'static str,
}

fn tables(kind: PrincipalKind) -> Tables {
    match kind {
        PrincipalKind::Customer => Tables {
            principals: "customers",
            tokens: "customers_tokens",
            owner_column: "customer_id",
            roles: "ARRAY[]::TEXT[]",
        },
        PrincipalKind::Manager => Tables {
            principals: "managers",
            tokens: "managers_tokens",
            owner_column: "manager_id",
            roles: "roles",
        },
    }
}

/// Principal and token repository over a Postgres pool
#[derive(Clone)]
pub struct PgAuthStore {
    pool: PgPool,
}

impl PgAuthStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgAuthStore {
    async fn find_by_login(
        &self,
        kind: PrincipalKind,
        login: &str,
    ) -> Result<Option<CredentialRecord>> {
        let t = tables(kind);
        let record = sqlx::query_as::<_, CredentialRecord>(&format!(
            "SELECT id, password AS password_hash FROM {} WHERE phone = $1",
            t.principals
        ))
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, kind: PrincipalKind, id: i64) -> Result<Option<PrincipalRecord>> {
        let t = tables(kind);
        let record = sqlx::query_as::<_, PrincipalRecord>(&format!(
            "SELECT id, name, phone, {} AS roles, active, created FROM {} WHERE id = $1",
            t.roles, t.principals
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn roles_of(&self, kind: PrincipalKind, id: i64) -> Result<HashSet<String>> {
        if !kind.has_roles() {
            return Ok(HashSet::new());
        }

        let t = tables(kind);
        let roles = sqlx::query_scalar::<_, Vec<String>>(&format!(
            "SELECT {} FROM {} WHERE id = $1",
            t.roles, t.principals
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(roles.unwrap_or_default().into_iter().collect())
    }

    async fn login_exists(&self, kind: PrincipalKind, login: &str) -> Result<bool> {
        let t = tables(kind);
        let exists = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE phone = $1)",
            t.principals
        ))
        .bind(login)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create(
        &self,
        kind: PrincipalKind,
        principal: NewPrincipal,
    ) -> std::result::Result<PrincipalRecord, CreateError> {
        let inserted = match kind {
            PrincipalKind::Customer => {
                sqlx::query_as::<_, PrincipalRecord>(
                    r#"
                    INSERT INTO customers (name, phone, password)
                    VALUES ($1, $2, $3)
                    RETURNING id, name, phone, ARRAY[]::TEXT[] AS roles, active, created
                    "#,
                )
                .bind(&principal.name)
                .bind(&principal.phone)
                .bind(&principal.password_hash)
                .fetch_one(&self.pool)
                .await
            }
            PrincipalKind::Manager => {
                sqlx::query_as::<_, PrincipalRecord>(
                    r#"
                    INSERT INTO managers (name, phone, password, roles)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id, name, phone, roles, active, created
                    "#,
                )
                .bind(&principal.name)
                .bind(&principal.phone)
                .bind(&principal.password_hash)
                .bind(&principal.roles)
                .fetch_one(&self.pool)
                .await
            }
        };

        inserted.map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => CreateError::Duplicate(kind),
            other => CreateError::Storage(other.into()),
        })
    }

    async fn health_check(&self) -> Result<()> {
        db::health_check(&self.pool).await
    }
}

#[async_trait]
impl TokenStore for PgAuthStore {
    async fn insert_token(&self, kind: PrincipalKind, token: &NewToken) -> Result<()> {
        let t = tables(kind);
        sqlx::query(&format!(
            "INSERT INTO {} (token, {}, expire) VALUES ($1, $2, $3)",
            t.tokens, t.owner_column
        ))
        .bind(&token.token)
        .bind(token.principal_id)
        .bind(token.expire)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_token(&self, kind: PrincipalKind, token: &str) -> Result<Option<TokenRecord>> {
        let t = tables(kind);
        let record = sqlx::query_as::<_, TokenRecord>(&format!(
            "SELECT {} AS principal_id, expire FROM {} WHERE token = $1",
            t.owner_column, t.tokens
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
