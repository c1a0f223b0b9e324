//! In-memory principal and token storage
//!
//! Intended for tests/dev. Mirrors the Postgres layout: one principal map and
//! one token map per principal kind, ids assigned by the store.

use super::store::{
    CreateError, CredentialRecord, CredentialStore, NewPrincipal, NewToken, PrincipalRecord, TokenRecord,
    TokenStore,
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use counter_auth_shared::PrincipalKind;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredPrincipal {
    record: PrincipalRecord,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Namespace {
    next_id: i64,
    principals: HashMap<i64, StoredPrincipal>,
    tokens: HashMap<String, TokenRecord>,
}

#[derive(Debug, Default)]
struct Namespaces {
    customers: Namespace,
    managers: Namespace,
}

impl Namespaces {
    fn get(&self, kind: PrincipalKind) -> &Namespace {
        match kind {
            PrincipalKind::Customer => &self.customers,
            PrincipalKind::Manager => &self.managers,
        }
    }

    fn get_mut(&mut self, kind: PrincipalKind) -> &mut Namespace {
        match kind {
            PrincipalKind::Customer => &mut self.customers,
            PrincipalKind::Manager => &mut self.managers,
        }
    }
}

/// In-memory auth store
#[derive(Debug, Default)]
pub struct MemoryAuthStore {
    inner: RwLock<Namespaces>,
}

impl MemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Namespaces) -> T) -> Result<T> {
        let guard = self.inner.read().map_err(|_| anyhow!("auth store lock poisoned"))?;
        Ok(f(&guard))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Namespaces) -> T) -> Result<T> {
        let mut guard = self.inner.write().map_err(|_| anyhow!("auth store lock poisoned"))?;
        Ok(f(&mut guard))
    }
}

#[async_trait]
impl CredentialStore for MemoryAuthStore {
    async fn find_by_login(
        &self,
        kind: PrincipalKind,
        login: &str,
    ) -> Result<Option<CredentialRecord>> {
        self.read(|ns| {
            ns.get(kind)
                .principals
                .values()
                .find(|p| p.record.phone == login)
                .map(|p| CredentialRecord {
                    id: p.record.id,
                    password_hash: p.password_hash.clone(),
                })
        })
    }

    async fn find_by_id(&self, kind: PrincipalKind, id: i64) -> Result<Option<PrincipalRecord>> {
        self.read(|ns| ns.get(kind).principals.get(&id).map(|p| p.record.clone()))
    }

    async fn roles_of(&self, kind: PrincipalKind, id: i64) -> Result<HashSet<String>> {
        self.read(|ns| {
            ns.get(kind)
                .principals
                .get(&id)
                .map(|p| p.record.roles.iter().cloned().collect())
                .unwrap_or_default()
        })
    }

    async fn login_exists(&self, kind: PrincipalKind, login: &str) -> Result<bool> {
        self.read(|ns| {
            ns.get(kind)
                .principals
                .values()
                .any(|p| p.record.phone == login)
        })
    }

    async fn create(
        &self,
        kind: PrincipalKind,
        principal: NewPrincipal,
    ) -> std::result::Result<PrincipalRecord, CreateError> {
        self.write(|ns| {
            let namespace = ns.get_mut(kind);
            if namespace
                .principals
                .values()
                .any(|p| p.record.phone == principal.phone)
            {
                return Err(CreateError::Duplicate(kind));
            }

            namespace.next_id += 1;
            let record = PrincipalRecord {
                id: namespace.next_id,
                name: principal.name,
                phone: principal.phone,
                roles: if kind.has_roles() {
                    principal.roles
                } else {
                    Vec::new()
                },
                active: true,
                created: Utc::now(),
            };
            namespace.principals.insert(
                record.id,
                StoredPrincipal {
                    record: record.clone(),
                    password_hash: principal.password_hash,
                },
            );
            Ok(record)
        })?
    }

    async fn health_check(&self) -> Result<()> {
        self.read(|_| ())
    }
}

#[async_trait]
impl TokenStore for MemoryAuthStore {
    async fn insert_token(&self, kind: PrincipalKind, token: &NewToken) -> Result<()> {
        self.write(|ns| {
            let namespace = ns.get_mut(kind);
            if !namespace.principals.contains_key(&token.principal_id) {
                return Err(anyhow!("unknown {} id {}", kind, token.principal_id));
            }
            if namespace.tokens.contains_key(&token.token) {
                return Err(anyhow!("duplicate {} token", kind));
            }
            namespace.tokens.insert(
                token.token.clone(),
                TokenRecord {
                    principal_id: token.principal_id,
                    expire: token.expire,
                },
            );
            Ok(())
        })?
    }

    async fn find_token(&self, kind: PrincipalKind, token: &str) -> Result<Option<TokenRecord>> {
        self.read(|ns| ns.get(kind).tokens.get(token).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(phone: &str, roles: &[&str]) -> NewPrincipal {
        NewPrincipal {
            name: "Test".to_string(),
            phone: phone.to_string(),
            password_hash: "hash".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryAuthStore::new();
        let first = store
            .create(PrincipalKind::Manager, principal("1", &[]))
            .await
            .unwrap();
        let second = store
            .create(PrincipalKind::Manager, principal("2", &[]))
            .await
            .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_namespaces_are_separate() {
        let store = MemoryAuthStore::new();
        store
            .create(PrincipalKind::Manager, principal("555", &["ADMIN"]))
            .await
            .unwrap();

        assert!(store.login_exists(PrincipalKind::Manager, "555").await.unwrap());
        assert!(!store.login_exists(PrincipalKind::Customer, "555").await.unwrap());
        // Same phone is free in the other namespace
        store
            .create(PrincipalKind::Customer, principal("555", &["ADMIN"]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_login_rejected() {
        let store = MemoryAuthStore::new();
        store
            .create(PrincipalKind::Customer, principal("555", &[]))
            .await
            .unwrap();
        assert!(matches!(
            store
                .create(PrincipalKind::Customer, principal("555", &[]))
                .await,
            Err(CreateError::Duplicate(PrincipalKind::Customer))
        ));
    }

    #[tokio::test]
    async fn test_customer_roles_are_dropped() {
        let store = MemoryAuthStore::new();
        let customer = store
            .create(PrincipalKind::Customer, principal("555", &["ADMIN"]))
            .await
            .unwrap();
        assert!(customer.roles.is_empty());
        assert!(store
            .roles_of(PrincipalKind::Customer, customer.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_token_lookup_is_namespaced() {
        let store = MemoryAuthStore::new();
        let m = store
            .create(PrincipalKind::Manager, principal("555", &[]))
            .await
            .unwrap();
        let token = NewToken {
            token: "abc".to_string(),
            principal_id: m.id,
            expire: None,
        };
        store.insert_token(PrincipalKind::Manager, &token).await.unwrap();

        let found = store.find_token(PrincipalKind::Manager, "abc").await.unwrap();
        assert_eq!(found.map(|t| t.principal_id), Some(m.id));
        assert!(store
            .find_token(PrincipalKind::Customer, "abc")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_token_for_unknown_principal_rejected() {
        let store = MemoryAuthStore::new();
        let token = NewToken {
            token: "abc".to_string(),
            principal_id: 42,
            expire: None,
        };
        assert!(store.insert_token(PrincipalKind::Customer, &token).await.is_err());
    }
}
