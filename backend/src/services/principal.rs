//! Principal registration and profile reads
//!
//! Password hashing runs on the blocking thread pool via
//! [`PasswordService::hash_async`].

use crate::auth::PasswordService;
use crate::error::ApiError;
use crate::repositories::{AuthStore, CredentialStore, NewPrincipal, PrincipalRecord};
use counter_auth_shared::validation::{validate_password, validate_phone, validate_role};
use counter_auth_shared::{
    CustomerProfile, ManagerProfile, PrincipalKind, RegisterCustomerRequest,
    RegisterManagerRequest, ADMIN_ROLE,
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

/// Service for creating and reading customers and managers
#[derive(Clone)]
pub struct PrincipalService {
    store: Arc<dyn AuthStore>,
}

impl PrincipalService {
    pub fn new(store: Arc<dyn AuthStore>) -> Self {
        Self { store }
    }

    /// Create a principal after validating its credentials
    async fn register(
        &self,
        kind: PrincipalKind,
        name: String,
        phone: String,
        password: SecretString,
        roles: Vec<String>,
    ) -> Result<PrincipalRecord, ApiError> {
        validate_phone(&phone)?;
        validate_password(password.expose_secret())?;

        if self.store.login_exists(kind, &phone).await? {
            return Err(ApiError::Conflict("Phone already registered".to_string()));
        }

        let password_hash = PasswordService::hash_async(password).await?;

        let principal = self
            .store
            .create(
                kind,
                NewPrincipal {
                    name,
                    phone,
                    password_hash,
                    roles,
                },
            )
            .await?;

        info!(kind = %kind, principal_id = principal.id, "Principal registered");
        Ok(principal)
    }

    /// Register a customer
    pub async fn register_customer(
        &self,
        request: RegisterCustomerRequest,
    ) -> Result<CustomerProfile, ApiError> {
        request.validate()?;

        let principal = self
            .register(
                PrincipalKind::Customer,
                request.name,
                request.phone,
                request.password,
                Vec::new(),
            )
            .await?;
        Ok(customer_profile(principal))
    }

    /// Register a manager with the requested roles
    ///
    /// Callers gate this behind the `ADMIN` role.
    pub async fn register_manager(
        &self,
        request: RegisterManagerRequest,
    ) -> Result<ManagerProfile, ApiError> {
        request.validate()?;
        for role in &request.roles {
            validate_role(role)?;
        }

        let mut roles = request.roles;
        roles.sort();
        roles.dedup();

        let principal = self
            .register(
                PrincipalKind::Manager,
                request.name,
                request.phone,
                request.password,
                roles,
            )
            .await?;
        Ok(manager_profile(principal))
    }

    pub async fn customer(&self, id: i64) -> Result<CustomerProfile, ApiError> {
        self.find(PrincipalKind::Customer, id).await.map(customer_profile)
    }

    pub async fn manager(&self, id: i64) -> Result<ManagerProfile, ApiError> {
        self.find(PrincipalKind::Manager, id).await.map(manager_profile)
    }

    async fn find(&self, kind: PrincipalKind, id: i64) -> Result<PrincipalRecord, ApiError> {
        self.store
            .find_by_id(kind, id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("{} not found", kind)))
    }

    /// Create the bootstrap administrator unless the phone is already taken
    ///
    /// Returns whether a manager was created. An existing manager keeps its
    /// password and roles.
    pub async fn ensure_admin(&self, phone: &str, password: SecretString) -> Result<bool, ApiError> {
        if self.store.login_exists(PrincipalKind::Manager, phone).await? {
            return Ok(false);
        }

        let created = self
            .register(
                PrincipalKind::Manager,
                "Administrator".to_string(),
                phone.to_string(),
                password,
                vec![ADMIN_ROLE.to_string()],
            )
            .await;

        match created {
            Ok(_) => Ok(true),
            // another instance created it first
            Err(ApiError::Conflict(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

fn customer_profile(record: PrincipalRecord) -> CustomerProfile {
    CustomerProfile {
        id: record.id,
        name: record.name,
        phone: record.phone,
        active: record.active,
        created: record.created,
    }
}

fn manager_profile(record: PrincipalRecord) -> ManagerProfile {
    ManagerProfile {
        id: record.id,
        name: record.name,
        phone: record.phone,
        roles: record.roles,
        active: record.active,
        created: record.created,
    }
}
