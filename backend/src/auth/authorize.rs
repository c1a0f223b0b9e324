//! Role-based access control for principals
//!
//! Roles are flat strings matched exactly: no hierarchy, no wildcards.

use super::error::AuthError;
use super::identity::Identity;
use super::realm::Realm;
use crate::error::ApiError;
use crate::repositories::{AuthStore, CredentialStore};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// Role name used in RBAC checks
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Answers role questions about the request identity
#[derive(Clone)]
pub struct RoleAuthorizer {
    store: Arc<dyn AuthStore>,
}

impl RoleAuthorizer {
    pub fn new(store: Arc<dyn AuthStore>) -> Self {
        Self { store }
    }

    /// Whether the identity holds `role`
    ///
    /// Fails closed: no identity or a storage failure both answer `false`.
    pub async fn has_role<K: Realm>(&self, identity: Option<&Identity<K>>, role: &str) -> bool {
        let Some(identity) = identity else {
            debug!(role, "Role check without authentication");
            return false;
        };

        match self.store.roles_of(K::KIND, identity.principal_id()).await {
            Ok(roles) => roles.contains(role),
            Err(e) => {
                error!(
                    error = ?e,
                    kind = %K::KIND,
                    principal_id = identity.principal_id(),
                    "Failed to load roles"
                );
                false
            }
        }
    }

    /// [`RoleAuthorizer::has_role`] as a guard for privileged operations
    pub async fn authorize<K: Realm>(
        &self,
        identity: Option<&Identity<K>>,
        role: &Role,
    ) -> Result<(), AuthError> {
        if self.has_role(identity, role.as_str()).await {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

/// State for [`require_role`]: which role the wrapped routes need
#[derive(Clone)]
pub struct RoleGate {
    roles: RoleAuthorizer,
    role: Role,
}

impl RoleGate {
    pub fn new(roles: RoleAuthorizer, role: Role) -> Self {
        Self { roles, role }
    }
}

/// Require the request identity of realm `K` to hold the gate's role
///
/// Must run inside [`super::require_auth`] for the same realm.
pub async fn require_role<K: Realm>(
    State(gate): State<RoleGate>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = Identity::<K>::current(request.extensions()).ok();

    if let Err(AuthError::Forbidden) = gate.roles.authorize(identity.as_ref(), &gate.role).await {
        return Err(ApiError::Forbidden(format!("Missing role '{}'", gate.role)));
    }

    Ok(next.run(request).await)
}
