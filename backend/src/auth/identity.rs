//! Request identity
//!
//! The authentication middleware stores an [`Identity`] in the request's
//! extensions once the bearer token checks out. The type parameter is the
//! key: a manager identity can never be read as a customer one.

use super::error::AuthError;
use super::realm::Realm;
use crate::error::ApiError;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, Extensions},
};
use counter_auth_shared::PrincipalKind;
use std::marker::PhantomData;

/// Principal resolved for the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity<K: Realm> {
    principal_id: i64,
    realm: PhantomData<K>,
}

impl<K: Realm> Identity<K> {
    pub fn new(principal_id: i64) -> Self {
        Self {
            principal_id,
            realm: PhantomData,
        }
    }

    pub fn principal_id(&self) -> i64 {
        self.principal_id
    }

    pub fn kind(&self) -> PrincipalKind {
        K::KIND
    }

    /// Identity attached earlier in this request, if any
    ///
    /// `NoAuthentication` is the normal answer on public routes.
    pub fn current(extensions: &Extensions) -> Result<Self, AuthError> {
        extensions
            .get::<Self>()
            .copied()
            .ok_or(AuthError::NoAuthentication)
    }
}

#[axum::async_trait]
impl<S, K> FromRequestParts<S> for Identity<K>
where
    S: Send + Sync,
    K: Realm,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::current(&parts.extensions).map_err(ApiError::from)
    }
}
