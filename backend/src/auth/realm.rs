//! Principal namespaces at the type level
//!
//! The HTTP pipeline is written once and instantiated per namespace:
//! `require_auth::<Customer>` and `require_auth::<Manager>` share the same
//! code but never accept each other's tokens.

use counter_auth_shared::PrincipalKind;
use std::fmt;

/// A principal namespace the auth pipeline can run for
pub trait Realm: Copy + Send + Sync + fmt::Debug + 'static {
    const KIND: PrincipalKind;
}

/// Customer namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Customer;

impl Realm for Customer {
    const KIND: PrincipalKind = PrincipalKind::Customer;
}

/// Manager namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Manager;

impl Realm for Manager {
    const KIND: PrincipalKind = PrincipalKind::Manager;
}
