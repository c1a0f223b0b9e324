//! Principal models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace a principal belongs to.
///
/// Customers and managers live in separate tables with separate token tables;
/// an id is only meaningful together with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Customer,
    Manager,
}

impl PrincipalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::Customer => "customer",
            PrincipalKind::Manager => "manager",
        }
    }

    /// Whether principals of this kind can hold roles.
    pub fn has_roles(&self) -> bool {
        matches!(self, PrincipalKind::Manager)
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role granting access to manager administration.
pub const ADMIN_ROLE: &str = "ADMIN";
