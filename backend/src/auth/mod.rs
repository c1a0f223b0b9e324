//! Authentication module
//!
//! Opaque bearer tokens stored per principal namespace, argon2 password
//! hashing, typed request identity and role gates.

mod authorize;
mod error;
mod identity;
mod middleware;
mod password;
mod realm;
mod token;

pub use authorize::{require_role, Role, RoleAuthorizer, RoleGate};
pub use error::AuthError;
pub use identity::Identity;
pub use middleware::{bearer_token, require_auth};
pub use password::PasswordService;
pub use realm::{Customer, Manager, Realm};
pub use token::{TokenService, TOKEN_BYTES};
