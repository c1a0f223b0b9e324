//! Counter Auth Shared Library
//!
//! Wire types, principal models and input validation shared between the
//! backend and its clients.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::*;
pub use types::*;
