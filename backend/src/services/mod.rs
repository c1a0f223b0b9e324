//! Business logic services
//!
//! Services coordinate validation, password hashing and the storage layer.

pub mod principal;

pub use principal::PrincipalService;
