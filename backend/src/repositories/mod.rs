//! Database repositories
//!
//! Provides the data access layer for principals and their bearer tokens.
//! Storage is reached through the [`CredentialStore`] and [`TokenStore`]
//! traits so the auth pipeline runs unchanged against Postgres or memory.

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryAuthStore;
pub use postgres::PgAuthStore;
pub use store::{
    AuthStore, CreateError, CredentialRecord, CredentialStore, NewPrincipal, NewToken, PrincipalRecord,
    TokenRecord, TokenStore,
};
