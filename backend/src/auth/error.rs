//! Authentication and authorization outcomes

use thiserror::Error;

/// Failure of an auth operation
///
/// Everything except `Internal` is an expected outcome that callers answer
/// with a structured response; only `Internal` indicates a fault.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("no such user")]
    NoSuchUser,

    #[error("invalid password")]
    InvalidPassword,

    #[error("token expired")]
    Expired,

    #[error("no authentication")]
    NoAuthentication,

    #[error("forbidden")]
    Forbidden,

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}
