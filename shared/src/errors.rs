//! Error types shared with API clients

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason a presented token was not accepted.
///
/// The two variants must stay distinguishable on the wire: clients re-login on
/// `Expired` but treat `NotFound` as a bad token.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenFailure {
    #[error("not found")]
    #[serde(rename = "not found")]
    NotFound,

    #[error("expired")]
    #[serde(rename = "expired")]
    Expired,
}

/// Input validation failure with field context
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}
