//! API request and response types

use crate::errors::TokenFailure;
use crate::models::PrincipalKind;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Authentication
// ============================================================================

/// Login request
///
/// Customers send `login`, managers send `phone`; both carry the phone number.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "phone")]
    pub login: String,
    pub password: SecretString,
}

/// Issued bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Token validation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateTokenRequest {
    pub token: String,
}

/// Outcome of a token validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Ok,
    Fail,
}

/// Token validation response
///
/// On success carries `customerId` or `managerId` depending on the token's
/// namespace; on failure carries `reason`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateTokenResponse {
    pub status: ValidationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<TokenFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<i64>,
}

impl ValidateTokenResponse {
    pub fn ok(kind: PrincipalKind, principal_id: i64) -> Self {
        let (customer_id, manager_id) = match kind {
            PrincipalKind::Customer => (Some(principal_id), None),
            PrincipalKind::Manager => (None, Some(principal_id)),
        };
        Self {
            status: ValidationStatus::Ok,
            reason: None,
            customer_id,
            manager_id,
        }
    }

    pub fn fail(reason: TokenFailure) -> Self {
        Self {
            status: ValidationStatus::Fail,
            reason: Some(reason),
            customer_id: None,
            manager_id: None,
        }
    }
}

// ============================================================================
// Registration and Profiles
// ============================================================================

/// Customer registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterCustomerRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    pub phone: String,
    pub password: SecretString,
}

/// Manager registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterManagerRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    pub phone: String,
    pub password: SecretString,
    #[serde(default)]
    #[validate(length(max = 32, message = "At most 32 roles may be granted"))]
    pub roles: Vec<String>,
}

/// Customer profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub active: bool,
    pub created: DateTime<Utc>,
}

/// Manager profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerProfile {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub created: DateTime<Utc>,
}
