//! Token issuance and validation handlers
//!
//! Generic over the principal realm; the customer and manager routers mount
//! the same handlers with their own marker type.

use crate::auth::{AuthError, Realm};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use counter_auth_shared::{
    LoginRequest, TokenFailure, TokenResponse, ValidateTokenRequest, ValidateTokenResponse,
};

/// Exchange login and password for a bearer token
///
/// POST /api/{customers,managers}/token
pub async fn issue_token<K: Realm>(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let token = state.tokens().issue(K::KIND, &req.login, req.password).await?;
    Ok(Json(TokenResponse { token }))
}

/// Check whether a token is live
///
/// POST /api/{customers,managers}/token/validate
///
/// Unknown tokens answer 404 and expired ones 400, both with a `fail` body.
pub async fn validate_token<K: Realm>(
    State(state): State<AppState>,
    Json(req): Json<ValidateTokenRequest>,
) -> Result<(StatusCode, Json<ValidateTokenResponse>), ApiError> {
    let (status, body) = match state.tokens().authenticate(K::KIND, &req.token).await {
        Ok(principal_id) => (
            StatusCode::OK,
            ValidateTokenResponse::ok(K::KIND, principal_id),
        ),
        Err(AuthError::NoSuchUser) => (
            StatusCode::NOT_FOUND,
            ValidateTokenResponse::fail(TokenFailure::NotFound),
        ),
        Err(AuthError::Expired) => (
            StatusCode::BAD_REQUEST,
            ValidateTokenResponse::fail(TokenFailure::Expired),
        ),
        Err(other) => return Err(other.into()),
    };
    Ok((status, Json(body)))
}
