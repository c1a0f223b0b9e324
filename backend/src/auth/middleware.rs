//! Authentication middleware
//!
//! Resolves the bearer token for one principal namespace and attaches the
//! resulting [`Identity`] to the request. Apply per route group with
//! `middleware::from_fn_with_state(state, require_auth::<Manager>)`.

use super::error::AuthError;
use super::identity::Identity;
use super::realm::Realm;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// The scheme name matches case-insensitively (RFC 7235).
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    auth_header
        .split_once(' ')
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))
}

/// Rejection for a token that did not authenticate
fn reject(err: AuthError) -> ApiError {
    match err {
        AuthError::NoSuchUser => ApiError::Unauthorized("Invalid token".to_string()),
        AuthError::Expired => ApiError::Unauthorized("Token expired".to_string()),
        other => other.into(),
    }
}

/// Require a valid, unexpired bearer token of realm `K`
pub async fn require_auth<K: Realm>(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?.to_owned();

    let principal_id = state
        .tokens()
        .authenticate(K::KIND, &token)
        .await
        .map_err(reject)?;

    request.extensions_mut().insert(Identity::<K>::new(principal_id));

    Ok(next.run(request).await)
}
