//! Manager routes
//!
//! Managers cannot sign up: new managers are registered by an authenticated
//! manager holding the `ADMIN` role.

use super::token::{issue_token, validate_token};
use crate::auth::{require_auth, require_role, Identity, Manager, Realm, Role, RoleGate};
use crate::error::ApiResult;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use counter_auth_shared::{ManagerProfile, RegisterManagerRequest, TokenResponse, ADMIN_ROLE};
use tracing::info;

/// Create manager routes
pub fn manager_routes(state: &AppState) -> Router<AppState> {
    let admin_gate = RoleGate::new(state.roles().clone(), Role::new(ADMIN_ROLE));

    // route_layer wraps outside-in: authentication runs before the role gate
    let admin = Router::new()
        .route("/", post(register))
        .route_layer(middleware::from_fn_with_state(
            admin_gate,
            require_role::<Manager>,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<Manager>,
        ));

    let protected = Router::new()
        .route("/me", get(get_me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<Manager>,
        ));

    Router::new()
        .route("/token", post(issue_token::<Manager>))
        .route("/token/validate", post(validate_token::<Manager>))
        .merge(admin)
        .merge(protected)
}

/// Register a new manager and issue its first token
///
/// POST /api/managers
///
/// # Authorization
/// Requires a manager token whose owner holds the `ADMIN` role.
async fn register(
    State(state): State<AppState>,
    admin: Identity<Manager>,
    Json(req): Json<RegisterManagerRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    let manager = state.principals().register_manager(req).await?;
    let token = state.tokens().grant(Manager::KIND, manager.id).await?;

    info!(
        admin_id = admin.principal_id(),
        manager_id = manager.id,
        "Manager registered"
    );
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Current manager's profile, including roles
///
/// GET /api/managers/me
async fn get_me(
    State(state): State<AppState>,
    identity: Identity<Manager>,
) -> ApiResult<Json<ManagerProfile>> {
    let profile = state.principals().manager(identity.principal_id()).await?;
    Ok(Json(profile))
}
