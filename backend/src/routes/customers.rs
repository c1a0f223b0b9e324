//! Customer routes
//!
//! Registration and login are public; `/me` requires a customer token.

use super::token::{issue_token, validate_token};
use crate::auth::{require_auth, Customer, Identity};
use crate::error::ApiResult;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use counter_auth_shared::{CustomerProfile, RegisterCustomerRequest};

/// Create customer routes
pub fn customer_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(get_me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<Customer>,
        ));

    Router::new()
        .route("/", post(register))
        .route("/token", post(issue_token::<Customer>))
        .route("/token/validate", post(validate_token::<Customer>))
        .merge(protected)
}

/// Register a new customer
///
/// POST /api/customers
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterCustomerRequest>,
) -> ApiResult<(StatusCode, Json<CustomerProfile>)> {
    let profile = state.principals().register_customer(req).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Current customer's profile
///
/// GET /api/customers/me
async fn get_me(
    State(state): State<AppState>,
    identity: Identity<Customer>,
) -> ApiResult<Json<CustomerProfile>> {
    let profile = state.principals().customer(identity.principal_id()).await?;
    Ok(Json(profile))
}
