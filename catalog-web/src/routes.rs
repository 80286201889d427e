//! Route definitions for the catalog service

use crate::{
    auth::handlers as auth,
    handlers,
    middleware::{require_auth, require_roles, RoleGate},
    AppState,
};
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

/// Routes reachable without a token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(handlers::health_check))
        .route("/v1/auth/register", post(auth::register_user))
        .route("/v1/auth/login", post(auth::login_user))
        .route("/v1/auth/refresh", post(auth::refresh_token))
}

/// Routes behind the bearer token gate; admin routes additionally pass the role gate
pub fn protected_routes(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/v1/users", get(auth::list_users))
        .route_layer(from_fn_with_state(RoleGate::admin_only(), require_roles));

    Router::new()
        .route("/v1/auth/me", get(auth::get_current_user))
        .route(
            "/v1/items",
            get(handlers::list_items).post(handlers::create_item),
        )
        .route(
            "/v1/items/{id}",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .merge(admin)
        .route_layer(from_fn_with_state(state, require_auth))
}

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    public_routes().merge(protected_routes(state))
}
