//! Authentication handlers for registration, login and token management

use super::{
    jwt::{AuthError, TokenPair},
    users::{LoginRequest, RefreshRequest, RegisterRequest},
    AdminIdentity, RequestIdentity,
};
use crate::{
    error::AppJson,
    handlers::types::{ApiResponse, ErrorResponse},
    AppState,
};
use axum::{extract::State, http::StatusCode, response::Json};
use catalog_core::AccountView;
use tracing::info;

/// Account registration endpoint
///
/// New accounts always get the `user` role.
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AccountView>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn register_user(
    State(app_state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountView>>), AuthError> {
    info!("Registration attempt: {}", request.email);

    let account = app_state.user_service.register(request).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(account))))
}

/// Login endpoint
///
/// Returns an access/refresh token pair.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = ApiResponse<TokenPair>),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse)
    )
)]
pub async fn login_user(
    State(app_state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<ApiResponse<TokenPair>>, AuthError> {
    info!("Login attempt: {}", request.email);

    let tokens = app_state.user_service.login(request).await?;

    Ok(Json(ApiResponse::new(tokens)))
}

/// Token refresh endpoint
///
/// Trades a refresh token for a new pair.
#[utoipa::path(
    post,
    path = "/v1/auth/refresh",
    tag = "Auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = ApiResponse<TokenPair>),
        (status = 401, description = "Invalid refresh token", body = ErrorResponse)
    )
)]
pub async fn refresh_token(
    State(app_state): State<AppState>,
    AppJson(request): AppJson<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenPair>>, AuthError> {
    let tokens = app_state.user_service.refresh(request).await?;

    info!("Token refreshed successfully");
    Ok(Json(ApiResponse::new(tokens)))
}

/// Profile of the authenticated caller
#[utoipa::path(
    get,
    path = "/v1/auth/me",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account", body = ApiResponse<AccountView>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    )
)]
pub async fn get_current_user(
    State(app_state): State<AppState>,
    identity: RequestIdentity,
) -> Result<Json<ApiResponse<AccountView>>, AuthError> {
    let account = app_state.user_service.current(identity.subject).await?;
    Ok(Json(ApiResponse::new(account)))
}

/// List every account (admin only)
#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All accounts", body = ApiResponse<Vec<AccountView>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    AdminIdentity(admin): AdminIdentity,
) -> Result<Json<ApiResponse<Vec<AccountView>>>, AuthError> {
    info!(admin = %admin.subject, "Listing accounts");

    let accounts = app_state.user_service.list().await?;
    Ok(Json(ApiResponse::new(accounts)))
}
