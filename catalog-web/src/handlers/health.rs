//! Health check handlers

use super::types::{ApiResponse, HealthResponse};
use crate::{error::ApiError, AppState};
use axum::{extract::State, response::Json};
use catalog_core::AccountStore;
use tracing::error;

/// Health check endpoint; pings the account store
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "Health",
    summary = "Health check",
    description = "Check the server and database status",
    responses(
        (status = 200, description = "Server and database are healthy", body = ApiResponse<HealthResponse>),
        (status = 500, description = "Database unreachable", body = crate::handlers::ErrorResponse)
    )
)]
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<HealthResponse>>, ApiError> {
    state.accounts.ping().await.map_err(|e| {
        error!(error = %e, "Health check failed");
        ApiError::Database
    })?;

    Ok(Json(ApiResponse::new(HealthResponse {
        status: "ok".to_string(),
        db_status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })))
}
