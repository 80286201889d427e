//! Catalog item handlers

use super::types::{ApiResponse, ErrorResponse};
use crate::{
    auth::RequestIdentity,
    error::{ApiError, AppJson, AppPath},
    AppState,
};
use axum::{extract::State, http::StatusCode, response::Json};
use catalog_core::{Item, ItemInput};
use uuid::Uuid;

/// List all items
#[utoipa::path(
    get,
    path = "/v1/items",
    tag = "Items",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All catalog items", body = ApiResponse<Vec<Item>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
    _identity: RequestIdentity,
) -> Result<Json<ApiResponse<Vec<Item>>>, ApiError> {
    let items = state.item_service.list().await?;
    Ok(Json(ApiResponse::new(items)))
}

/// Create an item owned by the caller
#[utoipa::path(
    post,
    path = "/v1/items",
    tag = "Items",
    security(("bearer_auth" = [])),
    request_body = ItemInput,
    responses(
        (status = 201, description = "Item created", body = ApiResponse<Item>),
        (status = 400, description = "Invalid item", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    identity: RequestIdentity,
    AppJson(input): AppJson<ItemInput>,
) -> Result<(StatusCode, Json<ApiResponse<Item>>), ApiError> {
    let item = state.item_service.create(&identity, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(item))))
}

/// Fetch one item
#[utoipa::path(
    get,
    path = "/v1/items/{id}",
    tag = "Items",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Item id")),
    responses(
        (status = 200, description = "The item", body = ApiResponse<Item>),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such item", body = ErrorResponse)
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    _identity: RequestIdentity,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<Item>>, ApiError> {
    let item = state.item_service.get(id).await?;
    Ok(Json(ApiResponse::new(item)))
}

/// Replace an item; owner or admin only
#[utoipa::path(
    put,
    path = "/v1/items/{id}",
    tag = "Items",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Item id")),
    request_body = ItemInput,
    responses(
        (status = 200, description = "Item updated", body = ApiResponse<Item>),
        (status = 400, description = "Invalid item or id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is neither owner nor admin", body = ErrorResponse),
        (status = 404, description = "No such item", body = ErrorResponse)
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    identity: RequestIdentity,
    AppPath(id): AppPath<Uuid>,
    AppJson(input): AppJson<ItemInput>,
) -> Result<Json<ApiResponse<Item>>, ApiError> {
    let item = state.item_service.update(&identity, id, input).await?;
    Ok(Json(ApiResponse::new(item)))
}

/// Delete an item; owner or admin only
#[utoipa::path(
    delete,
    path = "/v1/items/{id}",
    tag = "Items",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Item id")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is neither owner nor admin", body = ErrorResponse),
        (status = 404, description = "No such item", body = ErrorResponse)
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    identity: RequestIdentity,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.item_service.delete(&identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
