//! OpenAPI specification for the catalog service

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::auth::{
    jwt::TokenPair,
    users::{LoginRequest, RefreshRequest, RegisterRequest},
};
use crate::handlers::{ApiErrorBody, ErrorResponse, HealthResponse};
use catalog_core::{AccountView, Item, ItemInput, Role};

/// Main OpenAPI specification
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Accounts and catalog items with bearer token authentication",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        crate::handlers::health_check,

        crate::auth::handlers::register_user,
        crate::auth::handlers::login_user,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::get_current_user,
        crate::auth::handlers::list_users,

        crate::handlers::list_items,
        crate::handlers::create_item,
        crate::handlers::get_item,
        crate::handlers::update_item,
        crate::handlers::delete_item,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            ApiErrorBody,
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            TokenPair,
            AccountView,
            Role,
            Item,
            ItemInput,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database status"),
        (name = "Auth", description = "Registration, login and token refresh"),
        (name = "Users", description = "Account administration"),
        (name = "Items", description = "Catalog item management"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the bearer token scheme referenced by protected paths
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Get the OpenAPI specification as JSON
pub fn get_openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}

/// Get the OpenAPI specification as YAML
pub fn get_openapi_yaml() -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&ApiDoc::openapi())
}
