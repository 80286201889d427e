//! HTTP error taxonomy and JSON extractors that report through it

use crate::auth::jwt::AuthError;
use crate::handlers::types::{ApiErrorBody, ErrorResponse};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use catalog_core::CatalogError;
use tracing::{error, warn};

/// Every failure a handler can return, already classified for the client
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Input failed a domain rule
    #[error("{0}")]
    Validation(String),
    /// Body or path could not be parsed at all
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    AlreadyExists(String),
    /// Store unreachable; reported by the health check
    #[error("Database connection error")]
    Database,
    /// Carries only the correlation id; details stay in the logs
    #[error("Internal server error (ref: {0})")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AlreadyExists(_) => StatusCode::CONFLICT,
            ApiError::Database | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::InvalidCredentials => "invalid_credentials",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::AlreadyExists(_) => "already_exists",
            ApiError::Database => "db_error",
            ApiError::Internal(_) => "internal_error",
        }
    }

    /// Log an unexpected failure and hide it behind a correlation id
    pub fn internal(err: &CatalogError) -> Self {
        err.log();
        let error_id = err
            .error_id()
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        error!(error_id = %error_id, "Request failed with an internal error");
        ApiError::Internal(error_id)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ApiErrorBody {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation { message, .. } => ApiError::Validation(message),
            CatalogError::NotFound { resource, .. } => ApiError::NotFound(resource),
            CatalogError::AlreadyExists { resource, .. } => {
                ApiError::AlreadyExists(format!("{} already exists", resource))
            }
            other => ApiError::internal(&other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::MissingAuthHeader => {
                ApiError::Unauthorized("Authorization header is required".to_string())
            }
            AuthError::MalformedAuthHeader => ApiError::Unauthorized(
                "Authorization header must be 'Bearer <token>'".to_string(),
            ),
            AuthError::InvalidToken => {
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            AuthError::Forbidden => {
                ApiError::Forbidden("Insufficient permissions".to_string())
            }
            AuthError::AlreadyExists => {
                ApiError::AlreadyExists("Email is already registered".to_string())
            }
            AuthError::AccountNotFound => ApiError::NotFound("Account".to_string()),
            AuthError::Validation(err) | AuthError::Store(err) => ApiError::from(err),
            AuthError::TokenCreation | AuthError::Hashing => {
                let error_id = uuid::Uuid::new_v4().to_string();
                error!(error_id = %error_id, error = %err, "Authentication internals failed");
                ApiError::Internal(error_id)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// `Json` extractor whose rejection uses the error envelope
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// `Path` extractor whose rejection uses the error envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);
