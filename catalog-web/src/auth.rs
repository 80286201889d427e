//! Authentication and authorization
//!
//! The request pipeline is: [`crate::middleware::require_auth`] verifies the
//! bearer token and binds a [`RequestIdentity`]; handlers read it back through
//! the extractors below and apply [`authorize_owner`] where ownership matters.

pub mod handlers;
pub mod jwt;
pub mod password;
pub mod users;


use crate::error::ApiError;
use axum::{extract::FromRequestParts, http::request::Parts};
use catalog_core::Role;
use jwt::AuthError;
use tracing::warn;
use uuid::Uuid;

/// Caller identity established from a verified access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestIdentity {
    pub subject: Uuid,
    pub role: Role,
}

impl RequestIdentity {
    pub fn new(subject: Uuid, role: Role) -> Self {
        Self { subject, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Reads the identity bound by the authentication middleware
impl<S> FromRequestParts<S> for RequestIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestIdentity>()
            .copied()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

/// Identity that must carry the admin role
#[derive(Debug, Clone, Copy)]
pub struct AdminIdentity(pub RequestIdentity);

impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = RequestIdentity::from_request_parts(parts, state).await?;

        if identity.is_admin() {
            Ok(AdminIdentity(identity))
        } else {
            warn!(subject = %identity.subject, "Admin access required but account is not admin");
            Err(AuthError::Forbidden.into())
        }
    }
}

/// Owners may touch their own resources; admins may touch anything.
pub fn authorize_owner(identity: &RequestIdentity, owner_id: Uuid) -> Result<(), AuthError> {
    if identity.subject == owner_id || identity.is_admin() {
        Ok(())
    } else {
        warn!(
            subject = %identity.subject,
            owner = %owner_id,
            "Ownership check failed"
        );
        Err(AuthError::Forbidden)
    }
}
