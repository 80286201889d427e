//! Request middleware: bearer authentication and role gating

use crate::{
    auth::{
        jwt::{AuthError, TokenService},
        RequestIdentity,
    },
    error::ApiError,
    AppState,
};
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use catalog_core::Role;
use std::sync::Arc;
use tracing::{debug, warn};

/// Split an `Authorization` value into its bearer token.
///
/// Exactly two whitespace-separated segments; the scheme is matched
/// case-insensitively.
pub fn parse_bearer(value: &str) -> Option<&str> {
    let mut parts = value.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token)
}

/// Verify the bearer access token carried by `headers`
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<RequestIdentity, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedAuthHeader)?;

    let token = parse_bearer(value).ok_or(AuthError::MalformedAuthHeader)?;
    let claims = tokens.verify_access(token)?;

    Ok(RequestIdentity::new(claims.sub, claims.role))
}

/// Reject unauthenticated requests and bind the caller's identity
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = authenticate(request.headers(), &state.tokens).map_err(|e| {
        debug!(path = %request.uri().path(), "Authentication failed: {}", e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Set of roles admitted by [`require_roles`]
#[derive(Debug, Clone)]
pub struct RoleGate {
    allowed: Arc<[Role]>,
}

impl RoleGate {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: roles.into_iter().collect(),
        }
    }

    pub fn admin_only() -> Self {
        Self::new([Role::Admin])
    }

    /// A missing identity is refused, never assumed
    pub fn check(&self, identity: Option<&RequestIdentity>) -> Result<(), AuthError> {
        match identity {
            Some(identity) if self.allowed.contains(&identity.role) => Ok(()),
            Some(identity) => {
                warn!(
                    subject = %identity.subject,
                    role = %identity.role,
                    "Role not permitted for this route"
                );
                Err(AuthError::Forbidden)
            }
            None => {
                warn!("Role gate reached without an authenticated identity");
                Err(AuthError::Forbidden)
            }
        }
    }
}

/// Gate a route on the bound identity's role; layer it inside [`require_auth`]
pub async fn require_roles(
    State(gate): State<RoleGate>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    gate.check(request.extensions().get::<RequestIdentity>())?;
    Ok(next.run(request).await)
}
