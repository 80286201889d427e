//! Signed bearer tokens (HS256)
//!
//! Access and refresh tokens share one secret; the `kind` claim keeps them from
//! being used in each other's place.

use crate::error::ApiError;
use axum::response::{IntoResponse, Response};
use catalog_core::{AuthConfig, CatalogError, CatalogResult, Role};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Token purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims carried by both token kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: Uuid,
    pub role: Role,
    pub kind: TokenKind,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    /// Claims valid from `now` for `ttl`
    pub fn new(subject: Uuid, role: Role, kind: TokenKind, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: subject,
            role,
            kind,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

/// Access + refresh token pair handed out on login and refresh
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Access token lifetime in seconds
    #[schema(example = 900)]
    pub expires_in: i64,
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String, access_ttl: Duration) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: access_ttl.num_seconds(),
        }
    }
}

/// Authentication and authorization failures
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing authorization header")]
    MissingAuthHeader,
    #[error("Malformed authorization header")]
    MalformedAuthHeader,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Insufficient permissions")]
    Forbidden,
    #[error("Account already exists")]
    AlreadyExists,
    #[error("Account not found")]
    AccountNotFound,
    #[error("Token creation failed")]
    TokenCreation,
    #[error("Password hashing failed")]
    Hashing,
    #[error(transparent)]
    Validation(CatalogError),
    #[error(transparent)]
    Store(CatalogError),
}

impl From<CatalogError> for AuthError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation { .. } => AuthError::Validation(err),
            CatalogError::AlreadyExists { .. } => AuthError::AlreadyExists,
            other => AuthError::Store(other),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

/// Build a signed token for `subject`
pub fn issue(
    subject: Uuid,
    role: Role,
    kind: TokenKind,
    secret: &[u8],
    ttl: Duration,
) -> Result<String, AuthError> {
    let claims = Claims::new(subject, role, kind, Utc::now(), ttl);
    sign(&claims, &EncodingKey::from_secret(secret))
}

/// Issue an access token and a refresh token for the same subject
pub fn issue_pair(
    subject: Uuid,
    role: Role,
    secret: &[u8],
    access_ttl: Duration,
    refresh_ttl: Duration,
) -> Result<TokenPair, AuthError> {
    let access = issue(subject, role, TokenKind::Access, secret, access_ttl)?;
    let refresh = issue(subject, role, TokenKind::Refresh, secret, refresh_ttl)?;
    Ok(TokenPair::new(access, refresh, access_ttl))
}

/// Check signature, algorithm and time window, then return the claims.
///
/// Every failure surfaces as [`AuthError::InvalidToken`]; the concrete reason
/// only goes to the debug log.
pub fn verify(token: &str, secret: &[u8]) -> Result<Claims, AuthError> {
    check(token, &DecodingKey::from_secret(secret))
}

fn sign(claims: &Claims, key: &EncodingKey) -> Result<String, AuthError> {
    encode(&Header::new(Algorithm::HS256), claims, key).map_err(|e| {
        warn!("Failed to encode JWT token: {}", e);
        AuthError::TokenCreation
    })
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.set_required_spec_claims(&["exp", "nbf", "iat", "sub"]);
    validation
}

fn check(token: &str, key: &DecodingKey) -> Result<Claims, AuthError> {
    decode::<Claims>(token, key, &validation())
        .map(|data| data.claims)
        .map_err(|e| {
            debug!(reason = rejection_reason(e.kind()), "Token verification failed");
            AuthError::InvalidToken
        })
}

fn rejection_reason(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::ExpiredSignature => "expired",
        ErrorKind::ImmatureSignature => "not_yet_valid",
        ErrorKind::InvalidSignature => "signature_mismatch",
        ErrorKind::InvalidAlgorithm => "algorithm_mismatch",
        ErrorKind::MissingRequiredClaim(_) => "missing_claim",
        _ => "malformed",
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Token issuer/verifier bound to the configured secret and lifetimes
#[derive(Clone)]
pub struct TokenService {
    keys: Arc<Keys>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
            }),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> CatalogResult<Self> {
        Ok(Self::new(
            config.jwt_secret.as_bytes(),
            config.access_ttl()?,
            config.refresh_ttl()?,
        ))
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn issue(&self, subject: Uuid, role: Role, kind: TokenKind) -> Result<String, AuthError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        sign(
            &Claims::new(subject, role, kind, Utc::now(), ttl),
            &self.keys.encoding,
        )
    }

    pub fn issue_pair(&self, subject: Uuid, role: Role) -> Result<TokenPair, AuthError> {
        let access = self.issue(subject, role, TokenKind::Access)?;
        let refresh = self.issue(subject, role, TokenKind::Refresh)?;
        Ok(TokenPair::new(access, refresh, self.access_ttl))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        check(token, &self.keys.decoding)
    }

    /// Verify a token that must be an access token
    pub fn verify_access(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_kind(token, TokenKind::Access)
    }

    /// Verify a token that must be a refresh token
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_kind(token, TokenKind::Refresh)
    }

    fn verify_kind(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
        let claims = self.verify(token)?;
        if claims.kind != expected {
            debug!(reason = "wrong_kind", "Token verification failed");
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }

    #[cfg(test)]
    pub(crate) fn sign_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        sign(claims, &self.keys.encoding)
    }
}
