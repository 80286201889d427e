//! Account registration, login and token refresh

use super::{
    jwt::{AuthError, TokenPair, TokenService},
    password,
};
use catalog_core::{
    is_valid_email, log_operation_start, validation_error, Account, AccountStore, AccountView,
    CatalogResult, PasswordConfig, Registration, Role,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Account registration request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "Ann")]
    pub name: String,
    #[schema(example = "ann@example.com")]
    pub email: String,
    #[schema(example = "correct-horse-battery")]
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ann@example.com")]
    pub email: String,
    #[schema(example = "correct-horse-battery")]
    pub password: String,
}

impl LoginRequest {
    /// Shape check only; whether the credentials match is decided by `login`
    pub fn validate(&self) -> CatalogResult<()> {
        if !is_valid_email(self.email.trim()) {
            return Err(validation_error!(
                "email must be a valid address",
                "email",
                "accounts"
            ));
        }
        if self.password.is_empty() {
            return Err(validation_error!("password is required", "password", "accounts"));
        }
        Ok(())
    }
}

/// Token refresh request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Authentication operations over an account store
#[derive(Clone)]
pub struct UserService {
    accounts: Arc<dyn AccountStore>,
    tokens: TokenService,
    password: PasswordConfig,
    /// Verified against when the email is unknown, so both paths cost one hash
    dummy_hash: Arc<str>,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("tokens", &self.tokens)
            .field("password", &self.password)
            .finish_non_exhaustive()
    }
}

impl UserService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        tokens: TokenService,
        password: PasswordConfig,
    ) -> Result<Self, AuthError> {
        let dummy_hash = password::hash(&Uuid::new_v4().to_string(), &password)?;
        Ok(Self {
            accounts,
            tokens,
            password,
            dummy_hash: dummy_hash.into(),
        })
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Create a plain `user` account
    pub async fn register(&self, request: RegisterRequest) -> Result<AccountView, AuthError> {
        log_operation_start!("register", email = %request.email);
        let account = self
            .build_account(&request.name, &request.email, request.password, Role::User)
            .await?;

        self.accounts.create(&account).await.map_err(|e| {
            debug!("Registration rejected by store: {}", e);
            AuthError::from(e)
        })?;

        info!(account_id = %account.id, email = %account.email, "Registered new account");
        Ok(account.to_view())
    }

    /// Exchange email and password for a token pair.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, request: LoginRequest) -> Result<TokenPair, AuthError> {
        request.validate()?;
        let email = request.email.trim();
        let account = self.accounts.find_by_email(email).await?;

        let hash = match &account {
            Some(account) => account.password_hash.clone(),
            None => self.dummy_hash.to_string(),
        };
        let verified = password::verify_blocking(request.password, hash).await;

        match account {
            Some(account) if verified => {
                let tokens = self.tokens.issue_pair(account.id, account.role)?;
                info!(account_id = %account.id, "Login succeeded");
                Ok(tokens)
            }
            _ => {
                warn!(email = %email, "Login failed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// All accounts without credential hashes
    pub async fn list(&self) -> Result<Vec<AccountView>, AuthError> {
        let accounts = self.accounts.list().await?;
        Ok(accounts.iter().map(Account::to_view).collect())
    }

    /// Trade a refresh token for a new pair.
    ///
    /// The account is read again so role changes and removals take effect.
    pub async fn refresh(&self, request: RefreshRequest) -> Result<TokenPair, AuthError> {
        let claims = self.tokens.verify_refresh(&request.refresh_token)?;

        let account = self.accounts.find_by_id(claims.sub).await?.ok_or_else(|| {
            warn!(subject = %claims.sub, "Refresh token for unknown account");
            AuthError::InvalidToken
        })?;

        debug!(account_id = %account.id, "Refreshing tokens");
        self.tokens.issue_pair(account.id, account.role)
    }

    /// Profile of the authenticated caller
    pub async fn current(&self, subject: Uuid) -> Result<AccountView, AuthError> {
        self.accounts
            .find_by_id(subject)
            .await?
            .map(|account| account.to_view())
            .ok_or(AuthError::AccountNotFound)
    }

    /// Create the bootstrap admin unless an account with that email exists
    pub async fn ensure_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AccountView, AuthError> {
        if let Some(existing) = self.accounts.find_by_email(email.trim()).await? {
            if !existing.role.is_admin() {
                warn!(
                    email = %existing.email,
                    "Bootstrap admin email belongs to a non-admin account; leaving it unchanged"
                );
            }
            return Ok(existing.to_view());
        }

        let account = self
            .build_account(name, email, password.to_string(), Role::Admin)
            .await?;
        match self.accounts.create(&account).await {
            Ok(()) => {
                info!(email = %account.email, "Created bootstrap admin account");
                Ok(account.to_view())
            }
            // Lost a race with another instance creating the same admin
            Err(e @ catalog_core::CatalogError::AlreadyExists { .. }) => {
                debug!("{}", e);
                self.accounts
                    .find_by_email(email.trim())
                    .await?
                    .map(|account| account.to_view())
                    .ok_or(AuthError::AccountNotFound)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn build_account(
        &self,
        name: &str,
        email: &str,
        password: String,
        role: Role,
    ) -> Result<Account, AuthError> {
        let name = name.trim();
        let email = email.trim();
        Registration {
            name,
            email,
            password: &password,
        }
        .validate()?;

        let password_hash = password::hash_blocking(password, self.password).await?;
        Ok(Account::new(
            name.to_string(),
            email.to_string(),
            password_hash,
            role,
        ))
    }
}
