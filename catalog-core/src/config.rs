//! Configuration management
//!
//! Configuration is resolved once at start-up (defaults, then an optional TOML
//! file, then environment variables) and handed to each component explicitly.

use crate::config_error;
use crate::error::{CatalogError, CatalogResult, ErrorContext};
use crate::logging::LoggingConfig;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Deployment environment; `dev` switches to verbose human-readable logs
    pub app_env: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub password: PasswordConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub dev_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            dev_mode: false,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite URL such as `sqlite:data/catalog.db`; in-memory store when unset
    pub url: Option<String>,
}

/// Token signing and account bootstrap settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret shared by access and refresh tokens
    pub jwt_secret: String,
    pub access_token_ttl: String,
    pub refresh_token_ttl: String,
    pub admin_name: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_ttl: "15m".to_string(),
            refresh_token_ttl: "7d".to_string(),
            admin_name: "Administrator".to_string(),
            admin_email: None,
            admin_password: None,
        }
    }
}

// Keeps the secret and bootstrap password out of debug logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("admin_name", &self.admin_name)
            .field("admin_email", &self.admin_email)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl AuthConfig {
    pub fn access_ttl(&self) -> CatalogResult<Duration> {
        parse_duration(&self.access_token_ttl)
    }

    pub fn refresh_ttl(&self) -> CatalogResult<Duration> {
        parse_duration(&self.refresh_token_ttl)
    }

    /// Admin bootstrap credentials, when both email and password are configured
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}

/// Argon2 cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl PasswordConfig {
    /// Argon2 lane limit (2^24 - 1)
    pub const MAX_PARALLELISM: u32 = 0x00FF_FFFF;
    /// Argon2 memory limit in KiB (2^28 - 1)
    pub const MAX_MEMORY_KIB: u32 = 0x0FFF_FFFF;

    /// Check the parameters against the ranges argon2 accepts
    pub fn validate(&self) -> CatalogResult<()> {
        let lanes_ok = (1..=Self::MAX_PARALLELISM).contains(&self.parallelism);
        let memory_ok = self
            .parallelism
            .checked_mul(8)
            .is_some_and(|min| (min..=Self::MAX_MEMORY_KIB).contains(&self.memory_kib));

        if self.iterations == 0 || !lanes_ok || !memory_ok {
            return Err(CatalogError::Config {
                message: format!(
                    "Password hashing parameters are out of range (memory_kib={}, iterations={}, parallelism={})",
                    self.memory_kib, self.iterations, self.parallelism
                ),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate_password")
                    .with_suggestion("iterations >= 1, parallelism 1..=16777215, memory_kib between 8 x parallelism and 268435455"),
            });
        }
        Ok(())
    }

    /// Cheapest parameters argon2 accepts; only for tests
    pub fn minimal() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }
}

/// Parse a duration such as `90s`, `15m`, `12h` or `7d`.
///
/// A bare number is read as seconds.
pub fn parse_duration(value: &str) -> CatalogResult<Duration> {
    let value = value.trim();
    let invalid = || CatalogError::Config {
        message: format!("Invalid duration: '{}'", value),
        source: None,
        context: ErrorContext::new("config")
            .with_operation("parse_duration")
            .with_suggestion("Use a number followed by s, m, h or d, e.g. 15m or 7d"),
    };

    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, unit) = value.split_at(split);
    let amount: i64 = digits.parse().map_err(|_| invalid())?;

    let duration = match unit {
        "" | "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        _ => None,
    };

    match duration {
        Some(d) if d > Duration::zero() => Ok(d),
        _ => Err(invalid()),
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| CatalogError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Overlay values from the process environment
    pub fn apply_env(&mut self) -> CatalogResult<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary variable source
    pub fn apply_env_with<F>(&mut self, lookup: F) -> CatalogResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(env) = lookup("APP_ENV") {
            self.app_env = env;
        }
        if let Some(host) = lookup("CATALOG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("CATALOG_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| config_error!(format!("Invalid CATALOG_PORT: '{}'", port), "config"))?;
        }
        if let Some(dev) = lookup("CATALOG_DEV_MODE") {
            self.server.dev_mode = dev
                .parse()
                .map_err(|_| config_error!(format!("Invalid CATALOG_DEV_MODE: '{}'", dev), "config"))?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(ttl) = lookup("ACCESS_TOKEN_TTL") {
            self.auth.access_token_ttl = ttl;
        }
        if let Some(ttl) = lookup("REFRESH_TOKEN_TTL") {
            self.auth.refresh_token_ttl = ttl;
        }
        if let Some(email) = lookup("CATALOG_ADMIN_EMAIL") {
            self.auth.admin_email = Some(email);
        }
        if let Some(password) = lookup("CATALOG_ADMIN_PASSWORD") {
            self.auth.admin_password = Some(password);
        }
        Ok(())
    }

    pub fn is_dev(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("dev") || self.server.dev_mode
    }

    /// Validate configuration
    pub fn validate(&self) -> CatalogResult<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(CatalogError::Config {
                message: "JWT secret must not be empty".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set JWT_SECRET or auth.jwt_secret"),
            });
        }

        let access = self.auth.access_ttl()?;
        let refresh = self.auth.refresh_ttl()?;
        if refresh <= access {
            return Err(CatalogError::Config {
                message: "Refresh token TTL must be longer than access token TTL".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Use e.g. access_token_ttl = \"15m\", refresh_token_ttl = \"7d\""),
            });
        }

        self.password.validate()?;

        if let Some(email) = &self.auth.admin_email {
            if !crate::types::is_valid_email(email) {
                return Err(config_error!(
                    format!("Invalid admin email: '{}'", email),
                    "config"
                ));
            }
        }

        Ok(())
    }
}
