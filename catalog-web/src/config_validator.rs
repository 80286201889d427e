//! Configuration validation for the catalog web server
//!
//! Collects every problem with a configuration in one pass, so start-up can
//! report them together instead of failing on the first.

use catalog_core::{AppConfig, Registration};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use tracing::{error, info, warn};

/// Tokens signed with shorter HMAC keys are easier to brute-force
const RECOMMENDED_SECRET_LEN: usize = 32;

/// Configuration validation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub recommendations: Vec<String>,
}

/// Configuration validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub severity: ErrorSeverity,
}

/// Configuration validation warning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub recommendation: String,
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the complete service configuration
    pub fn validate_config(config: &AppConfig) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut recommendations = Vec::new();

        Self::validate_network_config(config, &mut errors, &mut warnings);
        Self::validate_database_config(config, &mut errors, &mut warnings);
        Self::validate_auth_config(config, &mut errors, &mut warnings);
        Self::validate_password_config(config, &mut errors);
        Self::validate_dev_mode_config(config, &mut warnings, &mut recommendations);

        let is_valid = errors
            .iter()
            .all(|e| !matches!(e.severity, ErrorSeverity::Critical));

        ValidationResult {
            is_valid,
            errors,
            warnings,
            recommendations,
        }
    }

    /// Validate network configuration
    fn validate_network_config(
        config: &AppConfig,
        errors: &mut Vec<ValidationError>,
        warnings: &mut Vec<ValidationWarning>,
    ) {
        let server = &config.server;
        if server.host.is_empty() {
            errors.push(ValidationError {
                field: "server.host".to_string(),
                message: "Host cannot be empty".to_string(),
                severity: ErrorSeverity::Critical,
            });
        } else if server.host.parse::<IpAddr>().is_err() && server.host != "localhost" {
            errors.push(ValidationError {
                field: "server.host".to_string(),
                message: format!("Invalid host format: {}", server.host),
                severity: ErrorSeverity::High,
            });
        }

        if server.port == 0 {
            warnings.push(ValidationWarning {
                field: "server.port".to_string(),
                message: "Port 0 lets the OS pick a random port".to_string(),
                recommendation: "Set a fixed port outside of tests".to_string(),
            });
        } else if server.port < 1024 && !server.dev_mode {
            warnings.push(ValidationWarning {
                field: "server.port".to_string(),
                message: format!("Using privileged port {} in production", server.port),
                recommendation: "Consider using a port >= 1024 behind a reverse proxy".to_string(),
            });
        }
    }

    /// Validate database configuration
    fn validate_database_config(
        config: &AppConfig,
        errors: &mut Vec<ValidationError>,
        warnings: &mut Vec<ValidationWarning>,
    ) {
        match config.database.url.as_deref() {
            Some("") => errors.push(ValidationError {
                field: "database.url".to_string(),
                message: "Database URL cannot be empty if provided".to_string(),
                severity: ErrorSeverity::High,
            }),
            Some(url) if !url.starts_with("sqlite:") => errors.push(ValidationError {
                field: "database.url".to_string(),
                message: format!("Unsupported database URL: {}", url),
                severity: ErrorSeverity::Critical,
            }),
            Some(url) if url.contains(":memory:") && !config.is_dev() => {
                warnings.push(ValidationWarning {
                    field: "database.url".to_string(),
                    message: "Using in-memory database in production".to_string(),
                    recommendation: "Use a persistent database file for production".to_string(),
                })
            }
            Some(_) => {}
            None if !config.is_dev() => warnings.push(ValidationWarning {
                field: "database.url".to_string(),
                message: "No database configured; accounts and items live in memory".to_string(),
                recommendation: "Set DATABASE_URL to a SQLite file".to_string(),
            }),
            None => {}
        }
    }

    /// Validate token and admin bootstrap settings
    fn validate_auth_config(
        config: &AppConfig,
        errors: &mut Vec<ValidationError>,
        warnings: &mut Vec<ValidationWarning>,
    ) {
        let auth = &config.auth;
        if auth.jwt_secret.is_empty() {
            errors.push(ValidationError {
                field: "auth.jwt_secret".to_string(),
                message: "JWT secret must be set".to_string(),
                severity: ErrorSeverity::Critical,
            });
        } else if auth.jwt_secret.len() < RECOMMENDED_SECRET_LEN {
            warnings.push(ValidationWarning {
                field: "auth.jwt_secret".to_string(),
                message: format!("JWT secret is shorter than {} bytes", RECOMMENDED_SECRET_LEN),
                recommendation: "Generate a long random secret, e.g. `openssl rand -hex 32`"
                    .to_string(),
            });
        }

        match (auth.access_ttl(), auth.refresh_ttl()) {
            (Ok(access), Ok(refresh)) if refresh <= access => errors.push(ValidationError {
                field: "auth.refresh_token_ttl".to_string(),
                message: "Refresh token TTL must be longer than access token TTL".to_string(),
                severity: ErrorSeverity::Critical,
            }),
            (Ok(_), Ok(_)) => {}
            (access, refresh) => {
                for (field, result) in [
                    ("auth.access_token_ttl", access),
                    ("auth.refresh_token_ttl", refresh),
                ] {
                    if let Err(e) = result {
                        errors.push(ValidationError {
                            field: field.to_string(),
                            message: e.to_string(),
                            severity: ErrorSeverity::Critical,
                        });
                    }
                }
            }
        }

        match (&auth.admin_email, &auth.admin_password) {
            (Some(email), Some(password)) => {
                let bootstrap = Registration {
                    name: &auth.admin_name,
                    email,
                    password,
                };
                if let Err(e) = bootstrap.validate() {
                    errors.push(ValidationError {
                        field: "auth.admin".to_string(),
                        message: format!("Bootstrap admin is invalid: {}", e),
                        severity: ErrorSeverity::Critical,
                    });
                }
            }
            (Some(_), None) | (None, Some(_)) => warnings.push(ValidationWarning {
                field: "auth.admin".to_string(),
                message: "Only one of admin email and admin password is set; no admin will be created"
                    .to_string(),
                recommendation: "Set both CATALOG_ADMIN_EMAIL and CATALOG_ADMIN_PASSWORD".to_string(),
            }),
            (None, None) => {}
        }
    }

    /// Validate password hashing cost
    fn validate_password_config(config: &AppConfig, errors: &mut Vec<ValidationError>) {
        let password = &config.password;
        if let Err(e) = password.validate() {
            errors.push(ValidationError {
                field: "password".to_string(),
                message: e.to_string(),
                severity: ErrorSeverity::Critical,
            });
        } else if password.memory_kib < 19 * 1024 && !config.is_dev() {
            errors.push(ValidationError {
                field: "password.memory_kib".to_string(),
                message: format!(
                    "Password hashing memory {} KiB is below the recommended 19456 KiB",
                    password.memory_kib
                ),
                severity: ErrorSeverity::Medium,
            });
        }
    }

    /// Validate development mode configuration
    fn validate_dev_mode_config(
        config: &AppConfig,
        warnings: &mut Vec<ValidationWarning>,
        recommendations: &mut Vec<String>,
    ) {
        if config.server.dev_mode {
            warnings.push(ValidationWarning {
                field: "server.dev_mode".to_string(),
                message: "Development mode is enabled".to_string(),
                recommendation: "Disable development mode for production deployment".to_string(),
            });
            recommendations.push("Ensure dev_mode is set to false for production".to_string());
        }

        if config.server.host == "0.0.0.0" {
            recommendations
                .push("Consider using a reverse proxy with TLS when binding to 0.0.0.0".to_string());
        }
    }

    /// Log validation results
    pub fn log_validation_result(result: &ValidationResult) {
        if result.is_valid {
            info!("Configuration validation passed");
        } else {
            error!("Configuration validation failed");
        }

        for err in &result.errors {
            match err.severity {
                ErrorSeverity::Critical | ErrorSeverity::High => {
                    error!(field = %err.field, severity = ?err.severity, "{}", err.message)
                }
                ErrorSeverity::Medium | ErrorSeverity::Low => {
                    warn!(field = %err.field, severity = ?err.severity, "{}", err.message)
                }
            }
        }

        for warning in &result.warnings {
            warn!(
                field = %warning.field,
                recommendation = %warning.recommendation,
                "{}",
                warning.message
            );
        }

        for recommendation in &result.recommendations {
            info!("Recommendation: {}", recommendation);
        }
    }
}
