//! Integration tests for catalog-core infrastructure

use catalog_core::{
    already_exists_error, config_error, init_logging, not_found_error, storage_error,
    validation_error, AppConfig, CatalogError, LogFormat, LoggingConfig,
};
use std::io::Write;

#[tokio::test]
async fn test_error_handling() {
    let error = storage_error!("disk full", "test_component");

    match &error {
        CatalogError::Storage {
            message, context, ..
        } => {
            assert_eq!(message, "disk full");
            assert_eq!(context.component, "test_component");
            assert!(!context.error_id.is_empty());
        }
        _ => panic!("Expected Storage error"),
    }

    // Logging must never panic, whatever the variant
    error.log();

    assert!(!error.is_client_error());
    assert!(error.error_id().is_some());

    let conflict = already_exists_error!("account ann@example.com", "accounts");
    assert!(conflict.is_client_error());

    let config_err = config_error!("Invalid config", "test");
    assert!(!config_err.is_client_error());
}

#[tokio::test]
async fn test_logging_initialization() {
    let config = LoggingConfig {
        level: "debug".to_string(),
        format: LogFormat::Compact,
        include_location: false,
        include_thread: false,
        log_span_close: false,
        filter_directives: vec!["catalog_core=debug".to_string()],
    };

    // A second initialisation in the same process reports an error instead of panicking
    let first = init_logging(&config);
    let second = init_logging(&config);
    assert!(first.is_ok() || second.is_err());
    assert!(second.is_err());
}

#[tokio::test]
async fn test_config_file_loading() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
app_env = "dev"

[server]
port = 3000

[database]
url = "sqlite::memory:"

[auth]
jwt_secret = "file-secret-with-enough-entropy-0123"
access_token_ttl = "10m"

[password]
memory_kib = 4096
iterations = 3
parallelism = 1
"#
    )
    .unwrap();

    let config = AppConfig::from_file(file.path()).unwrap();
    assert!(config.is_dev());
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.database.url.as_deref(), Some("sqlite::memory:"));
    assert_eq!(config.auth.refresh_token_ttl, "7d");
    assert_eq!(config.password.iterations, 3);
    assert!(config.validate().is_ok());
}

#[tokio::test]
async fn test_config_file_errors() {
    let missing = AppConfig::from_file("/definitely/not/here.toml");
    match missing {
        Err(CatalogError::Config { context, .. }) => {
            assert_eq!(context.operation.as_deref(), Some("read_file"));
        }
        other => panic!("Expected Config error, got {:?}", other.map(|_| ())),
    }

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server\nport = ").unwrap();
    assert!(matches!(
        AppConfig::from_file(file.path()),
        Err(CatalogError::Config { .. })
    ));
}

#[tokio::test]
async fn test_password_parameters_are_validated() {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "secret".to_string();
    config.password.iterations = 0;

    match config.validate().unwrap_err() {
        CatalogError::Config { message, .. } => {
            assert!(message.contains("Password hashing"));
        }
        _ => panic!("Expected Config error"),
    }
}

#[tokio::test]
async fn test_error_macros() {
    let validation_err = validation_error!("Invalid field value", "email", "validator");
    match validation_err {
        CatalogError::Validation {
            message,
            field,
            context,
        } => {
            assert_eq!(message, "Invalid field value");
            assert_eq!(field, Some("email".to_string()));
            assert_eq!(context.component, "validator");
            assert!(!context.recovery_suggestions.is_empty());
        }
        _ => panic!("Expected Validation error"),
    }

    let not_found_err = not_found_error!("item 42", "items");
    match not_found_err {
        CatalogError::NotFound { resource, context } => {
            assert_eq!(resource, "item 42");
            assert_eq!(context.component, "items");
        }
        _ => panic!("Expected NotFound error"),
    }
}
