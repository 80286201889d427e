//! Unified error handling system
//!
//! Provides structured error types with context, recovery suggestions, and proper error chaining

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID, also handed to clients for correlation
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for the catalog domain and its stores
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("Resource not found: {resource}")]
    NotFound {
        resource: String,
        context: ErrorContext,
    },

    #[error("Resource already exists: {resource}")]
    AlreadyExists {
        resource: String,
        context: ErrorContext,
    },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },
}

impl CatalogError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            CatalogError::Validation { context, .. } => Some(context),
            CatalogError::NotFound { context, .. } => Some(context),
            CatalogError::AlreadyExists { context, .. } => Some(context),
            CatalogError::Storage { context, .. } => Some(context),
            CatalogError::Config { context, .. } => Some(context),
            CatalogError::Internal { context, .. } => Some(context),
            CatalogError::Io(_) | CatalogError::Serialization(_) => None,
        }
    }

    /// Correlation id for this error, when one was recorded
    pub fn error_id(&self) -> Option<&str> {
        self.context().map(|c| c.error_id.as_str())
    }

    /// Whether the error is caused by the caller rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CatalogError::Validation { .. }
                | CatalogError::NotFound { .. }
                | CatalogError::AlreadyExists { .. }
        )
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            CatalogError::Validation { .. }
            | CatalogError::NotFound { .. }
            | CatalogError::AlreadyExists { .. } => {
                warn!(
                    error_id = ?self.error_id(),
                    error = %self,
                    "Request rejected"
                );
            }
            CatalogError::Config { .. } => {
                error!(
                    error_id = ?self.error_id(),
                    error = %self,
                    "Configuration error"
                );
            }
            _ => {
                error!(
                    error_id = ?self.error_id(),
                    error = %self,
                    "Error occurred"
                );
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! storage_error {
    ($msg:expr, $component:expr) => {
        $crate::CatalogError::Storage {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component),
        }
    };
    ($msg:expr, $component:expr, $source:expr) => {
        $crate::CatalogError::Storage {
            message: $msg.to_string(),
            source: Some(Box::new($source)),
            context: $crate::ErrorContext::new($component),
        }
    };
}

#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        $crate::CatalogError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your configuration file and environment"),
        }
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        $crate::CatalogError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check the field value and format"),
        }
    };
}

#[macro_export]
macro_rules! not_found_error {
    ($resource:expr, $component:expr) => {
        $crate::CatalogError::NotFound {
            resource: $resource.to_string(),
            context: $crate::ErrorContext::new($component),
        }
    };
}

#[macro_export]
macro_rules! already_exists_error {
    ($resource:expr, $component:expr) => {
        $crate::CatalogError::AlreadyExists {
            resource: $resource.to_string(),
            context: $crate::ErrorContext::new($component),
        }
    };
}
