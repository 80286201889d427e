//! Catalog Core - domain types, storage capabilities and shared infrastructure
//!
//! This crate holds everything the HTTP service builds on that does not depend on
//! the transport: accounts, roles and items, the store traits, the unified error
//! type, configuration and logging set-up.

pub mod config;
pub mod error;
pub mod logging;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use traits::*;
pub use types::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tracing;
