//! HTTP request handlers for the catalog service
//!
//! Authentication endpoints live in [`crate::auth::handlers`].

pub mod health;
pub mod items;
pub mod types;

pub use health::*;
pub use items::*;

pub use types::*;
