//! Store backends for accounts and items
//!
//! Both backends implement the capability traits from `catalog_core`; which one
//! is used is decided when [`crate::AppState`] is built.

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
