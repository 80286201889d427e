//! Core trait definitions
//!
//! Storage capabilities consumed by the services. Backends are chosen when the
//! application state is wired and are used through `Arc<dyn ...>`.

use crate::error::CatalogResult;
use crate::types::{Account, Item};
use async_trait::async_trait;
use uuid::Uuid;

/// Account persistence
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account.
    ///
    /// Fails with [`crate::CatalogError::AlreadyExists`] when the email is
    /// already taken, compared case-insensitively.
    async fn create(&self, account: &Account) -> CatalogResult<()>;

    /// Look an account up by email, ignoring case
    async fn find_by_email(&self, email: &str) -> CatalogResult<Option<Account>>;

    async fn find_by_id(&self, id: Uuid) -> CatalogResult<Option<Account>>;

    /// All accounts, oldest first
    async fn list(&self) -> CatalogResult<Vec<Account>>;

    /// Cheap liveness check used by the health endpoint
    async fn ping(&self) -> CatalogResult<()>;
}

/// Catalog item persistence
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn create(&self, item: &Item) -> CatalogResult<()>;

    async fn find_by_id(&self, id: Uuid) -> CatalogResult<Option<Item>>;

    /// Overwrite an existing item; [`crate::CatalogError::NotFound`] when it is gone
    async fn update(&self, item: &Item) -> CatalogResult<()>;

    /// Remove an item; [`crate::CatalogError::NotFound`] when it is gone
    async fn delete(&self, id: Uuid) -> CatalogResult<()>;

    /// All items, oldest first
    async fn list(&self) -> CatalogResult<Vec<Item>>;
}
