//! In-memory store for development and tests

use async_trait::async_trait;
use catalog_core::{
    already_exists_error, normalize_email, not_found_error, Account, AccountStore, CatalogResult,
    Item, ItemStore,
};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<Uuid, Account>,
    /// normalized email -> account id
    emails: HashMap<String, Uuid>,
    items: HashMap<Uuid, Item>,
}

/// Process-local store; contents vanish on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create(&self, account: &Account) -> CatalogResult<()> {
        let key = normalize_email(&account.email);
        let mut tables = self.tables.write().await;

        if tables.emails.contains_key(&key) {
            return Err(already_exists_error!(
                format!("account {}", account.email),
                "memory_store"
            ));
        }

        tables.emails.insert(key, account.id);
        tables.accounts.insert(account.id, account.clone());
        debug!(account_id = %account.id, "Account stored in memory");
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> CatalogResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables
            .emails
            .get(&normalize_email(email))
            .and_then(|id| tables.accounts.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> CatalogResult<Option<Account>> {
        Ok(self.tables.read().await.accounts.get(&id).cloned())
    }

    async fn list(&self) -> CatalogResult<Vec<Account>> {
        let mut accounts: Vec<Account> =
            self.tables.read().await.accounts.values().cloned().collect();
        accounts.sort_by_key(|a| a.created_at);
        Ok(accounts)
    }

    async fn ping(&self) -> CatalogResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn create(&self, item: &Item) -> CatalogResult<()> {
        let mut tables = self.tables.write().await;
        if tables.items.contains_key(&item.id) {
            return Err(already_exists_error!(
                format!("item {}", item.id),
                "memory_store"
            ));
        }
        tables.items.insert(item.id, item.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> CatalogResult<Option<Item>> {
        Ok(self.tables.read().await.items.get(&id).cloned())
    }

    async fn update(&self, item: &Item) -> CatalogResult<()> {
        let mut tables = self.tables.write().await;
        match tables.items.get_mut(&item.id) {
            Some(existing) => {
                *existing = item.clone();
                Ok(())
            }
            None => Err(not_found_error!("Item", "memory_store")),
        }
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<()> {
        self.tables
            .write()
            .await
            .items
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found_error!("Item", "memory_store"))
    }

    async fn list(&self) -> CatalogResult<Vec<Item>> {
        let mut items: Vec<Item> = self.tables.read().await.items.values().cloned().collect();
        items.sort_by_key(|i| i.created_at);
        Ok(items)
    }
}
