//! Catalog item operations with ownership checks

use crate::{
    auth::{authorize_owner, RequestIdentity},
    error::ApiError,
};
use catalog_core::{log_operation_error, not_found_error, Item, ItemInput, ItemStore};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct ItemService {
    items: Arc<dyn ItemStore>,
}

impl ItemService {
    pub fn new(items: Arc<dyn ItemStore>) -> Self {
        Self { items }
    }

    /// Create an item owned by the caller
    pub async fn create(&self, owner: &RequestIdentity, input: ItemInput) -> Result<Item, ApiError> {
        input.validate()?;
        let item = Item::new(input, owner.subject);
        self.items.create(&item).await?;
        info!(item_id = %item.id, owner = %item.owner_id, "Item created");
        Ok(item)
    }

    pub async fn get(&self, id: Uuid) -> Result<Item, ApiError> {
        Ok(self.load(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<Item>, ApiError> {
        Ok(self.items.list().await?)
    }

    /// Replace an item's fields; owner or admin only
    pub async fn update(
        &self,
        identity: &RequestIdentity,
        id: Uuid,
        input: ItemInput,
    ) -> Result<Item, ApiError> {
        input.validate()?;
        let mut item = self.load(id).await?;
        authorize_owner(identity, item.owner_id)?;

        item.apply(input);
        self.items.update(&item).await.inspect_err(|e| {
            log_operation_error!("update_item", e, item_id = %id);
        })?;

        info!(item_id = %id, by = %identity.subject, "Item updated");
        Ok(item)
    }

    /// Remove an item; owner or admin only
    pub async fn delete(&self, identity: &RequestIdentity, id: Uuid) -> Result<(), ApiError> {
        let item = self.load(id).await?;
        authorize_owner(identity, item.owner_id)?;

        self.items.delete(id).await.inspect_err(|e| {
            log_operation_error!("delete_item", e, item_id = %id);
        })?;

        info!(item_id = %id, by = %identity.subject, "Item deleted");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> catalog_core::CatalogResult<Item> {
        self.items
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error!("Item", "items"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use catalog_core::Role;

    fn input(name: &str) -> ItemInput {
        ItemInput {
            name: name.to_string(),
            description: "test".to_string(),
            price: 9.5,
            stock: 4,
        }
    }

    fn service() -> ItemService {
        ItemService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn owner_can_update_and_stranger_cannot() {
        let service = service();
        let owner = RequestIdentity::new(Uuid::new_v4(), Role::User);
        let stranger = RequestIdentity::new(Uuid::new_v4(), Role::User);

        let item = service.create(&owner, input("Lamp")).await.unwrap();
        assert_eq!(item.owner_id, owner.subject);

        let denied = service.update(&stranger, item.id, input("Stolen lamp")).await;
        assert!(matches!(denied, Err(ApiError::Forbidden(_))));

        let updated = service.update(&owner, item.id, input("Desk lamp")).await.unwrap();
        assert_eq!(updated.name, "Desk lamp");
        assert_eq!(updated.owner_id, owner.subject);
    }

    #[tokio::test]
    async fn admin_can_delete_any_item() {
        let service = service();
        let owner = RequestIdentity::new(Uuid::new_v4(), Role::User);
        let admin = RequestIdentity::new(Uuid::new_v4(), Role::Admin);

        let item = service.create(&owner, input("Chair")).await.unwrap();
        service.delete(&admin, item.id).await.unwrap();

        assert!(matches!(service.get(item.id).await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn missing_item_is_not_found_before_ownership() {
        let service = service();
        let caller = RequestIdentity::new(Uuid::new_v4(), Role::User);

        let result = service.delete(&caller, Uuid::new_v4()).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn invalid_input_is_rejected() {
        let service = service();
        let owner = RequestIdentity::new(Uuid::new_v4(), Role::User);
        let mut bad = input("Ok name");
        bad.price = -1.0;

        assert!(matches!(
            service.create(&owner, bad).await,
            Err(ApiError::Validation(_))
        ));
        assert!(service.list().await.unwrap().is_empty());
    }
}
