//! Storage trait definitions for the item store backends.

use crate::models::{BaseItem, Item};

/// Data-access interface consumed by the item routes.
#[async_trait::async_trait]
pub trait ItemStore: Send + Sync {
    /// List every stored item
    async fn find_all(&self) -> Result<Vec<Item>, super::StorageError>;

    /// Get item by ID
    async fn find(&self, id: &str) -> Result<Option<Item>, super::StorageError>;

    /// Insert a new item.
    ///
    /// When `id` is `None` the store assigns a fresh identifier.
    async fn create(
        &self,
        item: BaseItem,
        id: Option<String>,
    ) -> Result<Item, super::StorageError>;

    /// Replace the payload of an existing item
    async fn update(&self, id: &str, item: BaseItem) -> Result<Item, super::StorageError>;

    /// Store `item` under `id` in one step: replace the payload if the id
    /// exists, insert it otherwise. The flag is `true` when it was inserted.
    async fn upsert(&self, id: &str, item: BaseItem) -> Result<(Item, bool), super::StorageError>;

    /// Delete an item; succeeds whether or not it existed
    async fn remove(&self, id: &str) -> Result<(), super::StorageError>;
}
