//! In-memory item store.
//!
//! Used when no `DATABASE_URL` is configured, and by the route tests.

use super::{StorageError, traits::ItemStore};
use crate::models::{BaseItem, Item};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct Entries {
    next_seq: u64,
    // id -> (insertion sequence, item); the sequence keeps listings stable
    items: HashMap<String, (u64, Item)>,
}

/// Item store backed by a process-local map.
#[derive(Default)]
pub struct MemoryItemStore {
    entries: RwLock<Entries>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with the sample menu.
    pub fn seeded() -> Self {
        let mut entries = Entries::default();
        for (id, base) in sample_menu() {
            let seq = entries.next_seq;
            entries.next_seq += 1;
            entries
                .items
                .insert(id.to_string(), (seq, Item::new(id, base)));
        }
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.items.len()
    }
}

fn sample_menu() -> Vec<(&'static str, BaseItem)> {
    vec![
        (
            "1",
            BaseItem::new(
                "Burger",
                599,
                "Tasty",
                "https://cdn.auth0.com/blog/whatabyte/burger-sm.png",
            ),
        ),
        (
            "2",
            BaseItem::new(
                "Pizza",
                299,
                "Cheesy",
                "https://cdn.auth0.com/blog/whatabyte/pizza-sm.png",
            ),
        ),
        (
            "3",
            BaseItem::new(
                "Tea",
                199,
                "Informative",
                "https://cdn.auth0.com/blog/whatabyte/tea-sm.png",
            ),
        ),
    ]
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn find_all(&self) -> Result<Vec<Item>, StorageError> {
        let entries = self.entries.read().await;
        let mut listed: Vec<&(u64, Item)> = entries.items.values().collect();
        listed.sort_by_key(|(seq, _)| *seq);
        Ok(listed.into_iter().map(|(_, item)| item.clone()).collect())
    }

    async fn find(&self, id: &str) -> Result<Option<Item>, StorageError> {
        let entries = self.entries.read().await;
        Ok(entries.items.get(id).map(|(_, item)| item.clone()))
    }

    async fn create(&self, item: BaseItem, id: Option<String>) -> Result<Item, StorageError> {
        let item = match id {
            Some(id) => Item::new(id, item),
            None => Item::with_generated_id(item),
        };

        let mut entries = self.entries.write().await;
        if entries.items.contains_key(&item.id) {
            return Err(StorageError::Other(format!(
                "item with id {} already exists",
                item.id
            )));
        }
        let seq = entries.next_seq;
        entries.next_seq += 1;
        entries.items.insert(item.id.clone(), (seq, item.clone()));
        debug!("Stored item {}", item.id);
        Ok(item)
    }

    async fn update(&self, id: &str, item: BaseItem) -> Result<Item, StorageError> {
        let mut entries = self.entries.write().await;
        match entries.items.get_mut(id) {
            Some((_, stored)) => {
                stored.base = item;
                Ok(stored.clone())
            }
            None => Err(StorageError::item_not_found(id)),
        }
    }

    async fn upsert(&self, id: &str, item: BaseItem) -> Result<(Item, bool), StorageError> {
        let mut entries = self.entries.write().await;
        if let Some((_, stored)) = entries.items.get_mut(id) {
            stored.base = item;
            return Ok((stored.clone(), false));
        }

        let seq = entries.next_seq;
        entries.next_seq += 1;
        let created = Item::new(id, item);
        entries.items.insert(id.to_string(), (seq, created.clone()));
        debug!("Stored item {} via upsert", id);
        Ok((created, true))
    }

    async fn remove(&self, id: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        if entries.items.remove(id).is_none() {
            debug!("Remove of absent item {} is a no-op", id);
        }
        Ok(())
    }
}
