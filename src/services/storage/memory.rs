use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{InventoryStore, StorageError, StorageResult};
use crate::models::inventory::{InventoryChanges, InventoryItem, NewInventoryItem, PhotoLinks};

/// Process-local store. Contents and the id counter vanish on restart.
pub struct MemoryStore {
    links: PhotoLinks,
    inner: RwLock<Inner>,
}

struct Inner {
    items: Vec<InventoryItem>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new(links: PhotoLinks) -> Self {
        Self {
            links,
            inner: RwLock::new(Inner {
                items: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Inner {
    fn find_mut(&mut self, id: i64) -> Option<&mut InventoryItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn insert(&self, item: NewInventoryItem) -> StorageResult<InventoryItem> {
        let mut inner = self.inner.write().await;

        let id = inner.next_id;
        inner.next_id = id
            .checked_add(1)
            .ok_or_else(|| StorageError::Corrupted("id counter exhausted".to_string()))?;

        let photo_url = item.photo_filename.as_ref().map(|_| self.links.photo_url(id));
        let record = InventoryItem {
            id,
            inventory_name: item.inventory_name,
            description: item.description,
            photo_filename: item.photo_filename,
            photo_url,
        };
        inner.items.push(record.clone());

        tracing::debug!("Inserted inventory item {} into memory store", id);
        Ok(record)
    }

    async fn list(&self) -> StorageResult<Vec<InventoryItem>> {
        Ok(self.inner.read().await.items.clone())
    }

    async fn get_by_id(&self, id: i64) -> StorageResult<Option<InventoryItem>> {
        let inner = self.inner.read().await;
        Ok(inner.items.iter().find(|item| item.id == id).cloned())
    }

    async fn update(&self, id: i64, changes: InventoryChanges) -> StorageResult<Option<InventoryItem>> {
        let mut inner = self.inner.write().await;
        Ok(inner.find_mut(id).map(|item| {
            changes.apply_to(item);
            item.clone()
        }))
    }

    async fn update_photo(
        &self,
        id: i64,
        filename: String,
        url: String,
    ) -> StorageResult<Option<InventoryItem>> {
        let mut inner = self.inner.write().await;
        Ok(inner.find_mut(id).map(|item| {
            let previous = item.clone();
            item.photo_filename = Some(filename);
            item.photo_url = Some(url);
            previous
        }))
    }

    async fn delete(&self, id: i64) -> StorageResult<Option<InventoryItem>> {
        let mut inner = self.inner.write().await;
        let position = inner.items.iter().position(|item| item.id == id);
        Ok(position.map(|index| inner.items.remove(index)))
    }
}
