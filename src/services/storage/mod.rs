//! Inventory record storage.
//!
//! Both backends implement [`InventoryStore`]; which one serves requests is
//! decided once at startup from `storage.backend`.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::inventory::{InventoryChanges, InventoryItem, NewInventoryItem};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("storage corrupted: {0}")]
    Corrupted(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// CRUD capability over inventory records.
///
/// Lookups by an unknown id return `Ok(None)`; `Err` is reserved for the
/// backend itself failing.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Store a new item under a fresh id. When the item carries a photo the
    /// `photo_url` is derived from that id before anyone can read the record.
    async fn insert(&self, item: NewInventoryItem) -> StorageResult<InventoryItem>;

    async fn list(&self) -> StorageResult<Vec<InventoryItem>>;

    async fn get_by_id(&self, id: i64) -> StorageResult<Option<InventoryItem>>;

    /// Overwrite the non-empty fields of `changes`.
    async fn update(&self, id: i64, changes: InventoryChanges) -> StorageResult<Option<InventoryItem>>;

    /// Replace both photo fields in one step, returning the record as it was
    /// just before the write so the caller knows which file it displaced.
    async fn update_photo(
        &self,
        id: i64,
        filename: String,
        url: String,
    ) -> StorageResult<Option<InventoryItem>>;

    /// Remove the record, returning what was removed.
    async fn delete(&self, id: i64) -> StorageResult<Option<InventoryItem>>;
}
