use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{InventoryStore, StorageResult};
use crate::models::inventory::{InventoryChanges, InventoryItem, NewInventoryItem, PhotoLinks};
use crate::services::database::Database;

const COLUMNS: &str =
    "id, inventory_name, COALESCE(description, '') AS description, photo_filename, photo_url";

/// Store backed by the `inventory` table.
pub struct SqliteStore {
    pool: SqlitePool,
    links: PhotoLinks,
}

impl SqliteStore {
    pub fn new(db: Database, links: PhotoLinks) -> Self {
        Self { pool: db.pool, links }
    }
}

#[async_trait]
impl InventoryStore for SqliteStore {
    async fn insert(&self, item: NewInventoryItem) -> StorageResult<InventoryItem> {
        // The URL needs the generated id, so both writes share one transaction.
        let mut tx = self.pool.begin().await?;

        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO inventory (inventory_name, description, photo_filename) \
             VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&item.inventory_name)
        .bind(&item.description)
        .bind(&item.photo_filename)
        .fetch_one(&mut *tx)
        .await?;

        let photo_url = item.photo_filename.as_ref().map(|_| self.links.photo_url(id));
        if let Some(url) = &photo_url {
            sqlx::query("UPDATE inventory SET photo_url = ? WHERE id = ?")
                .bind(url)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::debug!("Inserted inventory item {} into sqlite store", id);

        Ok(InventoryItem {
            id,
            inventory_name: item.inventory_name,
            description: item.description,
            photo_filename: item.photo_filename,
            photo_url,
        })
    }

    async fn list(&self) -> StorageResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {COLUMNS} FROM inventory ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn get_by_id(&self, id: i64) -> StorageResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {COLUMNS} FROM inventory WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn update(&self, id: i64, changes: InventoryChanges) -> StorageResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            "UPDATE inventory SET \
                inventory_name = COALESCE(?, inventory_name), \
                description = COALESCE(?, description) \
             WHERE id = ? RETURNING {COLUMNS}"
        ))
        .bind(changes.inventory_name)
        .bind(changes.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn update_photo(
        &self,
        id: i64,
        filename: String,
        url: String,
    ) -> StorageResult<Option<InventoryItem>> {
        // Compare-and-swap on the filename just read, so concurrent swaps each
        // see the file they actually displaced.
        loop {
            let Some(previous) = self.get_by_id(id).await? else {
                return Ok(None);
            };

            let swapped = sqlx::query(
                "UPDATE inventory SET photo_filename = ?, photo_url = ? \
                 WHERE id = ? AND photo_filename IS ?",
            )
            .bind(&filename)
            .bind(&url)
            .bind(id)
            .bind(&previous.photo_filename)
            .execute(&self.pool)
            .await?;

            if swapped.rows_affected() > 0 {
                return Ok(Some(previous));
            }
            tracing::debug!("Photo of inventory item {} changed concurrently, retrying", id);
        }
    }

    async fn delete(&self, id: i64) -> StorageResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            "DELETE FROM inventory WHERE id = ? RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }
}
