use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    extract::UploadedFile,
    models::inventory::{InventoryChanges, InventoryItem, NewInventoryItem, PhotoLinks},
    services::{photo::PhotoStore, storage::InventoryStore},
};

/// Coordinates record storage with the photo directory.
///
/// Photo files are written before the record that names them and removed
/// after the record stops naming them. Removal is fire-and-forget.
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn InventoryStore>,
    photos: Arc<PhotoStore>,
    links: PhotoLinks,
}

impl InventoryService {
    pub fn new(store: Arc<dyn InventoryStore>, photos: Arc<PhotoStore>, links: PhotoLinks) -> Self {
        Self { store, photos, links }
    }

    pub fn photos(&self) -> &PhotoStore {
        &self.photos
    }

    pub async fn register(
        &self,
        inventory_name: String,
        description: Option<String>,
        photo: Option<UploadedFile>,
    ) -> AppResult<InventoryItem> {
        let mut new_item = NewInventoryItem::new(inventory_name, description);

        if let Some(photo) = &photo {
            let filename = self.photos.save(photo.file_name.as_deref(), &photo.data).await?;
            new_item = new_item.with_photo(filename);
        }

        let saved_photo = new_item.photo_filename.clone();
        match self.store.insert(new_item).await {
            Ok(item) => {
                tracing::info!("Registered inventory item {} ({})", item.id, item.inventory_name);
                Ok(item)
            }
            Err(e) => {
                if let Some(filename) = saved_photo {
                    self.photos.discard(filename);
                }
                Err(e.into())
            }
        }
    }

    pub async fn list(&self) -> AppResult<Vec<InventoryItem>> {
        Ok(self.store.list().await?)
    }

    pub async fn get(&self, id: i64) -> AppResult<InventoryItem> {
        self.store.get_by_id(id).await?.ok_or_else(AppError::item_not_found)
    }

    pub async fn update(&self, id: i64, changes: InventoryChanges) -> AppResult<InventoryItem> {
        let item = self
            .store
            .update(id, changes)
            .await?
            .ok_or_else(AppError::item_not_found)?;

        tracing::info!("Updated inventory item {}", id);
        Ok(item)
    }

    pub async fn delete(&self, id: i64) -> AppResult<InventoryItem> {
        let item = self.store.delete(id).await?.ok_or_else(AppError::item_not_found)?;

        if let Some(filename) = &item.photo_filename {
            self.photos.discard(filename.clone());
        }

        tracing::info!("Deleted inventory item {}", id);
        Ok(item)
    }

    /// Bytes of the item's current photo.
    pub async fn photo(&self, id: i64) -> AppResult<Vec<u8>> {
        let item = self.get(id).await?;
        let filename = item.photo_filename.ok_or_else(Self::photo_not_found)?;

        match self.photos.read(&filename).await? {
            Some(bytes) => Ok(bytes),
            None => {
                tracing::warn!("Photo {} of item {} is missing on disk", filename, id);
                Err(Self::photo_not_found())
            }
        }
    }

    pub async fn replace_photo(&self, id: i64, photo: Option<UploadedFile>) -> AppResult<InventoryItem> {
        self.get(id).await?;
        let photo = photo.ok_or_else(|| AppError::BadRequest("Photo file is required".to_string()))?;

        let filename = self.photos.save(photo.file_name.as_deref(), &photo.data).await?;
        let url = self.links.photo_url(id);
        let previous = match self.store.update_photo(id, filename.clone(), url.clone()).await {
            Ok(Some(item)) => item,
            Ok(None) => {
                self.photos.discard(filename);
                return Err(AppError::item_not_found());
            }
            Err(e) => {
                self.photos.discard(filename);
                return Err(e.into());
            }
        };

        let mut updated = previous.clone();
        updated.photo_filename = Some(filename);
        updated.photo_url = Some(url);

        // Only the file this write displaced is ours to remove.
        if let Some(old) = previous.photo_filename {
            self.photos.discard(old);
        }

        tracing::info!("Replaced photo of inventory item {}", id);
        Ok(updated)
    }

    /// Look an item up for `POST /search`. With `include_photo` the photo URL
    /// is appended to the returned description; the stored record is untouched.
    pub async fn search(&self, id: i64, include_photo: bool) -> AppResult<InventoryItem> {
        let mut item = self.get(id).await?;

        if include_photo {
            if let Some(url) = &item.photo_url {
                item.description = format!("{} {}", item.description, url);
            }
        }

        Ok(item)
    }

    fn photo_not_found() -> AppError {
        AppError::NotFound("Photo not found".to_string())
    }
}
