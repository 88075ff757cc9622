use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single tracked inventory item.
///
/// `photo_filename` and `photo_url` are always set or cleared together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct InventoryItem {
    pub id: i64,
    pub inventory_name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Fields supplied when registering a new item; the store assigns the id.
#[derive(Debug, Clone, Default)]
pub struct NewInventoryItem {
    pub inventory_name: String,
    pub description: String,
    pub photo_filename: Option<String>,
}

impl NewInventoryItem {
    pub fn new(inventory_name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            inventory_name: inventory_name.into(),
            description: description.unwrap_or_default(),
            photo_filename: None,
        }
    }

    pub fn with_photo(mut self, filename: impl Into<String>) -> Self {
        self.photo_filename = Some(filename.into());
        self
    }
}

/// Partial update of the descriptive fields.
///
/// An empty string counts as "not provided", same as `None`.
#[derive(Debug, Clone, Default)]
pub struct InventoryChanges {
    pub inventory_name: Option<String>,
    pub description: Option<String>,
}

impl InventoryChanges {
    pub fn new(inventory_name: Option<String>, description: Option<String>) -> Self {
        Self {
            inventory_name: inventory_name.filter(|s| !s.is_empty()),
            description: description.filter(|s| !s.is_empty()),
        }
    }

    pub fn apply_to(&self, item: &mut InventoryItem) {
        if let Some(name) = &self.inventory_name {
            item.inventory_name = name.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
    }
}

/// Builds the public URL of an item's photo endpoint.
#[derive(Debug, Clone)]
pub struct PhotoLinks {
    base_url: String,
}

impl PhotoLinks {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn photo_url(&self, id: i64) -> String {
        format!("{}/inventory/{}/photo", self.base_url, id)
    }
}
