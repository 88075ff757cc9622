use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::inventory::InventoryChanges;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub id: i64,
}

/// Multipart body of `POST /register`.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct RegisterForm {
    pub inventory_name: String,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub photo: Option<Vec<u8>>,
}

/// Body of `PUT /inventory/{id}`, as JSON or form fields.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateInventoryRequest {
    pub inventory_name: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateInventoryRequest> for InventoryChanges {
    fn from(request: UpdateInventoryRequest) -> Self {
        InventoryChanges::new(request.inventory_name, request.description)
    }
}

/// Multipart body of `PUT /inventory/{id}/photo`.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct PhotoUploadForm {
    #[schema(value_type = String, format = Binary)]
    pub photo: Vec<u8>,
}

/// Form body of `POST /search`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SearchForm {
    pub id: Option<String>,
    /// Only the literal `"on"` appends the photo URL to the description.
    #[serde(rename = "includePhoto")]
    pub include_photo: Option<String>,
}

impl SearchForm {
    pub fn wants_photo(&self) -> bool {
        self.include_photo.as_deref() == Some("on")
    }
}
