pub mod inventory;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use utoipa::OpenApi;

use crate::{
    dto::inventory::{
        ErrorResponse, MessageResponse, PhotoUploadForm, RegisterForm, RegisterResponse, SearchForm,
        UpdateInventoryRequest,
    },
    error::AppError,
    models::inventory::InventoryItem,
};

/// Inventory API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        inventory::register,
        inventory::list_inventory,
        inventory::get_inventory,
        inventory::update_inventory,
        inventory::delete_inventory,
        inventory::get_photo,
        inventory::update_photo,
        inventory::search,
    ),
    components(schemas(
        InventoryItem,
        RegisterForm,
        RegisterResponse,
        UpdateInventoryRequest,
        PhotoUploadForm,
        SearchForm,
        MessageResponse,
        ErrorResponse
    )),
    tags(
        (name = "inventory", description = "Inventory item management")
    ),
    info(
        title = "Inventory API",
        version = "1.0.0",
        description = "Register, look up and photograph inventory items"
    )
)]
pub struct ApiDoc;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Catch-all for unknown paths and unsupported methods.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Give bodiless 405s produced outside our handlers the usual JSON error body.
pub async fn json_method_not_allowed(response: Response) -> Response {
    if response.status() == StatusCode::METHOD_NOT_ALLOWED
        && !response.headers().contains_key(header::CONTENT_TYPE)
    {
        return AppError::MethodNotAllowed.into_response();
    }
    response
}
