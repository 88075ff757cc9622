use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};

use crate::{
    dto::inventory::{
        ErrorResponse, MessageResponse, PhotoUploadForm, RegisterForm, RegisterResponse, SearchForm,
        UpdateInventoryRequest,
    },
    error::{AppError, AppResult},
    extract::FormPayload,
    models::inventory::InventoryItem,
    AppState,
};

/// Numeric path id. Anything unparseable, and 0, counts as "no such item".
fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id != 0)
}

fn path_id(raw: &str) -> AppResult<i64> {
    parse_id(raw).ok_or_else(AppError::item_not_found)
}

#[utoipa::path(
    post,
    path = "/register",
    tag = "inventory",
    request_body(content = RegisterForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Inventory item registered", body = RegisterResponse),
        (status = 400, description = "inventory_name missing", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    mut form: FormPayload,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let inventory_name = form
        .non_empty("inventory_name")
        .ok_or_else(|| AppError::BadRequest("inventory_name is required".to_string()))?;
    let description = form.text("description").map(str::to_string);
    let photo = form.take_file("photo");

    let item = state.inventory.register(inventory_name, description, photo).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Inventory item registered successfully".to_string(),
            id: item.id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/inventory",
    tag = "inventory",
    responses(
        (status = 200, description = "All inventory items", body = [InventoryItem]),
        (status = 404, description = "Inventory is empty", body = ErrorResponse)
    )
)]
pub async fn list_inventory(State(state): State<AppState>) -> AppResult<Json<Vec<InventoryItem>>> {
    let items = state.inventory.list().await?;
    if items.is_empty() {
        return Err(AppError::NotFound("No inventory items found".to_string()));
    }
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/inventory/{id}",
    tag = "inventory",
    params(("id" = i64, Path, description = "Inventory item id")),
    responses(
        (status = 200, description = "Inventory item", body = InventoryItem),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
pub async fn get_inventory(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<InventoryItem>> {
    let id = path_id(&id)?;
    Ok(Json(state.inventory.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/inventory/{id}",
    tag = "inventory",
    params(("id" = i64, Path, description = "Inventory item id")),
    request_body = UpdateInventoryRequest,
    responses(
        (status = 200, description = "Item updated", body = MessageResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
pub async fn update_inventory(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: FormPayload,
) -> AppResult<Json<MessageResponse>> {
    let id = path_id(&id)?;
    let request: UpdateInventoryRequest = form.parse()?;

    state.inventory.update(id, request.into()).await?;
    Ok(Json(MessageResponse::new("Inventory item updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/inventory/{id}",
    tag = "inventory",
    params(("id" = i64, Path, description = "Inventory item id")),
    responses(
        (status = 200, description = "Item deleted", body = MessageResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
pub async fn delete_inventory(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = path_id(&id)?;
    state.inventory.delete(id).await?;
    Ok(Json(MessageResponse::new("Inventory item deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/inventory/{id}/photo",
    tag = "inventory",
    params(("id" = i64, Path, description = "Inventory item id")),
    responses(
        (status = 200, description = "Photo bytes", body = String, content_type = "image/jpeg"),
        (status = 404, description = "Item or photo not found", body = ErrorResponse)
    )
)]
pub async fn get_photo(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let id = path_id(&id)?;
    let bytes = state.inventory.photo(id).await?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response())
}

#[utoipa::path(
    put,
    path = "/inventory/{id}/photo",
    tag = "inventory",
    params(("id" = i64, Path, description = "Inventory item id")),
    request_body(content = PhotoUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Photo replaced", body = MessageResponse),
        (status = 400, description = "No photo supplied", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
pub async fn update_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut form: FormPayload,
) -> AppResult<Json<MessageResponse>> {
    let id = path_id(&id)?;
    state.inventory.replace_photo(id, form.take_file("photo")).await?;
    Ok(Json(MessageResponse::new("Photo updated successfully")))
}

#[utoipa::path(
    post,
    path = "/search",
    tag = "inventory",
    request_body(content = SearchForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Matching item", body = InventoryItem),
        (status = 400, description = "id missing or invalid", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
pub async fn search(State(state): State<AppState>, form: FormPayload) -> AppResult<Json<InventoryItem>> {
    let search: SearchForm = form.parse()?;

    let id = search
        .id
        .as_deref()
        .and_then(parse_id)
        .ok_or_else(|| AppError::BadRequest("id is required".to_string()))?;

    Ok(Json(state.inventory.search(id, search.wants_photo()).await?))
}

#[cfg(test)]
mod tests {
    use super::parse_id;

    #[test]
    fn parse_id_treats_zero_and_garbage_as_absent() {
        assert_eq!(parse_id("12"), Some(12));
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id(""), None);
    }
}
