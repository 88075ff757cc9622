mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{setup_test_app, test_config, TestApp};
use inventory_service::{
    config::StorageBackend,
    create_router,
    models::inventory::{InventoryChanges, InventoryItem, NewInventoryItem, PhotoLinks},
    services::{
        photo::PhotoStore,
        storage::{InventoryStore, StorageError, StorageResult},
    },
    AppState,
};

/// A backend whose every call fails, like a database that went away.
struct BrokenStore;

#[async_trait]
impl InventoryStore for BrokenStore {
    async fn insert(&self, _item: NewInventoryItem) -> StorageResult<InventoryItem> {
        Err(broken())
    }

    async fn list(&self) -> StorageResult<Vec<InventoryItem>> {
        Err(broken())
    }

    async fn get_by_id(&self, _id: i64) -> StorageResult<Option<InventoryItem>> {
        Err(broken())
    }

    async fn update(&self, _id: i64, _changes: InventoryChanges) -> StorageResult<Option<InventoryItem>> {
        Err(broken())
    }

    async fn update_photo(
        &self,
        _id: i64,
        _filename: String,
        _url: String,
    ) -> StorageResult<Option<InventoryItem>> {
        Err(broken())
    }

    async fn delete(&self, _id: i64) -> StorageResult<Option<InventoryItem>> {
        Err(broken())
    }
}

fn broken() -> StorageError {
    StorageError::Corrupted("backend offline".to_string())
}

fn broken_app() -> TestApp {
    let photo_dir = tempfile::tempdir().unwrap();
    let config = test_config(StorageBackend::Memory, &photo_dir);
    let photos = Arc::new(PhotoStore::open(&config.photos.dir, "photo").unwrap());
    let state = AppState::new(
        config,
        Arc::new(BrokenStore),
        photos,
        PhotoLinks::new("http://localhost:8080"),
    );

    TestApp {
        router: create_router(state.clone()),
        state,
        photo_dir,
    }
}

#[tokio::test]
async fn storage_failures_are_500() {
    let app = broken_app();

    let list = app.get("/inventory").await;
    assert_eq!(list.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(list.json(), json!({ "error": "Storage failure" }));

    assert_eq!(
        app.get("/inventory/1").await.status,
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        app.delete("/inventory/1").await.status,
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn failed_register_cleans_up_photo() {
    let app = broken_app();

    let response = app
        .send_multipart(
            Method::POST,
            "/register",
            &[("inventory_name", "Camera")],
            Some(("photo", "c.jpg", b"bytes".as_slice())),
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);

    for _ in 0..100 {
        if app.photo_files().is_empty() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("orphaned photo was not removed: {:?}", app.photo_files());
}

#[tokio::test]
async fn unknown_routes_are_405() {
    let app = setup_test_app(StorageBackend::Memory).await;

    let response = app.get("/nope").await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.json(), json!({ "error": "Method not allowed" }));
}

#[tokio::test]
async fn unsupported_methods_are_405() {
    let app = setup_test_app(StorageBackend::Memory).await;

    let get_register = app.get("/register").await;
    assert_eq!(get_register.status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(get_register.json()["error"].is_string());

    let post_item = app.send_json(Method::POST, "/inventory/1", json!({})).await;
    assert_eq!(post_item.status, StatusCode::METHOD_NOT_ALLOWED);

    let delete_search = app.delete("/search").await;
    assert_eq!(delete_search.status, StatusCode::METHOD_NOT_ALLOWED);

    let post_health = app.send_json(Method::POST, "/health", json!({})).await;
    assert_eq!(post_health.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(post_health.json(), json!({ "error": "Method not allowed" }));
}

#[tokio::test]
async fn static_and_docs_routes_reject_writes_with_json() {
    let app = setup_test_app(StorageBackend::Memory).await;
    let id = app.register("Camera", None, Some(b"jpeg".as_slice())).await;
    let item = app.get(&format!("/inventory/{}", id)).await.json();
    let photo_uri = format!("/uploads/{}", item["photo_filename"].as_str().unwrap());

    for uri in [photo_uri.as_str(), "/uploads/missing.jpg", "/api-docs/openapi.json"] {
        let response = app.send_json(Method::POST, uri, json!({})).await;
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED, "{}", uri);
        assert_eq!(response.json(), json!({ "error": "Method not allowed" }), "{}", uri);
    }

    let delete_photo = app.delete(&photo_uri).await;
    assert_eq!(delete_photo.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(app.photo_files().len(), 1);

    // Reads still work.
    assert_eq!(app.get(&photo_uri).await.status, StatusCode::OK);
}

#[tokio::test]
async fn openapi_document_lists_endpoints() {
    let app = setup_test_app(StorageBackend::Memory).await;

    let response = app.get("/api-docs/openapi.json").await;
    assert_eq!(response.status, StatusCode::OK);

    let doc = response.json();
    let paths = doc["paths"].as_object().unwrap();
    for path in [
        "/register",
        "/inventory",
        "/inventory/{id}",
        "/inventory/{id}/photo",
        "/search",
    ] {
        assert!(paths.contains_key(path), "missing {}", path);
    }
}

#[tokio::test]
async fn health_probe() {
    let app = setup_test_app(StorageBackend::Memory).await;
    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({ "status": "ok" }));
}

#[tokio::test]
async fn ids_increase_across_deletes() {
    let app = setup_test_app(StorageBackend::Memory).await;
    let first = app.register("A", None, None).await;
    app.delete(&format!("/inventory/{}", first)).await;
    let second = app.register("B", None, None).await;

    assert_eq!(first, 1);
    assert_eq!(second, 2);
}
