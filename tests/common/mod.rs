#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use inventory_service::{
    config::{AppConfig, StorageBackend},
    create_router, AppState,
};

pub const BOUNDARY: &str = "----inventory-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub photo_dir: TempDir,
}

pub fn test_config(backend: StorageBackend, photo_dir: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.backend = backend;
    config.storage.database_url = "sqlite::memory:".to_string();
    config.storage.max_connections = 1;
    config.photos.dir = photo_dir.path().join("photos").display().to_string();
    config
}

pub async fn setup_test_app(backend: StorageBackend) -> TestApp {
    let photo_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let state = AppState::from_config(test_config(backend, &photo_dir))
        .await
        .expect("Failed to build app state");

    TestApp {
        router: create_router(state.clone()),
        state,
        photo_dir,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse { status, headers, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn send_json(&self, method: Method, uri: &str, body: Value) -> TestResponse {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn send_form(&self, method: Method, uri: &str, body: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn send_multipart(
        &self,
        method: Method,
        uri: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &[u8])>,
    ) -> TestResponse {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(multipart_body(fields, file)))
                .unwrap(),
        )
        .await
    }

    /// Register an item and return its id.
    pub async fn register(&self, name: &str, description: Option<&str>, photo: Option<&[u8]>) -> i64 {
        let mut fields = vec![("inventory_name", name)];
        if let Some(description) = description {
            fields.push(("description", description));
        }
        let file = photo.map(|bytes| ("photo", "item.jpg", bytes));

        let response = self.send_multipart(Method::POST, "/register", &fields, file).await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.json()["id"].as_i64().expect("register returns an id")
    }

    pub fn photo_files(&self) -> Vec<String> {
        std::fs::read_dir(self.state.inventory.photos().root())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect()
    }

    /// Photo deletion runs in the background; poll until it has happened.
    pub async fn wait_until_removed(&self, filename: &str) -> bool {
        let path = self.state.inventory.photos().root().join(filename);
        for _ in 0..100 {
            if !path.exists() {
                return true;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        false
    }
}

/// `(field, file name, bytes)` for the optional file part.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((name, file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/jpeg\r\n\r\n",
                BOUNDARY, name, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
