pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, get_service, post, put, MethodRouter},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::AppConfig;
pub use error::AppError;
pub use services::inventory::InventoryService;

use crate::{
    config::StorageBackend,
    handlers::{inventory, method_not_allowed, ApiDoc},
    models::inventory::PhotoLinks,
    services::{
        database::Database,
        photo::PhotoStore,
        storage::{InventoryStore, MemoryStore, SqliteStore},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub inventory: InventoryService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Open the photo directory and the configured storage backend.
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let photos = Arc::new(PhotoStore::open(&config.photos.dir, config.photos.field_tag.clone())?);
        let links = PhotoLinks::new(config.public_url());

        let store: Arc<dyn InventoryStore> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStore::new(links.clone())),
            StorageBackend::Sqlite => {
                let db = Database::new(&config.storage.database_url, config.storage.max_connections).await?;
                Arc::new(SqliteStore::new(db, links.clone()))
            }
        };

        Ok(Self::new(config, store, photos, links))
    }

    pub fn new(
        config: AppConfig,
        store: Arc<dyn InventoryStore>,
        photos: Arc<PhotoStore>,
        links: PhotoLinks,
    ) -> Self {
        Self {
            inventory: InventoryService::new(store, photos, links),
            config: Arc::new(config),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/register", post(inventory::register).fallback(method_not_allowed))
        .route("/inventory", get(inventory::list_inventory).fallback(method_not_allowed))
        .route(
            "/inventory/:id",
            get(inventory::get_inventory)
                .put(inventory::update_inventory)
                .delete(inventory::delete_inventory)
                .fallback(method_not_allowed),
        )
        .route(
            "/inventory/:id/photo",
            get(inventory::get_photo)
                .put(inventory::update_photo)
                .fallback(method_not_allowed),
        )
        .route("/search", post(inventory::search).fallback(method_not_allowed))
        .route("/health", get(handlers::health).fallback(method_not_allowed));

    // Uploaded photos, served straight from disk (GET/HEAD only)
    let serve_photos: MethodRouter =
        get_service(ServeDir::new(state.inventory.photos().root())).fallback(method_not_allowed);
    let photo_routes = Router::new().nest_service(&state.config.photos.public_prefix, serve_photos);

    // API Documentation - Swagger UI; its own 405s carry no body
    let api_docs_routes = Router::new()
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::map_response(handlers::json_method_not_allowed));

    let body_limit = state.config.server.max_body_bytes;

    Router::new()
        .merge(api_routes)
        .merge(photo_routes)
        .merge(api_docs_routes)
        .fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
