use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    dto::inventory::ErrorResponse,
    services::{photo::PhotoError, storage::StorageError},
};

/// Failure of an API request, rendered as `{ "error": "..." }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Photo(#[from] PhotoError),
}

impl AppError {
    pub fn item_not_found() -> Self {
        Self::NotFound("Inventory item not found".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Storage(_) | Self::Photo(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Storage(e) => {
                tracing::error!("Storage failure: {}", e);
                "Storage failure".to_string()
            }
            Self::Photo(e) => {
                tracing::error!("Photo store failure: {}", e);
                "Photo store failure".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
