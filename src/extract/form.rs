use std::collections::HashMap;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header,
    Form, Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AppError;

/// A file part of a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub data: Bytes,
}

/// Named text fields and files of a request body, whichever encoding the
/// client picked: multipart, url-encoded form or a flat JSON object.
#[derive(Debug, Default)]
pub struct FormPayload {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormPayload {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Text field with empty values treated as missing.
    pub fn non_empty(&self, name: &str) -> Option<String> {
        self.text(name).filter(|v| !v.is_empty()).map(str::to_string)
    }

    /// Read the text fields into a typed form.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::to_value(&self.fields)
            .and_then(serde_json::from_value)
            .map_err(|e| AppError::BadRequest(format!("Invalid form fields: {}", e)))
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut payload = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to process multipart field: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();

            if let Some(file_name) = field.file_name().map(str::to_string) {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;

                // Browsers send an empty part when no file was picked.
                if data.is_empty() {
                    debug!("Ignoring empty file part '{}'", name);
                    continue;
                }

                let file_name = Some(file_name).filter(|n| !n.is_empty());
                payload.files.insert(name, UploadedFile { file_name, data });
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read field '{}': {}", name, e)))?;
                payload.fields.insert(name, text);
            }
        }

        Ok(payload)
    }

    fn from_json(value: serde_json::Value) -> Result<Self, AppError> {
        let serde_json::Value::Object(object) = value else {
            return Err(AppError::BadRequest("Expected a JSON object".to_string()));
        };

        let mut payload = Self::default();
        for (name, value) in object {
            let text = match value {
                serde_json::Value::Null => continue,
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            payload.fields.insert(name, text);
        }
        Ok(payload)
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(request, state)
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to process multipart request: {}", e)))?;
            Self::from_multipart(multipart).await
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(request, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self {
                fields,
                files: HashMap::new(),
            })
        } else if content_type.starts_with("application/json") {
            let Json(value) = Json::<serde_json::Value>::from_request(request, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Self::from_json(value)
        } else {
            debug!("No form body recognised (content-type: '{}')", content_type);
            Ok(Self::default())
        }
    }
}
