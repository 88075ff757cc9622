use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("failed to prepare photo directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid photo file name: {0}")]
    InvalidName(String),
    #[error("photo i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Directory of uploaded photos, one file per photo.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    root: PathBuf,
    field_tag: String,
}

impl PhotoStore {
    /// Open the store, creating `root` and its parents when missing.
    pub fn open(root: impl AsRef<Path>, field_tag: impl Into<String>) -> Result<Self, PhotoError> {
        let root = root.as_ref();
        std::fs::create_dir_all(root).map_err(|source| PhotoError::CreateDir {
            path: root.to_path_buf(),
            source,
        })?;
        let root = root.canonicalize().map_err(|source| PhotoError::CreateDir {
            path: root.to_path_buf(),
            source,
        })?;

        info!("Photo store ready at {}", root.display());
        Ok(Self {
            root,
            field_tag: field_tag.into(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an uploaded photo under a freshly generated name and return that name.
    pub async fn save(&self, original_name: Option<&str>, data: &[u8]) -> Result<String, PhotoError> {
        let filename = self.generate_name(original_name);
        tokio::fs::write(self.root.join(&filename), data).await?;

        debug!("Saved photo {} ({} bytes)", filename, data.len());
        Ok(filename)
    }

    /// Read a stored photo. A missing file yields `Ok(None)`.
    pub async fn read(&self, filename: &str) -> Result<Option<Vec<u8>>, PhotoError> {
        let path = self.path(filename)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Absolute path of a stored file. Names that could escape the root are refused.
    pub fn path(&self, filename: &str) -> Result<PathBuf, PhotoError> {
        let is_plain = !filename.is_empty()
            && filename != "."
            && filename != ".."
            && !filename.contains(['/', '\\']);
        if !is_plain {
            return Err(PhotoError::InvalidName(filename.to_string()));
        }
        Ok(self.root.join(filename))
    }

    /// Remove a photo in the background.
    ///
    /// The outcome is only logged; the handle lets callers wait if they care.
    pub fn discard(&self, filename: String) -> JoinHandle<()> {
        let path = self.path(&filename);
        tokio::spawn(async move {
            let path = match path {
                Ok(path) => path,
                Err(e) => {
                    warn!("Skipping photo cleanup: {}", e);
                    return;
                }
            };
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!("Deleted photo {}", filename),
                Err(e) => warn!("Failed to delete photo {}: {}", path.display(), e),
            }
        })
    }

    fn generate_name(&self, original_name: Option<&str>) -> String {
        let token = uuid::Uuid::new_v4().simple();
        let extension = original_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()));

        match extension {
            Some(ext) => format!("{}-{}.{}", self.field_tag, token, ext),
            None => format!("{}-{}", self.field_tag, token),
        }
    }
}
