use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Application configuration structure
///
/// Sections:
/// - ServerConfig: bind address and public URL
/// - StorageConfig: which backend holds inventory records
/// - PhotoConfig: where uploaded photos live on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub photos: PhotoConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base URL used when deriving `photo_url`. Falls back to `http://host:port`.
    pub public_url: Option<String>,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoConfig {
    pub dir: String,
    /// Prefix placed in front of every generated photo file name.
    pub field_tag: String,
    /// URL prefix under which the photo directory is served as-is.
    pub public_prefix: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "localhost".to_string(),
                port: 8080,
                public_url: None,
                max_body_bytes: 25 * 1024 * 1024,
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                database_url: "sqlite://inventory.db".to_string(),
                max_connections: 5,
            },
            photos: PhotoConfig {
                dir: "uploads".to_string(),
                field_tag: "photo".to_string(),
                public_prefix: "/uploads".to_string(),
            },
        }
    }
}

/// Values given on the command line; they win over every other source.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<StorageBackend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_dir: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_with(CliOverrides::default())
    }

    pub fn load_with(overrides: CliOverrides) -> Result<Self> {
        info!("Loading application configuration...");

        let mut figment = Figment::new()
            // Start with default values
            .merge(Serialized::defaults(Self::default()))
            // Override with config file if present
            .merge(Yaml::file("config.yaml"))
            // Override with environment variables, e.g. APP_SERVER__PORT
            .merge(Env::prefixed("APP_").split("__"));

        if let Some(host) = overrides.host {
            figment = figment.merge(("server.host", host));
        }
        if let Some(port) = overrides.port {
            figment = figment.merge(("server.port", port));
        }
        if let Some(backend) = overrides.backend {
            figment = figment.merge(("storage.backend", backend));
        }
        if let Some(url) = overrides.database_url {
            figment = figment.merge(("storage.database_url", url));
        }
        if let Some(dir) = overrides.photo_dir {
            figment = figment.merge(("photos.dir", dir));
        }

        let config: AppConfig = figment.extract()?;

        info!("Configuration loaded successfully");
        info!("Bind address: {}:{}", config.server.host, config.server.port);
        info!("Storage backend: {:?}", config.storage.backend);
        info!("Photo directory: {}", config.photos.dir);

        Ok(config)
    }

    /// Base URL that prefixes every derived `photo_url`.
    pub fn public_url(&self) -> String {
        match &self.server.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.server.host, self.server.port),
        }
    }
}
