use anyhow::Result;
use clap::Parser;
use tokio::signal;

use inventory_service::{
    config::{AppConfig, CliOverrides, StorageBackend},
    create_router,
    utils::logging,
    AppState,
};

/// Command line arguments for inventory-service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Hostname/IP to bind the server to.
    #[arg(long, env = "INVENTORY_HOST")]
    host: Option<String>,

    /// Port number to listen on.
    #[arg(short, long, env = "INVENTORY_PORT")]
    port: Option<u16>,

    /// Where inventory records are kept.
    #[arg(long, env = "INVENTORY_STORAGE", value_enum)]
    storage: Option<StorageBackend>,

    /// SQLite URL used by the sqlite backend.
    #[arg(long, env = "INVENTORY_DATABASE_URL")]
    database_url: Option<String>,

    /// Directory holding uploaded photos.
    #[arg(long, env = "INVENTORY_PHOTO_DIR")]
    photo_dir: Option<String>,
}

impl From<Cli> for CliOverrides {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            backend: cli.storage,
            database_url: cli.database_url,
            photo_dir: cli.photo_dir,
        }
    }
}

/// Graceful shutdown signal handler
///
/// Handles shutdown signals gracefully, allowing in-flight requests to complete
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging()?;

    let config = AppConfig::load_with(cli.into())?;
    let host = config.server.host.clone();
    let port = config.server.port;

    let state = AppState::from_config(config).await?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    tracing::info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
