use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

/// Connection pool wrapper for the SQLite inventory database.
///
/// Creating a `Database` also makes sure the `inventory` table exists, so a
/// fresh file is usable straight away.
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    /// Connect to `database_url` and create the schema if needed.
    ///
    /// # Parameters
    /// - `database_url`: SQLite URL, e.g. `sqlite://inventory.db` or `sqlite::memory:`
    /// - `max_connections`: upper bound on pooled connections
    ///
    /// # Example
    /// ```no_run
    /// # async fn run() -> Result<(), sqlx::Error> {
    /// let db = inventory_service::services::database::Database::new("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        info!("Connecting to SQLite: {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        init_schema(&pool).await?;

        info!("SQLite connection established successfully");

        Ok(Self { pool })
    }
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS inventory (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            inventory_name VARCHAR(255) NOT NULL,
            description TEXT,
            photo_filename VARCHAR(255),
            photo_url VARCHAR(255)
        )"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
