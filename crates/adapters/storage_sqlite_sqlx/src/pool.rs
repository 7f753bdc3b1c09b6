//! `SQLite` pool holding the preference tables.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::StorageError;

/// Pool size used by [`Config::new`].
pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;

const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Where the preferences live and how many connections may reach them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:autoleave.db?mode=rwc`).
    pub database_url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

impl Config {
    /// Pool for the database at `database_url`.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Private in-memory database over a single connection.
    ///
    /// The data lives exactly as long as the returned [`Database`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            database_url: IN_MEMORY_URL.to_string(),
            max_connections: 1,
        }
    }

    /// Open the pool and bring the schema up to date.
    ///
    /// A missing database file is created.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Database`] if the URL is invalid or the
    /// connection fails, [`StorageError::Migration`] if the schema cannot
    /// be migrated.
    pub async fn build(self) -> Result<Database, StorageError> {
        Database::open(&self).await
    }
}

/// Open preference database.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    async fn open(config: &Config) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

        // connections are never recycled, an in-memory database dies with its last one
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!(
            url = %config.database_url,
            max_connections = config.max_connections,
            "preference database ready"
        );

        Ok(Self { pool })
    }

    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Wait for checked-out connections to return, then close all of them.
    ///
    /// Stores built on this pool fail every query afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("preference database closed");
    }
}
