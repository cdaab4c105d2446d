//! SQLite-backed store implementation.
//!
//! Records live in a single `tables_kv` table as JSON values. The primary
//! key index serves the prefix scan, so no further schema is needed.

use std::path::Path;

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::warn;

use super::TableStore;
use crate::error::CoreError;
use crate::table::TableRecord;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations/sqlite");

/// SQLite-backed key/value store.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store from an existing pool.
    ///
    /// The caller is responsible for running [`run_migrations`](Self::run_migrations).
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create and initialize a new SQLite store from a file path.
    ///
    /// This convenience constructor handles all setup:
    /// - Creates parent directories if they don't exist
    /// - Creates the database file if it doesn't exist
    /// - Connects to the database with sensible defaults
    /// - Runs all migrations
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file (e.g., ".data/tables.db")
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::StoreUnavailable {
                operation: "create_dir".to_string(),
                details: format!("Failed to create directory {:?}: {}", parent, e),
            })?;
        }

        // Build connection URL
        let path_str = path.to_string_lossy();
        let url = format!("sqlite:{}?mode=rwc", path_str);

        // Create pool with reasonable defaults
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .map_err(|e| CoreError::StoreUnavailable {
                operation: "connect".to_string(),
                details: format!("Failed to connect to SQLite at {:?}: {}", path, e),
            })?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Apply all pending migrations. Safe to call multiple times; already
    /// applied migrations are skipped.
    pub async fn run_migrations(&self) -> Result<(), CoreError> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| CoreError::StoreUnavailable {
                operation: "migrate".to_string(),
                details: format!("Failed to run migrations: {}", e),
            })
    }
}

#[async_trait::async_trait]
impl TableStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<TableRecord>, CoreError> {
        let value: Option<String> = sqlx::query_scalar(
            r#"
            SELECT value FROM tables_kv WHERE key = ?
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        match value {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, record: &TableRecord) -> Result<(), CoreError> {
        let json = serde_json::to_string(record)?;

        sqlx::query(
            r#"
            INSERT INTO tables_kv (key, value)
            VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn scan_by_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<(String, TableRecord)>, CoreError> {
        // Fixed engine prefixes contain no LIKE metacharacters
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT key, value FROM tables_kv WHERE key LIKE ? || '%' ORDER BY key
            "#,
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for (key, json) in rows {
            match serde_json::from_str::<TableRecord>(&json) {
                Ok(record) => records.push((key, record)),
                Err(e) => {
                    // One undecodable row must not fail a scan
                    warn!(key = %key, error = %e, "Skipping undecodable store row");
                }
            }
        }
        Ok(records)
    }
}
