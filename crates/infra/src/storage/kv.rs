//! SQLite key-value state store.
//!
//! One `app_state` table holds every persisted blob (overlay records,
//! booking cache, validity marker) keyed by name. All database operations
//! run in `spawn_blocking` to avoid blocking the async runtime.

use std::path::Path;
use std::sync::Arc;

use bookdesk_domain::Result;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use tokio::task;
use tracing::info;

use crate::errors::{map_join_error, InfraError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS app_state (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
)";

/// Pooled SQLite store for string-keyed state blobs.
#[derive(Clone)]
pub struct SqliteStateStore {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl SqliteStateStore {
    /// Open (or create) the database at `path` and ensure the schema.
    pub fn open<P: AsRef<Path>>(path: P, pool_size: u32) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path.as_ref());
        let pool = Pool::builder()
            .max_size(pool_size.max(1))
            .build(manager)
            .map_err(|e| InfraError::from(e).0)?;

        let conn = pool.get().map_err(|e| InfraError::from(e).0)?;
        conn.execute(SCHEMA, []).map_err(|e| InfraError::from(e).0)?;
        info!(path = %path.as_ref().display(), "state store opened");

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Read the value stored under `key`.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let pool = Arc::clone(&self.pool);
        let key = key.to_string();

        task::spawn_blocking(move || -> Result<Option<String>> {
            let conn = pool.get().map_err(|e| InfraError::from(e).0)?;
            conn.query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| InfraError::from(e).0)
        })
        .await
        .map_err(map_join_error)?
    }

    /// Write `value` under `key`, replacing any previous value.
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let pool = Arc::clone(&self.pool);
        let key = key.to_string();
        let value = value.to_string();

        task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get().map_err(|e| InfraError::from(e).0)?;
            let now = chrono::Utc::now().timestamp();
            conn.execute(
                "INSERT INTO app_state (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
                params![key, value, now],
            )
            .map_err(|e| InfraError::from(e).0)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    /// Delete `key`; returns whether a row existed.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let pool = Arc::clone(&self.pool);
        let key = key.to_string();

        task::spawn_blocking(move || -> Result<bool> {
            let conn = pool.get().map_err(|e| InfraError::from(e).0)?;
            let changed = conn
                .execute("DELETE FROM app_state WHERE key = ?1", params![key])
                .map_err(|e| InfraError::from(e).0)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}
