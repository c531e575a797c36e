//! SQLite-backed key/value storage.
//!
//! Stands in for browser local storage: one table of string values keyed by
//! name, with an optional byte quota.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, instrument, trace};

use super::backend::StorageBackend;
use crate::error::{AdminError, Result};

/// SQLite schema for key/value storage.
const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

/// Default byte budget, matching what browsers give local storage.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Database wrapper for key/value storage.
pub struct SqliteStorage {
    conn: Connection,
    location: String,
    quota_bytes: Option<usize>,
}

impl SqliteStorage {
    /// Opens or creates a database at the given path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AdminError::StorageRead(format!(
                    "Failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        debug!(path = %path.display(), "Opening storage database");
        let conn = Connection::open(path)
            .map_err(|e| AdminError::StorageRead(format!("Failed to open database: {e}")))?;

        let db = Self {
            conn,
            location: path.display().to_string(),
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
        };
        db.init_schema()?;
        info!(path = %path.display(), "Storage database ready");
        Ok(db)
    }

    /// Creates an in-memory database (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            AdminError::StorageRead(format!("Failed to create in-memory database: {e}"))
        })?;

        let db = Self {
            conn,
            location: ":memory:".to_string(),
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Replace the byte quota (`None` disables it).
    #[must_use]
    pub const fn with_quota(mut self, quota_bytes: Option<usize>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    /// Initializes the database schema.
    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA_SQL)
            .map_err(|e| AdminError::StorageRead(format!("Failed to initialize schema: {e}")))?;
        Ok(())
    }

    /// Bytes used by every entry except `key`.
    fn usage_excluding(&self, key: &str) -> Result<usize> {
        let used: i64 = self
            .conn
            .query_row(
                "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
                 FROM kv_store WHERE key != ?1",
                params![key],
                |row| row.get(0),
            )
            .map_err(|e| AdminError::StorageRead(format!("Failed to measure usage: {e}")))?;
        Ok(usize::try_from(used).unwrap_or_default())
    }

    /// Timestamp of the last write to `key`.
    pub fn updated_at(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT updated_at FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| AdminError::StorageRead(format!("Failed to read timestamp: {e}")))
    }
}

impl StorageBackend for SqliteStorage {
    #[instrument(skip(self))]
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        trace!(key, "Reading storage item");
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| AdminError::StorageRead(format!("Failed to read '{key}': {e}")))
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota_bytes {
            let needed = self.usage_excluding(key)? + key.len() + value.len();
            if needed > quota {
                return Err(AdminError::StorageQuotaExceeded { needed, quota });
            }
        }

        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )
            .map_err(|e| AdminError::StorageWrite(format!("Failed to write '{key}': {e}")))?;
        debug!(key, "Storage item written");
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .map_err(|e| AdminError::StorageWrite(format!("Failed to delete '{key}': {e}")))?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.location)
    }
}

/// Returns the default database path.
///
/// `~/.local/share/coach/storage.db` on Linux, the platform data dir elsewhere.
pub fn default_db_path() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir().ok_or_else(|| {
        AdminError::StorageRead("Could not determine local data directory".to_string())
    })?;
    Ok(data_dir.join("coach").join("storage.db"))
}
