//! Single write connection. Used only by ingestion and migrations.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use relata_core::config::StorageConfig;
use relata_core::errors::RelataResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// A single write connection behind a mutex. Serialized writes.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path, config: &StorageConfig) -> RelataResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, config)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory(config: &StorageConfig) -> RelataResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, config)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the lock and execute a closure with the connection.
    pub fn with_conn<F, T>(&self, f: F) -> RelataResult<T>
    where
        F: FnOnce(&Connection) -> RelataResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("writer lock poisoned: {e}")))?;
        f(&guard)
    }
}
