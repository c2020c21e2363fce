//! Versioned schema migrations, applied once each at startup.

mod v001_report_tables;
mod v002_term_tables;
mod v003_section_embeddings;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use relata_core::errors::{RelataResult, StorageError};

use crate::to_storage_err;

type MigrationFn = fn(&Connection) -> RelataResult<()>;

const MIGRATIONS: &[(u32, &str, MigrationFn)] = &[
    (1, "report_tables", v001_report_tables::migrate),
    (2, "term_tables", v002_term_tables::migrate),
    (3, "section_embeddings", v003_section_embeddings::migrate),
];

/// Latest schema version this build knows.
pub const LATEST_VERSION: u32 = 3;

/// Apply every migration newer than the recorded schema version.
pub fn run_migrations(conn: &Connection) -> RelataResult<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            name        TEXT NOT NULL,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current = current_version(conn)?;
    for (version, name, migrate) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        migrate(conn).map_err(|e| StorageError::MigrationFailed {
            version: *version,
            reason: e.to_string(),
        })?;
        conn.execute(
            "INSERT INTO schema_version (version, name) VALUES (?1, ?2)",
            params![version, name],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
        info!(version, name, "applied migration");
    }
    current_version(conn)
}

/// Highest applied version, 0 on a fresh database.
pub fn current_version(conn: &Connection) -> RelataResult<u32> {
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?
        .flatten();
    Ok(version.unwrap_or(0))
}
