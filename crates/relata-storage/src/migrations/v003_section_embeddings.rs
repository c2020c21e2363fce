//! v003: per-section embedding vectors.

use rusqlite::Connection;

use relata_core::errors::RelataResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> RelataResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS section_embeddings (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            report_id   INTEGER NOT NULL REFERENCES reports(id) ON DELETE CASCADE,
            section     TEXT NOT NULL,
            content     TEXT NOT NULL,
            embedding   BLOB NOT NULL,
            dimensions  INTEGER NOT NULL,
            model       TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_section_embeddings_report ON section_embeddings(report_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
