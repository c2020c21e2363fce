//! v001: reports table with derived metadata and origin-file dedup key.

use rusqlite::Connection;

use relata_core::errors::RelataResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> RelataResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS reports (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            payload        TEXT NOT NULL,
            year           INTEGER NOT NULL,
            term_code      TEXT NOT NULL,
            academic_year  TEXT NOT NULL,
            ordinal        INTEGER NOT NULL,
            track          TEXT NOT NULL,
            company        TEXT,
            company_key    TEXT,
            company_cnpj   TEXT,
            origin_folder  TEXT NOT NULL,
            origin_file    TEXT NOT NULL,
            created_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            UNIQUE (origin_file, origin_folder)
        );

        CREATE INDEX IF NOT EXISTS idx_reports_year ON reports(year);
        CREATE INDEX IF NOT EXISTS idx_reports_track ON reports(track);
        CREATE INDEX IF NOT EXISTS idx_reports_company_key ON reports(company_key);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
