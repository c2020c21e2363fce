//! v002: technical vocabulary, report-term links, and the seed vocabulary.

use rusqlite::{params, Connection};

use relata_core::errors::RelataResult;
use relata_core::terms::SEED_TERMS;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> RelataResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS technical_terms (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            term         TEXT NOT NULL,
            category     TEXT NOT NULL,
            normalized   TEXT NOT NULL,
            description  TEXT,
            UNIQUE (term, category)
        );

        CREATE INDEX IF NOT EXISTS idx_terms_normalized ON technical_terms(normalized);
        CREATE INDEX IF NOT EXISTS idx_terms_category ON technical_terms(category);

        CREATE TABLE IF NOT EXISTS report_terms (
            report_id  INTEGER NOT NULL REFERENCES reports(id) ON DELETE CASCADE,
            term_id    INTEGER NOT NULL REFERENCES technical_terms(id) ON DELETE CASCADE,
            section    TEXT NOT NULL,
            frequency  INTEGER NOT NULL DEFAULT 1 CHECK (frequency > 0),
            PRIMARY KEY (report_id, term_id, section)
        );

        CREATE INDEX IF NOT EXISTS idx_report_terms_term ON report_terms(term_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let mut stmt = conn
        .prepare(
            "INSERT OR IGNORE INTO technical_terms (term, category, normalized)
             VALUES (?1, ?2, ?3)",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    for (term, category, normalized) in SEED_TERMS {
        stmt.execute(params![term, category.as_str(), normalized])
            .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}
