//! Report ingestion. Metadata comes from the origin folder name; the company from
//! the payload. Re-ingesting the same (file, folder) pair is a no-op.

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use tracing::debug;

use relata_core::errors::RelataResult;
use relata_core::text::fold;
use relata_core::{Report, ReportMetadata};

use crate::to_storage_err;

/// Result of one ingest call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOutcome {
    pub id: i64,
    /// False when the (file, folder) pair was already stored.
    pub inserted: bool,
}

/// Store one report payload. Invalid folder names are rejected before any write.
pub fn ingest_report(
    conn: &Connection,
    origin_folder: &str,
    origin_file: &str,
    payload: &Value,
) -> RelataResult<IngestOutcome> {
    let metadata = ReportMetadata::from_folder_name(origin_folder)?;

    if let Some(id) = existing_id(conn, origin_folder, origin_file)? {
        debug!(id, origin_folder, origin_file, "report already ingested");
        return Ok(IngestOutcome {
            id,
            inserted: false,
        });
    }

    let company = Report::company_from_payload(payload);
    let company_key = company.as_deref().map(fold);
    let cnpj = Report::cnpj_from_payload(payload);
    let payload_json = serde_json::to_string(payload)?;

    conn.execute(
        "INSERT INTO reports (payload, year, term_code, academic_year, ordinal, track,
                              company, company_key, company_cnpj, origin_folder, origin_file)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            payload_json,
            metadata.year,
            metadata.term.code(),
            metadata.academic_year.label(),
            metadata.ordinal,
            metadata.track.label(),
            company,
            company_key,
            cnpj,
            origin_folder,
            origin_file,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    let id = conn.last_insert_rowid();
    debug!(id, origin_folder, origin_file, "report ingested");
    Ok(IngestOutcome { id, inserted: true })
}

fn existing_id(conn: &Connection, origin_folder: &str, origin_file: &str) -> RelataResult<Option<i64>> {
    conn.query_row(
        "SELECT id FROM reports WHERE origin_file = ?1 AND origin_folder = ?2",
        params![origin_file, origin_folder],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}
