//! Vocabulary reads and report-term link writes.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use relata_core::errors::{RelataResult, StorageError};
use relata_core::terms::{ReportTermLink, SectionKind, TechnicalTerm, TermCategory};

use crate::to_storage_err;

/// Every vocabulary row. Rows with an unknown category are skipped.
pub fn known_terms(conn: &Connection) -> RelataResult<Vec<TechnicalTerm>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, term, category, normalized, description
             FROM technical_terms ORDER BY normalized, id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut terms = Vec::new();
    for row in rows {
        let (id, term, category, normalized, description) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        let Some(category) = TermCategory::parse(&category) else {
            warn!(term_id = id, category = %category, "skipping term with unknown category");
            continue;
        };
        terms.push(TechnicalTerm {
            id,
            term,
            category,
            normalized,
            description,
        });
    }
    Ok(terms)
}

/// Insert a vocabulary entry, returning the id of the new or existing row.
pub fn insert_term(
    conn: &Connection,
    term: &str,
    category: TermCategory,
    normalized: &str,
    description: Option<&str>,
) -> RelataResult<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO technical_terms (term, category, normalized, description)
         VALUES (?1, ?2, ?3, ?4)",
        params![term, category.as_str(), normalized, description],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    conn.query_row(
        "SELECT id FROM technical_terms WHERE term = ?1 AND category = ?2",
        params![term, category.as_str()],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Id of the first vocabulary row carrying `normalized`.
pub fn term_id_for(conn: &Connection, normalized: &str) -> RelataResult<Option<i64>> {
    conn.query_row(
        "SELECT id FROM technical_terms WHERE normalized = ?1 ORDER BY id LIMIT 1",
        params![normalized],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Record `frequency` mentions of `normalized` in one section of a report.
/// A repeated link adds to the stored frequency.
pub fn link_term(
    conn: &Connection,
    report_id: i64,
    normalized: &str,
    section: SectionKind,
    frequency: u32,
) -> RelataResult<()> {
    if frequency == 0 {
        return Ok(());
    }
    let term_id = term_id_for(conn, normalized)?.ok_or_else(|| StorageError::IntegrityAnomaly {
        table: "technical_terms".to_string(),
        row_id: report_id,
        details: format!("no vocabulary entry for {normalized:?}"),
    })?;
    conn.execute(
        "INSERT INTO report_terms (report_id, term_id, section, frequency)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (report_id, term_id, section)
         DO UPDATE SET frequency = frequency + excluded.frequency",
        params![report_id, term_id, section.as_str(), frequency],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Every term link of one report, by section then term id.
pub fn report_links(conn: &Connection, report_id: i64) -> RelataResult<Vec<ReportTermLink>> {
    let mut stmt = conn
        .prepare(
            "SELECT term_id, section, frequency FROM report_terms
             WHERE report_id = ?1 ORDER BY section, term_id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![report_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut links = Vec::new();
    for row in rows {
        let (term_id, section, frequency) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let Some(section) = SectionKind::parse(&section) else {
            warn!(report_id, term_id, section = %section, "skipping link with unknown section");
            continue;
        };
        links.push(ReportTermLink {
            report_id,
            term_id,
            section,
            frequency,
        });
    }
    Ok(links)
}
