//! Section embeddings: storage codec, inserts, and a pre-filtered brute-force scan.

use std::cmp::Ordering;

use rusqlite::{params, Connection};
use tracing::warn;

use relata_core::errors::RelataResult;
use relata_core::retrieval::{ReportFilter, SectionHit};
use relata_core::terms::{SectionEmbedding, SectionKind};

use super::filter::FilterClause;
use crate::to_storage_err;

/// Store a section vector, returning its row id.
pub fn insert_section_embedding(
    conn: &Connection,
    report_id: i64,
    section: SectionKind,
    content: &str,
    embedding: &[f32],
    model: &str,
) -> RelataResult<i64> {
    conn.execute(
        "INSERT INTO section_embeddings (report_id, section, content, embedding, dimensions, model)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            report_id,
            section.as_str(),
            content,
            f32_vec_to_bytes(embedding),
            embedding.len() as i64,
            model
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

/// Stored vectors of one report, oldest first.
pub fn section_embeddings(conn: &Connection, report_id: i64) -> RelataResult<Vec<SectionEmbedding>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, section, content, embedding, model FROM section_embeddings
             WHERE report_id = ?1 ORDER BY id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![report_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Vec<u8>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let (id, section, content, blob, model) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let Some(section) = SectionKind::parse(&section) else {
            warn!(embedding_id = id, section = %section, "skipping embedding with unknown section");
            continue;
        };
        out.push(SectionEmbedding {
            id,
            report_id,
            section,
            content,
            embedding: bytes_to_f32_vec(&blob),
            model,
        });
    }
    Ok(out)
}

/// Nearest sections by Euclidean distance, ties broken by report then row id.
///
/// Candidates are narrowed in SQL by report filter and section before any distance
/// is computed. Stored vectors whose length differs from `query` are skipped.
pub fn nearest_sections(
    conn: &Connection,
    query: &[f32],
    filter: &ReportFilter,
    sections: &[SectionKind],
    limit: usize,
) -> RelataResult<Vec<SectionHit>> {
    if query.is_empty() || limit == 0 {
        return Ok(Vec::new());
    }
    let mut clause = FilterClause::valid_reports().report_filter(filter);
    if !sections.is_empty() {
        let placeholders: Vec<String> = sections
            .iter()
            .map(|s| clause.bind(s.as_str()))
            .collect();
        clause.push(format!("se.section IN ({})", placeholders.join(", ")));
    }
    let sql = format!(
        "SELECT se.id, se.report_id, se.section, se.content, se.embedding,
                r.company, r.year, r.term_code
         FROM section_embeddings se
         JOIN reports r ON r.id = se.report_id
         {}",
        clause.where_sql()
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let params = clause.params();
    let rows = stmt
        .query_map(params.as_slice(), |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Vec<u8>>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, i32>(6)?,
                row.get::<_, String>(7)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut hits = Vec::new();
    for row in rows {
        let (embedding_id, report_id, section, content, blob, company, year, term) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        let Some(section) = SectionKind::parse(&section) else {
            warn!(embedding_id, section = %section, "skipping embedding with unknown section");
            continue;
        };
        let stored = bytes_to_f32_vec(&blob);
        if stored.len() != query.len() {
            warn!(
                embedding_id,
                stored = stored.len(),
                expected = query.len(),
                "skipping embedding with mismatched dimensions"
            );
            continue;
        }
        hits.push(SectionHit {
            embedding_id,
            report_id,
            section,
            content,
            company,
            year,
            term,
            distance: l2_distance(query, &stored),
        });
    }

    hits.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.report_id.cmp(&b.report_id))
            .then_with(|| a.embedding_id.cmp(&b.embedding_id))
    });
    hits.truncate(limit);
    Ok(hits)
}

/// Euclidean distance between two equal-length vectors.
pub fn l2_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Little-endian f32 encoding for the embedding BLOB column.
pub fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Decode a BLOB written by [`f32_vec_to_bytes`]. Trailing partial chunks are dropped.
pub fn bytes_to_f32_vec(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}
