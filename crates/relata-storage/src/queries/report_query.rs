//! Report reads. Rows whose metadata fails validation are skipped with a warning.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::warn;

use relata_core::errors::RelataResult;
use relata_core::retrieval::ReportFilter;
use relata_core::{AcademicYear, ProgramTrack, Report, ReportMetadata, TermCode, RelataError};

use super::filter::FilterClause;
use crate::to_storage_err;

pub(crate) const REPORT_COLUMNS: &str = "r.id, r.payload, r.year, r.term_code, r.academic_year, \
     r.ordinal, r.track, r.company, r.origin_folder, r.origin_file";

/// Column values as stored, before validation.
pub(crate) struct RawReportRow {
    id: i64,
    payload: String,
    year: i32,
    term_code: String,
    academic_year: String,
    ordinal: i64,
    track: String,
    company: Option<String>,
    origin_folder: String,
    origin_file: String,
}

impl RawReportRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            payload: row.get(1)?,
            year: row.get(2)?,
            term_code: row.get(3)?,
            academic_year: row.get(4)?,
            ordinal: row.get(5)?,
            track: row.get(6)?,
            company: row.get(7)?,
            origin_folder: row.get(8)?,
            origin_file: row.get(9)?,
        })
    }

    pub(crate) fn id(&self) -> i64 {
        self.id
    }

    pub(crate) fn into_report(self) -> RelataResult<Report> {
        let invalid = |reason: String| RelataError::InvalidMetadata { reason };
        let term = TermCode::parse(&self.term_code)
            .ok_or_else(|| invalid(format!("unknown term code {:?}", self.term_code)))?;
        let academic_year = AcademicYear::parse(&self.academic_year)
            .ok_or_else(|| invalid(format!("unknown academic year {:?}", self.academic_year)))?;
        let track = ProgramTrack::parse(&self.track)
            .ok_or_else(|| invalid(format!("unknown track {:?}", self.track)))?;
        let ordinal = u8::try_from(self.ordinal)
            .map_err(|_| invalid(format!("ordinal {} out of range", self.ordinal)))?;
        let metadata = ReportMetadata::new(self.year, term, academic_year, ordinal, track)?;
        let payload = serde_json::from_str(&self.payload)?;
        Ok(Report {
            id: self.id,
            payload,
            metadata,
            company: self.company,
            origin_folder: self.origin_folder,
            origin_file: self.origin_file,
        })
    }
}

/// Convert raw rows, skipping anomalies.
pub(crate) fn collect_valid(rows: Vec<RawReportRow>) -> Vec<Report> {
    rows.into_iter()
        .filter_map(|raw| {
            let id = raw.id();
            match raw.into_report() {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!(report_id = id, error = %e, "skipping report with invalid metadata");
                    None
                }
            }
        })
        .collect()
}

/// One report by id. An invalid row reads as absent.
pub fn get_report(conn: &Connection, id: i64) -> RelataResult<Option<Report>> {
    let raw = conn
        .query_row(
            &format!("SELECT {REPORT_COLUMNS} FROM reports r WHERE r.id = ?1"),
            params![id],
            RawReportRow::from_row,
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(raw.and_then(|r| collect_valid(vec![r]).pop()))
}

/// Reports matching `filter`, most recent first.
pub fn reports_matching(
    conn: &Connection,
    filter: &ReportFilter,
    limit: usize,
) -> RelataResult<Vec<Report>> {
    let mut clause = FilterClause::valid_reports().report_filter(filter);
    let limit_p = clause.bind(limit as i64);
    let sql = format!(
        "SELECT {REPORT_COLUMNS} FROM reports r {}
         ORDER BY r.year DESC, r.term_code DESC, r.id DESC
         LIMIT {limit_p}",
        clause.where_sql()
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let params = clause.params();
    let rows = stmt
        .query_map(params.as_slice(), RawReportRow::from_row)
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(collect_valid(rows))
}

/// Distinct non-empty company names as stored.
pub fn known_companies(conn: &Connection) -> RelataResult<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT DISTINCT company FROM reports
             WHERE company IS NOT NULL AND TRIM(company) <> ''
             ORDER BY company",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
