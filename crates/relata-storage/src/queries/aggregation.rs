//! Grouped counts behind rankings, reverse lookups, and the corpus summary.
//!
//! Every query starts from valid reports only. Company grouping happens in SQL on the
//! stored name and is then folded by canonical name, so aliases count once.

use std::collections::{BTreeMap, BTreeSet};

use rusqlite::Connection;
use tracing::warn;

use relata_core::errors::RelataResult;
use relata_core::intent::Direction;
use relata_core::report::canonical_company;
use relata_core::retrieval::{CompanyCount, CompanyUsage, ReportFilter, StatsSummary, TermCount};
use relata_core::terms::TermCategory;

use super::filter::{valid_metadata_sql, FilterClause};
use crate::to_storage_err;

/// Terms grouped by normalized key, ordered by summed frequency then key.
pub fn term_ranking(
    conn: &Connection,
    filter: &ReportFilter,
    direction: Direction,
    limit: usize,
) -> RelataResult<Vec<TermCount>> {
    let mut clause = FilterClause::valid_reports()
        .report_filter(filter)
        .categories("t", &filter.categories);
    let limit_p = clause.bind(limit as i64);
    let sql = format!(
        "SELECT t.normalized, MIN(t.category), SUM(rt.frequency), COUNT(DISTINCT rt.report_id)
         FROM report_terms rt
         JOIN technical_terms t ON t.id = rt.term_id
         JOIN reports r ON r.id = rt.report_id
         {}
         GROUP BY t.normalized
         ORDER BY SUM(rt.frequency) {}, t.normalized ASC
         LIMIT {limit_p}",
        clause.where_sql(),
        direction.sql()
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let params = clause.params();
    let rows = stmt
        .query_map(params.as_slice(), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut counts = Vec::new();
    for row in rows {
        let (normalized, category, occurrences, reports) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        let Some(category) = TermCategory::parse(&category) else {
            warn!(normalized = %normalized, category = %category, "skipping term with unknown category");
            continue;
        };
        counts.push(TermCount {
            normalized,
            category,
            occurrences: occurrences.max(0) as u64,
            reports: reports.max(0) as u64,
        });
    }
    Ok(counts)
}

/// Reports per canonical company, ordered by count then name.
pub fn company_ranking(
    conn: &Connection,
    filter: &ReportFilter,
    direction: Direction,
    limit: usize,
) -> RelataResult<Vec<CompanyCount>> {
    let mut clause = FilterClause::valid_reports().report_filter(filter);
    clause.push("r.company IS NOT NULL AND TRIM(r.company) <> ''");
    let sql = format!(
        "SELECT r.company, COUNT(*) FROM reports r {} GROUP BY r.company",
        clause.where_sql()
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let params = clause.params();
    let rows = stmt
        .query_map(params.as_slice(), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut folded: BTreeMap<String, u64> = BTreeMap::new();
    for row in rows {
        let (company, count) = row.map_err(|e| to_storage_err(e.to_string()))?;
        *folded.entry(canonical_company(&company)).or_default() += count.max(0) as u64;
    }

    let mut ranking: Vec<CompanyCount> = folded
        .into_iter()
        .map(|(company, reports)| CompanyCount { company, reports })
        .collect();
    ranking.sort_by(|a, b| {
        let by_count = match direction {
            Direction::Most => b.reports.cmp(&a.reports),
            Direction::Least => a.reports.cmp(&b.reports),
        };
        by_count.then_with(|| a.company.cmp(&b.company))
    });
    ranking.truncate(limit);
    Ok(ranking)
}

/// Canonical companies whose reports mention `term`, most reports first.
pub fn companies_using_term(
    conn: &Connection,
    term: &str,
    filter: &ReportFilter,
) -> RelataResult<Vec<CompanyUsage>> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Ok(Vec::new());
    }
    let mut clause = FilterClause::valid_reports().report_filter(filter);
    clause.push("r.company IS NOT NULL AND TRIM(r.company) <> ''");
    let p = clause.bind(term);
    clause.push(format!("(LOWER(t.normalized) = {p} OR LOWER(t.term) = {p})"));
    let sql = format!(
        "SELECT r.company, r.year, r.term_code, COUNT(DISTINCT r.id), GROUP_CONCAT(DISTINCT t.normalized)
         FROM reports r
         JOIN report_terms rt ON rt.report_id = r.id
         JOIN technical_terms t ON t.id = rt.term_id
         {}
         GROUP BY r.company, r.year, r.term_code",
        clause.where_sql()
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let params = clause.params();
    let rows = stmt
        .query_map(params.as_slice(), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i32>(1)?,
                row.get::<_, i64>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    struct Acc {
        reports: u64,
        years: BTreeSet<i32>,
        terms: BTreeSet<String>,
    }
    let mut folded: BTreeMap<String, Acc> = BTreeMap::new();
    for row in rows {
        let (company, year, reports, terms) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let acc = folded
            .entry(canonical_company(&company))
            .or_insert_with(|| Acc {
                reports: 0,
                years: BTreeSet::new(),
                terms: BTreeSet::new(),
            });
        acc.reports += reports.max(0) as u64;
        acc.years.insert(year);
        acc.terms
            .extend(terms.unwrap_or_default().split(',').filter(|s| !s.is_empty()).map(str::to_string));
    }

    let mut usage: Vec<CompanyUsage> = folded
        .into_iter()
        .map(|(company, acc)| CompanyUsage {
            company,
            reports: acc.reports,
            years: acc.years.into_iter().rev().collect(),
            terms: acc.terms.into_iter().collect(),
        })
        .collect();
    usage.sort_by(|a, b| b.reports.cmp(&a.reports).then_with(|| a.company.cmp(&b.company)));
    Ok(usage)
}

/// Corpus counts under `filter`.
pub fn summary(conn: &Connection, filter: &ReportFilter) -> RelataResult<StatsSummary> {
    let invalid = count_invalid_reports(conn)?;
    if invalid > 0 {
        warn!(invalid, "reports with invalid metadata excluded from statistics");
    }

    let clause = FilterClause::valid_reports().report_filter(filter);
    let where_sql = clause.where_sql();
    let params = clause.params();

    let total_reports: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM reports r {where_sql}"),
            params.as_slice(),
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut stmt = conn
        .prepare(&format!(
            "SELECT DISTINCT r.company FROM reports r {where_sql}
             {} r.company IS NOT NULL AND TRIM(r.company) <> ''",
            if where_sql.is_empty() { "WHERE" } else { "AND" }
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let companies: BTreeSet<String> = stmt
        .query_map(params.as_slice(), |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?
        .iter()
        .map(|c| canonical_company(c))
        .collect();

    let total_terms: i64 = conn
        .query_row(
            "SELECT COUNT(DISTINCT normalized) FROM technical_terms",
            [],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let by_year = grouped_counts(
        conn,
        &format!("SELECT r.year, COUNT(*) FROM reports r {where_sql} GROUP BY r.year ORDER BY r.year"),
        params.as_slice(),
    )?
    .into_iter()
    .filter_map(|(year, count)| year.parse::<i32>().ok().map(|y| (y, count)))
    .collect();

    let by_track = grouped_counts(
        conn,
        &format!("SELECT r.track, COUNT(*) FROM reports r {where_sql} GROUP BY r.track ORDER BY r.track"),
        params.as_slice(),
    )?;

    let by_category = grouped_counts(
        conn,
        &format!(
            "SELECT t.category, COUNT(DISTINCT t.normalized)
             FROM report_terms rt
             JOIN technical_terms t ON t.id = rt.term_id
             JOIN reports r ON r.id = rt.report_id
             {where_sql}
             GROUP BY t.category ORDER BY t.category"
        ),
        params.as_slice(),
    )?;

    Ok(StatsSummary {
        total_reports: total_reports.max(0) as u64,
        total_companies: companies.len() as u64,
        total_terms: total_terms.max(0) as u64,
        by_year,
        by_track,
        by_category,
    })
}

/// Rows in `reports` that fail the metadata checks.
pub fn count_invalid_reports(conn: &Connection) -> RelataResult<u64> {
    let count: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM reports r WHERE NOT ({})", valid_metadata_sql()),
            [],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count.max(0) as u64)
}

fn grouped_counts(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::types::ToSql],
) -> RelataResult<Vec<(String, u64)>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params, |row| {
            let key: rusqlite::types::Value = row.get(0)?;
            let key = match key {
                rusqlite::types::Value::Integer(i) => i.to_string(),
                rusqlite::types::Value::Text(s) => s,
                other => format!("{other:?}"),
            };
            Ok((key, row.get::<_, i64>(1)?.max(0) as u64))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
