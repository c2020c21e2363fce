//! WHERE-clause builder. User values are only ever bound as parameters.

use rusqlite::types::ToSql;

use relata_core::constants::{MAX_ORDINAL, MAX_REPORT_YEAR, MIN_ORDINAL, MIN_REPORT_YEAR};
use relata_core::retrieval::ReportFilter;
use relata_core::terms::TermCategory;
use relata_core::text::fold;
use relata_core::ProgramTrack;

/// Conditions joined with AND, plus their bound parameters in `?N` order.
pub struct FilterClause {
    conditions: Vec<String>,
    params: Vec<Box<dyn ToSql>>,
}

impl FilterClause {
    pub fn new() -> Self {
        Self {
            conditions: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Rows of `reports r` whose metadata is internally consistent.
    pub fn valid_reports() -> Self {
        let mut clause = Self::new();
        clause.push(valid_metadata_sql());
        clause
    }

    /// Bind a value, returning its placeholder.
    pub fn bind(&mut self, value: impl ToSql + 'static) -> String {
        self.params.push(Box::new(value));
        format!("?{}", self.params.len())
    }

    pub fn push(&mut self, condition: impl Into<String>) {
        self.conditions.push(condition.into());
    }

    /// Year, track, company, and term filters against `reports r`.
    pub fn report_filter(mut self, filter: &ReportFilter) -> Self {
        if let Some(year) = filter.year {
            let p = self.bind(year);
            self.push(format!("r.year = {p}"));
        }
        if let Some(track) = filter.track {
            let p = self.bind(track.label());
            self.push(format!("r.track = {p}"));
        }
        if let Some(company) = filter.company.as_deref().filter(|c| !c.trim().is_empty()) {
            let p = self.bind(like_pattern(&fold(company.trim())));
            self.push(format!("r.company_key LIKE {p} ESCAPE '\\'"));
        }
        if let Some(term) = filter.term.as_deref().filter(|t| !t.trim().is_empty()) {
            let p = self.bind(term.trim().to_lowercase());
            self.push(format!(
                "EXISTS (SELECT 1 FROM report_terms rtf
                         JOIN technical_terms tf ON tf.id = rtf.term_id
                         WHERE rtf.report_id = r.id
                           AND (LOWER(tf.normalized) = {p} OR LOWER(tf.term) = {p}))"
            ));
        }
        self
    }

    /// Restrict `alias.category` to `categories`; empty means no restriction.
    pub fn categories(mut self, alias: &str, categories: &[TermCategory]) -> Self {
        if categories.is_empty() {
            return self;
        }
        let placeholders: Vec<String> = categories
            .iter()
            .map(|c| self.bind(c.as_str()))
            .collect();
        self.push(format!("{alias}.category IN ({})", placeholders.join(", ")));
        self
    }

    pub fn where_sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn params(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}

impl Default for FilterClause {
    fn default() -> Self {
        Self::new()
    }
}

/// Track/term pairing plus year and ordinal bounds, as SQL over `reports r`.
pub fn valid_metadata_sql() -> String {
    let pairs: Vec<String> = ProgramTrack::ALL
        .iter()
        .map(|track| {
            let terms: Vec<String> = track
                .valid_terms()
                .iter()
                .map(|t| format!("'{}'", t.code()))
                .collect();
            format!(
                "(r.track = '{}' AND r.term_code IN ({}))",
                track.label(),
                terms.join(", ")
            )
        })
        .collect();
    format!(
        "({}) AND r.ordinal BETWEEN {MIN_ORDINAL} AND {MAX_ORDINAL} AND r.year BETWEEN {MIN_REPORT_YEAR} AND {MAX_REPORT_YEAR}",
        pairs.join(" OR ")
    )
}

/// `%needle%` with LIKE wildcards in the needle escaped.
pub fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
