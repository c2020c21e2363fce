use crate::errors::RelataResult;
use crate::intent::Direction;
use crate::report::Report;
use crate::retrieval::{
    CompanyCount, CompanyUsage, ReportFilter, SectionHit, StatsSummary, TermCount,
};
use crate::terms::{SectionKind, TechnicalTerm};

/// Read access to the relational store.
///
/// Every method is read-only. Filters are bound as parameters, never spliced into SQL.
/// Rows with invalid metadata are skipped with a warning.
pub trait IReportStore: Send + Sync {
    /// One report by id, or `None`.
    fn get_report(&self, id: i64) -> RelataResult<Option<Report>>;

    /// Reports whose company matches `filter.company`, most recent first.
    fn reports_for_company(&self, filter: &ReportFilter, limit: usize)
        -> RelataResult<Vec<Report>>;

    /// Terms grouped by normalized key, ordered by occurrences then key.
    fn term_ranking(
        &self,
        filter: &ReportFilter,
        direction: Direction,
        limit: usize,
    ) -> RelataResult<Vec<TermCount>>;

    /// Reports grouped by canonical company, ordered by count then name.
    fn company_ranking(
        &self,
        filter: &ReportFilter,
        direction: Direction,
        limit: usize,
    ) -> RelataResult<Vec<CompanyCount>>;

    /// Distinct canonical companies whose reports mention `term`
    /// (normalized key or surface form).
    fn companies_using_term(
        &self,
        term: &str,
        filter: &ReportFilter,
    ) -> RelataResult<Vec<CompanyUsage>>;

    /// Corpus counts under `filter`.
    fn summary(&self, filter: &ReportFilter) -> RelataResult<StatsSummary>;

    /// Nearest stored sections to `query`, pre-filtered by `filter` and `sections`.
    /// Stored vectors whose length differs from `query` are skipped.
    fn nearest_sections(
        &self,
        query: &[f32],
        filter: &ReportFilter,
        sections: &[SectionKind],
        limit: usize,
    ) -> RelataResult<Vec<SectionHit>>;

    /// The full vocabulary.
    fn known_terms(&self) -> RelataResult<Vec<TechnicalTerm>>;

    /// Distinct company names as stored.
    fn known_companies(&self) -> RelataResult<Vec<String>>;
}
