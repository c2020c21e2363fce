//! Structured Aggregator: count and rank queries over reports and term associations.
//!
//! Every call goes through the store trait, off the async runtime, under the
//! configured timeout. User text only ever reaches the store as a bound filter value.

use std::sync::Arc;

use relata_core::config::RetrievalConfig;
use relata_core::errors::RelataResult;
use relata_core::intent::{Direction, QueryParams};
use relata_core::report::Report;
use relata_core::retrieval::{CompanyCount, CompanyUsage, ReportFilter, StatsSummary, TermCount};
use relata_core::terms::TermCategory;
use relata_core::traits::IReportStore;

use crate::bounded::run_bounded;

/// Store filter for a set of classified parameters. Ranking categories default to
/// the technology categories.
pub fn filter_for(params: &QueryParams) -> ReportFilter {
    ReportFilter {
        year: params.year,
        track: params.track,
        company: params.company.clone(),
        term: None,
        categories: match params.category {
            Some(category) => vec![category],
            None => TermCategory::TECHNOLOGY.to_vec(),
        },
    }
}

#[derive(Clone)]
pub struct StructuredAggregator {
    store: Arc<dyn IReportStore>,
    timeout_ms: u64,
}

impl StructuredAggregator {
    pub fn new(store: Arc<dyn IReportStore>, config: &RetrievalConfig) -> Self {
        Self {
            store,
            timeout_ms: config.query_timeout_ms,
        }
    }

    pub async fn term_ranking(
        &self,
        filter: ReportFilter,
        direction: Direction,
        limit: usize,
    ) -> RelataResult<Vec<TermCount>> {
        let store = Arc::clone(&self.store);
        run_bounded("term_ranking", self.timeout_ms, move || {
            store.term_ranking(&filter, direction, limit)
        })
        .await
    }

    pub async fn company_ranking(
        &self,
        filter: ReportFilter,
        direction: Direction,
        limit: usize,
    ) -> RelataResult<Vec<CompanyCount>> {
        let store = Arc::clone(&self.store);
        run_bounded("company_ranking", self.timeout_ms, move || {
            store.company_ranking(&filter, direction, limit)
        })
        .await
    }

    pub async fn companies_using_term(
        &self,
        term: String,
        filter: ReportFilter,
    ) -> RelataResult<Vec<CompanyUsage>> {
        let store = Arc::clone(&self.store);
        run_bounded("companies_using_term", self.timeout_ms, move || {
            store.companies_using_term(&term, &filter)
        })
        .await
    }

    pub async fn summary(&self, filter: ReportFilter) -> RelataResult<StatsSummary> {
        let store = Arc::clone(&self.store);
        run_bounded("summary", self.timeout_ms, move || store.summary(&filter)).await
    }

    /// Reports of one company, most recent first.
    pub async fn company_reports(
        &self,
        filter: ReportFilter,
        limit: usize,
    ) -> RelataResult<Vec<Report>> {
        let store = Arc::clone(&self.store);
        run_bounded("company_reports", self.timeout_ms, move || {
            store.reports_for_company(&filter, limit)
        })
        .await
    }

    pub async fn report(&self, id: i64) -> RelataResult<Option<Report>> {
        let store = Arc::clone(&self.store);
        run_bounded("get_report", self.timeout_ms, move || store.get_report(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_defaults_to_technology_categories() {
        let params = QueryParams::with_limit(5);
        let filter = filter_for(&params);
        assert_eq!(filter.categories, TermCategory::TECHNOLOGY.to_vec());
        assert!(filter.term.is_none());
    }

    #[test]
    fn filter_narrows_to_one_category() {
        let mut params = QueryParams::with_limit(5);
        params.category = Some(TermCategory::Practice);
        params.year = Some(2024);
        let filter = filter_for(&params);
        assert_eq!(filter.categories, vec![TermCategory::Practice]);
        assert_eq!(filter.year, Some(2024));
    }
}
