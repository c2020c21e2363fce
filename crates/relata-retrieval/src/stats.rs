//! Named statistics for `get_stats`.

use std::sync::Arc;

use tracing::debug;

use relata_core::config::RetrievalConfig;
use relata_core::errors::{RelataError, RelataResult};
use relata_core::intent::Direction;
use relata_core::retrieval::{
    ReportFilter, StatEntry, StatsFilters, StatsMetric, StatsResult, StatsSummary,
};
use relata_core::terms::TermCategory;
use relata_privacy::PrivacyFilter;

use crate::aggregator::StructuredAggregator;
use crate::normalizer::TermNormalizer;

pub struct StatsService {
    aggregator: StructuredAggregator,
    normalizer: Arc<TermNormalizer>,
    privacy: Arc<PrivacyFilter>,
    default_limit: usize,
    max_limit: usize,
}

impl StatsService {
    pub fn new(
        aggregator: StructuredAggregator,
        normalizer: Arc<TermNormalizer>,
        privacy: Arc<PrivacyFilter>,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            aggregator,
            normalizer,
            privacy,
            default_limit: config.default_limit.max(1),
            max_limit: config.max_limit.max(1),
        }
    }

    /// Compute `metric` by name. Unsupported names are `UnknownMetric`.
    pub async fn get(&self, metric: &str, filters: &StatsFilters) -> RelataResult<StatsResult> {
        let parsed = StatsMetric::parse(metric).ok_or_else(|| RelataError::UnknownMetric {
            metric: metric.to_string(),
        })?;
        self.compute(parsed, filters).await
    }

    pub async fn compute(
        &self,
        metric: StatsMetric,
        filters: &StatsFilters,
    ) -> RelataResult<StatsResult> {
        let limit = filters
            .limit
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit);
        let base = ReportFilter {
            year: filters.year,
            track: filters.track,
            company: filters.company.clone(),
            ..ReportFilter::default()
        };
        debug!(metric = metric.as_str(), limit, "computing statistics");

        let summary = self.aggregator.summary(base.clone()).await?;
        let total_reports = summary.total_reports;

        let entries = match metric {
            StatsMetric::Summary => {
                return Ok(StatsResult {
                    metric,
                    entries: self.scrub(summary_entries(&summary)),
                    total_reports,
                    summary: Some(summary),
                });
            }
            StatsMetric::TopTechnologies => {
                let categories = match filters.category {
                    Some(category) => vec![category],
                    None => TermCategory::TECHNOLOGY.to_vec(),
                };
                self.terms(base, categories, limit).await?
            }
            StatsMetric::ProgrammingLanguages => {
                self.terms(base, vec![TermCategory::Language], limit).await?
            }
            StatsMetric::Frameworks => {
                self.terms(base, vec![TermCategory::Framework], limit).await?
            }
            StatsMetric::Methodologies => {
                self.terms(base, vec![TermCategory::Practice], limit).await?
            }
            StatsMetric::TopCompanies => self
                .aggregator
                .company_ranking(base, Direction::Most, limit)
                .await?
                .into_iter()
                .map(|c| StatEntry {
                    label: c.company,
                    count: c.reports,
                    group: None,
                })
                .collect(),
            StatsMetric::ReportsByYear => grouped(&summary.by_year, "ano"),
            StatsMetric::ReportsByCourse => grouped(&summary.by_track, "curso"),
            StatsMetric::TechnologiesByType => grouped(&summary.by_category, "categoria"),
        };

        Ok(StatsResult {
            metric,
            entries: self.scrub(entries),
            total_reports,
            summary: None,
        })
    }

    /// Labels can carry company names straight from report payloads.
    fn scrub(&self, mut entries: Vec<StatEntry>) -> Vec<StatEntry> {
        for entry in &mut entries {
            entry.label = self.privacy.filter_text(&entry.label).text;
        }
        entries
    }

    async fn terms(
        &self,
        mut filter: ReportFilter,
        categories: Vec<TermCategory>,
        limit: usize,
    ) -> RelataResult<Vec<StatEntry>> {
        filter.categories = categories;
        let counts = self
            .aggregator
            .term_ranking(filter, Direction::Most, limit)
            .await?;
        Ok(counts
            .into_iter()
            .map(|c| StatEntry {
                label: self.normalizer.display_name(&c.normalized),
                count: c.occurrences,
                group: Some(c.category.as_str().to_string()),
            })
            .collect())
    }
}

fn grouped<K: ToString>(rows: &[(K, u64)], group: &str) -> Vec<StatEntry> {
    rows.iter()
        .map(|(key, count)| StatEntry {
            label: key.to_string(),
            count: *count,
            group: Some(group.to_string()),
        })
        .collect()
}

fn summary_entries(summary: &StatsSummary) -> Vec<StatEntry> {
    let totals = [
        ("relatorios", summary.total_reports),
        ("empresas", summary.total_companies),
        ("termos", summary.total_terms),
    ];
    let mut entries: Vec<StatEntry> = totals
        .into_iter()
        .map(|(label, count)| StatEntry {
            label: label.to_string(),
            count,
            group: Some("total".to_string()),
        })
        .collect();
    entries.extend(grouped(&summary.by_year, "ano"));
    entries.extend(grouped(&summary.by_track, "curso"));
    entries.extend(grouped(&summary.by_category, "categoria"));
    entries
}
