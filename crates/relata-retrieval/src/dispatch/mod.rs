//! Query Dispatcher: maps each intent to its retrieval branch and owns fallback.
//!
//! | intent                      | branch                                        |
//! |-----------------------------|-----------------------------------------------|
//! | `technology_ranking`        | term ranking (structured)                     |
//! | `company_ranking`           | company ranking (structured)                  |
//! | `technology_reverse_lookup` | companies using a term (structured)           |
//! | `company_activities`        | company reports + section search (hybrid)     |
//! | `general_statistics`        | corpus summary (structured, never empty)      |
//! | `open_search`               | section search, then structured if detected   |
//!
//! A structured branch that comes back empty or fails is retried as a section
//! search. Only when every collaborator that was tried failed is the result
//! `Unavailable`.

mod branches;

use std::sync::Arc;

use tracing::{debug, info, warn};

use relata_core::config::RetrievalConfig;
use relata_core::errors::RelataResult;
use relata_core::intent::{Classification, Intent, QueryParams};
use relata_core::retrieval::{ReportFilter, RetrievalResult};

use crate::aggregator::StructuredAggregator;
use crate::normalizer::TermNormalizer;
use crate::vector::{VectorOutcome, VectorSearchService};

pub struct QueryDispatcher {
    aggregator: StructuredAggregator,
    vector: VectorSearchService,
    normalizer: Arc<TermNormalizer>,
    activities_per_company: usize,
}

impl QueryDispatcher {
    pub fn new(
        aggregator: StructuredAggregator,
        vector: VectorSearchService,
        normalizer: Arc<TermNormalizer>,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            aggregator,
            vector,
            normalizer,
            activities_per_company: config.activities_per_company.max(1),
        }
    }

    /// Retrieve facts for a classified utterance. Never fails.
    pub async fn dispatch(&self, utterance: &str, classification: &Classification) -> RetrievalResult {
        let intent = classification.intent;
        let params = &classification.params;

        if intent == Intent::OpenSearch {
            return self.open_search(utterance, params).await;
        }

        match self.run_branch(intent, utterance, params).await {
            Ok(result @ RetrievalResult::Found { .. }) => {
                debug!(intent = %intent, facts = result.facts().len(), "structured branch answered");
                result
            }
            Ok(_) => {
                debug!(intent = %intent, "structured branch empty; trying section search");
                self.vector_fallback(utterance, params, false).await
            }
            Err(e) => {
                warn!(intent = %intent, error = %e, "structured branch failed; trying section search");
                self.vector_fallback(utterance, params, true).await
            }
        }
    }

    /// The dispatch table.
    async fn run_branch(
        &self,
        intent: Intent,
        utterance: &str,
        params: &QueryParams,
    ) -> RelataResult<RetrievalResult> {
        match intent {
            Intent::TechnologyRanking => branches::technology_ranking(self, params).await,
            Intent::CompanyRanking => branches::company_ranking(self, params).await,
            Intent::TechnologyReverseLookup => branches::reverse_lookup(self, params).await,
            Intent::CompanyActivities => {
                branches::company_activities(self, utterance, params).await
            }
            Intent::GeneralStatistics => branches::general_statistics(self, params).await,
            Intent::OpenSearch => Ok(self.open_search(utterance, params).await),
        }
    }

    /// Section search first. With no hits, a detected technology or company is
    /// answered structurally instead.
    async fn open_search(&self, utterance: &str, params: &QueryParams) -> RetrievalResult {
        let limit = self.vector.top_k().max(1);
        let outcome = self
            .vector
            .search_text(utterance, &section_filter(params), &[], limit)
            .await;
        if !outcome.hits().is_empty() {
            return branches::section_facts(outcome.hits(), limit);
        }

        let structured = if params.normalized_technology.is_some() {
            branches::reverse_lookup(self, params).await
        } else if params.company.is_some() {
            branches::company_activities(self, utterance, params).await
        } else {
            return RetrievalResult::NoData;
        };

        match structured {
            Ok(result) => result,
            Err(e) if outcome.is_down() => {
                warn!(error = %e, "open search: every collaborator failed");
                RetrievalResult::Unavailable
            }
            Err(e) => {
                warn!(error = %e, "open search: structured fallback failed");
                RetrievalResult::NoData
            }
        }
    }

    async fn vector_fallback(
        &self,
        utterance: &str,
        params: &QueryParams,
        structured_failed: bool,
    ) -> RetrievalResult {
        let limit = self.vector.top_k().max(1);
        let outcome = self
            .vector
            .search_text(utterance, &section_filter(params), &[], limit)
            .await;
        match outcome {
            VectorOutcome::Hits(hits) if !hits.is_empty() => {
                branches::section_facts(&hits, limit)
            }
            VectorOutcome::Hits(_) => RetrievalResult::NoData,
            _ if structured_failed => {
                info!("structured and vector branches both unavailable");
                RetrievalResult::Unavailable
            }
            _ => RetrievalResult::NoData,
        }
    }
}

/// Year, track, and company narrow a section search; categories do not apply.
fn section_filter(params: &QueryParams) -> ReportFilter {
    ReportFilter {
        year: params.year,
        track: params.track,
        company: params.company.clone(),
        ..ReportFilter::default()
    }
}
