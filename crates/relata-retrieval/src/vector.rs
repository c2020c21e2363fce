//! Vector Search Service: nearest stored sections to a query.
//!
//! Filters are applied by the store before ranking. When no embedding provider is
//! configured the service reports `Unavailable` instead of failing, and the public
//! [`VectorSearchService::search`] collapses every non-hit outcome to an empty list.

use std::sync::Arc;

use tracing::{debug, warn};

use relata_core::config::RetrievalConfig;
use relata_core::errors::RelataError;
use relata_core::retrieval::{ReportFilter, SectionHit};
use relata_core::terms::SectionKind;
use relata_core::traits::IReportStore;
use relata_embeddings::EmbeddingEngine;

use crate::bounded::run_bounded;

/// Similarity in (0, 1], strictly decreasing in distance.
pub fn similarity(distance: f64) -> f64 {
    if distance.is_nan() {
        return f64::MIN_POSITIVE;
    }
    let s = 1.0 / (1.0 + distance.max(0.0));
    s.max(f64::MIN_POSITIVE)
}

/// A stored section with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSection {
    pub hit: SectionHit,
    pub similarity: f64,
}

/// Outcome of one search, distinguishing "nothing found" from "could not search".
#[derive(Debug)]
pub enum VectorOutcome {
    Hits(Vec<ScoredSection>),
    /// No embedding provider configured, or the provider is down.
    Unavailable,
    /// The provider or the store failed or timed out.
    Failed(RelataError),
}

impl VectorOutcome {
    pub fn hits(&self) -> &[ScoredSection] {
        match self {
            Self::Hits(hits) => hits,
            _ => &[],
        }
    }

    /// True when the branch could not run at all.
    pub fn is_down(&self) -> bool {
        !matches!(self, Self::Hits(_))
    }
}

#[derive(Clone)]
pub struct VectorSearchService {
    store: Arc<dyn IReportStore>,
    embeddings: Arc<EmbeddingEngine>,
    timeout_ms: u64,
    top_k: usize,
}

impl VectorSearchService {
    pub fn new(
        store: Arc<dyn IReportStore>,
        embeddings: Arc<EmbeddingEngine>,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            store,
            embeddings,
            timeout_ms: config.query_timeout_ms,
            top_k: config.vector_top_k,
        }
    }

    pub fn is_available(&self) -> bool {
        self.embeddings.is_available()
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Nearest sections to `text`, or empty when search is impossible.
    pub async fn search(
        &self,
        text: &str,
        filter: &ReportFilter,
        sections: &[SectionKind],
        limit: usize,
    ) -> Vec<ScoredSection> {
        match self.search_text(text, filter, sections, limit).await {
            VectorOutcome::Hits(hits) => hits,
            _ => Vec::new(),
        }
    }

    /// Embed `text` and rank stored sections against it. An empty `sections`
    /// slice means every section kind.
    pub async fn search_text(
        &self,
        text: &str,
        filter: &ReportFilter,
        sections: &[SectionKind],
        limit: usize,
    ) -> VectorOutcome {
        if !self.embeddings.is_available() {
            debug!("vector search skipped: embedding provider missing or down");
            return VectorOutcome::Unavailable;
        }
        if text.trim().is_empty() || limit == 0 {
            return VectorOutcome::Hits(Vec::new());
        }

        let embeddings = Arc::clone(&self.embeddings);
        let store = Arc::clone(&self.store);
        let text = text.to_string();
        let filter = filter.clone();
        let sections = if sections.is_empty() {
            SectionKind::ALL.to_vec()
        } else {
            sections.to_vec()
        };

        let result = run_bounded("vector_search", self.timeout_ms, move || {
            let query = embeddings.embed_query(&text)?;
            store.nearest_sections(&query, &filter, &sections, limit)
        })
        .await;

        match result {
            Ok(hits) => {
                debug!(hits = hits.len(), "vector search complete");
                VectorOutcome::Hits(
                    hits.into_iter()
                        .map(|hit| ScoredSection {
                            similarity: similarity(hit.distance),
                            hit,
                        })
                        .collect(),
                )
            }
            Err(e) => {
                warn!(error = %e, "vector search failed");
                VectorOutcome::Failed(e)
            }
        }
    }
}
