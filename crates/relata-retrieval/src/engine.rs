//! AnswerEngine: the three operations exposed to the API layer.
//!
//! `answer` never fails; `get_report` returns a privacy-filtered copy or
//! `ReportNotFound`; `get_stats` returns a named statistic or `UnknownMetric`.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use relata_core::config::RelataConfig;
use relata_core::errors::{RelataError, RelataResult};
use relata_core::intent::Classification;
use relata_core::report::Report;
use relata_core::retrieval::{Answer, AnswerFilters, ConversationTurn, StatsFilters, StatsResult};
use relata_core::traits::{IReportStore, IResponsePolisher};
use relata_embeddings::EmbeddingEngine;
use relata_privacy::PrivacyFilter;
use relata_storage::StorageEngine;

use crate::aggregator::StructuredAggregator;
use crate::classifier::IntentClassifier;
use crate::composer::ResponseComposer;
use crate::dispatch::QueryDispatcher;
use crate::normalizer::TermNormalizer;
use crate::stats::StatsService;
use crate::vector::VectorSearchService;

pub struct AnswerEngine {
    classifier: IntentClassifier,
    dispatcher: QueryDispatcher,
    composer: ResponseComposer,
    privacy: Arc<PrivacyFilter>,
    aggregator: StructuredAggregator,
    stats: StatsService,
}

impl AnswerEngine {
    /// Open the configured database and embedding provider.
    pub fn open(config: &RelataConfig) -> RelataResult<Self> {
        config.validate()?;
        let store = StorageEngine::open(Path::new(&config.storage.db_path), &config.storage)?;
        let embeddings = EmbeddingEngine::new(config.embedding.clone());
        Self::build(Arc::new(store), Arc::new(embeddings), config)
    }

    /// Wire the engine over existing collaborators. Reads the vocabulary and the
    /// company list once.
    pub fn build(
        store: Arc<dyn IReportStore>,
        embeddings: Arc<EmbeddingEngine>,
        config: &RelataConfig,
    ) -> RelataResult<Self> {
        let terms = store.known_terms()?;
        let normalizer = Arc::new(if terms.is_empty() {
            TermNormalizer::from_seed()
        } else {
            TermNormalizer::new(&terms)
        });
        let companies = store.known_companies()?;

        let retrieval = &config.retrieval;
        let privacy = Arc::new(PrivacyFilter::new(config.privacy.clone()));
        let aggregator = StructuredAggregator::new(Arc::clone(&store), retrieval);
        let vector = VectorSearchService::new(Arc::clone(&store), embeddings, retrieval);

        info!(
            terms = normalizer.len(),
            companies = companies.len(),
            vector_search = vector.is_available(),
            "answer engine ready"
        );

        Ok(Self {
            classifier: IntentClassifier::new(Arc::clone(&normalizer), &companies, retrieval),
            dispatcher: QueryDispatcher::new(
                aggregator.clone(),
                vector,
                Arc::clone(&normalizer),
                retrieval,
            ),
            composer: ResponseComposer::new(config.composer.clone(), Arc::clone(&privacy)),
            stats: StatsService::new(
                aggregator.clone(),
                normalizer,
                Arc::clone(&privacy),
                retrieval,
            ),
            privacy,
            aggregator,
        })
    }

    pub fn with_polisher(mut self, polisher: Arc<dyn IResponsePolisher>) -> Self {
        self.composer = self.composer.with_polisher(polisher);
        self
    }

    /// Intent and parameters for an utterance, without retrieval.
    pub fn classify(&self, utterance: &str) -> Classification {
        self.classifier.classify(utterance)
    }

    /// Answer a question. Failures degrade to a "no data" or "unavailable" reply.
    pub async fn answer(
        &self,
        utterance: &str,
        filters: Option<&AnswerFilters>,
        history: &[ConversationTurn],
    ) -> Answer {
        let classification = self.classifier.classify_in_context(utterance, filters, history);
        let retrieved = self.dispatcher.dispatch(utterance, &classification).await;
        let filtered = self.privacy.filter_retrieval(retrieved);
        let answer = self.composer.compose(utterance, &classification, &filtered).await;
        info!(
            intent = %answer.intent,
            rule = classification.rule,
            confidence = answer.confidence,
            sources = answer.sources.len(),
            "answered"
        );
        answer
    }

    /// One report with every restricted field removed.
    pub async fn get_report(&self, id: i64) -> RelataResult<Report> {
        let report = self
            .aggregator
            .report(id)
            .await?
            .ok_or(RelataError::ReportNotFound { id })?;
        let filtered = self.privacy.filter_report(&report);
        self.privacy.audit_payload(&filtered.payload)?;
        Ok(filtered)
    }

    pub async fn get_stats(&self, metric: &str, filters: &StatsFilters) -> RelataResult<StatsResult> {
        self.stats.get(metric, filters).await
    }
}
