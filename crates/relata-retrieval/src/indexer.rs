//! Report indexing for the import collaborator: store the report, link the
//! vocabulary terms found in each section, and embed each section when a
//! provider is configured.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use relata_core::errors::{RelataError, RelataResult, StorageError};
use relata_core::terms::SectionKind;
use relata_core::traits::IReportStore;
use relata_embeddings::EmbeddingEngine;
use relata_storage::StorageEngine;

use crate::normalizer::TermNormalizer;

/// What one `index` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutcome {
    pub report_id: i64,
    /// False when the report was already stored; nothing else was done.
    pub inserted: bool,
    pub terms_linked: usize,
    pub sections_embedded: usize,
}

pub struct ReportIndexer {
    store: Arc<StorageEngine>,
    normalizer: Arc<TermNormalizer>,
    embeddings: Option<Arc<EmbeddingEngine>>,
}

impl ReportIndexer {
    pub fn new(store: Arc<StorageEngine>, normalizer: Arc<TermNormalizer>) -> Self {
        Self {
            store,
            normalizer,
            embeddings: None,
        }
    }

    pub fn with_embeddings(mut self, embeddings: Arc<EmbeddingEngine>) -> Self {
        self.embeddings = Some(embeddings).filter(|e| e.is_enabled());
        self
    }

    pub fn index(&self, folder: &str, file: &str, payload: &Value) -> RelataResult<IndexOutcome> {
        let ingested = self.store.ingest_report(folder, file, payload)?;
        let mut outcome = IndexOutcome {
            report_id: ingested.id,
            inserted: ingested.inserted,
            terms_linked: 0,
            sections_embedded: 0,
        };
        if !ingested.inserted {
            return Ok(outcome);
        }
        let Some(report) = self.store.get_report(ingested.id)? else {
            return Ok(outcome);
        };

        let sections: Vec<(SectionKind, String)> = SectionKind::ALL
            .into_iter()
            .filter_map(|kind| report.section_text(kind).map(|text| (kind, text)))
            .collect();

        for (kind, text) in &sections {
            for (normalized, frequency) in self.normalizer.extract_terms(text) {
                match self.store.link_term(report.id, &normalized, *kind, frequency) {
                    Ok(()) => outcome.terms_linked += 1,
                    Err(RelataError::StorageError(StorageError::IntegrityAnomaly { details, .. })) => {
                        warn!(report_id = report.id, term = %normalized, details = %details, "term not in store vocabulary; skipped");
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        if let Some(embeddings) = &self.embeddings {
            outcome.sections_embedded = self.embed_sections(embeddings, report.id, &sections);
        }

        info!(
            report_id = report.id,
            folder,
            terms = outcome.terms_linked,
            embedded = outcome.sections_embedded,
            "report indexed"
        );
        Ok(outcome)
    }

    /// Embedding failures leave the report searchable by structured queries only.
    fn embed_sections(
        &self,
        embeddings: &EmbeddingEngine,
        report_id: i64,
        sections: &[(SectionKind, String)],
    ) -> usize {
        let texts: Vec<String> = sections.iter().map(|(_, t)| t.clone()).collect();
        let vectors = match embeddings.embed_documents(&texts) {
            Ok(v) => v,
            Err(e) => {
                warn!(report_id, error = %e, "section embedding failed; report not searchable by similarity");
                return 0;
            }
        };
        let mut stored = 0;
        for ((kind, text), vector) in sections.iter().zip(vectors) {
            match self.store.insert_section_embedding(
                report_id,
                *kind,
                text,
                &vector,
                embeddings.model(),
            ) {
                Ok(_) => stored += 1,
                Err(e) => warn!(report_id, section = kind.as_str(), error = %e, "embedding not stored"),
            }
        }
        debug!(report_id, stored, "sections embedded");
        stored
    }
}
