//! # relata-retrieval
//!
//! Query understanding and hybrid retrieval over internship reports.
//!
//! An utterance flows classifier → dispatcher → (aggregator and/or vector search)
//! → privacy filter → composer. [`AnswerEngine`] wires the pieces together and
//! exposes `answer`, `get_report`, and `get_stats`.

mod bounded;

pub mod aggregator;
pub mod classifier;
pub mod composer;
pub mod dispatch;
pub mod engine;
pub mod indexer;
pub mod normalizer;
pub mod stats;
pub mod tracing_setup;
pub mod vector;

pub use aggregator::StructuredAggregator;
pub use classifier::IntentClassifier;
pub use composer::ResponseComposer;
pub use dispatch::QueryDispatcher;
pub use engine::AnswerEngine;
pub use indexer::{IndexOutcome, ReportIndexer};
pub use normalizer::{TermMatch, TermNormalizer};
pub use stats::StatsService;
pub use vector::{similarity, ScoredSection, VectorOutcome, VectorSearchService};
