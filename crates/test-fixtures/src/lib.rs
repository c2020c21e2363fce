//! Test fixture loader for the Relata report corpus and classifier golden set.
//!
//! Provides typed deserialization of the fixture JSON files plus helpers that build a
//! seeded in-memory store for integration tests across crates.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use relata_core::terms::SectionKind;
use relata_core::traits::IEmbeddingProvider;
use relata_core::Report;
use relata_storage::StorageEngine;

/// Root directory of the fixture data.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// One term mention recorded for a corpus report.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureTerm {
    pub term: String,
    pub section: SectionKind,
    pub frequency: u32,
}

/// One corpus report as it would arrive from extraction.
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusEntry {
    pub folder: String,
    pub file: String,
    pub payload: serde_json::Value,
    pub terms: Vec<FixtureTerm>,
}

/// One labelled utterance for classifier tests.
#[derive(Debug, Clone, Deserialize)]
pub struct GoldenQuery {
    pub utterance: String,
    pub intent: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub technology: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

pub fn corpus() -> Vec<CorpusEntry> {
    load_fixture("corpus.json")
}

pub fn golden_queries() -> Vec<GoldenQuery> {
    load_fixture("queries.json")
}

/// In-memory store holding the whole corpus with its term links.
///
/// # Panics
/// Panics on any storage failure.
pub fn seeded_store() -> StorageEngine {
    let store = StorageEngine::open_in_memory().expect("in-memory store");
    for entry in corpus() {
        let outcome = store
            .ingest_report(&entry.folder, &entry.file, &entry.payload)
            .unwrap_or_else(|e| panic!("ingest {}: {e}", entry.folder));
        for term in &entry.terms {
            store
                .link_term(outcome.id, &term.term, term.section, term.frequency)
                .unwrap_or_else(|e| panic!("link {} to {}: {e}", term.term, entry.folder));
        }
    }
    store
}

/// Embed every non-empty section of every stored report with `provider`.
/// Returns the number of vectors written.
///
/// # Panics
/// Panics on any storage or provider failure.
pub fn embed_corpus(store: &StorageEngine, provider: &dyn IEmbeddingProvider, model: &str) -> usize {
    let ids: Vec<i64> = store
        .with_reader(|conn| {
            let mut stmt = conn
                .prepare("SELECT id FROM reports ORDER BY id")
                .expect("prepare");
            let ids = stmt
                .query_map([], |row| row.get(0))
                .expect("query")
                .collect::<Result<Vec<i64>, _>>()
                .expect("rows");
            Ok(ids)
        })
        .expect("list reports");

    let mut written = 0;
    for id in ids {
        let report: Report = relata_core::traits::IReportStore::get_report(store, id)
            .expect("read report")
            .expect("report exists");
        for section in SectionKind::ALL {
            let Some(text) = report.section_text(section) else {
                continue;
            };
            let vector = provider.embed(&text).expect("embed section");
            store
                .insert_section_embedding(id, section, &text, &vector, model)
                .expect("store embedding");
            written += 1;
        }
    }
    written
}

/// Find the stored id of a corpus report by its origin folder.
///
/// # Panics
/// Panics if the folder was not ingested.
pub fn report_id(store: &StorageEngine, folder: &str) -> i64 {
    store
        .with_reader(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id FROM reports WHERE origin_folder = ?1",
                    [folder],
                    |row| row.get(0),
                )
                .expect("report by folder"))
        })
        .expect("reader")
}
