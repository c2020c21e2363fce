//! Nearest-section scan: ordering, pre-filtering, and dimension mismatches.

use relata_core::retrieval::ReportFilter;
use relata_core::terms::SectionKind;
use relata_core::traits::IReportStore;
use relata_storage::StorageEngine;
use serde_json::json;

fn report(store: &StorageEngine, folder: &str, company: &str) -> i64 {
    store
        .ingest_report(
            folder,
            "r.json",
            &json!({ "estagio": { "razao_social_empresa": company } }),
        )
        .unwrap()
        .id
}

#[test]
fn hits_are_ordered_by_distance() {
    let store = StorageEngine::open_in_memory().unwrap();
    let a = report(&store, "2025-2Q-3roAno-1", "ACME");
    let b = report(&store, "2024-3Q-4roAno-1", "Globex");
    store
        .insert_section_embedding(a, SectionKind::Activities, "far", &[0.0, 1.0], "m")
        .unwrap();
    store
        .insert_section_embedding(b, SectionKind::Activities, "near", &[1.0, 0.1], "m")
        .unwrap();

    let hits = store
        .nearest_sections(&[1.0, 0.0], &ReportFilter::default(), &[], 5)
        .unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].content, "near");
    assert!(hits[0].distance < hits[1].distance);
    assert_eq!(hits[0].company.as_deref(), Some("Globex"));
}

#[test]
fn filters_apply_before_ranking() {
    let store = StorageEngine::open_in_memory().unwrap();
    let a = report(&store, "2025-2Q-3roAno-1", "ACME");
    let b = report(&store, "2024-3Q-4roAno-1", "Globex");
    store
        .insert_section_embedding(a, SectionKind::Activities, "acme work", &[0.0, 1.0], "m")
        .unwrap();
    store
        .insert_section_embedding(a, SectionKind::Conclusion, "acme end", &[1.0, 0.0], "m")
        .unwrap();
    store
        .insert_section_embedding(b, SectionKind::Activities, "globex work", &[1.0, 0.0], "m")
        .unwrap();

    let filter = ReportFilter {
        company: Some("acme".into()),
        ..ReportFilter::default()
    };
    let hits = store
        .nearest_sections(&[1.0, 0.0], &filter, &[SectionKind::Activities], 5)
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "acme work");
}

#[test]
fn mismatched_dimensions_are_skipped() {
    let store = StorageEngine::open_in_memory().unwrap();
    let a = report(&store, "2025-2Q-3roAno-1", "ACME");
    store
        .insert_section_embedding(a, SectionKind::Activities, "three", &[1.0, 0.0, 0.0], "m")
        .unwrap();
    store
        .insert_section_embedding(a, SectionKind::Conclusion, "two", &[1.0, 0.0], "m")
        .unwrap();
    let hits = store
        .nearest_sections(&[1.0, 0.0], &ReportFilter::default(), &[], 5)
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "two");
}

#[test]
fn empty_query_returns_nothing() {
    let store = StorageEngine::open_in_memory().unwrap();
    assert!(store
        .nearest_sections(&[], &ReportFilter::default(), &[], 5)
        .unwrap()
        .is_empty());
}
