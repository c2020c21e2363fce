//! Property tests for the embedding codec and the nearest-section ordering.

use proptest::prelude::*;
use relata_core::retrieval::ReportFilter;
use relata_core::terms::SectionKind;
use relata_core::traits::IReportStore;
use relata_storage::queries::section_search::{bytes_to_f32_vec, f32_vec_to_bytes, l2_distance};
use relata_storage::StorageEngine;
use serde_json::json;

proptest! {
    #[test]
    fn codec_is_lossless(v in prop::collection::vec(-1.0e6f32..1.0e6, 0..64)) {
        prop_assert_eq!(bytes_to_f32_vec(&f32_vec_to_bytes(&v)), v);
    }

    #[test]
    fn distance_is_symmetric(
        pair in (1usize..16).prop_flat_map(|n| (
            prop::collection::vec(-10.0f32..10.0, n),
            prop::collection::vec(-10.0f32..10.0, n),
        ))
    ) {
        let (a, b) = pair;
        prop_assert!((l2_distance(&a, &b) - l2_distance(&b, &a)).abs() < 1e-9);
        prop_assert!(l2_distance(&a, &b) >= 0.0);
    }

    #[test]
    fn nearest_sections_are_sorted(
        vectors in prop::collection::vec(prop::collection::vec(-1.0f32..1.0, 3), 1..12),
        query in prop::collection::vec(-1.0f32..1.0, 3),
        limit in 1usize..8,
    ) {
        let store = StorageEngine::open_in_memory().unwrap();
        let id = store
            .ingest_report("2025-2Q-3roAno-1", "p.json", &json!({ "empresa_razao_social": "ACME" }))
            .unwrap()
            .id;
        for (i, v) in vectors.iter().enumerate() {
            store
                .insert_section_embedding(id, SectionKind::Activities, &format!("s{i}"), v, "m")
                .unwrap();
        }
        let hits = store
            .nearest_sections(&query, &ReportFilter::default(), &[], limit)
            .unwrap();
        prop_assert_eq!(hits.len(), limit.min(vectors.len()));
        for pair in hits.windows(2) {
            prop_assert!(pair[0].distance <= pair[1].distance);
        }
    }
}
