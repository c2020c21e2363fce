//! Property tests: classification is total, similarity is monotone, confidence stays bounded.

use std::sync::Arc;

use proptest::prelude::*;
use relata_core::config::{ComposerConfig, PrivacyConfig, RetrievalConfig};
use relata_core::intent::Intent;
use relata_core::retrieval::{Branch, Fact, RetrievalResult};
use relata_core::terms::{TermCategory, SEED_TERMS};
use relata_privacy::PrivacyFilter;
use relata_retrieval::{similarity, IntentClassifier, ResponseComposer, TermNormalizer};

fn classifier(config: &RetrievalConfig) -> IntentClassifier {
    let companies = vec![
        "BANCO BTG PACTUAL S.A.".to_string(),
        "WEG S.A.".to_string(),
        "SIEMENS LTDA".to_string(),
    ];
    IntentClassifier::new(Arc::new(TermNormalizer::from_seed()), &companies, config)
}

fn technology_surface() -> impl Strategy<Value = &'static str> {
    let surfaces: Vec<&'static str> = SEED_TERMS
        .iter()
        .filter(|(_, category, _)| TermCategory::TECHNOLOGY.contains(category))
        .map(|(surface, _, _)| *surface)
        .collect();
    proptest::sample::select(surfaces)
}

fn found(branch: Branch, facts: usize, limit: usize) -> RetrievalResult {
    RetrievalResult::Found {
        branch,
        facts: (0..facts).map(|i| Fact::new(format!("f{i}"), 1.0)).collect(),
        limit,
    }
}

fn branch() -> impl Strategy<Value = Branch> {
    prop_oneof![Just(Branch::Structured), Just(Branch::Hybrid), Just(Branch::Vector)]
}

proptest! {
    #[test]
    fn classification_is_total(utterance in "\\PC{0,80}") {
        let config = RetrievalConfig::default();
        let c = classifier(&config).classify(&utterance);
        prop_assert!(c.params.limit >= 1 && c.params.limit <= config.max_limit);
        if let Some(year) = c.params.year {
            prop_assert!((2020..=2030).contains(&year));
        }
    }

    #[test]
    fn requested_limits_are_clamped(n in 0usize..10_000) {
        let config = RetrievalConfig::default();
        let c = classifier(&config).classify(&format!("top {n} linguagens"));
        prop_assert!(c.params.limit >= 1 && c.params.limit <= config.max_limit);
    }

    #[test]
    fn reverse_lookup_resolves_every_alias(surface in technology_surface()) {
        let config = RetrievalConfig::default();
        let classifier = classifier(&config);
        let c = classifier.classify(&format!("Quais empresas usam {surface}?"));
        prop_assert_eq!(c.intent, Intent::TechnologyReverseLookup);
        let expected = classifier.normalizer().normalize(surface).map(str::to_string);
        prop_assert_eq!(c.params.normalized_technology, expected);
    }

    #[test]
    fn similarity_decreases_with_distance(a in 0.0f64..1e3, delta in 1e-3f64..1e3) {
        let near = similarity(a);
        let far = similarity(a + delta);
        prop_assert!(near > far);
        prop_assert!(near <= 1.0 && far > 0.0);
    }

    #[test]
    fn confidence_rises_with_filled_results(
        branch in branch(),
        limit in 1usize..20,
        extra in 0usize..20,
    ) {
        let composer = ResponseComposer::new(
            ComposerConfig::default(),
            Arc::new(PrivacyFilter::new(PrivacyConfig::default())),
        );
        let mut previous = composer.confidence(&RetrievalResult::NoData);
        for n in 1..=limit {
            let score = composer.confidence(&found(branch, n, limit));
            prop_assert!((0.0..=1.0).contains(&score));
            prop_assert!(score > previous);
            previous = score;
        }
        let overfull = composer.confidence(&found(branch, limit + extra, limit));
        prop_assert!((overfull - previous).abs() < 1e-12);
    }
}
