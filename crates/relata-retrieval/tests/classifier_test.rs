//! Golden utterances against a classifier built from the fixture corpus.

use std::sync::Arc;

use relata_core::config::RetrievalConfig;
use relata_core::intent::{Direction, Intent};
use relata_core::text::fold;
use relata_core::traits::IReportStore;
use relata_retrieval::{IntentClassifier, TermNormalizer};
use test_fixtures::{golden_queries, seeded_store};

fn classifier() -> IntentClassifier {
    let store = seeded_store();
    let terms = store.known_terms().unwrap();
    let companies = store.known_companies().unwrap();
    IntentClassifier::new(
        Arc::new(TermNormalizer::new(&terms)),
        &companies,
        &RetrievalConfig::default(),
    )
}

#[test]
fn golden_utterances_classify_as_expected() {
    let classifier = classifier();
    for golden in golden_queries() {
        let c = classifier.classify(&golden.utterance);
        assert_eq!(
            c.intent.as_str(),
            golden.intent,
            "{:?} fired rule {}",
            golden.utterance,
            c.rule
        );
        assert_eq!(c.params.year, golden.year, "year of {:?}", golden.utterance);
        if let Some(tech) = &golden.technology {
            assert_eq!(
                c.params.normalized_technology.as_deref(),
                Some(tech.as_str()),
                "technology of {:?}",
                golden.utterance
            );
        }
        if let Some(company) = &golden.company {
            let got = c.params.company.as_deref().map(fold);
            assert_eq!(got, Some(fold(company)), "company of {:?}", golden.utterance);
        }
    }
}

#[test]
fn technology_with_company_context_beats_ranking_words() {
    let c = classifier().classify("Qual empresa usa a linguagem Kotlin?");
    assert_eq!(c.intent, Intent::TechnologyReverseLookup);
    assert_eq!(c.params.normalized_technology.as_deref(), Some("kotlin"));
}

#[test]
fn company_plus_least_resolves_to_one_ranking() {
    let c = classifier().classify("Qual a tecnologia menos usada pela Siemens?");
    assert_eq!(c.intent, Intent::TechnologyRanking);
    assert_eq!(c.params.direction, Direction::Least);
    assert_eq!(c.params.category, None);
    assert_eq!(c.params.company.as_deref(), Some("Siemens"));
}

#[test]
fn least_companies_keep_company_ranking() {
    let c = classifier().classify("Quais empresas têm menos estagiários?");
    assert_eq!(c.intent, Intent::CompanyRanking);
    assert_eq!(c.params.direction, Direction::Least);
}

#[test]
fn explicit_limits_are_read() {
    let c = classifier().classify("Quais as 3 linguagens mais usadas?");
    assert_eq!(c.params.limit, 3);
    let c = classifier().classify("top 2 frameworks");
    assert_eq!(c.params.limit, 2);
}

#[test]
fn track_mentions_become_filters() {
    let c = classifier().classify("Linguagens mais usadas na engenharia elétrica");
    assert_eq!(c.intent, Intent::TechnologyRanking);
    assert_eq!(
        c.params.track,
        Some(relata_core::report::ProgramTrack::ElectricalEngineering)
    );
}
