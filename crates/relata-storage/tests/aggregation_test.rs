//! Rankings, reverse lookup, and summary counts over a small hand-built corpus.

use relata_core::intent::Direction;
use relata_core::retrieval::ReportFilter;
use relata_core::terms::{SectionKind, TermCategory};
use relata_core::traits::IReportStore;
use relata_core::ProgramTrack;
use relata_storage::StorageEngine;
use serde_json::json;

fn add(store: &StorageEngine, folder: &str, file: &str, company: &str, terms: &[(&str, u32)]) -> i64 {
    let outcome = store
        .ingest_report(
            folder,
            file,
            &json!({ "estagio": { "razao_social_empresa": company } }),
        )
        .unwrap();
    for (term, frequency) in terms {
        store
            .link_term(outcome.id, term, SectionKind::Activities, *frequency)
            .unwrap();
    }
    outcome.id
}

fn corpus() -> StorageEngine {
    let store = StorageEngine::open_in_memory().unwrap();
    add(&store, "2025-2Q-3roAno-1", "btg.json", "BANCO BTG PACTUAL S.A.", &[("python", 4), ("sql", 2), ("docker", 1)]);
    add(&store, "2025-1Q-4roAno-2", "cip.json", "CIP - CENTRO DE INFORMAÇÃO E PROCESSAMENTO", &[("java", 3), ("kotlin", 1), ("python", 1)]);
    add(&store, "2025-3Q-3roAno-1", "nu.json", "NU PAGAMENTOS S.A.", &[("kotlin", 2), ("python", 2)]);
    add(&store, "2024-3Q-4roAno-1", "btg2.json", "BTG Pactual", &[("python", 2), ("react", 2)]);
    add(&store, "2024-2S-5roAno-1", "weg.json", "WEG S.A.", &[("c", 3), ("matlab", 2)]);
    store
}

fn languages(year: Option<i32>) -> ReportFilter {
    ReportFilter {
        year,
        categories: vec![TermCategory::Language],
        ..ReportFilter::default()
    }
}

#[test]
fn term_ranking_orders_by_occurrences_then_key() {
    let store = corpus();
    let ranking = store
        .term_ranking(&languages(Some(2025)), Direction::Most, 10)
        .unwrap();
    let keys: Vec<&str> = ranking.iter().map(|t| t.normalized.as_str()).collect();
    assert_eq!(keys, vec!["python", "java", "kotlin", "sql"]);
    assert_eq!(ranking[0].occurrences, 7);
    assert_eq!(ranking[0].reports, 3);
}

#[test]
fn term_ranking_least_reverses_counts_but_not_tiebreak() {
    let store = corpus();
    let ranking = store
        .term_ranking(&languages(Some(2025)), Direction::Least, 2)
        .unwrap();
    let keys: Vec<&str> = ranking.iter().map(|t| t.normalized.as_str()).collect();
    assert_eq!(keys, vec!["sql", "java"]);
}

#[test]
fn category_filter_excludes_other_categories() {
    let store = corpus();
    let ranking = store
        .term_ranking(&languages(None), Direction::Most, 50)
        .unwrap();
    assert!(ranking.iter().all(|t| t.category == TermCategory::Language));
    assert!(!ranking.iter().any(|t| t.normalized == "docker"));
}

#[test]
fn track_filter_limits_to_program() {
    let store = corpus();
    let filter = ReportFilter {
        track: Some(ProgramTrack::ElectricalEngineering),
        ..languages(None)
    };
    let ranking = store.term_ranking(&filter, Direction::Most, 10).unwrap();
    let keys: Vec<&str> = ranking.iter().map(|t| t.normalized.as_str()).collect();
    assert_eq!(keys, vec!["c", "matlab"]);
}

#[test]
fn company_ranking_folds_aliases() {
    let store = corpus();
    let ranking = store
        .company_ranking(&ReportFilter::default(), Direction::Most, 10)
        .unwrap();
    assert_eq!(ranking[0].company, "BANCO BTG PACTUAL S.A.");
    assert_eq!(ranking[0].reports, 2);
    assert_eq!(ranking.len(), 4);
}

#[test]
fn reverse_lookup_returns_distinct_companies() {
    let store = corpus();
    let usage = store
        .companies_using_term("kotlin", &ReportFilter::default())
        .unwrap();
    let names: Vec<&str> = usage.iter().map(|u| u.company.as_str()).collect();
    assert_eq!(
        names,
        vec!["CIP - CENTRO DE INFORMAÇÃO E PROCESSAMENTO", "NU PAGAMENTOS S.A."]
    );

    let python = store
        .companies_using_term("Python", &ReportFilter::default())
        .unwrap();
    let btg = python
        .iter()
        .find(|u| u.company == "BANCO BTG PACTUAL S.A.")
        .unwrap();
    assert_eq!(btg.reports, 2);
    assert_eq!(btg.years, vec![2025, 2024]);
}

#[test]
fn unknown_term_has_no_companies() {
    let store = corpus();
    assert!(store
        .companies_using_term("fortran", &ReportFilter::default())
        .unwrap()
        .is_empty());
}

#[test]
fn summary_counts_reports_companies_and_years() {
    let store = corpus();
    let summary = store.summary(&ReportFilter::default()).unwrap();
    assert_eq!(summary.total_reports, 5);
    assert_eq!(summary.total_companies, 4);
    assert!(summary.total_terms > 20);
    assert_eq!(summary.by_year, vec![(2024, 2), (2025, 3)]);
    assert!(summary
        .by_track
        .contains(&(ProgramTrack::ElectricalEngineering.label().to_string(), 1)));
    assert!(summary.by_category.iter().any(|(c, n)| c == "linguagem" && *n >= 6));

    let only_2024 = store
        .summary(&ReportFilter {
            year: Some(2024),
            ..ReportFilter::default()
        })
        .unwrap();
    assert_eq!(only_2024.total_reports, 2);
}
