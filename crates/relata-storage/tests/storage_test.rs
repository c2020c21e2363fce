//! Ingestion, report reads, vocabulary links, and invalid-row handling.

use relata_core::errors::{RelataError, StorageError};
use relata_core::retrieval::ReportFilter;
use relata_core::terms::{SectionKind, TermCategory};
use relata_core::traits::IReportStore;
use relata_core::{ProgramTrack, TermCode};
use relata_storage::StorageEngine;
use rusqlite::params;
use serde_json::json;

fn payload(company: &str) -> serde_json::Value {
    json!({
        "estagio": { "razao_social_empresa": company },
        "sobre_empresa": format!("{company} atua no mercado financeiro."),
        "atividades_realizadas": [
            { "descricao": "Desenvolvimento de APIs em Python" }
        ],
        "conclusao": "Foi uma boa experiência."
    })
}

#[test]
fn ingest_derives_metadata_from_folder() {
    let store = StorageEngine::open_in_memory().unwrap();
    let outcome = store
        .ingest_report("2025-2Q-3roAno-1", "relatorio.json", &payload("BANCO BTG PACTUAL S.A."))
        .unwrap();
    assert!(outcome.inserted);

    let report = store.get_report(outcome.id).unwrap().expect("stored report");
    assert_eq!(report.metadata.year, 2025);
    assert_eq!(report.metadata.term, TermCode::Q2);
    assert_eq!(report.metadata.track, ProgramTrack::ComputerEngineering);
    assert_eq!(report.company.as_deref(), Some("BANCO BTG PACTUAL S.A."));
    assert_eq!(report.origin_folder, "2025-2Q-3roAno-1");
}

#[test]
fn reingesting_same_file_is_a_no_op() {
    let store = StorageEngine::open_in_memory().unwrap();
    let first = store
        .ingest_report("2025-2Q-3roAno-1", "a.json", &payload("ACME"))
        .unwrap();
    let second = store
        .ingest_report("2025-2Q-3roAno-1", "a.json", &payload("ACME"))
        .unwrap();
    assert!(!second.inserted);
    assert_eq!(first.id, second.id);

    let other_folder = store
        .ingest_report("2025-3Q-3roAno-1", "a.json", &payload("ACME"))
        .unwrap();
    assert!(other_folder.inserted);
}

#[test]
fn invalid_folder_is_rejected() {
    let store = StorageEngine::open_in_memory().unwrap();
    let err = store
        .ingest_report("2025-1S-9roAno-1", "a.json", &payload("ACME"))
        .unwrap_err();
    assert!(matches!(err, RelataError::InvalidMetadata { .. }));
}

#[test]
fn missing_report_is_none() {
    let store = StorageEngine::open_in_memory().unwrap();
    assert!(store.get_report(999).unwrap().is_none());
}

#[test]
fn rows_with_invalid_metadata_are_skipped() {
    let store = StorageEngine::open_in_memory().unwrap();
    let good = store
        .ingest_report("2025-2Q-3roAno-1", "a.json", &payload("ACME"))
        .unwrap();
    // A semestral term on the computer engineering track cannot come from ingest.
    let bad_id = store
        .with_writer(|conn| {
            conn.execute(
                "INSERT INTO reports (payload, year, term_code, academic_year, ordinal, track,
                                      company, company_key, origin_folder, origin_file)
                 VALUES ('{}', 2025, '1S', '3°', 1, ?1, 'ACME', 'acme', 'x', 'y')",
                params![ProgramTrack::ComputerEngineering.label()],
            )
            .unwrap();
            Ok(conn.last_insert_rowid())
        })
        .unwrap();

    assert!(store.get_report(bad_id).unwrap().is_none());
    assert_eq!(store.count_invalid_reports().unwrap(), 1);

    let filter = ReportFilter {
        company: Some("acme".into()),
        ..ReportFilter::default()
    };
    let reports = store.reports_for_company(&filter, 10).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].id, good.id);
}

#[test]
fn company_filter_is_accent_and_case_insensitive() {
    let store = StorageEngine::open_in_memory().unwrap();
    store
        .ingest_report(
            "2025-1Q-4roAno-2",
            "cip.json",
            &payload("CIP - CENTRO DE INFORMAÇÃO E PROCESSAMENTO"),
        )
        .unwrap();
    let filter = ReportFilter {
        company: Some("informacao".into()),
        ..ReportFilter::default()
    };
    assert_eq!(store.reports_for_company(&filter, 5).unwrap().len(), 1);
}

#[test]
fn company_reports_come_most_recent_first() {
    let store = StorageEngine::open_in_memory().unwrap();
    store
        .ingest_report("2023-2Q-2roAno-1", "old.json", &payload("ACME"))
        .unwrap();
    let newest = store
        .ingest_report("2025-3Q-3roAno-1", "new.json", &payload("ACME"))
        .unwrap();
    store
        .ingest_report("2025-1Q-3roAno-1", "mid.json", &payload("ACME"))
        .unwrap();

    let filter = ReportFilter {
        company: Some("ACME".into()),
        ..ReportFilter::default()
    };
    let reports = store.reports_for_company(&filter, 2).unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].id, newest.id);
    assert_eq!(reports[1].metadata.term, TermCode::Q1);
}

#[test]
fn seed_vocabulary_is_loaded() {
    let store = StorageEngine::open_in_memory().unwrap();
    let terms = store.known_terms().unwrap();
    assert!(terms
        .iter()
        .any(|t| t.normalized == "python" && t.category == TermCategory::Language));
    assert!(terms.iter().any(|t| t.normalized == "spring_boot"));
}

#[test]
fn linking_an_unknown_term_is_an_integrity_anomaly() {
    let store = StorageEngine::open_in_memory().unwrap();
    let report = store
        .ingest_report("2025-2Q-3roAno-1", "a.json", &payload("ACME"))
        .unwrap();
    let err = store
        .link_term(report.id, "cobol_2099", SectionKind::Activities, 1)
        .unwrap_err();
    assert!(matches!(
        err,
        RelataError::StorageError(StorageError::IntegrityAnomaly { .. })
    ));
}

#[test]
fn custom_terms_can_be_added_and_linked() {
    let store = StorageEngine::open_in_memory().unwrap();
    let report = store
        .ingest_report("2025-2Q-3roAno-1", "a.json", &payload("ACME"))
        .unwrap();
    let id = store
        .insert_term("Airflow", TermCategory::Tool, "airflow", Some("workflow scheduler"))
        .unwrap();
    let again = store
        .insert_term("Airflow", TermCategory::Tool, "airflow", None)
        .unwrap();
    assert_eq!(id, again);
    store
        .link_term(report.id, "airflow", SectionKind::Activities, 2)
        .unwrap();
    store
        .link_term(report.id, "airflow", SectionKind::Activities, 1)
        .unwrap();

    let links = store.report_links(report.id).unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].term_id, id);
    assert_eq!(links[0].section, SectionKind::Activities);
    assert_eq!(links[0].frequency, 3);
}

#[test]
fn known_companies_lists_distinct_names() {
    let store = StorageEngine::open_in_memory().unwrap();
    store
        .ingest_report("2025-2Q-3roAno-1", "a.json", &payload("ACME"))
        .unwrap();
    store
        .ingest_report("2025-3Q-3roAno-1", "b.json", &payload("ACME"))
        .unwrap();
    store
        .ingest_report("2024-2S-5roAno-1", "c.json", &json!({ "conclusao": "sem empresa" }))
        .unwrap();
    assert_eq!(store.known_companies().unwrap(), vec!["ACME".to_string()]);
}
