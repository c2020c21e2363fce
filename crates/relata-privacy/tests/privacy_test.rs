//! Privacy filter over the fixture corpus.

use relata_core::config::PrivacyConfig;
use relata_core::retrieval::{Branch, Evidence, Fact, RetrievalResult};
use relata_privacy::PrivacyFilter;
use serde_json::Value;

fn contains_text(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.contains(needle),
        Value::Array(items) => items.iter().any(|v| contains_text(v, needle)),
        Value::Object(map) => map.values().any(|v| contains_text(v, needle)),
        _ => false,
    }
}

#[test]
fn corpus_payloads_lose_every_personal_field() {
    let filter = PrivacyFilter::default();
    for entry in test_fixtures::corpus() {
        let filtered = filter.filter_payload(&entry.payload);

        assert!(filtered.get("supervisor").is_none(), "{}", entry.folder);
        if let Some(intern) = filtered.get("estagiario") {
            let keys: Vec<&String> = intern.as_object().unwrap().keys().collect();
            assert!(keys.iter().all(|k| k.as_str() == "curso"), "{}: {keys:?}", entry.folder);
        }
        assert!(filter.audit_payload(&filtered).is_ok(), "{}", entry.folder);
        assert!(!contains_text(&filtered, "@"), "{}", entry.folder);
    }
}

#[test]
fn program_track_survives() {
    let filter = PrivacyFilter::default();
    let entry = &test_fixtures::corpus()[0];
    let filtered = filter.filter_payload(&entry.payload);
    assert_eq!(
        filtered.pointer("/estagiario/curso").and_then(Value::as_str),
        Some("Engenharia de Computação")
    );
    assert_eq!(
        filtered
            .pointer("/estagio/razao_social_empresa")
            .and_then(Value::as_str),
        Some("BANCO BTG PACTUAL S.A.")
    );
}

#[test]
fn free_text_identifiers_are_replaced_with_markers() {
    let filter = PrivacyFilter::default();
    let nubank = test_fixtures::corpus()
        .into_iter()
        .find(|e| e.folder == "2025-3Q-3roAno-1")
        .unwrap();
    let filtered = filter.filter_payload(&nubank.payload);
    let conclusion = filtered["conclusao"].as_str().unwrap();
    assert!(conclusion.contains("[EMAIL_REMOVED]"));
    assert!(conclusion.contains("[CPF_REMOVED]"));
    assert!(!conclusion.contains("123.456.789-09"));
}

#[test]
fn unfiltered_payload_fails_the_audit() {
    let filter = PrivacyFilter::default();
    let entry = &test_fixtures::corpus()[0];
    assert!(filter.audit_payload(&entry.payload).is_err());
}

#[test]
fn extra_sensitive_keys_are_configurable() {
    let filter = PrivacyFilter::new(PrivacyConfig {
        extra_sensitive_keys: vec!["area".to_string()],
        ..PrivacyConfig::default()
    });
    let entry = &test_fixtures::corpus()[0];
    let filtered = filter.filter_payload(&entry.payload);
    assert!(filtered.pointer("/estagio/area").is_none());
}

#[test]
fn retrieval_excerpts_are_scrubbed() {
    let filter = PrivacyFilter::default();
    let result = RetrievalResult::Found {
        branch: Branch::Vector,
        facts: vec![Fact::new("trecho", 0.8).with_evidence(Evidence {
            report_id: Some(1),
            excerpt: Some("Fale com ana@empresa.com ou (11) 91234-5678".to_string()),
            ..Evidence::default()
        })],
        limit: 5,
    };
    let filtered = filter.filter_retrieval(result);
    let excerpt = filtered.facts()[0].evidence[0].excerpt.as_deref().unwrap();
    assert!(filter.validate_safe(excerpt));
    assert!(excerpt.contains("[PHONE_REMOVED]"));
}
