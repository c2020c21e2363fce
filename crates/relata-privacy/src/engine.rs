use serde_json::Value;
use tracing::{debug, error};

use relata_core::config::PrivacyConfig;
use relata_core::errors::{RelataError, RelataResult};
use relata_core::traits::{ISanitizer, SanitizedText};
use relata_core::{Fact, Report, RetrievalResult};

use crate::patterns::{self, PiiPattern};
use crate::policy::{self, REPORT_POLICY};

/// Redacts personal data from report payloads, free text, and retrieval results.
///
/// Implements `ISanitizer` from relata-core. Every operation is idempotent:
/// markers contain no digits or `@`, so a second pass finds nothing to replace.
pub struct PrivacyFilter {
    config: PrivacyConfig,
    patterns: Vec<PiiPattern>,
}

impl PrivacyFilter {
    pub fn new(config: PrivacyConfig) -> Self {
        let patterns = patterns::pii::all_patterns(config.redact_institutional_id);
        Self { config, patterns }
    }

    /// Scrub free text.
    pub fn filter_text(&self, text: &str) -> SanitizedText {
        let matches = patterns::scan_all(text, &self.patterns);
        if matches.is_empty() {
            return SanitizedText {
                text: text.to_string(),
                redactions: Vec::new(),
            };
        }
        debug!(redactions = matches.len(), "scrubbed free text");
        SanitizedText {
            text: patterns::apply_replacements(text, &matches),
            redactions: patterns::to_redactions(&matches),
        }
    }

    /// Redacted copy of a report payload: path rules, then sensitive keys at any
    /// depth, then every string value scrubbed.
    pub fn filter_payload(&self, payload: &Value) -> Value {
        let mut out = payload.clone();
        policy::apply_policy(&mut out, REPORT_POLICY);
        policy::strip_sensitive_keys(&mut out, &self.config.extra_sensitive_keys);
        self.scrub_strings(&mut out);
        out
    }

    /// Redacted copy of a report. Metadata carries no personal data; the company
    /// name is scrubbed like any other free text.
    pub fn filter_report(&self, report: &Report) -> Report {
        Report {
            id: report.id,
            payload: self.filter_payload(&report.payload),
            metadata: report.metadata,
            company: report.company.as_deref().map(|c| self.filter_text(c).text),
            origin_folder: report.origin_folder.clone(),
            origin_file: report.origin_file.clone(),
        }
    }

    /// Scrub every label, excerpt, and company in a retrieval result.
    pub fn filter_retrieval(&self, result: RetrievalResult) -> RetrievalResult {
        match result {
            RetrievalResult::Found {
                branch,
                facts,
                limit,
            } => RetrievalResult::Found {
                branch,
                facts: facts.into_iter().map(|f| self.filter_fact(f)).collect(),
                limit,
            },
            other => other,
        }
    }

    fn filter_fact(&self, mut fact: Fact) -> Fact {
        fact.label = self.filter_text(&fact.label).text;
        for evidence in &mut fact.evidence {
            if let Some(excerpt) = evidence.excerpt.as_mut() {
                *excerpt = self.filter_text(excerpt).text;
            }
            if let Some(company) = evidence.company.as_mut() {
                *company = self.filter_text(company).text;
            }
        }
        fact
    }

    /// True when no personal-data pattern remains in `text`.
    pub fn validate_safe(&self, text: &str) -> bool {
        patterns::scan_all(text, &self.patterns).is_empty()
    }

    /// Fail closed if a filtered payload still violates the policy.
    pub fn audit_payload(&self, payload: &Value) -> RelataResult<()> {
        if let Some(field) = policy::find_violation(payload, &self.config.extra_sensitive_keys) {
            error!(field = %field, "privacy policy violation in outgoing payload");
            return Err(RelataError::PrivacyViolation { field });
        }
        if let Some(field) = self.first_unsafe_string(payload, String::new()) {
            error!(field = %field, "personal data left in outgoing payload");
            return Err(RelataError::PrivacyViolation { field });
        }
        Ok(())
    }

    fn scrub_strings(&self, value: &mut Value) {
        match value {
            Value::String(s) => {
                let scrubbed = self.filter_text(s);
                if !scrubbed.redactions.is_empty() {
                    *s = scrubbed.text;
                }
            }
            Value::Array(items) => items.iter_mut().for_each(|v| self.scrub_strings(v)),
            Value::Object(map) => map.values_mut().for_each(|v| self.scrub_strings(v)),
            _ => {}
        }
    }

    fn first_unsafe_string(&self, value: &Value, path: String) -> Option<String> {
        match value {
            Value::String(s) => (!self.validate_safe(s)).then_some(path),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .find_map(|(i, v)| self.first_unsafe_string(v, format!("{path}/{i}"))),
            Value::Object(map) => map
                .iter()
                .find_map(|(k, v)| self.first_unsafe_string(v, format!("{path}/{k}"))),
            _ => None,
        }
    }
}

impl Default for PrivacyFilter {
    fn default() -> Self {
        Self::new(PrivacyConfig::default())
    }
}

impl ISanitizer for PrivacyFilter {
    fn sanitize(&self, text: &str) -> SanitizedText {
        self.filter_text(text)
    }

    fn is_safe(&self, text: &str) -> bool {
        self.validate_safe(text)
    }
}
