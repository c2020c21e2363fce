//! Report record, derived metadata, and company naming.

mod company;
mod metadata;

pub use company::canonical_company;
pub use metadata::{AcademicYear, ProgramTrack, ReportMetadata, TermCode};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::terms::SectionKind;

/// One internship report. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    /// Full structured payload as extracted from the source document.
    pub payload: Value,
    pub metadata: ReportMetadata,
    pub company: Option<String>,
    pub origin_folder: String,
    pub origin_file: String,
}

impl Report {
    /// Company legal name from the payload: `estagio.razao_social_empresa`, then
    /// the top-level `empresa_razao_social`.
    pub fn company_from_payload(payload: &Value) -> Option<String> {
        payload
            .pointer("/estagio/razao_social_empresa")
            .and_then(Value::as_str)
            .or_else(|| payload.get("empresa_razao_social").and_then(Value::as_str))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Company tax id from the payload, when present.
    pub fn cnpj_from_payload(payload: &Value) -> Option<String> {
        payload
            .pointer("/estagio/cnpj")
            .and_then(Value::as_str)
            .or_else(|| payload.get("empresa_cnpj").and_then(Value::as_str))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Plain text of one named section.
    ///
    /// Activities are joined one entry per line from each entry's description,
    /// role, and tasks.
    pub fn section_text(&self, section: SectionKind) -> Option<String> {
        let node = self.payload.get(section.as_str())?;
        let text = match node {
            Value::String(s) => s.trim().to_string(),
            Value::Array(entries) => entries
                .iter()
                .filter_map(activity_line)
                .collect::<Vec<_>>()
                .join("\n"),
            Value::Object(_) => activity_line(node).unwrap_or_default(),
            _ => String::new(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn activity_line(entry: &Value) -> Option<String> {
    if let Some(s) = entry.as_str() {
        return Some(s.trim().to_string()).filter(|s| !s.is_empty());
    }
    let parts: Vec<String> = ["descricao", "papel_exercido", "tarefas_realizadas"]
        .iter()
        .filter_map(|key| match entry.get(*key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Array(items) => {
                let joined = items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join("; ");
                (!joined.is_empty()).then_some(joined)
            }
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(payload: Value) -> Report {
        Report {
            id: 1,
            payload,
            metadata: ReportMetadata::from_folder_name("2025-2Q-3roAno-1").unwrap(),
            company: None,
            origin_folder: "2025-2Q-3roAno-1".to_string(),
            origin_file: "a.json".to_string(),
        }
    }

    #[test]
    fn company_prefers_internship_record() {
        let payload = json!({
            "estagio": { "razao_social_empresa": " Banco BTG Pactual S.A. " },
            "empresa_razao_social": "Outro"
        });
        assert_eq!(
            Report::company_from_payload(&payload).as_deref(),
            Some("Banco BTG Pactual S.A.")
        );
        let fallback = json!({ "empresa_razao_social": "CIP" });
        assert_eq!(Report::company_from_payload(&fallback).as_deref(), Some("CIP"));
        assert_eq!(Report::company_from_payload(&json!({})), None);
    }

    #[test]
    fn activities_section_joins_entries() {
        let r = report(json!({
            "atividades_realizadas": [
                { "descricao": "API em Python", "tarefas_realizadas": ["testes", "deploy"] },
                { "descricao": "Dashboard React" }
            ]
        }));
        let text = r.section_text(SectionKind::Activities).unwrap();
        assert_eq!(text, "API em Python | testes; deploy\nDashboard React");
    }

    #[test]
    fn missing_or_empty_section_is_none() {
        let r = report(json!({ "conclusao": "  " }));
        assert!(r.section_text(SectionKind::Conclusion).is_none());
        assert!(r.section_text(SectionKind::CompanyDescription).is_none());
    }
}
