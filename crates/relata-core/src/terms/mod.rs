//! Technical vocabulary, report sections, and their associations.

mod seed;

pub use seed::SEED_TERMS;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a technical term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermCategory {
    Language,
    Framework,
    Tool,
    Platform,
    Database,
    Practice,
    ProjectType,
}

impl TermCategory {
    pub const ALL: [TermCategory; 7] = [
        TermCategory::Language,
        TermCategory::Framework,
        TermCategory::Tool,
        TermCategory::Platform,
        TermCategory::Database,
        TermCategory::Practice,
        TermCategory::ProjectType,
    ];

    /// Categories counted by technology rankings.
    pub const TECHNOLOGY: [TermCategory; 3] = [
        TermCategory::Language,
        TermCategory::Framework,
        TermCategory::Tool,
    ];

    /// Stored column value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Language => "linguagem",
            Self::Framework => "framework",
            Self::Tool => "ferramenta",
            Self::Platform => "plataforma",
            Self::Database => "banco_dados",
            Self::Practice => "tecnica",
            Self::ProjectType => "tipo_projeto",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s || format!("{c:?}").eq_ignore_ascii_case(&s))
    }

    pub fn is_technology(self) -> bool {
        Self::TECHNOLOGY.contains(&self)
    }
}

impl fmt::Display for TermCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonical vocabulary entry. Several surface forms may share one normalized key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalTerm {
    pub id: i64,
    /// Raw surface form ("Spring Boot").
    pub term: String,
    pub category: TermCategory,
    /// Canonical key ("spring_boot").
    pub normalized: String,
    pub description: Option<String>,
}

/// Named report section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionKind {
    #[serde(rename = "sobre_empresa")]
    CompanyDescription,
    #[serde(rename = "atividades_realizadas")]
    Activities,
    #[serde(rename = "conclusao")]
    Conclusion,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [
        SectionKind::CompanyDescription,
        SectionKind::Activities,
        SectionKind::Conclusion,
    ];

    /// Payload key and stored column value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CompanyDescription => "sobre_empresa",
            Self::Activities => "atividades_realizadas",
            Self::Conclusion => "conclusao",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s.trim())
    }
}

/// Weighted edge between a report and a term, unique per (report, term, section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTermLink {
    pub report_id: i64,
    pub term_id: i64,
    pub section: SectionKind,
    pub frequency: u32,
}

/// Stored vector for one section of one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionEmbedding {
    pub id: i64,
    pub report_id: i64,
    pub section: SectionKind,
    pub content: String,
    pub embedding: Vec<f32>,
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_accepts_stored_and_variant_names() {
        assert_eq!(TermCategory::parse("banco_dados"), Some(TermCategory::Database));
        assert_eq!(TermCategory::parse("Framework"), Some(TermCategory::Framework));
        assert_eq!(TermCategory::parse("projecttype"), Some(TermCategory::ProjectType));
        assert_eq!(TermCategory::parse("outro"), None);
    }

    #[test]
    fn technology_categories() {
        assert!(TermCategory::Tool.is_technology());
        assert!(!TermCategory::Platform.is_technology());
    }

    #[test]
    fn section_round_trips_through_column_value() {
        for kind in SectionKind::ALL {
            assert_eq!(SectionKind::parse(kind.as_str()), Some(kind));
        }
    }
}
