//! Retrieval results, answers, and the statistics shapes exposed to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::intent::Intent;
use crate::report::ProgramTrack;
use crate::terms::{SectionKind, TermCategory};

/// Which retrieval path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    Structured,
    Hybrid,
    Vector,
}

/// Supporting evidence for a fact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub report_id: Option<i64>,
    pub section: Option<SectionKind>,
    pub company: Option<String>,
    pub year: Option<i32>,
    pub term: Option<String>,
    /// Free text taken from a report. Always privacy-filtered before leaving the core.
    pub excerpt: Option<String>,
}

/// One retrieved fact with its weight (a count for aggregations, a similarity for search).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub label: String,
    /// Grouping for multi-part answers such as statistics ("ano", "curso").
    pub group: Option<String>,
    pub evidence: Vec<Evidence>,
    pub weight: f64,
    /// Secondary count shown next to the weight (e.g. distinct reports).
    pub detail: Option<u64>,
}

impl Fact {
    pub fn new(label: impl Into<String>, weight: f64) -> Self {
        Self {
            label: label.into(),
            group: None,
            evidence: Vec::new(),
            weight,
            detail: None,
        }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_detail(mut self, detail: u64) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence.push(evidence);
        self
    }
}

/// Dispatcher output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RetrievalResult {
    /// Ordered facts from one branch.
    Found {
        branch: Branch,
        facts: Vec<Fact>,
        /// Result count that was asked for.
        limit: usize,
    },
    /// A well-formed question with an empty legitimate answer.
    NoData,
    /// Every retrieval collaborator failed.
    Unavailable,
}

impl RetrievalResult {
    pub fn facts(&self) -> &[Fact] {
        match self {
            Self::Found { facts, .. } => facts,
            _ => &[],
        }
    }

    pub fn branch(&self) -> Option<Branch> {
        match self {
            Self::Found { branch, .. } => Some(*branch),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// A report cited by an answer. Carries no personal fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub report_id: i64,
    pub company: Option<String>,
    pub relevance: f64,
}

/// Final reply handed to the API layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub confidence: f64,
    pub intent: Intent,
    pub sources: Vec<Source>,
}

/// Optional filters supplied by the caller alongside an utterance.
/// Values found in the utterance itself take precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerFilters {
    pub year: Option<i32>,
    pub track: Option<ProgramTrack>,
    pub company: Option<String>,
}

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
}

/// Prior conversation turn, read-only context owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Filters for store reads. Every field is optional; set fields combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub year: Option<i32>,
    pub track: Option<ProgramTrack>,
    /// Substring of the company name, matched accent- and case-insensitively.
    pub company: Option<String>,
    /// Report must be associated with this normalized term.
    pub term: Option<String>,
    /// Term categories for term aggregations; empty means no category restriction.
    pub categories: Vec<TermCategory>,
}

/// Occurrence totals for one normalized term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermCount {
    pub normalized: String,
    pub category: TermCategory,
    /// Sum of per-section frequencies.
    pub occurrences: u64,
    /// Distinct reports mentioning the term.
    pub reports: u64,
}

/// Report count for one canonical company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyCount {
    pub company: String,
    pub reports: u64,
}

/// A company whose reports mention a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyUsage {
    pub company: String,
    pub reports: u64,
    pub years: Vec<i32>,
    pub terms: Vec<String>,
}

/// One stored section ranked by distance to a query vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionHit {
    pub embedding_id: i64,
    pub report_id: i64,
    pub section: SectionKind,
    pub content: String,
    pub company: Option<String>,
    pub year: i32,
    pub term: String,
    /// Euclidean distance to the query vector.
    pub distance: f64,
}

/// Corpus-wide counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_reports: u64,
    pub total_companies: u64,
    /// Distinct normalized keys in the vocabulary.
    pub total_terms: u64,
    pub by_year: Vec<(i32, u64)>,
    pub by_track: Vec<(String, u64)>,
    /// Distinct normalized terms linked to the selected reports, per category.
    pub by_category: Vec<(String, u64)>,
}

/// Named statistics supported by `get_stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsMetric {
    Summary,
    TopTechnologies,
    TopCompanies,
    ReportsByYear,
    ReportsByCourse,
    TechnologiesByType,
    ProgrammingLanguages,
    Frameworks,
    Methodologies,
}

impl StatsMetric {
    pub const ALL: [StatsMetric; 9] = [
        StatsMetric::Summary,
        StatsMetric::TopTechnologies,
        StatsMetric::TopCompanies,
        StatsMetric::ReportsByYear,
        StatsMetric::ReportsByCourse,
        StatsMetric::TechnologiesByType,
        StatsMetric::ProgrammingLanguages,
        StatsMetric::Frameworks,
        StatsMetric::Methodologies,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::TopTechnologies => "top_technologies",
            Self::TopCompanies => "top_companies",
            Self::ReportsByYear => "reports_by_year",
            Self::ReportsByCourse => "reports_by_course",
            Self::TechnologiesByType => "technologies_by_type",
            Self::ProgrammingLanguages => "programming_languages",
            Self::Frameworks => "frameworks",
            Self::Methodologies => "methodologies",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

/// Filters accepted by `get_stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsFilters {
    pub year: Option<i32>,
    pub track: Option<ProgramTrack>,
    pub company: Option<String>,
    pub category: Option<TermCategory>,
    pub limit: Option<usize>,
}

/// One labelled count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    pub label: String,
    pub count: u64,
    pub group: Option<String>,
}

/// `get_stats` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResult {
    pub metric: StatsMetric,
    pub entries: Vec<StatEntry>,
    pub total_reports: u64,
    pub summary: Option<StatsSummary>,
}
