//! Response Composer: deterministic Portuguese text, a confidence score, and the
//! cited sources for a retrieval result.
//!
//! Input is already privacy-filtered. The outgoing text is checked once more and
//! re-filtered if any personal-data pattern slipped through, and an optional
//! polisher's rewrite goes through the same filter.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use tracing::{debug, warn};

use relata_core::config::ComposerConfig;
use relata_core::intent::{Classification, Direction, Intent, QueryParams};
use relata_core::retrieval::{Answer, Branch, Fact, RetrievalResult, Source};
use relata_core::terms::TermCategory;
use relata_core::traits::IResponsePolisher;
use relata_privacy::PrivacyFilter;

use crate::bounded::run_bounded;

pub const NO_DATA_TEXT: &str = "Não encontrei dados suficientes para responder sua pergunta.";

pub const HELP_TEXT: &str = "Você pode perguntar sobre:\n\
- Linguagens de programação mais usadas\n\
- Empresas que oferecem mais estágios\n\
- Frameworks mais populares\n\
- Estatísticas gerais";

pub const UNAVAILABLE_TEXT: &str =
    "O sistema está indisponível no momento. Tente novamente em instantes.";

pub struct ResponseComposer {
    config: ComposerConfig,
    privacy: Arc<PrivacyFilter>,
    polisher: Option<Arc<dyn IResponsePolisher>>,
}

impl ResponseComposer {
    pub fn new(config: ComposerConfig, privacy: Arc<PrivacyFilter>) -> Self {
        Self {
            config,
            privacy,
            polisher: None,
        }
    }

    pub fn with_polisher(mut self, polisher: Arc<dyn IResponsePolisher>) -> Self {
        self.polisher = Some(polisher);
        self
    }

    /// Text, confidence, and sources for `result`.
    pub async fn compose(
        &self,
        utterance: &str,
        classification: &Classification,
        result: &RetrievalResult,
    ) -> Answer {
        let mut text = self.draft(classification, result);
        if result.is_found() {
            text = self.polish(utterance, text).await;
        }
        if !self.privacy.validate_safe(&text) {
            warn!(intent = %classification.intent, "composed text failed the safety check; re-filtering");
            text = self.privacy.filter_text(&text).text;
        }
        Answer {
            text,
            confidence: self.confidence(result),
            intent: classification.intent,
            sources: sources(result),
        }
    }

    /// Confidence in [0, 1]. Rises with the branch (structured > hybrid > vector)
    /// and with the share of the requested limit that was filled.
    pub fn confidence(&self, result: &RetrievalResult) -> f64 {
        let c = &self.config;
        let score = match result {
            RetrievalResult::Unavailable => c.unavailable_confidence,
            RetrievalResult::NoData => c.no_data_confidence,
            RetrievalResult::Found {
                branch,
                facts,
                limit,
            } => {
                let base = match branch {
                    Branch::Structured => c.structured_confidence,
                    Branch::Hybrid => c.hybrid_confidence,
                    Branch::Vector => c.vector_confidence,
                };
                let limit = (*limit).max(1);
                let fill = facts.len().min(limit) as f64 / limit as f64;
                c.no_data_confidence + (base - c.no_data_confidence) * (0.5 + 0.5 * fill)
            }
        };
        score.clamp(0.0, 1.0)
    }

    /// Deterministic text for `result`.
    pub fn draft(&self, classification: &Classification, result: &RetrievalResult) -> String {
        let params = &classification.params;
        match result {
            RetrievalResult::Unavailable => UNAVAILABLE_TEXT.to_string(),
            RetrievalResult::NoData if classification.intent == Intent::OpenSearch => {
                format!("{NO_DATA_TEXT}\n\n{HELP_TEXT}")
            }
            RetrievalResult::NoData => NO_DATA_TEXT.to_string(),
            RetrievalResult::Found { branch, facts, .. } => {
                match layout_for(classification.intent, *branch, params) {
                    Layout::Passages => passages(facts),
                    Layout::TermRanking => term_ranking(params, facts),
                    Layout::CompanyRanking => company_ranking(params, facts),
                    Layout::ReverseLookup => reverse_lookup(params, facts),
                    Layout::Activities => activities(params, facts),
                    Layout::Summary => summary(facts),
                }
            }
        }
    }

    async fn polish(&self, utterance: &str, draft: String) -> String {
        let Some(polisher) = self.polisher.clone() else {
            return draft;
        };
        let name = polisher.name().to_string();
        let (question, text) = (utterance.to_string(), draft.clone());
        let polished = run_bounded("polish", self.config.polish_timeout_ms, move || {
            polisher.polish(&question, &text)
        })
        .await;
        match polished {
            Ok(out) if !out.trim().is_empty() => {
                debug!(polisher = %name, "draft polished");
                self.privacy.filter_text(out.trim()).text
            }
            Ok(_) => {
                warn!(polisher = %name, "polisher returned nothing; keeping draft");
                draft
            }
            Err(e) => {
                warn!(polisher = %name, error = %e, "polisher failed; keeping draft");
                draft
            }
        }
    }
}

/// Reports cited by a result, best relevance first, one entry per report.
pub fn sources(result: &RetrievalResult) -> Vec<Source> {
    let RetrievalResult::Found { branch, facts, .. } = result else {
        return Vec::new();
    };
    let mut best: HashMap<i64, Source> = HashMap::new();
    for fact in facts {
        let relevance = match branch {
            Branch::Structured => 1.0,
            _ => fact.weight.clamp(0.0, 1.0),
        };
        for evidence in &fact.evidence {
            let Some(report_id) = evidence.report_id else {
                continue;
            };
            let entry = best.entry(report_id).or_insert_with(|| Source {
                report_id,
                company: evidence.company.clone(),
                relevance,
            });
            if relevance > entry.relevance {
                entry.relevance = relevance;
            }
        }
    }
    let mut out: Vec<Source> = best.into_values().collect();
    out.sort_by(|a, b| {
        b.relevance
            .total_cmp(&a.relevance)
            .then_with(|| a.report_id.cmp(&b.report_id))
    });
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Passages,
    TermRanking,
    CompanyRanking,
    ReverseLookup,
    Activities,
    Summary,
}

fn layout_for(intent: Intent, branch: Branch, params: &QueryParams) -> Layout {
    if branch == Branch::Vector {
        return Layout::Passages;
    }
    match intent {
        Intent::TechnologyRanking => Layout::TermRanking,
        Intent::CompanyRanking => Layout::CompanyRanking,
        Intent::TechnologyReverseLookup => Layout::ReverseLookup,
        Intent::CompanyActivities => Layout::Activities,
        Intent::GeneralStatistics => Layout::Summary,
        Intent::OpenSearch if params.normalized_technology.is_some() => Layout::ReverseLookup,
        Intent::OpenSearch => Layout::Activities,
    }
}

/// Plural noun for a ranking subject and whether it is feminine.
fn subject(category: Option<TermCategory>) -> (&'static str, bool) {
    match category {
        Some(TermCategory::Language) => ("linguagens de programação", true),
        Some(TermCategory::Framework) => ("frameworks", false),
        Some(TermCategory::Tool) => ("ferramentas", true),
        Some(TermCategory::Platform) => ("plataformas", true),
        Some(TermCategory::Database) => ("bancos de dados", false),
        Some(TermCategory::Practice) => ("metodologias", true),
        Some(TermCategory::ProjectType) => ("tipos de projeto", false),
        None => ("tecnologias", true),
    }
}

fn category_label(stored: &str) -> String {
    let label = match TermCategory::parse(stored) {
        Some(TermCategory::Language) => "Linguagens",
        Some(TermCategory::Framework) => "Frameworks",
        Some(TermCategory::Tool) => "Ferramentas",
        Some(TermCategory::Platform) => "Plataformas",
        Some(TermCategory::Database) => "Bancos de dados",
        Some(TermCategory::Practice) => "Metodologias",
        Some(TermCategory::ProjectType) => "Tipos de projeto",
        None => stored,
    };
    label.to_string()
}

fn plural(n: u64, one: &str, many: &str) -> String {
    if n == 1 {
        format!("1 {one}")
    } else {
        format!("{n} {many}")
    }
}

fn scope(params: &QueryParams) -> String {
    let mut out = String::new();
    if let Some(company) = params.company.as_deref() {
        let _ = write!(out, " na empresa {company}");
    }
    if let Some(track) = params.track {
        let _ = write!(out, " ({track})");
    }
    if let Some(year) = params.year {
        let _ = write!(out, " em {year}");
    }
    out
}

fn term_ranking(params: &QueryParams, facts: &[Fact]) -> String {
    let (noun, feminine) = subject(params.category);
    let (article, used) = if feminine {
        ("As", "utilizadas")
    } else {
        ("Os", "utilizados")
    };
    let order = match params.direction {
        Direction::Most => "mais",
        Direction::Least => "menos",
    };
    let mut out = format!("{article} {noun} {order} {used}{}:", scope(params));
    for (i, fact) in facts.iter().enumerate() {
        let occurrences = plural(fact.weight as u64, "ocorrência", "ocorrências");
        match fact.detail {
            Some(reports) => {
                let reports = plural(reports, "relatório", "relatórios");
                let _ = write!(out, "\n{}. {} ({occurrences} em {reports})", i + 1, fact.label);
            }
            None => {
                let _ = write!(out, "\n{}. {} ({occurrences})", i + 1, fact.label);
            }
        }
    }
    out
}

fn company_ranking(params: &QueryParams, facts: &[Fact]) -> String {
    let order = match params.direction {
        Direction::Most => "mais",
        Direction::Least => "menos",
    };
    let mut out = format!("As empresas com {order} estagiários{}:", scope(params));
    for (i, fact) in facts.iter().enumerate() {
        let reports = plural(fact.weight as u64, "relatório", "relatórios");
        let _ = write!(out, "\n{}. {} ({reports})", i + 1, fact.label);
    }
    out
}

fn reverse_lookup(params: &QueryParams, facts: &[Fact]) -> String {
    let technology = params
        .technology
        .as_deref()
        .or(params.normalized_technology.as_deref())
        .unwrap_or("a tecnologia");
    let mut out = format!("Empresas que utilizam {technology}{}:", scope(params));
    for fact in facts {
        let reports = plural(fact.weight as u64, "relatório", "relatórios");
        let years: Vec<String> = fact
            .evidence
            .iter()
            .filter_map(|e| e.year)
            .map(|y| y.to_string())
            .collect();
        if years.is_empty() {
            let _ = write!(out, "\n- {} ({reports})", fact.label);
        } else {
            let _ = write!(out, "\n- {} ({reports}; {})", fact.label, years.join(", "));
        }
    }
    out
}

fn activities(params: &QueryParams, facts: &[Fact]) -> String {
    let company = facts
        .first()
        .map(|f| f.label.as_str())
        .or(params.company.as_deref())
        .unwrap_or("empresa");
    let mut out = format!("Atividades realizadas por estagiários na {company}:");
    write_passages(&mut out, facts);
    out
}

fn passages(facts: &[Fact]) -> String {
    let mut out = String::from("Encontrei os seguintes trechos relevantes:");
    write_passages(&mut out, facts);
    out
}

fn write_passages(out: &mut String, facts: &[Fact]) {
    for fact in facts {
        for evidence in &fact.evidence {
            let Some(text) = evidence.excerpt.as_deref() else {
                continue;
            };
            let when = match (evidence.year, evidence.term.as_deref()) {
                (Some(year), Some(term)) => format!("{year}/{term}"),
                (Some(year), None) => year.to_string(),
                _ => String::new(),
            };
            if when.is_empty() {
                let _ = write!(out, "\n- {}: {text}", fact.label);
            } else {
                let _ = write!(out, "\n- {} ({when}): {text}", fact.label);
            }
        }
    }
}

fn summary(facts: &[Fact]) -> String {
    let mut out = String::from("Resumo dos relatórios de estágio:");
    let groups = [
        ("total", None),
        ("ano", Some("Por ano:")),
        ("curso", Some("Por curso:")),
        ("categoria", Some("Termos por categoria:")),
    ];
    for (group, heading) in groups {
        let members: Vec<&Fact> = facts
            .iter()
            .filter(|f| f.group.as_deref() == Some(group))
            .collect();
        if members.is_empty() {
            continue;
        }
        if let Some(heading) = heading {
            let _ = write!(out, "\n{heading}");
        }
        for fact in members {
            let label = if group == "categoria" {
                category_label(&fact.label)
            } else {
                capitalize(&fact.label)
            };
            let _ = write!(out, "\n- {label}: {}", fact.weight as u64);
        }
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relata_core::config::PrivacyConfig;
    use relata_core::retrieval::Evidence;

    fn composer() -> ResponseComposer {
        ResponseComposer::new(
            ComposerConfig::default(),
            Arc::new(PrivacyFilter::new(PrivacyConfig::default())),
        )
    }

    fn classification(intent: Intent) -> Classification {
        Classification {
            intent,
            params: QueryParams::with_limit(5),
            rule: "test",
        }
    }

    fn found(branch: Branch, n: usize, limit: usize) -> RetrievalResult {
        RetrievalResult::Found {
            branch,
            facts: (0..n).map(|i| Fact::new(format!("f{i}"), 1.0)).collect(),
            limit,
        }
    }

    #[test]
    fn confidence_orders_branches_and_sizes() {
        let c = composer();
        let structured = c.confidence(&found(Branch::Structured, 5, 5));
        let hybrid = c.confidence(&found(Branch::Hybrid, 5, 5));
        let vector = c.confidence(&found(Branch::Vector, 5, 5));
        let single = c.confidence(&found(Branch::Structured, 1, 5));
        let none = c.confidence(&RetrievalResult::NoData);
        let down = c.confidence(&RetrievalResult::Unavailable);
        assert!(structured > hybrid && hybrid > vector);
        assert!(structured > single && single > none);
        assert!(none > down);
        assert!((structured - 0.9).abs() < 1e-9);
    }

    #[test]
    fn ranking_text_uses_category_and_counts() {
        let mut cls = classification(Intent::TechnologyRanking);
        cls.params.category = Some(TermCategory::Language);
        cls.params.year = Some(2025);
        let result = RetrievalResult::Found {
            branch: Branch::Structured,
            facts: vec![
                Fact::new("Python", 7.0).with_detail(3),
                Fact::new("SQL", 1.0).with_detail(1),
            ],
            limit: 5,
        };
        let text = composer().draft(&cls, &result);
        assert_eq!(
            text,
            "As linguagens de programação mais utilizadas em 2025:\n\
             1. Python (7 ocorrências em 3 relatórios)\n\
             2. SQL (1 ocorrência em 1 relatório)"
        );
    }

    #[test]
    fn open_search_without_data_offers_help() {
        let text = composer().draft(&classification(Intent::OpenSearch), &RetrievalResult::NoData);
        assert!(text.starts_with(NO_DATA_TEXT));
        assert!(text.contains("Frameworks mais populares"));

        let text = composer().draft(
            &classification(Intent::CompanyRanking),
            &RetrievalResult::NoData,
        );
        assert_eq!(text, NO_DATA_TEXT);
    }

    #[test]
    fn sources_keep_best_relevance_per_report() {
        let evidence = |id| Evidence {
            report_id: Some(id),
            ..Evidence::default()
        };
        let result = RetrievalResult::Found {
            branch: Branch::Vector,
            facts: vec![
                Fact::new("a", 0.4).with_evidence(evidence(1)),
                Fact::new("b", 0.8).with_evidence(evidence(1)),
                Fact::new("c", 0.6).with_evidence(evidence(2)),
            ],
            limit: 5,
        };
        let out = sources(&result);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].report_id, 1);
        assert!((out[0].relevance - 0.8).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unsafe_text_is_refiltered() {
        let cls = classification(Intent::OpenSearch);
        let result = RetrievalResult::Found {
            branch: Branch::Vector,
            facts: vec![Fact::new("ACME", 0.9).with_evidence(Evidence {
                report_id: Some(1),
                excerpt: Some("escreva para ana@acme.com".to_string()),
                ..Evidence::default()
            })],
            limit: 5,
        };
        let answer = composer().compose("contato", &cls, &result).await;
        assert!(!answer.text.contains("ana@acme.com"));
        assert!(answer.text.contains("[EMAIL_REMOVED]"));
    }
}
