//! Ordered trigger rules. The first rule whose predicate holds decides the intent.
//!
//! Precedence, top to bottom:
//! 1. technology + company context ("quais empresas usam Kotlin") -> reverse lookup
//! 2. activity trigger + company ("o que fazem no BTG") -> company activities
//! 3. category word ("linguagem", "framework") -> technology ranking
//! 4. counting words ("quantos", "resumo") -> general statistics
//! 5. company words ("empresas", "estagiários") -> company ranking
//! 6. anything else -> open search
//!
//! Ordering words ("menos", "least") never select a rule; they only flip the direction.

use relata_core::intent::Intent;
use relata_core::terms::TermCategory;

use super::extract::Signals;

pub(crate) const COMPANY_CONTEXT: &[&str] = &[
    "empresa",
    "empresas",
    "company",
    "companies",
    "onde",
    "quem usa",
    "quem utiliza",
];

pub(crate) const ACTIVITY_TRIGGERS: &[&str] = &[
    "o que fazem",
    "o que faz",
    "fazem",
    "fizeram",
    "atividade",
    "atividades",
    "tarefas",
    "trabalham",
    "activities",
    "tasks",
];

/// Category words and the category they narrow a ranking to. `None` means every
/// technology category.
pub(crate) const CATEGORY_WORDS: &[(&str, Option<TermCategory>)] = &[
    ("linguagem", Some(TermCategory::Language)),
    ("linguagens", Some(TermCategory::Language)),
    ("language", Some(TermCategory::Language)),
    ("languages", Some(TermCategory::Language)),
    ("framework", Some(TermCategory::Framework)),
    ("frameworks", Some(TermCategory::Framework)),
    ("ferramenta", Some(TermCategory::Tool)),
    ("ferramentas", Some(TermCategory::Tool)),
    ("tool", Some(TermCategory::Tool)),
    ("tools", Some(TermCategory::Tool)),
    ("plataforma", Some(TermCategory::Platform)),
    ("plataformas", Some(TermCategory::Platform)),
    ("banco de dados", Some(TermCategory::Database)),
    ("bancos de dados", Some(TermCategory::Database)),
    ("database", Some(TermCategory::Database)),
    ("databases", Some(TermCategory::Database)),
    ("metodologia", Some(TermCategory::Practice)),
    ("metodologias", Some(TermCategory::Practice)),
    ("pratica", Some(TermCategory::Practice)),
    ("praticas", Some(TermCategory::Practice)),
    ("tecnologia", None),
    ("tecnologias", None),
    ("technology", None),
    ("technologies", None),
];

pub(crate) const STATISTICS_TRIGGERS: &[&str] = &[
    "estatistica",
    "estatisticas",
    "quantos",
    "quantas",
    "total",
    "resumo",
    "statistics",
    "how many",
    "summary",
];

pub(crate) const COMPANY_RANKING_TRIGGERS: &[&str] = &[
    "empresa",
    "empresas",
    "company",
    "companies",
    "estagiarios",
    "estagiario",
    "contratam",
    "contrata",
    "interns",
];

pub(crate) const LEAST_TRIGGERS: &[&str] = &["menos", "least", "fewest", "menor", "menores"];

/// One entry of the ordered rule list.
pub(crate) struct Rule {
    pub name: &'static str,
    pub intent: Intent,
    pub fires: fn(&Signals) -> bool,
}

pub(crate) const RULES: &[Rule] = &[
    Rule {
        name: "technology_with_company_context",
        intent: Intent::TechnologyReverseLookup,
        fires: |s| s.term.is_some() && s.has_any(COMPANY_CONTEXT),
    },
    Rule {
        name: "activities_at_company",
        intent: Intent::CompanyActivities,
        fires: |s| s.company.is_some() && s.has_any(ACTIVITY_TRIGGERS),
    },
    Rule {
        name: "category_ranking",
        intent: Intent::TechnologyRanking,
        fires: |s| s.category.is_some(),
    },
    Rule {
        name: "statistics",
        intent: Intent::GeneralStatistics,
        fires: |s| s.has_any(STATISTICS_TRIGGERS),
    },
    Rule {
        name: "company_ranking",
        intent: Intent::CompanyRanking,
        fires: |s| s.has_any(COMPANY_RANKING_TRIGGERS),
    },
];

pub(crate) const FALLBACK_RULE: &str = "fallback";

/// First rule that fires, or the open-search fallback.
pub(crate) fn first_match(signals: &Signals) -> (Intent, &'static str) {
    RULES
        .iter()
        .find(|rule| (rule.fires)(signals))
        .map_or((Intent::OpenSearch, FALLBACK_RULE), |rule| {
            (rule.intent, rule.name)
        })
}
