//! One retrieval function per intent. Each returns `NoData` for an empty legitimate
//! answer and `Err` when its collaborator failed; fallback is the dispatcher's job.

use std::collections::HashSet;

use relata_core::constants::MAX_EXCERPT_CHARS;
use relata_core::errors::RelataResult;
use relata_core::intent::QueryParams;
use relata_core::report::{canonical_company, Report};
use relata_core::retrieval::{Branch, Evidence, Fact, ReportFilter, RetrievalResult};
use relata_core::terms::SectionKind;
use relata_core::text::excerpt;

use super::QueryDispatcher;
use crate::aggregator::filter_for;
use crate::vector::ScoredSection;

/// Sections searched for activity questions.
pub(crate) const ACTIVITY_SECTIONS: [SectionKind; 2] =
    [SectionKind::Activities, SectionKind::CompanyDescription];

pub(crate) async fn technology_ranking(
    d: &QueryDispatcher,
    params: &QueryParams,
) -> RelataResult<RetrievalResult> {
    let counts = d
        .aggregator
        .term_ranking(filter_for(params), params.direction, params.limit)
        .await?;
    let facts: Vec<Fact> = counts
        .into_iter()
        .map(|c| {
            Fact::new(d.normalizer.display_name(&c.normalized), c.occurrences as f64)
                .in_group(c.category.as_str())
                .with_detail(c.reports)
                .with_evidence(Evidence {
                    term: Some(c.normalized),
                    year: params.year,
                    ..Evidence::default()
                })
        })
        .collect();
    Ok(found(Branch::Structured, facts, params.limit))
}

pub(crate) async fn company_ranking(
    d: &QueryDispatcher,
    params: &QueryParams,
) -> RelataResult<RetrievalResult> {
    let counts = d
        .aggregator
        .company_ranking(filter_for(params), params.direction, params.limit)
        .await?;
    let facts: Vec<Fact> = counts
        .into_iter()
        .map(|c| {
            Fact::new(c.company.clone(), c.reports as f64).with_evidence(Evidence {
                company: Some(c.company),
                year: params.year,
                ..Evidence::default()
            })
        })
        .collect();
    Ok(found(Branch::Structured, facts, params.limit))
}

pub(crate) async fn reverse_lookup(
    d: &QueryDispatcher,
    params: &QueryParams,
) -> RelataResult<RetrievalResult> {
    let Some(term) = params
        .normalized_technology
        .clone()
        .or_else(|| params.technology.clone())
    else {
        return Ok(RetrievalResult::NoData);
    };
    let filter = ReportFilter {
        year: params.year,
        track: params.track,
        company: params.company.clone(),
        ..ReportFilter::default()
    };
    let usages = d.aggregator.companies_using_term(term.clone(), filter).await?;
    let facts: Vec<Fact> = usages
        .into_iter()
        .take(params.limit)
        .map(|u| {
            let mut fact = Fact::new(u.company.clone(), u.reports as f64);
            for year in u.years {
                fact = fact.with_evidence(Evidence {
                    company: Some(u.company.clone()),
                    year: Some(year),
                    ..Evidence::default()
                });
            }
            fact
        })
        .collect();
    Ok(found(Branch::Structured, facts, params.limit))
}

pub(crate) async fn general_statistics(
    d: &QueryDispatcher,
    params: &QueryParams,
) -> RelataResult<RetrievalResult> {
    let filter = ReportFilter {
        year: params.year,
        track: params.track,
        company: params.company.clone(),
        ..ReportFilter::default()
    };
    let summary = d.aggregator.summary(filter).await?;

    let mut facts = vec![
        Fact::new("relatórios", summary.total_reports as f64).in_group("total"),
        Fact::new("empresas", summary.total_companies as f64).in_group("total"),
        Fact::new("termos técnicos", summary.total_terms as f64).in_group("total"),
    ];
    facts.extend(
        summary
            .by_year
            .iter()
            .map(|(year, n)| Fact::new(year.to_string(), *n as f64).in_group("ano")),
    );
    facts.extend(
        summary
            .by_track
            .iter()
            .map(|(track, n)| Fact::new(track.clone(), *n as f64).in_group("curso")),
    );
    facts.extend(
        summary
            .by_category
            .iter()
            .map(|(category, n)| Fact::new(category.clone(), *n as f64).in_group("categoria")),
    );
    let limit = facts.len();
    Ok(RetrievalResult::Found {
        branch: Branch::Structured,
        facts,
        limit,
    })
}

/// Company reports and a company-filtered section search, run together and merged
/// most recent first.
pub(crate) async fn company_activities(
    d: &QueryDispatcher,
    utterance: &str,
    params: &QueryParams,
) -> RelataResult<RetrievalResult> {
    let Some(company) = params.company.clone() else {
        return Ok(RetrievalResult::NoData);
    };
    let filter = ReportFilter {
        year: params.year,
        track: params.track,
        company: Some(company),
        ..ReportFilter::default()
    };
    let per_company = d.activities_per_company;

    let (reports, search) = tokio::join!(
        d.aggregator.company_reports(filter.clone(), per_company),
        d.vector
            .search_text(utterance, &filter, &ACTIVITY_SECTIONS, per_company),
    );

    let mut entries: Vec<ActivityEntry> = Vec::new();
    match reports {
        Ok(reports) => entries.extend(reports.iter().filter_map(ActivityEntry::from_report)),
        Err(e) if search.is_down() => return Err(e),
        Err(e) => tracing::warn!(error = %e, "company reports failed; using section search only"),
    }
    entries.extend(search.hits().iter().map(ActivityEntry::from_hit));

    let mut seen = HashSet::new();
    entries.retain(|e| seen.insert((e.report_id, e.section)));
    entries.sort_by(|a, b| {
        b.year
            .cmp(&a.year)
            .then_with(|| b.term.cmp(&a.term))
            .then_with(|| b.report_id.cmp(&a.report_id))
    });
    entries.truncate(per_company);

    let facts = entries.into_iter().map(ActivityEntry::into_fact).collect();
    Ok(found(Branch::Hybrid, facts, per_company))
}

/// Ranked sections as facts.
pub(crate) fn section_facts(hits: &[ScoredSection], limit: usize) -> RetrievalResult {
    let facts = hits
        .iter()
        .take(limit)
        .map(|s| ActivityEntry::from_hit(s).into_fact())
        .collect();
    found(Branch::Vector, facts, limit)
}

fn found(branch: Branch, facts: Vec<Fact>, limit: usize) -> RetrievalResult {
    if facts.is_empty() {
        RetrievalResult::NoData
    } else {
        RetrievalResult::Found {
            branch,
            facts,
            limit,
        }
    }
}

struct ActivityEntry {
    report_id: i64,
    section: SectionKind,
    company: Option<String>,
    year: i32,
    term: String,
    text: String,
    relevance: f64,
}

impl ActivityEntry {
    fn from_report(report: &Report) -> Option<Self> {
        let (section, text) = [SectionKind::Activities, SectionKind::CompanyDescription]
            .into_iter()
            .find_map(|s| report.section_text(s).map(|t| (s, t)))?;
        Some(Self {
            report_id: report.id,
            section,
            company: report.company.clone(),
            year: report.metadata.year,
            term: report.metadata.term.code().to_string(),
            text,
            relevance: 1.0,
        })
    }

    fn from_hit(scored: &ScoredSection) -> Self {
        let hit = &scored.hit;
        Self {
            report_id: hit.report_id,
            section: hit.section,
            company: hit.company.clone(),
            year: hit.year,
            term: hit.term.clone(),
            text: hit.content.clone(),
            relevance: scored.similarity,
        }
    }

    fn into_fact(self) -> Fact {
        let label = self
            .company
            .as_deref()
            .map(canonical_company)
            .unwrap_or_else(|| format!("Relatório {}", self.report_id));
        Fact::new(label, self.relevance).with_evidence(Evidence {
            report_id: Some(self.report_id),
            section: Some(self.section),
            company: self.company,
            year: Some(self.year),
            term: Some(self.term),
            excerpt: Some(excerpt(&self.text, MAX_EXCERPT_CHARS)),
        })
    }
}

