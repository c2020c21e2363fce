//! Question intents and the parameters extracted alongside them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::report::ProgramTrack;
use crate::terms::TermCategory;

/// What a question is asking for. Drives retrieval strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Most/least used technologies.
    TechnologyRanking,
    /// Companies with the most/fewest interns.
    CompanyRanking,
    /// Companies whose reports mention a given technology.
    TechnologyReverseLookup,
    /// What interns did at a given company.
    CompanyActivities,
    /// Corpus-wide counts.
    GeneralStatistics,
    /// Anything else; answered by nearest-section search.
    OpenSearch,
}

impl Intent {
    pub const ALL: [Intent; 6] = [
        Intent::TechnologyRanking,
        Intent::CompanyRanking,
        Intent::TechnologyReverseLookup,
        Intent::CompanyActivities,
        Intent::GeneralStatistics,
        Intent::OpenSearch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TechnologyRanking => "technology_ranking",
            Self::CompanyRanking => "company_ranking",
            Self::TechnologyReverseLookup => "technology_reverse_lookup",
            Self::CompanyActivities => "company_activities",
            Self::GeneralStatistics => "general_statistics",
            Self::OpenSearch => "open_search",
        }
    }

    /// Intents answered primarily by structured aggregation.
    pub fn is_structured(self) -> bool {
        !matches!(self, Self::OpenSearch | Self::CompanyActivities)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering of a ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Most,
    Least,
}

impl Direction {
    /// SQL keyword for the primary sort column.
    pub fn sql(self) -> &'static str {
        match self {
            Self::Most => "DESC",
            Self::Least => "ASC",
        }
    }
}

/// Parameters extracted from an utterance. All filters are optional and combine with AND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    pub year: Option<i32>,
    /// Technology as written by the user ("Kotlin").
    pub technology: Option<String>,
    /// Normalized key of `technology` when it is in the vocabulary ("kotlin").
    pub normalized_technology: Option<String>,
    /// Narrows technology rankings to one category; `None` means all technology categories.
    pub category: Option<TermCategory>,
    /// Company as written by the user.
    pub company: Option<String>,
    pub track: Option<ProgramTrack>,
    pub direction: Direction,
    pub limit: usize,
}

impl QueryParams {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            year: None,
            technology: None,
            normalized_technology: None,
            category: None,
            company: None,
            track: None,
            direction: Direction::Most,
            limit,
        }
    }
}

/// Classifier output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub intent: Intent,
    pub params: QueryParams,
    /// Name of the rule that fired, for tracing.
    pub rule: &'static str,
}
