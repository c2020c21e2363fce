//! Intent Classifier: maps an utterance to one intent plus extracted parameters.
//!
//! Pure lexical matching over an ordered rule list (see [`rules`]). Never fails:
//! anything unmatched is `open_search`.

pub(crate) mod extract;
pub(crate) mod rules;

use std::sync::Arc;

use tracing::debug;

use relata_core::config::RetrievalConfig;
use relata_core::intent::{Classification, Intent, QueryParams};
use relata_core::retrieval::{AnswerFilters, ConversationTurn, TurnRole};

use crate::normalizer::TermNormalizer;
use extract::{CompanyNeedle, Signals};

pub struct IntentClassifier {
    normalizer: Arc<TermNormalizer>,
    companies: Vec<CompanyNeedle>,
    default_limit: usize,
    max_limit: usize,
}

impl IntentClassifier {
    pub fn new(
        normalizer: Arc<TermNormalizer>,
        known_companies: &[String],
        config: &RetrievalConfig,
    ) -> Self {
        let mut companies: Vec<CompanyNeedle> = Vec::new();
        for needle in known_companies.iter().filter_map(|c| CompanyNeedle::from_name(c)) {
            if !companies.iter().any(|c| c.token == needle.token) {
                companies.push(needle);
            }
        }
        Self {
            normalizer,
            companies,
            default_limit: config.default_limit.max(1),
            max_limit: config.max_limit.max(1),
        }
    }

    pub fn normalizer(&self) -> &TermNormalizer {
        &self.normalizer
    }

    /// Classify a single utterance with no context.
    pub fn classify(&self, utterance: &str) -> Classification {
        self.classify_in_context(utterance, None, &[])
    }

    /// Classify with caller filters and prior turns.
    ///
    /// Values in the utterance win over `filters`. An activity question without a
    /// company borrows the company of the latest user turn that named one, and a
    /// bare follow-up such as "e em 2024?" repeats the previous question with the
    /// new year.
    pub fn classify_in_context(
        &self,
        utterance: &str,
        filters: Option<&AnswerFilters>,
        history: &[ConversationTurn],
    ) -> Classification {
        let mut signals = self.signals(utterance);

        if signals.company.is_none() && signals.has_any(rules::ACTIVITY_TRIGGERS) {
            signals.company = self
                .previous_user_turns(history)
                .find_map(|turn| self.signals(&turn.content).company);
        }

        if let Some(filters) = filters {
            signals.year = signals.year.or(filters.year);
            signals.track = signals.track.or(filters.track);
            if signals.company.is_none() {
                signals.company = filters.company.clone();
            }
        }

        let (intent, rule) = rules::first_match(&signals);

        if intent == Intent::OpenSearch && self.is_bare_follow_up(&signals) {
            if let Some(mut previous) = self
                .previous_user_turns(history)
                .next()
                .map(|turn| self.classify(&turn.content))
                .filter(|c| c.intent != Intent::OpenSearch)
            {
                previous.params.year = signals.year.or(previous.params.year);
                previous.params.track = signals.track.or(previous.params.track);
                previous.rule = "follow_up";
                debug!(intent = %previous.intent, year = ?previous.params.year, "follow-up reuses previous question");
                return previous;
            }
        }

        let classification = Classification {
            intent,
            params: self.params(signals),
            rule,
        };
        debug!(
            intent = %classification.intent,
            rule = classification.rule,
            technology = ?classification.params.normalized_technology,
            company = ?classification.params.company,
            year = ?classification.params.year,
            "classified"
        );
        classification
    }

    fn signals(&self, utterance: &str) -> Signals {
        Signals::read(utterance, &self.normalizer, &self.companies)
    }

    fn previous_user_turns<'a>(
        &self,
        history: &'a [ConversationTurn],
    ) -> impl Iterator<Item = &'a ConversationTurn> {
        history.iter().rev().filter(|t| t.role == TurnRole::User)
    }

    /// Short utterance carrying a year or track and nothing else.
    fn is_bare_follow_up(&self, signals: &Signals) -> bool {
        let words = signals.folded.split_whitespace().count();
        words <= 4
            && (signals.year.is_some() || signals.track.is_some())
            && signals.term.is_none()
            && signals.company.is_none()
    }

    fn params(&self, signals: Signals) -> QueryParams {
        let mut params = QueryParams::with_limit(
            signals
                .limit
                .unwrap_or(self.default_limit)
                .clamp(1, self.max_limit),
        );
        params.year = signals.year;
        params.track = signals.track;
        params.direction = signals.direction;
        params.company = signals.company;
        params.category = signals.category.flatten();
        if let Some(term) = signals.term {
            params.technology = Some(term.surface);
            params.normalized_technology = Some(term.normalized);
        }
        params
    }
}
