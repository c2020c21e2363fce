//! Lexical signals pulled out of an utterance before any rule runs.

use std::sync::LazyLock;

use regex::Regex;

use relata_core::constants::{MAX_REPORT_YEAR, MIN_REPORT_YEAR};
use relata_core::intent::Direction;
use relata_core::report::ProgramTrack;
use relata_core::terms::TermCategory;
use relata_core::text::fold;

use super::rules::{CATEGORY_WORDS, LEAST_TRIGGERS};
use crate::normalizer::{TermMatch, TermNormalizer};

static YEAR: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\b(20\d{2})\b").ok());

static TOP_N: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\btop\s*(\d{1,3})\b").ok());

static N_RANKED: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,3})\s+(?:mais|menos|principais|primeir[oa]s?|maiores|melhores)\b").ok()
});

/// Words dropped when deriving a company's match token from its legal name.
const CORPORATE_STOPWORDS: &[&str] = &[
    "banco", "sa", "s", "a", "ltda", "me", "eireli", "de", "da", "do", "dos", "das", "e", "the",
    "inc", "grupo", "cia",
];

/// Prepositions that introduce a company name ("na Siemens", "at Nubank").
/// "em", "da" and "do" are left out: they introduce places and years as often as
/// employers.
const COMPANY_PREPOSITIONS: &[&str] = &["na", "no", "pela", "pelo", "at"];

/// A stored company name reduced to the token users type for it.
#[derive(Debug, Clone)]
pub(crate) struct CompanyNeedle {
    pub token: String,
}

impl CompanyNeedle {
    pub fn from_name(name: &str) -> Option<Self> {
        fold(name)
            .split(|c: char| !c.is_alphanumeric())
            .find(|w| !w.is_empty() && !CORPORATE_STOPWORDS.contains(w))
            .map(|w| Self {
                token: w.to_string(),
            })
    }
}

/// Everything the rules look at.
#[derive(Debug, Clone, Default)]
pub(crate) struct Signals {
    pub folded: String,
    pub term: Option<TermMatch>,
    /// Company as written by the user.
    pub company: Option<String>,
    /// `Some(None)` for a generic "tecnologia", `Some(Some(c))` for a category word.
    pub category: Option<Option<TermCategory>>,
    pub year: Option<i32>,
    pub track: Option<ProgramTrack>,
    pub direction: Direction,
    pub limit: Option<usize>,
}

impl Signals {
    pub fn read(
        utterance: &str,
        normalizer: &TermNormalizer,
        companies: &[CompanyNeedle],
    ) -> Self {
        let folded = fold(utterance);
        let direction = if contains_any(&folded, LEAST_TRIGGERS) {
            Direction::Least
        } else {
            Direction::Most
        };
        Self {
            term: pick_term(normalizer.find_in(utterance)),
            company: detect_company(utterance, companies, normalizer),
            category: CATEGORY_WORDS
                .iter()
                .find(|(word, _)| contains_phrase(&folded, word))
                .map(|(_, category)| *category),
            year: detect_year(&folded),
            track: ProgramTrack::parse(&folded),
            direction,
            limit: detect_limit(&folded),
            folded,
        }
    }

    pub fn has_any(&self, phrases: &[&str]) -> bool {
        contains_any(&self.folded, phrases)
    }
}

/// Technology categories first, then leftmost.
fn pick_term(matches: Vec<TermMatch>) -> Option<TermMatch> {
    let mut best: Option<TermMatch> = None;
    for m in matches {
        let better = match &best {
            None => true,
            Some(b) => m.category.is_technology() && !b.category.is_technology(),
        };
        if better {
            best = Some(m);
        }
    }
    best
}

fn detect_year(folded: &str) -> Option<i32> {
    let re = YEAR.as_ref()?;
    re.captures_iter(folded)
        .filter_map(|c| c[1].parse::<i32>().ok())
        .find(|y| (MIN_REPORT_YEAR..=MAX_REPORT_YEAR).contains(y))
}

fn detect_limit(folded: &str) -> Option<usize> {
    [&TOP_N, &N_RANKED]
        .into_iter()
        .filter_map(|re| re.as_ref()?.captures(folded))
        .find_map(|c| c[1].parse::<usize>().ok())
}

/// Known company token first, else a capitalized word after a preposition that is
/// not a vocabulary term. A company token that is also a term ("Oracle") only counts
/// after a preposition, so "quais empresas usam Oracle" stays a question about the term.
fn detect_company(
    utterance: &str,
    companies: &[CompanyNeedle],
    normalizer: &TermNormalizer,
) -> Option<String> {
    let words: Vec<&str> = utterance
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let after_preposition =
        |i: usize| i > 0 && COMPANY_PREPOSITIONS.contains(&fold(words[i - 1]).as_str());

    for (i, word) in words.iter().enumerate() {
        let folded = fold(word);
        if !companies.iter().any(|c| c.token == folded) {
            continue;
        }
        if normalizer.normalize(word).is_none() || after_preposition(i) {
            return Some((*word).to_string());
        }
    }

    (1..words.len()).find_map(|i| {
        let candidate = words[i];
        let capitalized = candidate.chars().next().is_some_and(char::is_uppercase);
        let is_year = candidate.chars().all(|c| c.is_ascii_digit());
        (after_preposition(i) && capitalized && !is_year && normalizer.normalize(candidate).is_none())
            .then(|| candidate.to_string())
    })
}

pub(crate) fn contains_any(folded: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains_phrase(folded, p))
}

/// Whole-word phrase match on folded text.
pub(crate) fn contains_phrase(folded: &str, phrase: &str) -> bool {
    let mut from = 0;
    while let Some(offset) = folded[from..].find(phrase) {
        let start = from + offset;
        let end = start + phrase.len();
        let before = folded[..start].chars().next_back();
        let after = folded[end..].chars().next();
        if !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        {
            return true;
        }
        from = start + folded[start..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrase_match_needs_word_edges() {
        assert!(contains_phrase("quais empresas usam", "empresas"));
        assert!(!contains_phrase("microempresas", "empresas"));
        assert!(contains_phrase("quem usa java", "quem usa"));
        assert!(!contains_phrase("totalmente", "total"));
    }

    #[test]
    fn years_outside_the_corpus_range_are_ignored() {
        assert_eq!(detect_year("relatorios de 2019 e 2024"), Some(2024));
        assert_eq!(detect_year("em 2099"), None);
        assert_eq!(detect_year("sem ano"), None);
    }

    #[test]
    fn limits_from_top_and_counted_phrases() {
        assert_eq!(detect_limit("top 3 linguagens"), Some(3));
        assert_eq!(detect_limit("as 10 mais usadas"), Some(10));
        assert_eq!(detect_limit("mais usadas em 2025"), None);
    }

    #[test]
    fn company_needles_skip_corporate_words() {
        let needle = CompanyNeedle::from_name("BANCO BTG PACTUAL S.A.").unwrap();
        assert_eq!(needle.token, "btg");
        let needle = CompanyNeedle::from_name("CIP - CENTRO DE INFORMAÇÃO").unwrap();
        assert_eq!(needle.token, "cip");
        assert!(CompanyNeedle::from_name("S.A.").is_none());
    }

    #[test]
    fn unknown_company_after_preposition() {
        let normalizer = TermNormalizer::from_seed();
        assert_eq!(
            detect_company("O que fazem na Embraer?", &[], &normalizer).as_deref(),
            Some("Embraer")
        );
        assert_eq!(detect_company("Usei Python na Java", &[], &normalizer), None);
        assert_eq!(detect_company("relatórios em 2024", &[], &normalizer), None);
    }

    fn needles(names: &[&str]) -> Vec<CompanyNeedle> {
        names.iter().filter_map(|n| CompanyNeedle::from_name(n)).collect()
    }

    #[test]
    fn company_named_like_a_term_needs_a_preposition() {
        let normalizer = TermNormalizer::from_seed();
        let companies = needles(&["ORACLE DO BRASIL SISTEMAS LTDA", "WEG S.A."]);
        assert_eq!(detect_company("Quais empresas usam Oracle?", &companies, &normalizer), None);
        assert_eq!(
            detect_company("O que os estagiários fazem na Oracle?", &companies, &normalizer),
            Some("Oracle".to_string())
        );
    }

    #[test]
    fn places_after_em_are_not_companies() {
        let normalizer = TermNormalizer::from_seed();
        let companies = needles(&["WEG S.A."]);
        assert_eq!(
            detect_company("Quais empresas usam Python em São Paulo?", &companies, &normalizer),
            None
        );
        assert_eq!(
            detect_company("Quais tecnologias são usadas na Embraer?", &companies, &normalizer),
            Some("Embraer".to_string())
        );
    }
}
