//! Term Normalizer: maps surface forms to canonical keys and finds vocabulary terms in
//! free text.
//!
//! Matching is accent- and case-insensitive. A match must not touch a letter or digit
//! on either side, so "Java" never matches inside "JavaScript" and "C" never matches
//! inside a word.

use std::collections::{BTreeMap, HashMap, HashSet};

use regex::{Regex, RegexBuilder};
use tracing::warn;

use relata_core::terms::{TechnicalTerm, TermCategory, SEED_TERMS};
use relata_core::text::{fold, title_case};

/// One vocabulary occurrence in a piece of text. Offsets index the folded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatch {
    /// Vocabulary surface form as stored ("Spring Boot").
    pub surface: String,
    pub normalized: String,
    pub category: TermCategory,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
struct Entry {
    surface: String,
    normalized: String,
    category: TermCategory,
}

pub struct TermNormalizer {
    /// Folded surface form (and folded normalized key) to entry.
    by_surface: HashMap<String, Entry>,
    display: HashMap<String, String>,
    categories: HashMap<String, TermCategory>,
    matcher: Option<Regex>,
}

impl TermNormalizer {
    pub fn new(terms: &[TechnicalTerm]) -> Self {
        let mut by_surface: HashMap<String, Entry> = HashMap::new();
        let mut display: HashMap<String, String> = HashMap::new();
        let mut categories: HashMap<String, TermCategory> = HashMap::new();
        let mut spelled: HashSet<String> = HashSet::new();

        for term in terms {
            let entry = Entry {
                surface: term.term.clone(),
                normalized: term.normalized.clone(),
                category: term.category,
            };
            categories.entry(term.normalized.clone()).or_insert(term.category);

            let spells_key =
                strip_separators(&fold(&term.term)) == strip_separators(&term.normalized);
            let replace = match display.get(&term.normalized) {
                None => true,
                Some(_) => spells_key && !spelled.contains(&term.normalized),
            };
            if replace {
                display.insert(term.normalized.clone(), term.term.clone());
            }
            if spells_key {
                spelled.insert(term.normalized.clone());
            }

            for form in [fold(&term.term), fold(&term.normalized.replace('_', " "))] {
                if form.trim().is_empty() {
                    continue;
                }
                by_surface.entry(form).or_insert_with(|| entry.clone());
            }
        }

        let matcher = build_matcher(by_surface.keys());
        Self {
            by_surface,
            display,
            categories,
            matcher,
        }
    }

    /// Normalizer over the built-in seed vocabulary.
    pub fn from_seed() -> Self {
        let terms: Vec<TechnicalTerm> = SEED_TERMS
            .iter()
            .enumerate()
            .map(|(i, (term, category, normalized))| TechnicalTerm {
                id: i as i64 + 1,
                term: (*term).to_string(),
                category: *category,
                normalized: (*normalized).to_string(),
                description: None,
            })
            .collect();
        Self::new(&terms)
    }

    /// Canonical key for a raw surface form or key, if known.
    pub fn normalize(&self, raw: &str) -> Option<&str> {
        let folded = fold(raw.trim());
        self.by_surface
            .get(&folded)
            .or_else(|| self.by_surface.get(&folded.replace('_', " ")))
            .map(|e| e.normalized.as_str())
    }

    pub fn category(&self, normalized: &str) -> Option<TermCategory> {
        self.categories.get(normalized).copied()
    }

    /// Human-facing name for a normalized key: the surface form that spells the key,
    /// else the first one seen, else the key title-cased.
    pub fn display_name(&self, normalized: &str) -> String {
        self.display
            .get(normalized)
            .cloned()
            .unwrap_or_else(|| title_case(normalized))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Every vocabulary occurrence in `text`, left to right, longest form first at
    /// each position.
    pub fn find_in(&self, text: &str) -> Vec<TermMatch> {
        let Some(matcher) = &self.matcher else {
            return Vec::new();
        };
        let folded = fold(text);
        let mut found = Vec::new();
        let mut pos = 0;
        while pos <= folded.len() {
            let Some(m) = matcher.find_at(&folded, pos) else {
                break;
            };
            if is_boundary(&folded, m.start(), m.end()) {
                if let Some(entry) = self.by_surface.get(m.as_str()) {
                    found.push(TermMatch {
                        surface: entry.surface.clone(),
                        normalized: entry.normalized.clone(),
                        category: entry.category,
                        start: m.start(),
                        end: m.end(),
                    });
                }
                pos = m.end();
            } else {
                pos = next_char_boundary(&folded, m.start());
            }
        }
        found
    }

    /// Occurrence counts per normalized key.
    pub fn extract_terms(&self, text: &str) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        for m in self.find_in(text) {
            *counts.entry(m.normalized).or_insert(0) += 1;
        }
        counts
    }
}

fn strip_separators(s: &str) -> String {
    s.chars().filter(|c| c.is_alphanumeric()).collect()
}

fn build_matcher<'a>(forms: impl Iterator<Item = &'a String>) -> Option<Regex> {
    let mut forms: Vec<&String> = forms.collect();
    if forms.is_empty() {
        return None;
    }
    forms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternation = forms
        .iter()
        .map(|f| regex::escape(f))
        .collect::<Vec<_>>()
        .join("|");
    match RegexBuilder::new(&alternation)
        .size_limit(1 << 24)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(error = %e, "term matcher failed to compile; term detection disabled");
            None
        }
    }
}

fn is_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

fn next_char_boundary(text: &str, from: usize) -> usize {
    text[from..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| from + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_share_a_key() {
        let n = TermNormalizer::from_seed();
        assert_eq!(n.normalize("Golang"), Some("go"));
        assert_eq!(n.normalize("k8s"), Some("kubernetes"));
        assert_eq!(n.normalize("SpringBoot"), Some("spring_boot"));
        assert_eq!(n.normalize("spring_boot"), Some("spring_boot"));
        assert_eq!(n.normalize("ÁGIL"), Some("agile"));
        assert_eq!(n.normalize("cobol 2099"), None);
    }

    #[test]
    fn display_prefers_the_spelling_of_the_key() {
        let n = TermNormalizer::from_seed();
        assert_eq!(n.display_name("spring_boot"), "Spring Boot");
        assert_eq!(n.display_name("javascript"), "JavaScript");
        assert_eq!(n.display_name("unknown_thing"), "Unknown Thing");
    }

    #[test]
    fn matches_respect_word_boundaries() {
        let n = TermNormalizer::from_seed();
        let keys: Vec<String> = n
            .find_in("Usei JavaScript e Java, além de C++ e C.")
            .into_iter()
            .map(|m| m.normalized)
            .collect();
        assert_eq!(keys, vec!["javascript", "java", "cpp", "c"]);
    }

    #[test]
    fn longest_form_wins() {
        let n = TermNormalizer::from_seed();
        let found = n.find_in("APIs com Spring Boot");
        assert!(found.iter().any(|m| m.normalized == "spring_boot"));
        assert!(!found.iter().any(|m| m.surface == "Spring"));
    }

    #[test]
    fn extraction_counts_per_key() {
        let n = TermNormalizer::from_seed();
        let counts = n.extract_terms("Python, python e Golang; depois Go.");
        assert_eq!(counts.get("python"), Some(&2));
        assert_eq!(counts.get("go"), Some(&2));
    }

    #[test]
    fn empty_vocabulary_finds_nothing() {
        let n = TermNormalizer::new(&[]);
        assert!(n.is_empty());
        assert!(n.find_in("python").is_empty());
    }
}
