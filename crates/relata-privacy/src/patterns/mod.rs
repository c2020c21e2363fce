pub mod pii;

use relata_core::traits::Redaction;
use regex::Regex;
use std::sync::LazyLock;

pub use pii::PiiPattern;

/// One pattern hit, before overlap resolution.
#[derive(Debug, Clone)]
pub struct RawMatch {
    pub pattern_name: &'static str,
    pub marker: &'static str,
    pub start: usize,
    pub end: usize,
    /// Position of the pattern in the priority list; lower wins ties.
    pub priority: usize,
}

/// Run every pattern against `text`, returning non-overlapping matches sorted
/// by start position ascending.
pub fn scan_all(text: &str, patterns: &[PiiPattern]) -> Vec<RawMatch> {
    let mut matches = Vec::new();
    for (priority, pat) in patterns.iter().enumerate() {
        collect_matches(text, pat, priority, &mut matches);
    }
    resolve_overlaps(matches)
}

fn collect_matches(text: &str, pat: &PiiPattern, priority: usize, out: &mut Vec<RawMatch>) {
    let regex: &LazyLock<Option<Regex>> = pat.regex;
    let Some(re) = regex.as_ref() else {
        tracing::error!(pattern = pat.name, "PII pattern failed to compile");
        return;
    };
    for m in re.find_iter(text) {
        out.push(RawMatch {
            pattern_name: pat.name,
            marker: pat.marker,
            start: m.start(),
            end: m.end(),
            priority,
        });
    }
}

/// Keep a set of pairwise-disjoint matches. Longer matches are accepted first,
/// equal lengths go to the higher-priority pattern, then the leftmost. A match
/// overlapping any accepted one is dropped, however many it overlaps.
fn resolve_overlaps(mut candidates: Vec<RawMatch>) -> Vec<RawMatch> {
    candidates.sort_by(|a, b| {
        (b.end - b.start)
            .cmp(&(a.end - a.start))
            .then(a.priority.cmp(&b.priority))
            .then(a.start.cmp(&b.start))
    });
    let mut kept: Vec<RawMatch> = Vec::with_capacity(candidates.len());
    for m in candidates {
        if kept.iter().all(|k| m.end <= k.start || m.start >= k.end) {
            kept.push(m);
        }
    }
    kept.sort_by_key(|m| m.start);
    kept
}

/// Build the redacted text in one pass. `matches` must be disjoint and sorted
/// by start, as `scan_all` returns them.
pub fn apply_replacements(text: &str, matches: &[RawMatch]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for m in matches {
        if m.start < cursor || !text.is_char_boundary(m.end) {
            continue;
        }
        let Some(before) = text.get(cursor..m.start) else {
            continue;
        };
        out.push_str(before);
        out.push_str(m.marker);
        cursor = m.end;
    }
    out.push_str(text.get(cursor..).unwrap_or_default());
    out
}

pub fn to_redactions(matches: &[RawMatch]) -> Vec<Redaction> {
    matches
        .iter()
        .map(|m| Redaction {
            category: m.pattern_name.to_string(),
            marker: m.marker.to_string(),
            start: m.start,
            end: m.end,
        })
        .collect()
}
