//! Shared text helpers used by every extraction cascade.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Normalise line endings (CRLF and lone CR → LF).
///
/// Every extractor normalises up front so the strategies themselves only
/// ever reason about `\n`. This is what makes the strict patterns tolerant
/// of mixed line-break styles without multiplying the regexes.
pub fn normalize_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

/// Trimmed, non-empty lines of the input, in order.
pub fn non_empty_lines(input: &str) -> Vec<&str> {
    input
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

static RE_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[•\-*]|\d{1,3}\.)\s*").unwrap());

/// Strip a single leading bullet marker (`•`, `-`, `*`, or `N.`) from a line.
pub fn strip_bullet(line: &str) -> &str {
    match RE_BULLET.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// Keep only the first occurrence of each key, preserving input order.
///
/// Used by the key-term extractor (unique by exact `term` string); the quiz
/// extractor deliberately does *not* deduplicate.
pub fn dedup_first_wins<T, K, F>(items: Vec<T>, mut key: F) -> Vec<T>
where
    K: std::hash::Hash + Eq,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

/// Split raw text into display paragraphs on blank lines.
///
/// This is the caller-level fallback when a cascade yields zero records:
/// the original text is rendered verbatim, paragraph by paragraph, instead
/// of an error message.
pub fn fallback_paragraphs(input: &str) -> Vec<String> {
    normalize_line_endings(input)
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
