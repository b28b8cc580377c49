//! Key-term extraction: `Term:`/`Definition:` cascade with a formula-block
//! passthrough.
//!
//! Input text may end with a `Formulas:` section. That section is split off
//! *before* the cascade runs and carried through verbatim — formulas are
//! rendered after the glossary, never parsed as terms.
//!
//! Unlike quiz records, key terms are unique by exact `term` string within
//! one batch: the first occurrence wins, later duplicates are dropped.

use crate::extract::cascade::{run_cascade, CascadeOutcome, Strategy};
use crate::extract::text::{dedup_first_wins, non_empty_lines, normalize_line_endings, strip_bullet};
use crate::model::{KeyTermEntry, KeyTermExtraction};
use once_cell::sync::Lazy;
use regex::Regex;

static STRATEGIES: [Strategy<KeyTermEntry>; 3] = [
    Strategy {
        name: "strict-term-definition",
        run: strict_term_definition,
    },
    Strategy {
        name: "line-pair-scan",
        run: line_pair_scan,
    },
    Strategy {
        name: "bullet-pairs",
        run: bullet_pairs,
    },
];

/// Extract key terms (and an optional trailing formula block) from raw
/// generator output.
///
/// `entries` empty means "no structured terms": the caller renders the
/// original text as paragraphs instead (see
/// [`crate::extract::text::fallback_paragraphs`]).
pub fn extract_key_terms(text: &str) -> KeyTermExtraction {
    key_term_outcome(text).0
}

pub(crate) fn key_term_outcome(text: &str) -> (KeyTermExtraction, CascadeOutcome<KeyTermEntry>) {
    let text = normalize_line_endings(text);
    let (term_text, formulas) = split_formula_section(&text);

    let mut outcome = run_cascade(term_text, &STRATEGIES);
    outcome.records = dedup_first_wins(std::mem::take(&mut outcome.records), |e| e.term.clone());

    (
        KeyTermExtraction {
            entries: outcome.records.clone(),
            formulas,
        },
        outcome,
    )
}

// ── Formula section passthrough ──────────────────────────────────────────────

static RE_FORMULAS_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mi)^[ \t]*Formulas[ \t]*:").unwrap());

/// Split the text at the first `Formulas:` heading. Everything from the
/// heading on (heading included) is the formula block, carried unmodified
/// so the caller's rendering reproduces the original section.
fn split_formula_section(text: &str) -> (&str, Option<String>) {
    match RE_FORMULAS_HEADING.find(text) {
        Some(m) => {
            let block = text[m.start()..].trim();
            let formulas = (!block.is_empty()).then(|| block.to_string());
            (&text[..m.start()], formulas)
        }
        None => (text, None),
    }
}

// ── Tier 1: strict Term/Definition blocks ────────────────────────────────────
//
// Block-split at `Term:` markers so definitions may span multiple lines,
// ending at the next `Term:` or end of text.

static RE_TERM_MARK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*Term[ \t]*:[ \t]*").unwrap());
static RE_DEFINITION_MARK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*Definition[ \t]*:[ \t]*").unwrap());

fn strict_term_definition(text: &str) -> Vec<KeyTermEntry> {
    let marks: Vec<(usize, usize)> = RE_TERM_MARK
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();

    let mut entries = Vec::new();
    for (i, &(_, body_start)) in marks.iter().enumerate() {
        let body_end = marks.get(i + 1).map(|&(s, _)| s).unwrap_or(text.len());
        let block = &text[body_start..body_end];

        let Some(d) = RE_DEFINITION_MARK.find(block) else {
            continue;
        };
        let term = &block[..d.start()];
        let definition = &block[d.end()..];
        if let Some(entry) = KeyTermEntry::new(term, definition) {
            entries.push(entry);
        }
    }
    entries
}

// ── Tier 2: line-pair scan ───────────────────────────────────────────────────

fn line_pair_scan(text: &str) -> Vec<KeyTermEntry> {
    let mut entries = Vec::new();
    let mut pending_term: Option<String> = None;

    for line in text.lines().map(str::trim) {
        if let Some(rest) = labeled_rest(line, "Term") {
            pending_term = Some(rest.to_string());
        } else if let Some(rest) = labeled_rest(line, "Definition") {
            // A Definition line with an empty remainder does not close the
            // pair; the term stays pending.
            if rest.is_empty() {
                continue;
            }
            if let Some(term) = pending_term.take() {
                if let Some(entry) = KeyTermEntry::new(&term, rest) {
                    entries.push(entry);
                }
            }
        }
    }
    entries
}

/// `labeled_rest("Term: Osmosis", "Term")` → `Some("Osmosis")`.
fn labeled_rest<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(label)?.trim_start();
    Some(rest.strip_prefix(':')?.trim())
}

// ── Tier 3: bullet/alternating-line pairs ────────────────────────────────────

/// Section headings that must never become a term.
const HEADING_WORDS: [&str; 2] = ["Key Terms", "Formulas"];

fn is_heading(line: &str) -> bool {
    HEADING_WORDS.iter().any(|h| line.contains(h))
}

fn bullet_pairs(text: &str) -> Vec<KeyTermEntry> {
    let lines: Vec<&str> = non_empty_lines(text)
        .into_iter()
        .map(strip_bullet)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    lines
        .chunks(2)
        .filter_map(|pair| {
            let [term, definition] = pair else {
                return None;
            };
            if is_heading(term) {
                return None;
            }
            KeyTermEntry::new(term, definition)
        })
        .collect()
}
