//! Data model for extracted study artifacts.
//!
//! Every type here is plain data with serde derives so callers can persist
//! or transmit extraction results without conversion glue. Constructors
//! enforce the structural invariants (non-empty trimmed fields, valid
//! answer key) so an extractor can never hand out a half-built record —
//! a candidate that fails validation is simply not a record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four multiple-choice option slots.
///
/// Modelled as an enum rather than a raw `char` so a `QuizQuestion` cannot
/// carry a correct-answer marker outside A–D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnswerKey {
    A,
    B,
    C,
    D,
}

impl AnswerKey {
    /// All keys in option order.
    pub const ALL: [AnswerKey; 4] = [AnswerKey::A, AnswerKey::B, AnswerKey::C, AnswerKey::D];

    /// Parse a loosely-formatted answer token: `"b"`, `"C."`, `"D)"`, `" a "`.
    ///
    /// The letter is upper-cased and trailing punctuation is tolerated.
    /// Anything that is not exactly one A–D letter (plus optional trailing
    /// `.`, `)`, `:` or whitespace) yields `None` — callers treat that as
    /// the field being absent.
    pub fn from_token(token: &str) -> Option<AnswerKey> {
        let t = token
            .trim()
            .trim_end_matches(|c: char| c == '.' || c == ')' || c == ':' || c.is_whitespace());
        let mut chars = t.chars();
        let letter = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        match letter.to_ascii_uppercase() {
            'A' => Some(AnswerKey::A),
            'B' => Some(AnswerKey::B),
            'C' => Some(AnswerKey::C),
            'D' => Some(AnswerKey::D),
            _ => None,
        }
    }

    /// Zero-based option slot for this key.
    pub fn index(self) -> usize {
        match self {
            AnswerKey::A => 0,
            AnswerKey::B => 1,
            AnswerKey::C => 2,
            AnswerKey::D => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnswerKey::A => "A",
            AnswerKey::B => "B",
            AnswerKey::C => "C",
            AnswerKey::D => "D",
        }
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four option texts of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOptions {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl AnswerOptions {
    pub fn get(&self, key: AnswerKey) -> &str {
        match key {
            AnswerKey::A => &self.a,
            AnswerKey::B => &self.b,
            AnswerKey::C => &self.c,
            AnswerKey::D => &self.d,
        }
    }
}

/// A multiple-choice quiz question with exactly four options.
///
/// Invariant: question and all four option texts are non-empty after
/// trimming, and `correct` names one of the four option slots. `correct` is
/// *not* validated against option content — the extractor recovers
/// structure, not truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: AnswerOptions,
    pub correct: AnswerKey,
}

impl QuizQuestion {
    /// Assemble a question from captured fragments, enforcing the
    /// non-empty invariant. Returns `None` when any field trims to empty —
    /// the candidate is dropped, never padded.
    pub fn from_parts(
        question: &str,
        options: [&str; 4],
        correct: AnswerKey,
    ) -> Option<QuizQuestion> {
        let question = question.trim();
        let trimmed = options.map(str::trim);
        if question.is_empty() || trimmed.iter().any(|o| o.is_empty()) {
            return None;
        }
        Some(QuizQuestion {
            question: question.to_string(),
            options: AnswerOptions {
                a: trimmed[0].to_string(),
                b: trimmed[1].to_string(),
                c: trimmed[2].to_string(),
                d: trimmed[3].to_string(),
            },
            correct,
        })
    }
}

/// A question/answer flashcard.
///
/// `mastered` always starts `false`; it is flipped by the studying host,
/// never by the extractor. `id` is assigned by the caller when cards need
/// stable identity (persistence, UI keys) — extraction leaves it `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub question: String,
    pub answer: String,
    pub mastered: bool,
}

impl Flashcard {
    /// Build a card from a candidate pair. `None` when either side trims
    /// to empty — a half pair is dropped, not given a placeholder.
    pub fn new(question: &str, answer: &str) -> Option<Flashcard> {
        let question = question.trim();
        let answer = answer.trim();
        if question.is_empty() || answer.is_empty() {
            return None;
        }
        Some(Flashcard {
            id: None,
            question: question.to_string(),
            answer: answer.to_string(),
            mastered: false,
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Flashcard {
        self.id = Some(id.into());
        self
    }
}

/// A glossary term with its definition.
///
/// Unique by exact `term` string within one extraction batch (first
/// occurrence wins — see `extract::key_terms`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTermEntry {
    pub term: String,
    pub definition: String,
}

impl KeyTermEntry {
    pub fn new(term: &str, definition: &str) -> Option<KeyTermEntry> {
        let term = term.trim();
        let definition = definition.trim();
        if term.is_empty() || definition.is_empty() {
            return None;
        }
        Some(KeyTermEntry {
            term: term.to_string(),
            definition: definition.to_string(),
        })
    }
}

/// Result of a key-term extraction: the deduplicated entries plus an
/// optional trailing formula block carried through verbatim.
///
/// The formula block is *not* parsed as terms; callers concatenate it onto
/// their rendering after the glossary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTermExtraction {
    pub entries: Vec<KeyTermEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formulas: Option<String>,
}

impl KeyTermExtraction {
    /// True when no strategy produced structured terms. A present formula
    /// block alone does not count — the caller still falls back to raw text
    /// for the term portion.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Which study artifact an upstream generation request asked for.
///
/// Serialised with the wire spellings the generation collaborator uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    #[serde(rename = "quiz")]
    Quiz,
    #[serde(rename = "flashcards")]
    Flashcards,
    #[serde(rename = "keyTerms")]
    KeyTerms,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContentKind::Quiz => "quiz",
            ContentKind::Flashcards => "flashcards",
            ContentKind::KeyTerms => "keyTerms",
        };
        f.write_str(s)
    }
}
