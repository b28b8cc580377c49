//! Extraction cascades for each study artifact.
//!
//! Each submodule implements one extractor as an ordered strict→lenient
//! strategy cascade over the shared [`cascade`] contract. Keeping the
//! strategies separate makes each independently testable and lets a new
//! tier slot in without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! raw text ──▶ normalise ──▶ cascade ──▶ typed records (possibly empty)
//! (LLM blob)   (CR/CRLF)    (tiers)     (quiz / cards / terms)
//! ```
//!
//! 1. [`cascade`]    — ordered-strategy evaluator, first non-empty wins
//! 2. [`text`]       — shared normalisation, line, and dedup helpers
//! 3. [`quiz`]       — three tiers producing [`QuizQuestion`]s
//! 4. [`flashcards`] — four tiers producing [`Flashcard`]s
//! 5. [`key_terms`]  — three tiers producing [`KeyTermEntry`]s plus a
//!    formula-block passthrough
//!
//! An empty result is a valid non-error outcome meaning "fall back to
//! displaying the raw text".

pub mod cascade;
pub mod flashcards;
pub mod key_terms;
pub mod quiz;
pub mod text;

use crate::model::{ContentKind, Flashcard, KeyTermExtraction, QuizQuestion};
use serde::Serialize;
use tracing::info;

pub use flashcards::extract_flashcards;
pub use key_terms::extract_key_terms;
pub use quiz::extract_quiz;
pub use text::fallback_paragraphs;

/// The typed records recovered from one extraction call.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Extraction {
    Quiz(Vec<QuizQuestion>),
    Flashcards(Vec<Flashcard>),
    KeyTerms(KeyTermExtraction),
}

impl Extraction {
    /// Number of structured records recovered.
    pub fn len(&self) -> usize {
        match self {
            Extraction::Quiz(qs) => qs.len(),
            Extraction::Flashcards(cards) => cards.len(),
            Extraction::KeyTerms(terms) => terms.entries.len(),
        }
    }

    /// True when extraction found no structured records — the caller's cue
    /// to render the original raw text instead.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which cascade tier produced the records, and how many.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub kind: ContentKind,
    pub records: usize,
    /// Name of the winning strategy; `None` when every tier came up empty.
    pub strategy: Option<&'static str>,
}

/// One extraction call: typed records plus the report of how they were won.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutput {
    pub records: Extraction,
    pub report: ExtractionReport,
}

/// Run the extractor for `kind` over one raw text blob.
///
/// This is the primary entry point for the library. It never fails: a text
/// no strategy can interpret produces an empty [`Extraction`], and the
/// caller falls back to showing the raw text.
pub fn extract(kind: ContentKind, input: &str) -> ExtractionOutput {
    let (records, strategy) = match kind {
        ContentKind::Quiz => {
            let outcome = quiz::quiz_outcome(input);
            (Extraction::Quiz(outcome.records), outcome.strategy)
        }
        ContentKind::Flashcards => {
            let outcome = flashcards::flashcard_outcome(input);
            (Extraction::Flashcards(outcome.records), outcome.strategy)
        }
        ContentKind::KeyTerms => {
            let (extraction, outcome) = key_terms::key_term_outcome(input);
            (Extraction::KeyTerms(extraction), outcome.strategy)
        }
    };

    let report = ExtractionReport {
        kind,
        records: records.len(),
        strategy,
    };
    info!(
        kind = %kind,
        records = report.records,
        strategy = report.strategy.unwrap_or("none"),
        "extraction finished"
    );

    ExtractionOutput { records, report }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_dispatches_on_kind() {
        let quiz = "Q: X?\nA. 1\nB. 2\nC. 3\nD. 4\nCorrect: A\n";
        let out = extract(ContentKind::Quiz, quiz);
        assert_eq!(out.report.records, 1);
        assert_eq!(out.report.strategy, Some("strict-inline"));
        assert!(matches!(out.records, Extraction::Quiz(_)));
    }

    #[test]
    fn empty_result_reports_no_strategy() {
        let out = extract(ContentKind::Flashcards, "nothing here");
        assert!(out.records.is_empty());
        assert_eq!(out.report.strategy, None);
        assert_eq!(out.report.records, 0);
    }

    #[test]
    fn report_serialises_for_logging() {
        let out = extract(ContentKind::KeyTerms, "Term: X\nDefinition: Y\n");
        let json = serde_json::to_string(&out.report).unwrap();
        assert!(json.contains("\"keyTerms\""));
        assert!(json.contains("strict-term-definition"));
    }
}
