//! Collaborator seams: text generation and attempt recording.
//!
//! Both collaborators are external to this crate — the network calls, the
//! database, the retry policy all live with the implementor. The traits
//! pin down only the contract the extraction and session logic relies on:
//!
//! * a generator failure is a rejected call (`Err`), never a malformed
//!   string — malformed strings are a *successful* generation that the
//!   cascades then do their best with;
//! * a recorder failure must not block the caller from showing the score
//!   it already computed locally.

use crate::error::StudyError;
use crate::extract::{extract, ExtractionOutput};
use crate::model::ContentKind;
use tracing::debug;

/// Upstream generative-text collaborator.
///
/// Given a content kind and the study source text, returns the raw text
/// blob whose format is *not* contractually guaranteed — that is the whole
/// reason the extraction cascades exist.
pub trait TextGenerator {
    fn generate(&self, kind: ContentKind, source: &str) -> Result<String, StudyError>;
}

/// Persistence collaborator recording one completed quiz attempt.
///
/// `correct` holds the indices answered correctly, in question order.
pub trait AttemptRecorder {
    fn record(&mut self, score: usize, total: usize, correct: &[usize])
        -> Result<(), StudyError>;
}

/// Ask the generator for `kind` content over `source`, then run the
/// matching extraction cascade on whatever comes back.
///
/// # Errors
/// Only generator rejection propagates. An unparseable (but successfully
/// generated) text is *not* an error: it returns an empty extraction and
/// the caller falls back to raw-text display.
pub fn generate_and_extract(
    generator: &dyn TextGenerator,
    kind: ContentKind,
    source: &str,
) -> Result<ExtractionOutput, StudyError> {
    let raw = generator.generate(kind, source)?;
    debug!(kind = %kind, bytes = raw.len(), "generator returned text");
    Ok(extract(kind, &raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedGenerator(&'static str);

    impl TextGenerator for CannedGenerator {
        fn generate(&self, _kind: ContentKind, _source: &str) -> Result<String, StudyError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGenerator;

    impl TextGenerator for FailingGenerator {
        fn generate(&self, kind: ContentKind, _source: &str) -> Result<String, StudyError> {
            Err(StudyError::GenerationFailed {
                kind,
                detail: "upstream 500".into(),
            })
        }
    }

    #[test]
    fn generation_feeds_extraction() {
        let generator = CannedGenerator("Q: X?\nA. 1\nB. 2\nC. 3\nD. 4\nCorrect: A\n");
        let out = generate_and_extract(&generator, ContentKind::Quiz, "source notes").unwrap();
        assert_eq!(out.report.records, 1);
    }

    #[test]
    fn malformed_generation_is_not_an_error() {
        let generator = CannedGenerator("sorry, I cannot help with that");
        let out = generate_and_extract(&generator, ContentKind::Quiz, "source").unwrap();
        assert!(out.records.is_empty());
    }

    #[test]
    fn rejected_generation_propagates() {
        let err = generate_and_extract(&FailingGenerator, ContentKind::KeyTerms, "source");
        assert!(matches!(
            err,
            Err(StudyError::GenerationFailed {
                kind: ContentKind::KeyTerms,
                ..
            })
        ));
    }
}
