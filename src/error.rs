//! Error types for the text2study library.
//!
//! Extraction itself never errors: a block that matches no strategy is
//! dropped, and a text that matches nothing yields an empty result the
//! caller turns into a raw-text fallback. [`StudyError`] covers the cases
//! that *are* fatal to the caller:
//!
//! * constructing a quiz session over zero questions (the session would
//!   never legally reach its results phase),
//! * invalid configuration from the builder,
//! * failures of the external collaborators (text generation, attempt
//!   recording) surfaced at their trait boundary.
//!
//! Invalid session *operations* (answering twice, reviewing before results)
//! are deliberately not errors — the state machine ignores them.

use crate::model::ContentKind;
use thiserror::Error;

/// All fatal errors returned by the text2study library.
#[derive(Debug, Error)]
pub enum StudyError {
    /// A quiz session was constructed with an empty question set.
    #[error("Cannot start a quiz session with zero questions.\nRun extraction first and check for an empty result.")]
    EmptyQuestionSet,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The text-generation collaborator rejected the request.
    ///
    /// Generation failure is always a rejected call, never a malformed
    /// string — malformed strings go through extraction like any other.
    #[error("Text generation failed for '{kind}' content: {detail}")]
    GenerationFailed { kind: ContentKind, detail: String },

    /// The persistence collaborator could not record a completed attempt.
    ///
    /// Callers must not let this block showing the locally computed score;
    /// surface it as a notification and move on.
    #[error("Failed to record quiz attempt ({score}/{total}): {detail}")]
    RecordFailed {
        score: usize,
        total: usize,
        detail: String,
    },
}
