//! # text2study
//!
//! Recover strongly-typed study artifacts from loosely-formatted text
//! produced by a generative language model.
//!
//! ## Why this crate?
//!
//! The upstream generator's output format is not contractually guaranteed.
//! Prompting helps, but models still emit `Q:` one day, `Question 1.` the
//! next, drop an option line, or wrap everything in chatter. Rather than
//! rejecting a whole batch over one broken entry, each extractor here runs
//! an ordered strict→lenient cascade of small pure parsers and keeps every
//! record it can structurally recover. Extraction never fails: the worst
//! case is an empty result, and the caller shows the raw text instead.
//!
//! ## Pipeline Overview
//!
//! ```text
//! raw text
//!  │
//!  ├─ 1. Normalise  CR/CRLF → LF
//!  ├─ 2. Cascade    strict inline → segmented → line-scan heuristics
//!  ├─ 3. Validate   non-empty fields, correct key in A–D, dedup (terms)
//!  └─ 4. Output     QuizQuestion[] / Flashcard[] / KeyTermEntry[] + report
//! ```
//!
//! Quiz questions additionally feed the [`session::QuizSession`] state
//! machine: answer capture, scoring, and post-hoc review over one attempt.
//!
//! ## Quick Start
//!
//! ```rust
//! use text2study::{extract, ContentKind, Extraction};
//!
//! let raw = "\
//! Q: What keyword declares an immutable binding?
//! A. mut
//! B. let
//! C. static
//! D. const
//! Correct: B
//! ";
//!
//! let output = extract(ContentKind::Quiz, raw);
//! assert_eq!(output.report.records, 1);
//! if let Extraction::Quiz(questions) = &output.records {
//!     assert_eq!(questions[0].options.get(questions[0].correct), "let");
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `text2study` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! text2study = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod provider;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{SessionConfig, SessionConfigBuilder};
pub use error::StudyError;
pub use extract::{
    extract, extract_flashcards, extract_key_terms, extract_quiz, fallback_paragraphs, Extraction,
    ExtractionOutput, ExtractionReport,
};
pub use model::{
    AnswerKey, AnswerOptions, ContentKind, Flashcard, KeyTermEntry, KeyTermExtraction, QuizQuestion,
};
pub use provider::{generate_and_extract, AttemptRecorder, TextGenerator};
pub use session::{Phase, QuizSession, ScheduledAdvance, SessionSnapshot};
