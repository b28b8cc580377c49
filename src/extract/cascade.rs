//! Ordered strategy cascade: the shared contract of every extractor.
//!
//! ## Why a cascade?
//!
//! The upstream generator's output format is not contractually guaranteed.
//! Rather than one heroic regex full of alternations, each extractor keeps
//! an ordered list of small pure functions of identical signature
//! (`&str -> Vec<T>`), from most structurally strict to most lenient.
//! Evaluation stops at the first strategy whose output is non-empty, so a
//! lenient heuristic can never second-guess a strict match. If every
//! strategy comes up empty the overall result is an empty vec — extraction
//! never errors on malformed input; the caller falls back to showing the
//! raw text.
//!
//! Strategies run strictly in order, synchronously, with no shared state;
//! each is independently testable.

use tracing::debug;

/// One interpretation of the expected text format.
///
/// `run` must be pure: no side effects, same output for the same input.
pub struct Strategy<T> {
    /// Short identifier for logs and reports, e.g. `"strict-inline"`.
    pub name: &'static str,
    pub run: fn(&str) -> Vec<T>,
}

/// Result of running a cascade: the winning strategy's records, plus which
/// strategy produced them (`None` when every strategy returned empty).
#[derive(Debug)]
pub struct CascadeOutcome<T> {
    pub records: Vec<T>,
    pub strategy: Option<&'static str>,
}

impl<T> CascadeOutcome<T> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Try each strategy in priority order; first non-empty result wins.
pub fn run_cascade<T>(text: &str, strategies: &[Strategy<T>]) -> CascadeOutcome<T> {
    for strategy in strategies {
        let records = (strategy.run)(text);
        if !records.is_empty() {
            debug!(
                strategy = strategy.name,
                records = records.len(),
                "cascade matched"
            );
            return CascadeOutcome {
                records,
                strategy: Some(strategy.name),
            };
        }
        debug!(strategy = strategy.name, "cascade tier empty, trying next");
    }
    CascadeOutcome {
        records: Vec::new(),
        strategy: None,
    }
}
