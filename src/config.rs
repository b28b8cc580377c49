//! Configuration for quiz sessions.
//!
//! All session behaviour knobs live in [`SessionConfig`], built via its
//! [`SessionConfigBuilder`]. Keeping them in one serialisable struct makes
//! it trivial to log a session's parameters or diff two runs.

use crate::error::StudyError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable parameters of a [`crate::session::QuizSession`].
///
/// # Example
/// ```rust
/// use text2study::SessionConfig;
/// use std::time::Duration;
///
/// let config = SessionConfig::builder()
///     .advance_delay_correct(Duration::from_millis(2000))
///     .badge_threshold(0.8)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long the host should wait before auto-advancing after a
    /// *correct* answer. Default: 1500 ms.
    ///
    /// The longer dwell gives the learner a beat to register the green
    /// feedback. This is a presentation affordance only; scoring does not
    /// depend on it.
    pub advance_delay_correct: Duration,

    /// Dwell before auto-advancing after an *incorrect* answer.
    /// Default: 1000 ms.
    pub advance_delay_incorrect: Duration,

    /// Fraction of correct answers at or above which the badge hook fires
    /// on completion. Range 0.0–1.0. Default: 0.7.
    pub badge_threshold: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            advance_delay_correct: Duration::from_millis(1500),
            advance_delay_incorrect: Duration::from_millis(1000),
            badge_threshold: 0.7,
        }
    }
}

impl SessionConfig {
    /// Create a new builder for `SessionConfig`.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SessionConfig`].
#[derive(Debug)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    pub fn advance_delay_correct(mut self, d: Duration) -> Self {
        self.config.advance_delay_correct = d;
        self
    }

    pub fn advance_delay_incorrect(mut self, d: Duration) -> Self {
        self.config.advance_delay_incorrect = d;
        self
    }

    pub fn badge_threshold(mut self, t: f64) -> Self {
        self.config.badge_threshold = t;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SessionConfig, StudyError> {
        let c = &self.config;
        if !(0.0..=1.0).contains(&c.badge_threshold) {
            return Err(StudyError::InvalidConfig(format!(
                "badge threshold must be within 0.0–1.0, got {}",
                c.badge_threshold
            )));
        }
        Ok(self.config)
    }
}
