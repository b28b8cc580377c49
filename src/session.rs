//! The interactive quiz session state machine.
//!
//! ## States
//!
//! ```text
//! Answering ──(last answer / skip)──▶ Results ◀──▶ Reviewing
//!     ▲                                  │
//!     └────────────(reset)───────────────┘
//! ```
//!
//! The phase is a single enum rather than a set of booleans, so illegal
//! combinations (reviewing while still answering) cannot be represented.
//! Invalid operations — answering an already-answered question, reviewing
//! with no results — are no-op guards, never errors: the host can forward
//! UI events without defensive checks.
//!
//! ## The delayed auto-advance
//!
//! After an answer is selected the UI dwells on the feedback before moving
//! on. Rather than an implicit timer that could outlive the session,
//! [`QuizSession::select_answer`] returns a [`ScheduledAdvance`] handle
//! carrying the dwell duration and a generation token. The host sleeps (or
//! schedules) for `delay` and then calls [`QuizSession::apply_advance`];
//! a handle that is stale — the session was reset or already moved on — is
//! silently ignored. Dropping the handle cancels the transition.

use crate::config::SessionConfig;
use crate::error::StudyError;
use crate::model::{AnswerKey, QuizQuestion};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Where the session currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Taking the quiz; answers are being captured.
    Answering,
    /// All answering is done; the score is final for this attempt.
    Results,
    /// Walking back through the questions; reachable only from `Results`.
    Reviewing,
}

/// A pending auto-advance returned by [`QuizSession::select_answer`].
///
/// The host waits `delay` and then hands the token back via
/// [`QuizSession::apply_advance`]. Dropping the handle cancels the
/// transition; applying a stale handle is a no-op.
#[derive(Debug)]
#[must_use = "the session does not advance unless this handle is applied"]
pub struct ScheduledAdvance {
    delay: Duration,
    token: u64,
    index: usize,
}

impl ScheduledAdvance {
    /// How long the host should dwell before applying the advance.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Discard the pending transition. Equivalent to dropping the handle;
    /// named for call sites where the intent should read explicitly.
    pub fn cancel(self) {}
}

/// Callback invoked exactly once when an attempt first reaches `Results`.
pub type CompletionHook = Box<dyn FnMut(usize, usize) + Send>;

/// One in-progress or completed attempt over a fixed set of questions.
///
/// The session exclusively owns its answer map for the lifetime of one
/// attempt; [`QuizSession::reset`] starts a fresh attempt over the same
/// question set.
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    answers: BTreeMap<usize, AnswerKey>,
    phase: Phase,
    review_index: usize,
    /// Bumped on reset; outstanding [`ScheduledAdvance`] handles from the
    /// previous attempt then fail their token check.
    generation: u64,
    reported: bool,
    config: SessionConfig,
    on_complete: Option<CompletionHook>,
    on_badge: Option<CompletionHook>,
}

impl QuizSession {
    /// Create a session over `questions`.
    ///
    /// # Errors
    /// [`StudyError::EmptyQuestionSet`] when `questions` is empty — an
    /// empty session could never legally reach `Results`, so it cannot be
    /// constructed at all.
    pub fn new(questions: Vec<QuizQuestion>, config: SessionConfig) -> Result<Self, StudyError> {
        if questions.is_empty() {
            return Err(StudyError::EmptyQuestionSet);
        }
        Ok(Self {
            questions,
            current: 0,
            answers: BTreeMap::new(),
            phase: Phase::Answering,
            review_index: 0,
            generation: 0,
            reported: false,
            config,
            on_complete: None,
            on_badge: None,
        })
    }

    /// Register the completion callback, fired exactly once per attempt
    /// with `(score, total)` on the first transition into `Results`.
    pub fn with_on_complete(mut self, hook: impl FnMut(usize, usize) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(hook));
        self
    }

    /// Register the badge hook, fired alongside completion when
    /// `score / total` reaches the configured threshold. Presentation
    /// only — scoring does not depend on it.
    pub fn with_on_badge(mut self, hook: impl FnMut(usize, usize) + Send + 'static) -> Self {
        self.on_badge = Some(Box::new(hook));
        self
    }

    // ── Answering ─────────────────────────────────────────────────────────

    /// Record `key` for the current question.
    ///
    /// Valid only while `Answering` and only if the current question has no
    /// recorded answer yet; otherwise a no-op returning `None`.
    ///
    /// On success returns the [`ScheduledAdvance`] the host applies after
    /// its dwell — longer when the answer was correct, shorter otherwise.
    pub fn select_answer(&mut self, key: AnswerKey) -> Option<ScheduledAdvance> {
        if self.phase != Phase::Answering || self.answers.contains_key(&self.current) {
            debug!(phase = ?self.phase, index = self.current, "select_answer ignored");
            return None;
        }
        let correct = self.questions[self.current].correct == key;
        self.answers.insert(self.current, key);

        let delay = if correct {
            self.config.advance_delay_correct
        } else {
            self.config.advance_delay_incorrect
        };
        Some(ScheduledAdvance {
            delay,
            token: self.generation,
            index: self.current,
        })
    }

    /// Apply a previously returned [`ScheduledAdvance`].
    ///
    /// A stale handle — wrong generation, wrong index, or the session has
    /// left `Answering` — is silently ignored.
    pub fn apply_advance(&mut self, advance: ScheduledAdvance) {
        if advance.token != self.generation
            || self.phase != Phase::Answering
            || advance.index != self.current
            || !self.answers.contains_key(&self.current)
        {
            debug!(index = advance.index, "stale advance ignored");
            return;
        }
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        } else {
            self.finish();
        }
    }

    /// Force the transition to `Results` with whatever answers exist so
    /// far; unanswered questions count as wrong. Valid once at least one
    /// answer has been recorded.
    pub fn skip_to_results(&mut self) {
        if self.phase != Phase::Answering || self.answers.is_empty() {
            debug!(phase = ?self.phase, "skip_to_results ignored");
            return;
        }
        self.finish();
    }

    fn finish(&mut self) {
        self.phase = Phase::Results;
        if self.reported {
            return;
        }
        self.reported = true;

        let score = self.score();
        let total = self.questions.len();
        debug!(score, total, "attempt complete");
        if let Some(hook) = self.on_complete.as_mut() {
            hook(score, total);
        }
        if score as f64 / total as f64 >= self.config.badge_threshold {
            if let Some(hook) = self.on_badge.as_mut() {
                hook(score, total);
            }
        }
    }

    // ── Results ───────────────────────────────────────────────────────────

    /// Start a new attempt over the same question set. Valid from
    /// `Results`; clears answers and invalidates any outstanding
    /// [`ScheduledAdvance`] from the finished attempt.
    pub fn reset(&mut self) {
        if self.phase != Phase::Results {
            debug!(phase = ?self.phase, "reset ignored");
            return;
        }
        self.answers.clear();
        self.current = 0;
        self.review_index = 0;
        self.reported = false;
        self.generation += 1;
        self.phase = Phase::Answering;
    }

    /// Enter review mode. Valid from `Results`; the review cursor starts
    /// at the first question and never mutates answers.
    pub fn enter_review(&mut self) {
        if self.phase != Phase::Results {
            debug!(phase = ?self.phase, "enter_review ignored");
            return;
        }
        self.review_index = 0;
        self.phase = Phase::Reviewing;
    }

    /// Leave review mode, back to `Results`.
    pub fn exit_review(&mut self) {
        if self.phase != Phase::Reviewing {
            debug!(phase = ?self.phase, "exit_review ignored");
            return;
        }
        self.phase = Phase::Results;
    }

    /// Move the review cursor forward; clamped at the last question.
    pub fn review_next(&mut self) {
        if self.phase == Phase::Reviewing && self.review_index + 1 < self.questions.len() {
            self.review_index += 1;
        }
    }

    /// Move the review cursor back; clamped at the first question.
    pub fn review_prev(&mut self) {
        if self.phase == Phase::Reviewing {
            self.review_index = self.review_index.saturating_sub(1);
        }
    }

    // ── Observers ─────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question currently being answered.
    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.current]
    }

    pub fn review_index(&self) -> usize {
        self.review_index
    }

    /// The question under the review cursor.
    pub fn review_question(&self) -> &QuizQuestion {
        &self.questions[self.review_index]
    }

    pub fn answers(&self) -> &BTreeMap<usize, AnswerKey> {
        &self.answers
    }

    pub fn answer_for(&self, index: usize) -> Option<AnswerKey> {
        self.answers.get(&index).copied()
    }

    /// Count of recorded answers matching the question's correct key.
    pub fn score(&self) -> usize {
        self.answers
            .iter()
            .filter(|&(&i, &key)| self.questions[i].correct == key)
            .count()
    }

    /// Indices answered correctly, in question order. The shape the
    /// persistence collaborator records.
    pub fn correct_indices(&self) -> Vec<usize> {
        self.answers
            .iter()
            .filter(|&(&i, &key)| self.questions[i].correct == key)
            .map(|(&i, _)| i)
            .collect()
    }

    /// Whether this attempt's score reaches the badge threshold.
    pub fn badge_earned(&self) -> bool {
        self.score() as f64 / self.questions.len() as f64 >= self.config.badge_threshold
    }

    /// State snapshot for the host UI; cheap to take on every transition.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            current_index: self.current,
            total: self.questions.len(),
            answered: self.answers.len(),
            score: (self.phase != Phase::Answering).then(|| self.score()),
            review_index: (self.phase == Phase::Reviewing).then_some(self.review_index),
        }
    }
}

impl std::fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("answered", &self.answers.len())
            .field("total", &self.questions.len())
            .field("generation", &self.generation)
            .finish()
    }
}

/// Serialisable view of the session state for the host UI.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub current_index: usize,
    pub total: usize,
    pub answered: usize,
    /// Final score; present once the attempt has left `Answering`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_index: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerOptions;
    use std::sync::{Arc, Mutex};

    fn question(text: &str, correct: AnswerKey) -> QuizQuestion {
        QuizQuestion {
            question: text.to_string(),
            options: AnswerOptions {
                a: "option a".into(),
                b: "option b".into(),
                c: "option c".into(),
                d: "option d".into(),
            },
            correct,
        }
    }

    fn three_questions() -> Vec<QuizQuestion> {
        vec![
            question("q0", AnswerKey::A),
            question("q1", AnswerKey::B),
            question("q2", AnswerKey::C),
        ]
    }

    fn answer_and_advance(session: &mut QuizSession, key: AnswerKey) {
        let advance = session.select_answer(key).expect("answer accepted");
        session.apply_advance(advance);
    }

    #[test]
    fn zero_questions_is_a_construction_error() {
        let err = QuizSession::new(Vec::new(), SessionConfig::default());
        assert!(matches!(err, Err(StudyError::EmptyQuestionSet)));
    }

    #[test]
    fn perfect_run_reports_once_and_earns_badge() {
        let completions: Arc<Mutex<Vec<(usize, usize)>>> = Arc::default();
        let badges: Arc<Mutex<Vec<(usize, usize)>>> = Arc::default();
        let c = Arc::clone(&completions);
        let b = Arc::clone(&badges);

        let mut session = QuizSession::new(three_questions(), SessionConfig::default())
            .unwrap()
            .with_on_complete(move |score, total| c.lock().unwrap().push((score, total)))
            .with_on_badge(move |score, total| b.lock().unwrap().push((score, total)));

        answer_and_advance(&mut session, AnswerKey::A);
        answer_and_advance(&mut session, AnswerKey::B);
        answer_and_advance(&mut session, AnswerKey::C);

        assert_eq!(session.phase(), Phase::Results);
        assert_eq!(session.score(), 3);
        assert_eq!(*completions.lock().unwrap(), vec![(3, 3)]);
        assert_eq!(*badges.lock().unwrap(), vec![(3, 3)]);
        assert!(session.badge_earned());
    }

    #[test]
    fn below_threshold_fires_no_badge() {
        let badges: Arc<Mutex<Vec<(usize, usize)>>> = Arc::default();
        let b = Arc::clone(&badges);
        let mut session = QuizSession::new(three_questions(), SessionConfig::default())
            .unwrap()
            .with_on_badge(move |s, t| b.lock().unwrap().push((s, t)));

        // 1/3 correct is under the 0.7 default threshold.
        answer_and_advance(&mut session, AnswerKey::A);
        answer_and_advance(&mut session, AnswerKey::D);
        answer_and_advance(&mut session, AnswerKey::D);

        assert_eq!(session.score(), 1);
        assert!(badges.lock().unwrap().is_empty());
        assert!(!session.badge_earned());
    }

    #[test]
    fn second_answer_for_same_question_is_ignored() {
        let mut session = QuizSession::new(three_questions(), SessionConfig::default()).unwrap();
        let advance = session.select_answer(AnswerKey::D).unwrap();
        assert!(session.select_answer(AnswerKey::A).is_none());
        session.apply_advance(advance);
        // The first recorded answer stands.
        assert_eq!(session.answer_for(0), Some(AnswerKey::D));
    }

    #[test]
    fn correct_answer_dwells_longer() {
        let mut session = QuizSession::new(three_questions(), SessionConfig::default()).unwrap();
        let advance = session.select_answer(AnswerKey::A).unwrap();
        assert_eq!(
            advance.delay(),
            SessionConfig::default().advance_delay_correct
        );
        session.apply_advance(advance);

        let advance = session.select_answer(AnswerKey::D).unwrap();
        assert_eq!(
            advance.delay(),
            SessionConfig::default().advance_delay_incorrect
        );
    }

    #[test]
    fn stale_advance_after_reset_is_ignored() {
        let mut session = QuizSession::new(three_questions(), SessionConfig::default()).unwrap();
        answer_and_advance(&mut session, AnswerKey::A);
        let stale = session.select_answer(AnswerKey::B).unwrap();
        session.skip_to_results();
        session.reset();

        // The handle belongs to the previous attempt's generation.
        session.apply_advance(stale);
        assert_eq!(session.phase(), Phase::Answering);
        assert_eq!(session.current_index(), 0);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn skip_requires_at_least_one_answer() {
        let mut session = QuizSession::new(three_questions(), SessionConfig::default()).unwrap();
        session.skip_to_results();
        assert_eq!(session.phase(), Phase::Answering);

        session.select_answer(AnswerKey::A).unwrap().cancel();
        session.skip_to_results();
        assert_eq!(session.phase(), Phase::Results);
        // Unanswered questions count as wrong.
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn completion_reports_exactly_once_per_attempt() {
        let completions: Arc<Mutex<Vec<(usize, usize)>>> = Arc::default();
        let c = Arc::clone(&completions);
        let mut session = QuizSession::new(three_questions(), SessionConfig::default())
            .unwrap()
            .with_on_complete(move |s, t| c.lock().unwrap().push((s, t)));

        session.select_answer(AnswerKey::A).unwrap().cancel();
        session.skip_to_results();
        session.enter_review();
        session.exit_review();
        session.skip_to_results(); // no-op: already in Results
        assert_eq!(completions.lock().unwrap().len(), 1);

        // A fresh attempt reports again.
        session.reset();
        session.select_answer(AnswerKey::A).unwrap().cancel();
        session.skip_to_results();
        assert_eq!(completions.lock().unwrap().len(), 2);
    }

    #[test]
    fn review_round_trip_preserves_answers() {
        let mut session = QuizSession::new(three_questions(), SessionConfig::default()).unwrap();
        answer_and_advance(&mut session, AnswerKey::A);
        answer_and_advance(&mut session, AnswerKey::B);
        answer_and_advance(&mut session, AnswerKey::C);
        let before = session.answers().clone();

        session.enter_review();
        assert_eq!(session.phase(), Phase::Reviewing);
        session.review_next();
        session.review_next();
        session.review_next(); // clamped at the last question
        assert_eq!(session.review_index(), 2);
        session.review_prev();
        assert_eq!(session.review_question().question, "q1");
        session.exit_review();

        assert_eq!(session.phase(), Phase::Results);
        assert_eq!(session.answers(), &before);
    }

    #[test]
    fn review_unreachable_while_answering() {
        let mut session = QuizSession::new(three_questions(), SessionConfig::default()).unwrap();
        session.enter_review();
        assert_eq!(session.phase(), Phase::Answering);
    }

    #[test]
    fn reset_and_identical_answers_reproduce_score() {
        let mut session = QuizSession::new(three_questions(), SessionConfig::default()).unwrap();
        let keys = [AnswerKey::A, AnswerKey::B, AnswerKey::D];
        for key in keys {
            answer_and_advance(&mut session, key);
        }
        let first = session.score();

        session.reset();
        for key in keys {
            answer_and_advance(&mut session, key);
        }
        assert_eq!(session.score(), first);
        assert_eq!(first, 2);
    }

    #[test]
    fn snapshot_reflects_phase() {
        let mut session = QuizSession::new(three_questions(), SessionConfig::default()).unwrap();
        let snap = session.snapshot();
        assert_eq!(snap.score, None);
        assert_eq!(snap.answered, 0);

        answer_and_advance(&mut session, AnswerKey::A);
        session.skip_to_results();
        let snap = session.snapshot();
        assert_eq!(snap.score, Some(1));
        assert_eq!(snap.review_index, None);

        session.enter_review();
        assert_eq!(session.snapshot().review_index, Some(0));
    }
}
