//! Quiz-question extraction: a three-tier strict→lenient cascade.
//!
//! The expected shape is a question, four lettered options, and a
//! correct-answer marker:
//!
//! ```text
//! Q: What keyword declares an immutable binding?
//! A. mut
//! B. let
//! C. static
//! D. const
//! Correct: B
//! ```
//!
//! Tier 1 matches that whole block inline. Tier 2 segments the text at
//! question markers and hunts for the fields inside each segment. Tier 3
//! walks line by line and accumulates fields into an in-progress record.
//! A structurally broken block is dropped, never an error, and never takes
//! the rest of the batch down with it.
//!
//! Unlike key terms, quiz records are *not* deduplicated: every
//! structurally valid record is kept in input order.

use crate::extract::cascade::{run_cascade, CascadeOutcome, Strategy};
use crate::extract::text::normalize_line_endings;
use crate::model::{AnswerKey, QuizQuestion};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static STRATEGIES: [Strategy<QuizQuestion>; 3] = [
    Strategy {
        name: "strict-inline",
        run: strict_inline,
    },
    Strategy {
        name: "segment-fields",
        run: segment_fields,
    },
    Strategy {
        name: "line-scan",
        run: line_scan,
    },
];

/// Extract quiz questions from raw generator output.
///
/// Returns an empty vec when nothing parses; the caller decides the
/// raw-text fallback policy.
pub fn extract_quiz(text: &str) -> Vec<QuizQuestion> {
    quiz_outcome(text).records
}

pub(crate) fn quiz_outcome(text: &str) -> CascadeOutcome<QuizQuestion> {
    let text = normalize_line_endings(text);
    run_cascade(&text, &STRATEGIES)
}

// ── Tier 1: strict inline block ──────────────────────────────────────────────

static RE_STRICT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*(?:Question|Q)(?:[ \t]*\d+)?[ \t]*[:.][ \t]*(.+)\n",
        r"[ \t]*A[.:][ \t]*(.+)\n",
        r"[ \t]*B[.:][ \t]*(.+)\n",
        r"[ \t]*C[.:][ \t]*(.+)\n",
        r"[ \t]*D[.:][ \t]*(.+)\n",
        r"[ \t]*(?:Correct[ \t]+Answer|Correct|Answer)[ \t]*[:.][ \t]*([A-Da-d])[.):]?[ \t]*$",
    ))
    .unwrap()
});

fn strict_inline(text: &str) -> Vec<QuizQuestion> {
    RE_STRICT_BLOCK
        .captures_iter(text)
        .filter_map(|caps| {
            let correct = AnswerKey::from_token(&caps[6])?;
            QuizQuestion::from_parts(&caps[1], [&caps[2], &caps[3], &caps[4], &caps[5]], correct)
        })
        .collect()
}

// ── Tier 2: segment at question markers, search fields per segment ───────────

static RE_QUESTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:Question|Q)(?:[ \t]*\d+)?[ \t]*[:.]").unwrap());

static RE_QUESTION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:Question|Q)(?:[ \t]*\d+)?[ \t]*[:.][ \t]*(.+)").unwrap()
});

static RE_OPTION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*([A-D])[.:)][ \t]*(.+)").unwrap());

static RE_CORRECT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*(?:correct[ \t]+answer|correct|answer)[ \t]*[:.][ \t]*([A-Da-d])\b")
        .unwrap()
});

fn segment_fields(text: &str) -> Vec<QuizQuestion> {
    let starts: Vec<usize> = RE_QUESTION_MARKER.find_iter(text).map(|m| m.start()).collect();

    let mut records = Vec::new();
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        let block = &text[start..end];
        match parse_block(block) {
            Some(q) => records.push(q),
            None => warn!("dropping quiz block missing a required field"),
        }
    }
    records
}

/// Search one segment for the six required fields. `None` when any field
/// is missing or blank — the block is silently dropped.
fn parse_block(block: &str) -> Option<QuizQuestion> {
    let question = RE_QUESTION_LINE.captures(block)?.get(1)?.as_str();

    let mut options: [Option<&str>; 4] = [None; 4];
    for caps in RE_OPTION_LINE.captures_iter(block) {
        let key = AnswerKey::from_token(&caps[1])?;
        let slot = &mut options[key.index()];
        if slot.is_none() {
            *slot = Some(caps.get(2)?.as_str());
        }
    }
    let [a, b, c, d] = options;

    let correct = AnswerKey::from_token(&RE_CORRECT_LINE.captures(block)?[1])?;
    QuizQuestion::from_parts(question, [a?, b?, c?, d?], correct)
}

// ── Tier 3: line scan with an accumulating record ────────────────────────────

static RE_SCAN_QUESTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:Question|Q)(?:[ \t]*\d+)?[ \t]*[:.][ \t]*(.+)$").unwrap());

static RE_SCAN_NUMBERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}[.)][ \t]*(.+)$").unwrap());

static RE_SCAN_OPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-D])[.:)][ \t]*(.+)$").unwrap());

static RE_SCAN_CORRECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)(?:correct[ \t]+answer|correct|answer)[ \t]*[:.][ \t]*(.+)$").unwrap()
});

static RE_OPTION_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Da-d][.:)]").unwrap());

#[derive(Default)]
struct PendingQuestion {
    question: String,
    options: [Option<String>; 4],
    correct: Option<AnswerKey>,
}

impl PendingQuestion {
    fn new(question: &str) -> Self {
        PendingQuestion {
            question: question.to_string(),
            ..Default::default()
        }
    }

    fn complete(&self) -> bool {
        self.correct.is_some() && self.options.iter().all(Option::is_some)
    }

    fn flush(self) -> Option<QuizQuestion> {
        let [a, b, c, d] = self.options;
        QuizQuestion::from_parts(
            &self.question,
            [a?.as_str(), b?.as_str(), c?.as_str(), d?.as_str()],
            self.correct?,
        )
    }
}

/// Does this line open a new question record?
///
/// A numbered list item (`3) …`) only opens a record when its payload is
/// not itself an option line; `1) A. …` stays ambiguous and is treated as
/// an option context, matching the upstream behaviour.
fn question_start(line: &str) -> Option<&str> {
    if let Some(caps) = RE_SCAN_QUESTION.captures(line) {
        return Some(caps.get(1).map_or("", |m| m.as_str()));
    }
    if let Some(caps) = RE_SCAN_NUMBERED.captures(line) {
        let rest = caps.get(1).map_or("", |m| m.as_str());
        if !RE_OPTION_PREFIX.is_match(rest) {
            return Some(rest);
        }
    }
    None
}

fn line_scan(text: &str) -> Vec<QuizQuestion> {
    let mut records = Vec::new();
    let mut pending: Option<PendingQuestion> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(question) = question_start(line) {
            // Starting a new record abandons any incomplete one.
            pending = Some(PendingQuestion::new(question));
        } else if let Some(p) = pending.as_mut() {
            if let Some(caps) = RE_SCAN_OPTION.captures(line) {
                if let Some(key) = AnswerKey::from_token(&caps[1]) {
                    let slot = &mut p.options[key.index()];
                    if slot.is_none() {
                        *slot = Some(caps[2].to_string());
                    }
                }
            } else if let Some(caps) = RE_SCAN_CORRECT.captures(line) {
                if let Some(key) = AnswerKey::from_token(&caps[1]) {
                    p.correct = Some(key);
                }
            }
        }

        if pending.as_ref().is_some_and(PendingQuestion::complete) {
            if let Some(record) = pending.take().and_then(PendingQuestion::flush) {
                records.push(record);
            }
        }
    }
    // A record still pending at end of input never completed; discard it.
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRICT_TWO: &str = "\
Q: What is the capital of France?
A. London
B. Paris
C. Rome
D. Berlin
Correct: B

Q: Which planet is largest?
A: Mars
B: Venus
C: Jupiter
D: Mercury
Answer: C.
";

    #[test]
    fn strict_matches_two_blocks_in_order() {
        let records = strict_inline(STRICT_TWO);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].correct, AnswerKey::B);
        assert_eq!(records[0].options.get(AnswerKey::B), "Paris");
        assert_eq!(records[1].question, "Which planet is largest?");
        assert_eq!(records[1].correct, AnswerKey::C);
    }

    #[test]
    fn strict_tolerates_crlf_after_normalisation() {
        let crlf = STRICT_TWO.replace('\n', "\r\n");
        let records = extract_quiz(&crlf);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn strict_accepts_question_numbering() {
        let text = "Question 3: Pick one\nA. a\nB. b\nC. c\nD. d\nCorrect Answer: D\n";
        assert_eq!(strict_inline(text).len(), 1);
    }

    #[test]
    fn cascade_short_circuits_on_strict_match() {
        let outcome = quiz_outcome(STRICT_TWO);
        assert_eq!(outcome.strategy, Some("strict-inline"));
        assert_eq!(outcome.records.len(), 2);
    }

    #[test]
    fn segment_drops_block_missing_an_option() {
        let text = "\
Question: Complete block?
Here is some chatter between fields.
A) yes
B) no
C) maybe
D) unsure
Correct: A

Question: Broken block?
A) yes
B) no
Correct: B
";
        // Strict fails (interleaved chatter, `)` separators); segment tier
        // recovers the complete block and drops the broken one.
        let outcome = quiz_outcome(text);
        assert_eq!(outcome.strategy, Some("segment-fields"));
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].question, "Complete block?");
    }

    #[test]
    fn invalid_correct_letter_fails_the_record() {
        let text = "\
Question: Bad marker?
A) w
B) x
C) y
D) z
Correct: E
";
        assert!(extract_quiz(text).is_empty());
    }

    #[test]
    fn line_scan_accepts_numbered_questions() {
        let text = "\
1) First question text
A) alpha
B) beta
C) gamma
D) delta
answer: a

2. Second question text
A: one
B: two
C: three
D: four
CORRECT: d
";
        let records = line_scan(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question, "First question text");
        assert_eq!(records[0].correct, AnswerKey::A);
        assert_eq!(records[1].correct, AnswerKey::D);
    }

    #[test]
    fn line_scan_numbered_option_payload_does_not_open_record() {
        // `1) A. …` is an option-shaped payload, so no record opens and the
        // following option lines have nothing to attach to.
        let text = "1) A. orphan option\nB. second\nC. third\nD. fourth\nAnswer: A\n";
        assert!(line_scan(text).is_empty());
    }

    #[test]
    fn line_scan_discards_trailing_incomplete_record() {
        let text = "\
Q: Finished one?
A) 1
B) 2
C) 3
D) 4
Answer: B
Q: Never finished?
A) 1
B) 2
";
        let records = line_scan(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "Finished one?");
    }

    #[test]
    fn duplicate_records_are_kept_in_input_order() {
        let block = "Q: Same?\nA. 1\nB. 2\nC. 3\nD. 4\nCorrect: A\n";
        let text = format!("{block}\n{block}");
        let records = extract_quiz(&text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);
    }

    #[test]
    fn unstructured_prose_yields_empty() {
        let prose = "The mitochondria is the powerhouse of the cell.\n\nIt makes ATP.";
        let outcome = quiz_outcome(prose);
        assert!(outcome.is_empty());
        assert_eq!(outcome.strategy, None);
    }
}
