//! Flashcard extraction: four tiers from tagged Q/A pairs down to a
//! pair-the-lines last resort.
//!
//! Tier 1 and 2 parse explicit `Q:`/`A:` and `Question:`/`Answer:` labels,
//! with the answer bounded by the next question marker or end of text so
//! multi-line answers survive. Tier 3 treats any line ending in `?` as a
//! question and the following line as its answer. Tier 4 pairs non-empty
//! lines two at a time, with short-line and header-word guards so section
//! headings don't become cards.
//!
//! Every produced card starts `mastered = false`. A pair missing either
//! side is dropped — no placeholders.

use crate::extract::cascade::{run_cascade, CascadeOutcome, Strategy};
use crate::extract::text::{non_empty_lines, normalize_line_endings};
use crate::model::Flashcard;
use once_cell::sync::Lazy;
use regex::Regex;

static STRATEGIES: [Strategy<Flashcard>; 4] = [
    Strategy {
        name: "strict-qa",
        run: strict_qa,
    },
    Strategy {
        name: "labeled-question-answer",
        run: labeled_question_answer,
    },
    Strategy {
        name: "question-mark-lines",
        run: question_mark_lines,
    },
    Strategy {
        name: "alternating-lines",
        run: alternating_lines,
    },
];

/// Extract flashcards from raw generator output.
pub fn extract_flashcards(text: &str) -> Vec<Flashcard> {
    flashcard_outcome(text).records
}

pub(crate) fn flashcard_outcome(text: &str) -> CascadeOutcome<Flashcard> {
    let text = normalize_line_endings(text);
    run_cascade(&text, &STRATEGIES)
}

// ── Tiers 1 & 2: labeled pairs ───────────────────────────────────────────────
//
// Both tiers share the same mechanics: find every question marker, slice
// the text into blocks bounded by the next marker, then split each block at
// its answer marker. Only the marker spellings differ.

static RE_Q_MARK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*Q[:.][ \t]*").unwrap());
static RE_A_MARK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*A[:.][ \t]*").unwrap());

static RE_QUESTION_MARK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*Question[ \t]*[:.][ \t]*").unwrap());
static RE_ANSWER_MARK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*Answer[ \t]*[:.][ \t]*").unwrap());

fn strict_qa(text: &str) -> Vec<Flashcard> {
    labeled_pairs(text, &RE_Q_MARK, &RE_A_MARK)
}

fn labeled_question_answer(text: &str) -> Vec<Flashcard> {
    labeled_pairs(text, &RE_QUESTION_MARK, &RE_ANSWER_MARK)
}

fn labeled_pairs(text: &str, question_mark: &Regex, answer_mark: &Regex) -> Vec<Flashcard> {
    let marks: Vec<(usize, usize)> = question_mark
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();

    let mut cards = Vec::new();
    for (i, &(_, body_start)) in marks.iter().enumerate() {
        let body_end = marks.get(i + 1).map(|&(s, _)| s).unwrap_or(text.len());
        let block = &text[body_start..body_end];

        // The answer runs from its marker to the end of the block, i.e. up
        // to the next question marker or end of text.
        let Some(a) = answer_mark.find(block) else {
            continue;
        };
        let question = &block[..a.start()];
        let answer = &block[a.end()..];
        if let Some(card) = Flashcard::new(question, answer) {
            cards.push(card);
        }
    }
    cards
}

// ── Tier 3: question-mark heuristic ──────────────────────────────────────────

fn question_mark_lines(text: &str) -> Vec<Flashcard> {
    let lines = non_empty_lines(text);
    let mut cards = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if lines[i].ends_with('?') {
            if let Some(answer) = lines.get(i + 1) {
                if let Some(card) = Flashcard::new(lines[i], answer) {
                    cards.push(card);
                }
                // Both lines are consumed together.
                i += 2;
                continue;
            }
        }
        i += 1;
    }
    cards
}

// ── Tier 4: strict alternating-line pairing ──────────────────────────────────

/// Minimum length for either side of a blind pair. Anything shorter is more
/// likely a heading or list marker than content.
const MIN_PAIR_LINE_LEN: usize = 5;

fn looks_like_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("question") || lower.contains("answer")
}

fn alternating_lines(text: &str) -> Vec<Flashcard> {
    non_empty_lines(text)
        .chunks(2)
        .filter_map(|pair| {
            let [question, answer] = pair else {
                // Trailing odd line has no partner.
                return None;
            };
            if question.len() < MIN_PAIR_LINE_LEN || answer.len() < MIN_PAIR_LINE_LEN {
                return None;
            }
            if looks_like_header(question) || looks_like_header(answer) {
                return None;
            }
            Flashcard::new(question, answer)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_qa_bounds_answer_at_next_marker() {
        let text = "\
Q: What is ownership?
A: Each value has a single owner.
The owner going out of scope drops the value.
Q: What is borrowing?
A: Taking a reference without taking ownership.
";
        let cards = strict_qa(text);
        assert_eq!(cards.len(), 2);
        assert!(cards[0].answer.contains("drops the value"));
        assert_eq!(cards[1].question, "What is borrowing?");
        assert!(cards.iter().all(|c| !c.mastered));
    }

    #[test]
    fn strict_qa_drops_question_without_answer() {
        let text = "Q: Orphan question\nQ: Paired\nA: Yes\n";
        let cards = strict_qa(text);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "Paired");
    }

    #[test]
    fn labeled_tier_matches_question_answer_spelling() {
        let text = "\
Question: Why normalise line endings first?
Answer: So strategies only reason about a single newline style.
";
        let outcome = flashcard_outcome(text);
        assert_eq!(outcome.strategy, Some("labeled-question-answer"));
        assert_eq!(outcome.records.len(), 1);
    }

    #[test]
    fn question_mark_heuristic_pairs_with_following_line() {
        let text = "\
Some preamble from the model.
What does CPU stand for?
Central Processing Unit
What does RAM stand for?
Random Access Memory
";
        let cards = question_mark_lines(text);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].answer, "Random Access Memory");
    }

    #[test]
    fn question_mark_at_end_of_input_has_no_answer() {
        let cards = question_mark_lines("Dangling question?");
        assert!(cards.is_empty());
    }

    #[test]
    fn alternating_lines_pairs_fixed_positions() {
        let text = "\
Photosynthesis converts light to energy
Occurs in the chloroplast
Mitochondria produce ATP
Found in nearly all eukaryotes
";
        let cards = alternating_lines(text);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].question, "Photosynthesis converts light to energy");
        assert_eq!(cards[1].answer, "Found in nearly all eukaryotes");
    }

    #[test]
    fn alternating_lines_skips_headers_and_short_lines() {
        let text = "\
Questions and Answers
ok
Photosynthesis converts light to energy
Occurs in the chloroplast
";
        // Pair 0 contains the header word "question" (and a too-short line);
        // only pair 1 survives.
        let cards = alternating_lines(text);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "Photosynthesis converts light to energy");
    }

    #[test]
    fn totally_unstructured_single_line_yields_empty() {
        let outcome = flashcard_outcome("just one rambling line with no structure");
        assert!(outcome.is_empty());
        assert_eq!(outcome.strategy, None);
    }

    #[test]
    fn produced_fields_are_trimmed_non_empty() {
        let text = "Q:    spaced question   \nA:   spaced answer   \n";
        let cards = extract_flashcards(text);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "spaced question");
        assert_eq!(cards[0].answer, "spaced answer");
    }
}
