//! CLI binary for text2study.
//!
//! A thin shim over the library crate: reads one text blob (file or
//! stdin), runs the requested extraction cascade, and prints the result —
//! pretty text, JSON, or the raw-text fallback when nothing parsed.
//! `--play` drives a full interactive quiz session in the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::thread;
use text2study::{
    extract, fallback_paragraphs, AnswerKey, AttemptRecorder, ContentKind, Extraction,
    ExtractionOutput, Flashcard, KeyTermExtraction, Phase, QuizQuestion, QuizSession,
    SessionConfig, StudyError,
};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract quiz questions from a saved LLM response
  text2study --kind quiz response.txt

  # Pipe generator output straight in
  my-generator | text2study --kind flashcards -

  # Machine-readable output
  text2study --kind key-terms --json response.txt > terms.json

  # Take the extracted quiz interactively
  text2study --kind quiz --play response.txt

EXIT BEHAVIOUR:
  Extraction never fails on malformed text. When no strategy matches, the
  original text is printed verbatim (paragraph by paragraph) and a note is
  written to stderr; the exit code stays 0.
"#;

/// Extract structured study artifacts from LLM-generated text.
#[derive(Parser, Debug)]
#[command(
    name = "text2study",
    version,
    about = "Extract quiz questions, flashcards, or key terms from LLM-generated text",
    long_about = "Recover strongly-typed study artifacts from loosely-formatted text produced \
by a generative language model. Each artifact kind runs an ordered strict-to-lenient parsing \
cascade; a text no strategy can interpret falls back to raw-text display instead of erroring.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input text file, or '-' to read stdin.
    input: String,

    /// Artifact kind to extract.
    #[arg(short, long, env = "TEXT2STUDY_KIND", value_enum)]
    kind: KindArg,

    /// Write output to this file instead of stdout.
    #[arg(short, long, env = "TEXT2STUDY_OUTPUT")]
    output: Option<PathBuf>,

    /// Output structured JSON (records + extraction report).
    #[arg(long, env = "TEXT2STUDY_JSON")]
    json: bool,

    /// Take the extracted quiz interactively (quiz kind only).
    #[arg(long, conflicts_with_all = ["json", "output"])]
    play: bool,

    /// Enable DEBUG-level tracing logs (shows cascade tier decisions).
    #[arg(short, long, env = "TEXT2STUDY_VERBOSE")]
    verbose: bool,

    /// Suppress all logs except errors.
    #[arg(short, long, env = "TEXT2STUDY_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Quiz,
    Flashcards,
    KeyTerms,
}

impl From<KindArg> for ContentKind {
    fn from(v: KindArg) -> Self {
        match v {
            KindArg::Quiz => ContentKind::Quiz,
            KindArg::Flashcards => ContentKind::Flashcards,
            KindArg::KeyTerms => ContentKind::KeyTerms,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Read the input blob ──────────────────────────────────────────────
    let raw = if cli.input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(&cli.input)
            .with_context(|| format!("Failed to read input file '{}'", cli.input))?
    };

    // ── Extract ──────────────────────────────────────────────────────────
    let kind: ContentKind = cli.kind.into();
    let output = extract(kind, &raw);

    if cli.play {
        return match output.records {
            Extraction::Quiz(questions) if !questions.is_empty() => play_quiz(questions),
            Extraction::Quiz(_) => {
                eprintln!("{} no quiz questions recovered; nothing to play", red("✗"));
                Ok(())
            }
            _ => {
                eprintln!("{} --play only makes sense with --kind quiz", red("✗"));
                Ok(())
            }
        };
    }

    let rendered = if cli.json {
        serde_json::to_string_pretty(&output).context("Failed to serialize extraction output")?
    } else {
        render_pretty(&output, &raw)
    };

    match cli.output {
        Some(path) => std::fs::write(&path, rendered.as_bytes())
            .with_context(|| format!("Failed to write output file '{}'", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}

// ── Pretty rendering ─────────────────────────────────────────────────────────

fn render_pretty(output: &ExtractionOutput, raw: &str) -> String {
    if output.records.is_empty() {
        // Caller-level fallback: the original text, not an error message.
        eprintln!(
            "{} no structured records found; showing original text",
            cyan("⚠")
        );
        return fallback_paragraphs(raw).join("\n\n");
    }

    match &output.records {
        Extraction::Quiz(questions) => render_quiz(questions),
        Extraction::Flashcards(cards) => render_flashcards(cards),
        Extraction::KeyTerms(terms) => render_key_terms(terms),
    }
}

fn render_quiz(questions: &[QuizQuestion]) -> String {
    let mut out = String::new();
    for (i, q) in questions.iter().enumerate() {
        out.push_str(&format!("{} {}\n", bold(&format!("{}.", i + 1)), q.question));
        for key in AnswerKey::ALL {
            out.push_str(&format!("   {}) {}\n", key, q.options.get(key)));
        }
        out.push_str(&format!("   {}\n\n", dim(&format!("answer: {}", q.correct))));
    }
    out.trim_end().to_string()
}

fn render_flashcards(cards: &[Flashcard]) -> String {
    cards
        .iter()
        .map(|c| format!("{} {}\n  {}", bold("Q:"), c.question, c.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_key_terms(terms: &KeyTermExtraction) -> String {
    let mut out = terms
        .entries
        .iter()
        .map(|e| format!("{} — {}", bold(&e.term), e.definition))
        .collect::<Vec<_>>()
        .join("\n");
    if let Some(formulas) = &terms.formulas {
        out.push_str("\n\n");
        out.push_str(formulas);
    }
    out
}

// ── Interactive quiz ─────────────────────────────────────────────────────────

/// Records completed attempts to stdout — the CLI's stand-in for the host
/// application's persistence collaborator.
struct StdoutRecorder;

impl AttemptRecorder for StdoutRecorder {
    fn record(
        &mut self,
        score: usize,
        total: usize,
        correct: &[usize],
    ) -> Result<(), StudyError> {
        println!(
            "{}",
            dim(&format!(
                "recorded attempt: {score}/{total} (correct: {correct:?})"
            ))
        );
        Ok(())
    }
}

fn play_quiz(questions: Vec<QuizQuestion>) -> Result<()> {
    let total = questions.len();
    let mut session = QuizSession::new(questions, SessionConfig::default())
        .context("Cannot start quiz session")?
        .with_on_badge(|score, total| {
            println!("{} {score}/{total} — badge earned!", green("★"));
        });

    println!(
        "{}",
        bold(&format!("Starting quiz: {total} questions. Enter A–D, or 's' to skip to results.\n"))
    );

    let stdin = io::stdin();
    while session.phase() == Phase::Answering {
        let index = session.current_index();
        let q = session.current_question();
        println!("{} {}", bold(&format!("[{}/{total}]", index + 1)), q.question);
        for key in AnswerKey::ALL {
            println!("  {}) {}", key, q.options.get(key));
        }
        print!("> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF: finish with whatever answers exist, if any.
            session.skip_to_results();
            break;
        }
        let token = line.trim();
        if token.eq_ignore_ascii_case("s") {
            session.skip_to_results();
            continue;
        }
        let Some(key) = AnswerKey::from_token(token) else {
            println!("{}", dim("enter A, B, C, D, or 's'"));
            continue;
        };

        let Some(advance) = session.select_answer(key) else {
            continue;
        };
        let correct = session.current_question().correct;
        if key == correct {
            println!("{}\n", green("correct"));
        } else {
            println!("{}\n", red(&format!("wrong — answer was {correct}")));
        }
        // The dwell is a presentation affordance; in a terminal we just
        // sleep for it before applying the scheduled transition.
        thread::sleep(advance.delay());
        session.apply_advance(advance);
    }

    if session.phase() != Phase::Results {
        println!("{}", dim("no answers recorded; quiz abandoned"));
        return Ok(());
    }

    // ── Results ──────────────────────────────────────────────────────────
    let score = session.score();
    println!("\n{} score: {score}/{total}", bold("Results —"));

    // Recorder failure must not block the locally computed results.
    if let Err(e) = StdoutRecorder.record(score, total, &session.correct_indices()) {
        eprintln!("{} could not record attempt: {e}", cyan("⚠"));
    }

    // ── Review ───────────────────────────────────────────────────────────
    session.enter_review();
    println!("\n{}", bold("Review:"));
    loop {
        let index = session.review_index();
        let q = session.review_question();
        let marker = match session.answer_for(index) {
            Some(key) if key == q.correct => green("✓"),
            Some(key) => red(&format!("✗ (you answered {key})")),
            None => dim("— unanswered"),
        };
        println!("  {}. {} {} {}", index + 1, q.question, dim(&format!("[{}]", q.correct)), marker);

        if index + 1 == total {
            break;
        }
        session.review_next();
    }
    session.exit_review();

    Ok(())
}
