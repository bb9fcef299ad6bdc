//! The `quizrunner take` command.

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio::time::Instant;

use quizrunner_core::engine::{QuizSession, SessionState};
use quizrunner_core::error::SessionError;
use quizrunner_core::loader::load_bank;
use quizrunner_core::model::{Answer, OPTION_COUNT};
use quizrunner_core::report::{ResultExport, ResultSummary};
use quizrunner_report::html::write_html_report;
use quizrunner_sources::config::load_config_from;

/// One line of student input, before it reaches the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reply {
    Answer(Answer),
    Unrecognized,
}

/// Result artifacts written after a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Json,
    Html,
}

fn parse_formats(format: &str) -> Result<Vec<ExportFormat>> {
    match format {
        "all" => Ok(vec![ExportFormat::Json, ExportFormat::Html]),
        "none" => Ok(Vec::new()),
        other => other
            .split(',')
            .map(|f| match f.trim() {
                "json" => Ok(ExportFormat::Json),
                "html" => Ok(ExportFormat::Html),
                unknown => Err(anyhow::anyhow!(
                    "unknown format '{unknown}' (expected json, html, all, or none)"
                )),
            })
            .collect(),
    }
}

/// `1`-`4` pick an option; an empty line or `s` skips.
fn parse_reply(line: &str) -> Reply {
    let line = line.trim();
    if line.is_empty() || line.eq_ignore_ascii_case("s") {
        return Reply::Answer(Answer::NoAnswer);
    }
    match line.parse::<usize>() {
        Ok(n) if n >= 1 => Reply::Answer(Answer::Choice(n - 1)),
        _ => Reply::Unrecognized,
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    bank: String,
    name: String,
    max_questions: Option<usize>,
    time_limit: Option<u64>,
    seed: Option<u64>,
    banks_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let formats = parse_formats(&format)?;

    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(dir) = banks_dir {
        config.banks_dir = dir;
    }
    if let Some(max) = max_questions {
        config.max_questions_per_session = max;
    }
    if let Some(secs) = time_limit {
        anyhow::ensure!(secs >= 1, "time limit must be at least 1 second");
        config.time_limit_secs = Some(secs);
    }
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let source = config.directory_source();
    let validated = load_bank(&source, &bank)
        .await
        .with_context(|| format!("failed to load bank '{bank}'"))?;
    if !validated.rejected.is_empty() {
        eprintln!(
            "Note: {} record(s) in '{bank}' were skipped as invalid.",
            validated.rejected.len()
        );
    }

    let session_config = config.session_config();
    let mut session = match seed {
        Some(seed) => QuizSession::start_with_rng(
            &validated.bank,
            &name,
            &session_config,
            &mut StdRng::seed_from_u64(seed),
        )?,
        None => QuizSession::start(&validated.bank, &name, &session_config)?,
    };

    println!(
        "{}: {} question(s)\n",
        session.bank_info().name,
        session.question_order().len()
    );

    let time_limit = config.time_limit_secs.map(Duration::from_secs);
    let mut replies = spawn_reader(BufReader::new(std::io::stdin()));
    run_session(&mut session, &mut replies, time_limit, std::io::stdout()).await?;

    let export = session.export()?;
    print_result(&export.summary);

    if !formats.is_empty() {
        std::fs::create_dir_all(&output)
            .with_context(|| format!("failed to create {}", output.display()))?;
    }
    for fmt in &formats {
        save(&export, &output, *fmt)?;
    }
    tracing::debug!(
        attempt = %export.attempt_id,
        "{} export(s) written to {}",
        formats.len(),
        output.display()
    );

    Ok(())
}

/// Lines typed by the student, fed from a reader thread so a pending read
/// can be abandoned when the clock runs out.
type Replies = mpsc::Receiver<std::io::Result<String>>;

/// Read `input` line by line on a detached thread.
///
/// A plain thread rather than a blocking task: a read still pending on stdin
/// when the quiz ends must not hold up runtime shutdown.
fn spawn_reader<R: BufRead + Send + 'static>(mut input: R) -> Replies {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let mut line = String::new();
        loop {
            line.clear();
            match input.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {
                    if tx.blocking_send(Ok(line.clone())).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(Err(e));
                    break;
                }
            }
        }
    });
    rx
}

/// What came back while waiting for a reply.
enum Input {
    Line(String),
    Ended,
    TimedOut,
}

async fn next_input(replies: &mut Replies, deadline: Option<Instant>) -> Result<Input> {
    let received = match deadline {
        Some(deadline) => match tokio::time::timeout_at(deadline, replies.recv()).await {
            Ok(received) => received,
            Err(_) => return Ok(Input::TimedOut),
        },
        None => replies.recv().await,
    };
    match received {
        Some(Ok(line)) => Ok(Input::Line(line)),
        Some(Err(e)) => Err(e).context("failed to read answer"),
        None => Ok(Input::Ended),
    }
}

/// Ask every remaining question, reading one reply per line.
///
/// Unrecognized replies and out-of-range choices are asked again. With a
/// time limit, a question left unanswered when its clock runs out is
/// recorded as unanswered; re-prompts do not restart the clock. When input
/// runs out, the remaining questions are recorded as unanswered.
async fn run_session<W: Write>(
    session: &mut QuizSession,
    replies: &mut Replies,
    time_limit: Option<Duration>,
    mut out: W,
) -> Result<()> {
    let mut exhausted = false;

    while session.state() == SessionState::InProgress {
        let question = session.current_question()?;
        let progress = session.progress();
        writeln!(
            out,
            "Question {}/{}: {}",
            progress.answered + 1,
            progress.total,
            question.prompt
        )?;
        for (i, option) in question.options.iter().enumerate() {
            writeln!(out, "  {}) {option}", i + 1)?;
        }
        let deadline = time_limit.map(|limit| Instant::now() + limit);

        loop {
            let mut timed_out = false;
            let answer = if exhausted {
                Answer::NoAnswer
            } else {
                match time_limit {
                    Some(limit) => write!(
                        out,
                        "Answer [1-{OPTION_COUNT}, s to skip] ({}s): ",
                        limit.as_secs()
                    )?,
                    None => write!(out, "Answer [1-{OPTION_COUNT}, s to skip]: ")?,
                }
                out.flush()?;

                match next_input(replies, deadline).await? {
                    Input::Ended => {
                        exhausted = true;
                        writeln!(out)?;
                        Answer::NoAnswer
                    }
                    Input::TimedOut => {
                        timed_out = true;
                        writeln!(out)?;
                        Answer::NoAnswer
                    }
                    Input::Line(line) => match parse_reply(&line) {
                        Reply::Answer(answer) => answer,
                        Reply::Unrecognized => {
                            writeln!(out, "Please enter a number from 1 to {OPTION_COUNT}, or s.")?;
                            continue;
                        }
                    },
                }
            };

            match session.submit_answer(answer) {
                Ok(submission) => {
                    let verdict = match (submission.correct, answer) {
                        (true, _) => "Correct!",
                        (false, Answer::NoAnswer) if timed_out => "Time is up.",
                        (false, Answer::NoAnswer) => "Skipped.",
                        (false, Answer::Choice(_)) => "Incorrect.",
                    };
                    writeln!(out, "{verdict}\n")?;
                    break;
                }
                Err(SessionError::InvalidChoice(_)) => {
                    writeln!(out, "Please enter a number from 1 to {OPTION_COUNT}, or s.")?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

fn print_result(summary: &ResultSummary) {
    use comfy_table::{Cell, Table};

    println!(
        "Score: {}/100 ({}/{} correct)",
        summary.score_percent, summary.correct_count, summary.total_count
    );
    println!("{}", summary.feedback_tier.message());

    if summary.is_perfect() {
        println!("Every question answered correctly!");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Your answer", "Correct answer"]);
    for wrong in &summary.wrong_answers {
        table.add_row(vec![
            Cell::new(wrong.position),
            Cell::new(&wrong.question_text),
            Cell::new(wrong.selected_option().unwrap_or("(no answer)")),
            Cell::new(wrong.correct_option().unwrap_or("?")),
        ]);
    }
    println!("\n{table}");
}

fn save(export: &ResultExport, output: &Path, fmt: ExportFormat) -> Result<()> {
    let stem = export.file_stem();
    match fmt {
        ExportFormat::Json => {
            let path = output.join(format!("{stem}.json"));
            export.save_json(&path)?;
            eprintln!("Result saved to: {}", path.display());
        }
        ExportFormat::Html => {
            let path = output.join(format!("{stem}.html"));
            write_html_report(export, &path)?;
            eprintln!("Certificate: {}", path.display());
        }
    }
    Ok(())
}
