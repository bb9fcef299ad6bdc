//! HTML result certificate generator.
//!
//! Produces a self-contained HTML file with all CSS inlined, suitable for
//! printing or archiving without the session that produced it.

use anyhow::{Context, Result};
use std::path::Path;

use quizrunner_core::report::{FeedbackTier, ResultExport, WrongAnswer};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Format a duration as `"{m}m {s}s"`.
fn format_duration(secs: u64) -> String {
    format!("{}m {}s", secs / 60, secs % 60)
}

/// Generate an HTML certificate from a result export.
pub fn generate_html(export: &ResultExport) -> String {
    let summary = &export.summary;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Quiz result: {} ({})</title>\n",
        html_escape(&export.student_name),
        html_escape(&export.bank_name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n<main class=\"certificate\">\n");

    // Header
    html.push_str("<header>\n<h1>Quiz Result</h1>\n");
    html.push_str(&format!(
        "<p>Name: <strong>{}</strong></p>\n",
        html_escape(&export.student_name)
    ));
    html.push_str(&format!(
        "<p>Bank: <strong>{}</strong></p>\n",
        html_escape(&export.bank_name)
    ));
    html.push_str(&format!(
        "<p>Date: {} | Completed: {} UTC</p>\n",
        export.ended_at.format("%Y-%m-%d"),
        export.ended_at.format("%H:%M:%S")
    ));
    html.push_str(&format!(
        "<p>Duration: {} | Correct: {} / {}</p>\n",
        format_duration(export.duration_secs()),
        summary.correct_count,
        summary.total_count
    ));
    html.push_str("</header>\n");

    // Score
    html.push_str("<section class=\"score-summary\">\n");
    html.push_str(&generate_score_gauge(summary.score_percent, summary.feedback_tier));
    html.push_str(&format!(
        "<p class=\"feedback {}\">{}</p>\n",
        summary.feedback_tier,
        html_escape(summary.feedback_tier.message())
    ));
    html.push_str("</section>\n");

    // Wrong answers
    html.push_str("<section class=\"wrong-answers\">\n");
    if summary.is_perfect() {
        html.push_str("<h2>Every question answered correctly!</h2>\n");
    } else {
        html.push_str(&format!(
            "<h2>Questions to review ({})</h2>\n",
            summary.wrong_answers.len()
        ));
        for wrong in &summary.wrong_answers {
            html.push_str(&wrong_answer_item(wrong));
        }
    }
    html.push_str("</section>\n");

    html.push_str(&format!(
        "<footer>Attempt {}</footer>\n",
        export.attempt_id
    ));
    html.push_str("</main>\n</body>\n</html>");
    html
}

fn wrong_answer_item(wrong: &WrongAnswer) -> String {
    let selected = wrong
        .selected_option()
        .map(html_escape)
        .unwrap_or_else(|| "<em>no answer</em>".to_string());
    let correct = wrong
        .correct_option()
        .map(html_escape)
        .unwrap_or_else(|| "<em>unknown</em>".to_string());

    format!(
        "<div class=\"answer-item\">\n<h4>Question {}</h4>\n<p class=\"question\">{}</p>\n\
         <div class=\"option wrong\">Your answer: {}</div>\n\
         <div class=\"option correct\">Correct answer: {}</div>\n</div>\n",
        wrong.position,
        html_escape(&wrong.question_text),
        selected,
        correct
    )
}

/// Write an HTML certificate to a file.
pub fn write_html_report(export: &ResultExport, path: &Path) -> Result<()> {
    let html = generate_html(export);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write certificate to {}", path.display()))?;
    Ok(())
}

/// A horizontal gauge showing the score out of 100.
fn generate_score_gauge(percent: u32, tier: FeedbackTier) -> String {
    let max_width = 400;
    let bar_height = 30;
    let width = percent.min(100) as usize * max_width / 100;

    let color = match tier {
        FeedbackTier::Excellent => "#22c55e",
        FeedbackTier::Good => "#6366f1",
        FeedbackTier::Pass => "#eab308",
        FeedbackTier::NeedsImprovement => "#ef4444",
    };

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        max_width + 80,
        bar_height + 20
    );
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"10\" width=\"{max_width}\" height=\"{bar_height}\" fill=\"#e2e8f0\" rx=\"4\"/>\n"
    ));
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"10\" width=\"{width}\" height=\"{bar_height}\" fill=\"{color}\" rx=\"4\"/>\n"
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" font-size=\"16\" font-weight=\"bold\" fill=\"currentColor\" dominant-baseline=\"middle\">{percent} / 100</text>\n",
        max_width + 8,
        10 + bar_height / 2
    ));
    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1e293b; --muted: #64748b; --panel: #f8fafc; --border: #e2e8f0; --wrong: #ef4444; --correct: #22c55e; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
.certificate { max-width: 800px; margin: 0 auto; padding: 2rem; border-radius: 12px; box-shadow: 0 4px 6px -1px rgb(0 0 0 / 0.1); }
header { text-align: center; margin-bottom: 2rem; padding-bottom: 1rem; border-bottom: 2px solid var(--border); }
header p { color: var(--muted); margin: 0.5rem 0; }
.score-summary { text-align: center; margin-bottom: 2rem; }
.feedback { margin: 1rem 0; padding: 1rem; background: var(--panel); border-radius: 12px; font-size: 1.1rem; }
.wrong-answers { padding: 1.5rem; background: var(--panel); border-radius: 12px; }
.answer-item { margin-bottom: 1rem; padding: 1rem; background: var(--bg); border-radius: 12px; border-left: 4px solid var(--wrong); }
.option.wrong { color: var(--wrong); }
.option.correct { color: var(--correct); }
footer { margin-top: 2rem; color: var(--muted); font-size: 0.8rem; text-align: center; }
"#;
