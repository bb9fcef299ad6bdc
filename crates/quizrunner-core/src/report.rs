//! Result summaries and the export record handed to renderers.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{AnsweredQuestion, OPTION_COUNT};

/// Coarse qualitative label for a final percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackTier {
    NeedsImprovement,
    Pass,
    Good,
    Excellent,
}

impl FeedbackTier {
    /// Map a percentage to its band. Each band includes its lower bound.
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            90..=u32::MAX => FeedbackTier::Excellent,
            70..=89 => FeedbackTier::Good,
            50..=69 => FeedbackTier::Pass,
            _ => FeedbackTier::NeedsImprovement,
        }
    }

    /// Feedback sentence shown to the student.
    pub fn message(self) -> &'static str {
        match self {
            FeedbackTier::Excellent => "Excellent work! Keep it up!",
            FeedbackTier::Good => "Well done! There is still some room to improve.",
            FeedbackTier::Pass => "You passed. A little more review will help next time.",
            FeedbackTier::NeedsImprovement => {
                "More practice needed. Consider revisiting the material."
            }
        }
    }
}

impl fmt::Display for FeedbackTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackTier::Excellent => write!(f, "excellent"),
            FeedbackTier::Good => write!(f, "good"),
            FeedbackTier::Pass => write!(f, "pass"),
            FeedbackTier::NeedsImprovement => write!(f, "needs-improvement"),
        }
    }
}

/// `round(100 * correct / total)` with halves rounded up, in integer math.
///
/// Returns 0 for an empty total.
pub fn score_percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total) as u64;
    let total = total as u64;
    ((200 * correct + total) / (2 * total)) as u32
}

/// One incorrectly answered question, with enough data to show both the
/// student's answer and the correct one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrongAnswer {
    /// 1-based position in the session's question order.
    pub position: usize,
    pub question_id: i64,
    pub question_text: String,
    pub options: [String; OPTION_COUNT],
    /// `None` when no option was selected.
    pub selected_index: Option<usize>,
    pub correct_index: usize,
}

impl WrongAnswer {
    /// Text of the selected option; `None` when unanswered or out of range.
    pub fn selected_option(&self) -> Option<&str> {
        self.selected_index
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }

    /// Text of the correct option; `None` when the index is out of range.
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }

    fn check_indices(&self) -> Result<()> {
        anyhow::ensure!(
            self.correct_index < OPTION_COUNT,
            "wrong answer {}: correct_index {} is out of range",
            self.position,
            self.correct_index
        );
        if let Some(selected) = self.selected_index {
            anyhow::ensure!(
                selected < OPTION_COUNT,
                "wrong answer {}: selected_index {selected} is out of range",
                self.position
            );
        }
        Ok(())
    }
}

/// Final outcome of a completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub score_percent: u32,
    pub correct_count: usize,
    pub total_count: usize,
    pub feedback_tier: FeedbackTier,
    /// Incorrect answers in session order.
    pub wrong_answers: Vec<WrongAnswer>,
}

impl ResultSummary {
    /// Summarize answered questions given in session order.
    pub fn from_answers(answered: &[AnsweredQuestion]) -> Self {
        let total_count = answered.len();
        let correct_count = answered.iter().filter(|a| a.is_correct()).count();
        let percent = score_percent(correct_count, total_count);

        let wrong_answers = answered
            .iter()
            .enumerate()
            .filter(|(_, a)| !a.is_correct())
            .map(|(i, a)| WrongAnswer {
                position: i + 1,
                question_id: a.question.id,
                question_text: a.question.prompt.clone(),
                options: a.question.options.clone(),
                selected_index: a.answer.index(),
                correct_index: a.question.correct_index,
            })
            .collect();

        Self {
            score_percent: percent,
            correct_count,
            total_count,
            feedback_tier: FeedbackTier::from_percent(percent),
            wrong_answers,
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.wrong_answers.is_empty()
    }
}

/// Everything an exporter needs to render a standalone result artifact
/// without touching session internals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultExport {
    /// Identifies the attempt.
    pub attempt_id: Uuid,
    pub student_name: String,
    pub bank_name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub summary: ResultSummary,
}

impl ResultExport {
    /// Whole seconds between start and end.
    pub fn duration_secs(&self) -> u64 {
        (self.ended_at - self.started_at).num_seconds().max(0) as u64
    }

    /// Suggested file stem: `<student>_<bank>_result`, with path separators removed.
    pub fn file_stem(&self) -> String {
        let clean = |s: &str| {
            s.chars()
                .map(|c| if matches!(c, '/' | '\\' | ':') || c.is_whitespace() { '_' } else { c })
                .collect::<String>()
        };
        format!("{}_{}_result", clean(&self.student_name), clean(&self.bank_name))
    }

    /// Save the export as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize result")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write result to {}", path.display()))?;
        Ok(())
    }

    /// Load an export from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read result from {}", path.display()))?;
        let export: ResultExport =
            serde_json::from_str(&content).context("failed to parse result JSON")?;
        for wrong in &export.summary.wrong_answers {
            wrong
                .check_indices()
                .with_context(|| format!("invalid result in {}", path.display()))?;
        }
        Ok(export)
    }
}
