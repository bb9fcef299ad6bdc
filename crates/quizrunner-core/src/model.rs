//! Core data model types for quizrunner.
//!
//! These are the fundamental types that the entire quizrunner system uses
//! to represent question banks, questions, and recorded answers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of options every question carries.
pub const OPTION_COUNT: usize = 4;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within its bank (not necessarily contiguous).
    pub id: i64,
    /// The question text shown to the student.
    pub prompt: String,
    /// Exactly four answer options, in authored order.
    pub options: [String; OPTION_COUNT],
    /// Index into `options` of the single correct answer.
    pub correct_index: usize,
    /// Authoring weight. Carried through but not used in scoring.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Question {
    /// Returns `true` if `answer` selects the correct option.
    pub fn is_correct(&self, answer: Answer) -> bool {
        answer.index() == Some(self.correct_index)
    }

    /// Text of the correct option.
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }
}

/// Descriptive metadata of a bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankInfo {
    /// Human-readable bank name.
    pub name: String,
    /// Description of what the bank covers.
    #[serde(default)]
    pub description: String,
    /// Optional authoring version.
    #[serde(default)]
    pub version: Option<String>,
}

/// A named, validated collection of questions.
///
/// Only the validator constructs banks from raw documents, so `questions`
/// is always non-empty for a bank obtained through loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub info: BankInfo,
    /// Questions in authored order (not presentation order).
    pub questions: Vec<Question>,
}

impl QuestionBank {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// What the student submitted for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    /// The option at this index was selected.
    Choice(usize),
    /// No option was selected (timed out or skipped). Never correct.
    NoAnswer,
}

impl Answer {
    /// The selected option index, if any.
    pub fn index(self) -> Option<usize> {
        match self {
            Answer::Choice(i) => Some(i),
            Answer::NoAnswer => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Choice(i) => write!(f, "option {}", i + 1),
            Answer::NoAnswer => write!(f, "no answer"),
        }
    }
}

/// A question together with the answer recorded for it during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question: Question,
    pub answer: Answer,
}

impl AnsweredQuestion {
    pub fn is_correct(&self) -> bool {
        self.question.is_correct(self.answer)
    }
}

/// A catalog entry describing a bank that a source can load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankDescriptor {
    /// Display name.
    pub name: String,
    /// Identifier passed to `BankSource::fetch` (usually a file name).
    pub file: String,
    #[serde(default)]
    pub description: String,
}

/// Raw bank document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankFormat {
    Json,
    /// Comma-delimited text with a header row.
    Delimited,
}

impl BankFormat {
    /// Pick the format from an identifier's extension. Anything other than
    /// `.csv` is treated as JSON.
    pub fn from_identifier(identifier: &str) -> Self {
        let is_csv = std::path::Path::new(identifier)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            BankFormat::Delimited
        } else {
            BankFormat::Json
        }
    }
}

impl fmt::Display for BankFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankFormat::Json => write!(f, "json"),
            BankFormat::Delimited => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct_index: usize) -> Question {
        Question {
            id: 1,
            prompt: "Q".into(),
            options: ["A".into(), "B".into(), "C".into(), "D".into()],
            correct_index,
            weight: 1.0,
        }
    }

    #[test]
    fn no_answer_is_never_correct() {
        for correct in 0..OPTION_COUNT {
            assert!(!question(correct).is_correct(Answer::NoAnswer));
        }
    }

    #[test]
    fn choice_matches_correct_index() {
        let q = question(2);
        assert!(q.is_correct(Answer::Choice(2)));
        assert!(!q.is_correct(Answer::Choice(1)));
        assert_eq!(q.correct_option(), "C");
    }

    #[test]
    fn format_from_identifier() {
        assert_eq!(BankFormat::from_identifier("bank.csv"), BankFormat::Delimited);
        assert_eq!(BankFormat::from_identifier("BANK.CSV"), BankFormat::Delimited);
        assert_eq!(BankFormat::from_identifier("bank.json"), BankFormat::Json);
        assert_eq!(BankFormat::from_identifier("bank"), BankFormat::Json);
    }

    #[test]
    fn answer_serde_shape() {
        let json = serde_json::to_string(&Answer::Choice(3)).unwrap();
        assert_eq!(json, r#"{"choice":3}"#);
        let json = serde_json::to_string(&Answer::NoAnswer).unwrap();
        assert_eq!(json, r#""no_answer""#);
    }
}
