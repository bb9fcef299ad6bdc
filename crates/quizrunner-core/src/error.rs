//! Error types for bank loading and quiz sessions.
//!
//! Bank errors distinguish "no such bank" from "bank exists but is corrupt"
//! from "bank has no usable questions", since each calls for a different
//! remedy. Session errors are contract violations: the caller invoked an
//! operation outside its valid state.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single record was dropped during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRejection {
    /// 1-based record position (JSON array index + 1, or delimited line number).
    pub position: usize,
    /// The record's id, when it could be read.
    pub id: Option<i64>,
    pub reason: String,
}

impl fmt::Display for RecordRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "record {} (id {}): {}", self.position, id, self.reason),
            None => write!(f, "record {}: {}", self.position, self.reason),
        }
    }
}

/// Errors from validating a raw bank document.
#[derive(Debug, Clone, Error)]
pub enum BankError {
    /// The document's top-level shape is not recognized.
    #[error("malformed bank document: {0}")]
    Malformed(String),

    /// Every record was rejected.
    #[error("bank has no valid questions ({} record(s) rejected)", rejected.len())]
    EmptyBank { rejected: Vec<RecordRejection> },
}

/// Errors from loading a bank by identifier.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The identifier does not resolve to any document.
    #[error("bank not found: {0}")]
    NotFound(String),

    /// The document was found but failed validation.
    #[error(transparent)]
    Bank(#[from] BankError),

    /// The source failed for a reason other than absence.
    #[error("failed to read bank '{identifier}': {message}")]
    Io { identifier: String, message: String },
}

impl LoadError {
    /// Pick another bank.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound(_))
    }

    /// Fix the file.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, LoadError::Bank(BankError::Malformed(_)))
    }

    /// The file has no usable questions.
    pub fn is_empty(&self) -> bool {
        matches!(self, LoadError::Bank(BankError::EmptyBank { .. }))
    }
}

/// Errors from session engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("student name must not be empty")]
    MissingStudentName,

    #[error("bank has no questions to ask")]
    EmptyQuestionSet,

    #[error("max questions per session must be at least 1")]
    InvalidQuestionLimit,

    /// The submitted index does not name one of the four options.
    #[error("option index {0} is out of range")]
    InvalidChoice(usize),

    /// A mutation or current-question read was attempted after the last answer.
    #[error("session is already finalized")]
    Finalized,

    /// A result was requested before every question was answered.
    #[error("session is not finalized yet")]
    NotFinalized,
}
