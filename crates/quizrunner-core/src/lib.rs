//! quizrunner-core: Question banks, validation, and the quiz session engine.
//!
//! This crate defines the data model, the bank validator, the collaborator
//! traits for fetching banks, and the session state machine that the rest
//! of quizrunner builds on.

pub mod engine;
pub mod error;
pub mod loader;
pub mod model;
pub mod report;
pub mod traits;
pub mod validate;

pub use engine::{QuizSession, SessionConfig, SessionState};
pub use error::{BankError, LoadError, SessionError};
pub use model::{Answer, BankInfo, Question, QuestionBank};
