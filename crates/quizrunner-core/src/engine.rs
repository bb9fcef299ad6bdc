//! The quiz session engine.
//!
//! A `QuizSession` owns everything about one attempt: the shuffled and
//! bounded question order, the answers recorded so far, and the score.
//! Every operation is synchronous and runs to completion; the caller owns
//! the value and threads it through each call.
//!
//! Lifecycle: a session is `InProgress` from creation until the answer to
//! its last question is submitted, at which point it becomes `Finalized`
//! in the same call. A finalized session is never mutated again.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::error::SessionError;
use crate::model::{Answer, AnsweredQuestion, BankInfo, Question, QuestionBank, OPTION_COUNT};
use crate::report::{ResultExport, ResultSummary};

/// Default bound on questions asked per attempt.
pub const DEFAULT_MAX_QUESTIONS: usize = 10;

/// Configuration for creating sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Maximum number of questions drawn from the bank per attempt.
    pub max_questions_per_session: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_questions_per_session: DEFAULT_MAX_QUESTIONS,
        }
    }
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    InProgress,
    Finalized,
}

/// Progress through a session, for progress bars and "N remaining" labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    pub fn remaining(&self) -> usize {
        self.total - self.answered
    }

    /// Completed fraction as a whole percentage.
    pub fn percent(&self) -> u32 {
        crate::report::score_percent(self.answered, self.total)
    }
}

/// Outcome of a single submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub correct: bool,
    /// State after the submission.
    pub state: SessionState,
}

/// Draw a random, bounded question order from `questions`.
///
/// The full slice is copied and shuffled with Fisher–Yates (every
/// permutation equally likely), then truncated to `limit`, so a bounded
/// order is a uniform random sample of the whole bank rather than a prefix
/// of authored order. `questions` itself is never reordered.
pub fn select_questions<R: Rng + ?Sized>(
    questions: &[Question],
    limit: usize,
    rng: &mut R,
) -> Vec<Question> {
    let mut order = questions.to_vec();
    order.shuffle(rng);
    order.truncate(limit);
    order
}

/// One student's attempt at a bank.
#[derive(Debug, Clone)]
pub struct QuizSession {
    attempt_id: Uuid,
    bank_info: BankInfo,
    student_name: String,
    question_order: Vec<Question>,
    /// One entry per answered question; its length is the cursor.
    answers: Vec<Answer>,
    score: usize,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a session using the thread-local RNG.
    pub fn start(
        bank: &QuestionBank,
        student_name: &str,
        config: &SessionConfig,
    ) -> Result<Self, SessionError> {
        Self::start_with_rng(bank, student_name, config, &mut rand::rng())
    }

    /// Start a session drawing the question order from `rng`.
    pub fn start_with_rng<R: Rng + ?Sized>(
        bank: &QuestionBank,
        student_name: &str,
        config: &SessionConfig,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        let student_name = student_name.trim();
        if student_name.is_empty() {
            return Err(SessionError::MissingStudentName);
        }
        if bank.is_empty() {
            return Err(SessionError::EmptyQuestionSet);
        }
        if config.max_questions_per_session == 0 {
            return Err(SessionError::InvalidQuestionLimit);
        }

        let question_order = select_questions(&bank.questions, config.max_questions_per_session, rng);
        let session = Self {
            attempt_id: Uuid::new_v4(),
            bank_info: bank.info.clone(),
            student_name: student_name.to_string(),
            answers: Vec::with_capacity(question_order.len()),
            question_order,
            score: 0,
            started_at: Utc::now(),
            ended_at: None,
        };

        tracing::debug!(
            attempt = %session.attempt_id,
            "started '{}' for {}: {} of {} questions",
            session.bank_info.name,
            session.student_name,
            session.question_order.len(),
            bank.len()
        );

        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        if self.ended_at.is_some() {
            SessionState::Finalized
        } else {
            SessionState::InProgress
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.state() == SessionState::Finalized
    }

    /// The question awaiting an answer.
    pub fn current_question(&self) -> Result<&Question, SessionError> {
        self.question_order
            .get(self.cursor())
            .ok_or(SessionError::Finalized)
    }

    /// Record an answer for the current question and advance.
    ///
    /// `Answer::NoAnswer` is accepted and scored as incorrect. A choice
    /// outside the option range is refused without touching the session.
    /// Answering the last question finalizes the session and stamps its end
    /// time as part of this call.
    pub fn submit_answer(&mut self, answer: Answer) -> Result<Submission, SessionError> {
        let question = self.current_question()?;
        if let Answer::Choice(i) = answer {
            if i >= OPTION_COUNT {
                return Err(SessionError::InvalidChoice(i));
            }
        }
        let correct = question.is_correct(answer);

        self.answers.push(answer);
        if correct {
            self.score += 1;
        }

        if self.cursor() == self.question_order.len() {
            self.ended_at = Some(Utc::now());
            tracing::debug!(
                attempt = %self.attempt_id,
                "finalized: {}/{} correct",
                self.score,
                self.question_order.len()
            );
        }

        Ok(Submission {
            correct,
            state: self.state(),
        })
    }

    /// Summary of a finalized session. Safe to call repeatedly.
    pub fn result(&self) -> Result<ResultSummary, SessionError> {
        if !self.is_finalized() {
            return Err(SessionError::NotFinalized);
        }
        Ok(ResultSummary::from_answers(&self.answered()))
    }

    /// Everything an exporter needs, for a finalized session.
    pub fn export(&self) -> Result<ResultExport, SessionError> {
        let summary = self.result()?;
        let ended_at = self.ended_at.ok_or(SessionError::NotFinalized)?;
        Ok(ResultExport {
            attempt_id: self.attempt_id,
            student_name: self.student_name.clone(),
            bank_name: self.bank_info.name.clone(),
            started_at: self.started_at,
            ended_at,
            summary,
        })
    }

    /// Questions answered so far, paired with their answers, in session order.
    pub fn answered(&self) -> Vec<AnsweredQuestion> {
        self.question_order
            .iter()
            .zip(&self.answers)
            .map(|(question, &answer)| AnsweredQuestion {
                question: question.clone(),
                answer,
            })
            .collect()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            answered: self.cursor(),
            total: self.question_order.len(),
        }
    }

    /// Index of the next unanswered question; equals the question count
    /// once finalized.
    pub fn cursor(&self) -> usize {
        self.answers.len()
    }

    /// Correct answers so far.
    pub fn score(&self) -> usize {
        self.score
    }

    pub fn question_order(&self) -> &[Question] {
        &self.question_order
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn bank_info(&self) -> &BankInfo {
        &self.bank_info
    }

    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }
}
