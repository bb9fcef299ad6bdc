//! End-to-end flow through the public API: raw document → validated bank →
//! session → result → export.

use quizrunner_core::model::BankFormat;
use quizrunner_core::report::{FeedbackTier, ResultExport};
use quizrunner_core::validate::parse_bank_str;
use quizrunner_core::{Answer, BankError, QuizSession, SessionConfig, SessionError, SessionState};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn twenty_five_question_bank() -> String {
    let questions: Vec<String> = (1..=25)
        .map(|i| {
            format!(
                r#"{{"id":{i},"question":"Q{i}","options":["a{i}","b{i}","c{i}","d{i}"],"correct":{}}}"#,
                i % 4
            )
        })
        .collect();
    format!(
        r#"{{"info":{{"name":"Big","description":"25 questions"}},"questions":[{}]}}"#,
        questions.join(",")
    )
}

#[test]
fn literal_bank_scores_full_marks() {
    let doc = r#"{"info":{"name":"T"},"questions":[{"id":1,"question":"Q1","options":["A","B","C","D"],"correct":1,"weight":1}]}"#;
    let validated = parse_bank_str(doc, BankFormat::Json, "t.json").unwrap();
    assert_eq!(validated.bank.len(), 1);
    assert_eq!(validated.bank.questions[0].correct_index, 1);

    let mut session =
        QuizSession::start(&validated.bank, "Tester", &SessionConfig::default()).unwrap();
    session.submit_answer(Answer::Choice(1)).unwrap();

    assert_eq!(session.score(), 1);
    let result = session.result().unwrap();
    assert_eq!(result.score_percent, 100);
    assert_eq!(result.feedback_tier, FeedbackTier::Excellent);
}

#[test]
fn bounded_session_over_large_bank() {
    let validated = parse_bank_str(&twenty_five_question_bank(), BankFormat::Json, "big.json").unwrap();
    assert_eq!(validated.bank.len(), 25);

    let mut rng = StdRng::seed_from_u64(42);
    let mut session = QuizSession::start_with_rng(
        &validated.bank,
        "Student",
        &SessionConfig::default(),
        &mut rng,
    )
    .unwrap();
    assert_eq!(session.question_order().len(), 10);

    let mut submissions = 0;
    while session.state() == SessionState::InProgress {
        let correct = session.current_question().unwrap().correct_index;
        let answer = if submissions < 7 {
            Answer::Choice(correct)
        } else {
            Answer::NoAnswer
        };
        session.submit_answer(answer).unwrap();
        submissions += 1;
    }
    assert_eq!(submissions, 10);

    let result = session.result().unwrap();
    assert_eq!(result.correct_count, 7);
    assert_eq!(result.score_percent, 70);
    assert_eq!(result.feedback_tier, FeedbackTier::Good);
    assert!(result.wrong_answers.iter().all(|w| w.selected_index.is_none()));
    assert_eq!(
        session.submit_answer(Answer::Choice(0)).unwrap_err(),
        SessionError::Finalized
    );
}

#[test]
fn boundary_tiers_through_sessions() {
    // 10 questions each; answer `k` correctly for 50%, 70%, 90%.
    let validated = parse_bank_str(&twenty_five_question_bank(), BankFormat::Json, "big.json").unwrap();
    for (k, tier) in [
        (5, FeedbackTier::Pass),
        (7, FeedbackTier::Good),
        (9, FeedbackTier::Excellent),
    ] {
        let mut session =
            QuizSession::start(&validated.bank, "Student", &SessionConfig::default()).unwrap();
        for i in 0..10 {
            let correct = session.current_question().unwrap().correct_index;
            let answer = if i < k {
                Answer::Choice(correct)
            } else {
                Answer::Choice((correct + 2) % 4)
            };
            session.submit_answer(answer).unwrap();
        }
        let result = session.result().unwrap();
        assert_eq!(result.score_percent, (k * 10) as u32);
        assert_eq!(result.feedback_tier, tier);
    }
}

#[test]
fn corrupt_records_are_tolerated_until_none_survive() {
    let partial = r#"{"info":{"name":"P"},"questions":[
        {"id":1,"question":"Q1","options":["A","B","C","D"],"correct":0},
        {"id":2,"question":"Q2","options":["A","B","C"],"correct":0},
        {"id":3,"question":"Q3","options":["A","B","C","D"],"correct":1}
    ]}"#;
    let validated = parse_bank_str(partial, BankFormat::Json, "p.json").unwrap();
    assert_eq!(validated.bank.len(), 2);

    let hopeless = r#"{"info":{"name":"H"},"questions":[
        {"id":1,"question":"Q1","options":["A","B","C"],"correct":0},
        {"id":2,"question":"Q2","options":["A","B","C"],"correct":0}
    ]}"#;
    assert!(matches!(
        parse_bank_str(hopeless, BankFormat::Json, "h.json"),
        Err(BankError::EmptyBank { .. })
    ));
}

#[test]
fn export_survives_disk_round_trip() {
    let validated = parse_bank_str(&twenty_five_question_bank(), BankFormat::Json, "big.json").unwrap();
    let config = SessionConfig {
        max_questions_per_session: 3,
    };
    let mut session = QuizSession::start(&validated.bank, "Grace", &config).unwrap();
    while !session.is_finalized() {
        session.submit_answer(Answer::Choice(0)).unwrap();
    }

    let export = session.export().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("{}.json", export.file_stem()));
    export.save_json(&path).unwrap();

    let loaded = ResultExport::load_json(&path).unwrap();
    assert_eq!(loaded.bank_name, "Big");
    assert_eq!(loaded.summary, session.result().unwrap());
}
