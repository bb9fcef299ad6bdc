//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quizrunner(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizrunner").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("QUIZRUNNER_BANKS_DIR")
        .env_remove("QUIZRUNNER_MAX_QUESTIONS");
    cmd
}

/// A JSON bank whose questions all have the first option correct, so the
/// outcome does not depend on the shuffled order.
fn first_option_bank(name: &str, count: usize) -> String {
    let questions: Vec<String> = (1..=count)
        .map(|i| {
            format!(
                r#"{{"id":{i},"question":"Tide question {i}?","options":["Right","Wrong A","Wrong B","Wrong C"],"correct":0}}"#
            )
        })
        .collect();
    format!(
        r#"{{"info":{{"name":"{name}","description":"Coastal tides"}},"questions":[{}]}}"#,
        questions.join(",")
    )
}

fn banks_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("questions")).unwrap();
    std::fs::write(
        dir.path().join("questions/tides.json"),
        first_option_bank("Tides", 3),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("questions/long_tides.json"),
        first_option_bank("Long Tides", 25),
    )
    .unwrap();
    dir
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    quizrunner(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Terminal multiple-choice quiz runner"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    quizrunner(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizrunner"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizrunner(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizrunner.toml"))
        .stdout(predicate::str::contains("Created questions/example.json"));

    assert!(dir.path().join("quizrunner.toml").exists());
    assert!(dir.path().join("questions/example.json").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    quizrunner(dir.path()).arg("init").assert().success();

    quizrunner(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn init_then_validate_and_list() {
    let dir = TempDir::new().unwrap();
    quizrunner(dir.path()).arg("init").assert().success();

    quizrunner(dir.path())
        .args(["validate", "--bank", "questions/example.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Example Quiz (5 questions)"))
        .stdout(predicate::str::contains("All banks valid"));

    quizrunner(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Example Quiz"))
        .stdout(predicate::str::contains("example.json"));
}

#[test]
fn validate_reports_rejected_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mixed.csv");
    std::fs::write(
        &path,
        "id,question,option1,option2,option3,option4,correct\n\
         1,Good question,A,B,C,D,2\n\
         2,Bad index,A,B,C,D,7\n",
    )
    .unwrap();

    quizrunner(dir.path())
        .args(["validate", "--bank"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("mixed (1 questions)"))
        .stdout(predicate::str::contains("WARNING: record"))
        .stdout(predicate::str::contains("1 record(s) rejected"));
}

#[test]
fn validate_directory() {
    let dir = banks_dir();
    quizrunner(dir.path())
        .args(["validate", "--bank", "questions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tides (3 questions)"))
        .stdout(predicate::str::contains("Long Tides (25 questions)"));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    quizrunner(dir.path())
        .args(["validate", "--bank", "nonexistent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn list_empty_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("empty")).unwrap();
    quizrunner(dir.path())
        .args(["list", "--banks-dir", "empty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No banks found"));
}

#[test]
fn take_perfect_score_writes_exports() {
    let dir = banks_dir();

    quizrunner(dir.path())
        .args(["take", "--bank", "tides.json", "--name", "Ada Lovelace"])
        .args(["--output", "out", "--format", "all"])
        .write_stdin("1\n1\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 3/3"))
        .stdout(predicate::str::contains("Score: 100/100 (3/3 correct)"))
        .stdout(predicate::str::contains("Excellent work"))
        .stdout(predicate::str::contains("Every question answered correctly!"));

    let json_path = dir.path().join("out/Ada_Lovelace_Tides_result.json");
    assert!(dir.path().join("out/Ada_Lovelace_Tides_result.html").exists());

    let export: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(export["student_name"], "Ada Lovelace");
    assert_eq!(export["summary"]["score_percent"], 100);
    assert_eq!(export["summary"]["feedback_tier"], "excellent");
}

#[test]
fn take_wrong_and_skipped_answers() {
    let dir = banks_dir();

    quizrunner(dir.path())
        .args(["take", "--bank", "tides.json", "--name", "Grace"])
        .args(["--format", "none"])
        .write_stdin("2\n\ns\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 0/100 (0/3 correct)"))
        .stdout(predicate::str::contains("More practice needed"))
        .stdout(predicate::str::contains("(no answer)"))
        .stdout(predicate::str::contains("Wrong A"));

    assert!(!dir.path().join("quizrunner-results").exists());
}

#[test]
fn take_bounds_question_count() {
    let dir = banks_dir();

    quizrunner(dir.path())
        .args(["take", "--bank", "long_tides.json", "--name", "Grace"])
        .args(["--seed", "7", "--format", "none"])
        .write_stdin("1\n".repeat(10))
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 10/10"))
        .stdout(predicate::str::contains("Question 11/").not())
        .stdout(predicate::str::contains("(10/10 correct)"));

    quizrunner(dir.path())
        .args(["take", "--bank", "long_tides.json", "--name", "Grace"])
        .args(["--max-questions", "2", "--format", "none"])
        .write_stdin("1\n2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 50/100 (1/2 correct)"));
}

#[test]
fn take_with_time_limit() {
    let dir = banks_dir();

    quizrunner(dir.path())
        .args(["take", "--bank", "tides.json", "--name", "Grace"])
        .args(["--time-limit", "5", "--format", "none"])
        .write_stdin("1\n1\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("(5s)"))
        .stdout(predicate::str::contains("Score: 100/100"));

    quizrunner(dir.path())
        .args(["take", "--bank", "tides.json", "--name", "Grace"])
        .args(["--time-limit", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("time limit must be at least 1 second"));
}

#[test]
fn take_rejects_blank_name() {
    let dir = banks_dir();
    quizrunner(dir.path())
        .args(["take", "--bank", "tides.json", "--name", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("student name must not be empty"));
}

#[test]
fn take_missing_bank() {
    let dir = banks_dir();
    quizrunner(dir.path())
        .args(["take", "--bank", "nope.json", "--name", "Grace"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bank not found"));
}

#[test]
fn take_unknown_format() {
    let dir = banks_dir();
    quizrunner(dir.path())
        .args(["take", "--bank", "tides.json", "--name", "Grace"])
        .args(["--format", "sarif"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn render_saved_result() {
    let dir = banks_dir();

    quizrunner(dir.path())
        .args(["take", "--bank", "tides.json", "--name", "Grace"])
        .args(["--output", "out"])
        .write_stdin("1\n2\n1\n")
        .assert()
        .success();

    quizrunner(dir.path())
        .args(["render", "--result", "out/Grace_Tides_result.json"])
        .args(["--output", "cert/grace.html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Certificate for Grace (67/100)"));

    let html = std::fs::read_to_string(dir.path().join("cert/grace.html")).unwrap();
    assert!(html.contains("Questions to review (1)"));
    assert!(html.contains("Your answer: Wrong A"));
}

#[test]
fn render_nonexistent_result() {
    let dir = TempDir::new().unwrap();
    quizrunner(dir.path())
        .args(["render", "--result", "missing.json", "--output", "x.html"])
        .assert()
        .failure();
}

#[test]
fn render_rejects_edited_result() {
    let dir = banks_dir();

    quizrunner(dir.path())
        .args(["take", "--bank", "tides.json", "--name", "Grace"])
        .args(["--output", "out"])
        .write_stdin("2\n1\n1\n")
        .assert()
        .success();

    let path = dir.path().join("out/Grace_Tides_result.json");
    let mut export: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    export["summary"]["wrong_answers"][0]["selected_index"] = serde_json::json!(7);
    std::fs::write(&path, serde_json::to_string(&export).unwrap()).unwrap();

    quizrunner(dir.path())
        .args(["render", "--result", "out/Grace_Tides_result.json"])
        .args(["--output", "cert.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("selected_index 7 is out of range"))
        .stderr(predicate::str::contains("panicked").not());

    assert!(!dir.path().join("cert.html").exists());
}
