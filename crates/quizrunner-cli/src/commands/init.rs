//! The `quizrunner init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("quizrunner.toml").exists() {
        println!("quizrunner.toml already exists, skipping.");
    } else {
        std::fs::write("quizrunner.toml", SAMPLE_CONFIG)?;
        println!("Created quizrunner.toml");
    }

    std::fs::create_dir_all("questions")?;
    let example_path = Path::new("questions/example.json");
    if example_path.exists() {
        println!("questions/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created questions/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizrunner validate --bank questions/example.json");
    println!("  2. Run: quizrunner list");
    println!("  3. Run: quizrunner take --bank example.json --name \"Your Name\"");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizrunner configuration

banks_dir = "./questions"
manifest = "quiz_list.json"
max_questions_per_session = 10
# Seconds allowed per question; leave unset for no limit.
# time_limit_secs = 30
output_dir = "./quizrunner-results"
"#;

const EXAMPLE_BANK: &str = r#"{
  "info": {
    "name": "Example Quiz",
    "description": "A short general-knowledge quiz to get started",
    "version": "1"
  },
  "questions": [
    {
      "id": 1,
      "question": "Which planet is closest to the Sun?",
      "options": ["Venus", "Mercury", "Earth", "Mars"],
      "correct": 1
    },
    {
      "id": 2,
      "question": "What is the boiling point of water at sea level in Celsius?",
      "options": ["90", "100", "110", "120"],
      "correct": 1
    },
    {
      "id": 3,
      "question": "Which gas do plants absorb for photosynthesis?",
      "options": ["Oxygen", "Nitrogen", "Carbon dioxide", "Hydrogen"],
      "correct": 2
    },
    {
      "id": 4,
      "question": "How many sides does a hexagon have?",
      "options": ["5", "6", "7", "8"],
      "correct": 1
    },
    {
      "id": 5,
      "question": "Which ocean is the largest?",
      "options": ["Pacific", "Atlantic", "Indian", "Arctic"],
      "correct": 0
    }
  ]
}
"#;
