//! The `quizrunner validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizrunner_core::validate::{load_bank_directory, parse_bank_file};

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let banks = if bank_path.is_dir() {
        load_bank_directory(&bank_path)?
    } else {
        vec![(bank_path.clone(), parse_bank_file(&bank_path)?)]
    };

    let mut total_rejected = 0;

    for (path, validated) in &banks {
        println!(
            "Bank: {} ({} questions) [{}]",
            validated.bank.info.name,
            validated.bank.len(),
            path.display()
        );
        for rejection in &validated.rejected {
            println!("  WARNING: {rejection}");
        }
        total_rejected += validated.rejected.len();
    }

    if banks.is_empty() {
        println!("No banks found.");
    } else if total_rejected == 0 {
        println!("All banks valid.");
    } else {
        println!("\n{total_rejected} record(s) rejected.");
    }

    Ok(())
}
