//! The `quizrunner list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizrunner_core::traits::BankCatalog;
use quizrunner_sources::config::load_config_from;

pub async fn execute(banks_dir: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(dir) = banks_dir {
        config.banks_dir = dir;
    }

    let banks = config.directory_source().list_banks().await?;

    if banks.is_empty() {
        println!(
            "No banks found in {}. Run `quizrunner init` to create an example.",
            config.banks_dir.display()
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Name", "File", "Description"]);
    for bank in &banks {
        table.add_row(vec![
            Cell::new(&bank.name),
            Cell::new(&bank.file),
            Cell::new(&bank.description),
        ]);
    }
    println!("{table}");

    Ok(())
}
