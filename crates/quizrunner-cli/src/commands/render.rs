//! The `quizrunner render` command.

use std::path::PathBuf;

use anyhow::Result;

use quizrunner_core::report::ResultExport;
use quizrunner_report::html::write_html_report;

pub fn execute(result_path: PathBuf, output: PathBuf) -> Result<()> {
    let export = ResultExport::load_json(&result_path)?;
    write_html_report(&export, &output)?;
    println!(
        "Certificate for {} ({}/100) written to {}",
        export.student_name,
        export.summary.score_percent,
        output.display()
    );
    Ok(())
}
