//! quizrunner CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizrunner", version, about = "Terminal multiple-choice quiz runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a quiz interactively
    Take {
        /// Bank file name inside the banks directory
        #[arg(long)]
        bank: String,

        /// Student name shown on the result
        #[arg(long)]
        name: String,

        /// Questions drawn per attempt (overrides config)
        #[arg(long)]
        max_questions: Option<usize>,

        /// Seconds allowed per question; unanswered questions are skipped (overrides config)
        #[arg(long)]
        time_limit: Option<u64>,

        /// Seed for a reproducible question order
        #[arg(long)]
        seed: Option<u64>,

        /// Directory holding bank files (overrides config)
        #[arg(long)]
        banks_dir: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory for result exports (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Export format: json, html, all, none
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Validate bank files
    Validate {
        /// Path to a bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// List available banks
    List {
        /// Directory holding bank files (overrides config)
        #[arg(long)]
        banks_dir: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Render a saved result as an HTML certificate
    Render {
        /// Result export JSON
        #[arg(long)]
        result: PathBuf,

        /// HTML file to write
        #[arg(long)]
        output: PathBuf,
    },

    /// Create starter config and example bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizrunner=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            bank,
            name,
            max_questions,
            time_limit,
            seed,
            banks_dir,
            config,
            output,
            format,
        } => {
            commands::take::execute(
                bank,
                name,
                max_questions,
                time_limit,
                seed,
                banks_dir,
                config,
                output,
                format,
            )
            .await
        }
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::List { banks_dir, config } => commands::list::execute(banks_dir, config).await,
        Commands::Render { result, output } => commands::render::execute(result, output),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
