//! scorecard CLI: score answer sheets and share the reports.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "scorecard", version, about = "Exam scoring with shareable report links")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config, exam and answer sheet
    Init,

    /// Check an exam file
    Validate {
        /// Path to exam .toml
        #[arg(long)]
        exam: PathBuf,
    },

    /// Score an answer sheet and write reports
    Score {
        /// Path to exam .toml
        #[arg(long)]
        exam: PathBuf,

        /// Path to answers .toml
        #[arg(long)]
        answers: PathBuf,

        /// Output directory (default from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, pdf, all (comma-separated)
        #[arg(long)]
        format: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the share link for an answer sheet
    Share {
        /// Path to exam .toml
        #[arg(long)]
        exam: PathBuf,

        /// Path to answers .toml
        #[arg(long)]
        answers: PathBuf,

        /// Page the link points at (default from config)
        #[arg(long)]
        base_url: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Decode a share link and show its report
    Open {
        /// Share link, or just its `#s=...` fragment
        link: String,

        /// Write reports to this directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Report formats to write: json, html, pdf, all
        #[arg(long)]
        format: Option<String>,

        /// Save the decoded exam as TOML
        #[arg(long)]
        save_exam: Option<PathBuf>,

        /// Save the decoded answers as TOML
        #[arg(long)]
        save_answers: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Apply a pasted answer key (category, answer, points per line) to a section
    Import {
        /// Path to exam .toml
        #[arg(long)]
        exam: PathBuf,

        /// Section id to update
        #[arg(long)]
        section: String,

        /// File with the pasted rows (default: stdin)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Where to write the updated exam (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scorecard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { exam } => commands::validate::execute(exam),
        Commands::Score {
            exam,
            answers,
            output,
            format,
            config,
        } => commands::score::execute(exam, answers, output, format, config),
        Commands::Share {
            exam,
            answers,
            base_url,
            config,
        } => commands::share::execute(exam, answers, base_url, config),
        Commands::Open {
            link,
            output,
            format,
            save_exam,
            save_answers,
            config,
        } => commands::open::execute(link, output, format, save_exam, save_answers, config),
        Commands::Import {
            exam,
            section,
            file,
            output,
        } => commands::import::execute(exam, section, file, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
