//! The `scorecard open` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use scorecard_core::codec;
use scorecard_core::config::load_config_from;
use scorecard_core::fragment::{parse_fragment, Fragment};
use scorecard_core::parser::{answers_to_toml, exam_to_toml};
use scorecard_core::report::ScoreReport;

use super::output::{print_summary, write_reports};

pub fn execute(
    link: String,
    output: Option<PathBuf>,
    format: Option<String>,
    save_exam: Option<PathBuf>,
    save_answers: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let token = match parse_fragment(&link) {
        Fragment::Share(token) => token,
        Fragment::Legacy { version, .. } => {
            anyhow::bail!("{version} share links are no longer supported")
        }
        Fragment::Unrelated => anyhow::bail!("not a share link: expected a #s=... fragment"),
    };

    let shared = codec::decode(token).context("undecodable share link")?;
    let (exam, student) = shared
        .into_parts()
        .context("share link holds an inconsistent exam")?;

    if let Some(path) = &save_exam {
        write_text(path, &exam_to_toml(&exam)?)?;
        eprintln!("Exam saved to: {}", path.display());
    }
    if let Some(path) = &save_answers {
        write_text(path, &answers_to_toml(&exam, &student)?)?;
        eprintln!("Answers saved to: {}", path.display());
    }

    let report = ScoreReport::new(exam, student);
    print_summary(&report);

    if output.is_some() || format.is_some() {
        let config = load_config_from(config_path.as_deref())?;
        let output = output.unwrap_or_else(|| config.output_dir.clone());
        let format = format.unwrap_or_else(|| config.default_format.clone());
        let link = link.trim();
        let share_link = link.contains("://").then_some(link);
        write_reports(&report, &format, &output, &config.page, share_link)?;
    }

    Ok(())
}

fn write_text(path: &std::path::Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
