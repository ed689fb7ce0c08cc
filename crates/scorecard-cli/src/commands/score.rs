//! The `scorecard score` command.

use std::path::PathBuf;

use anyhow::Result;

use scorecard_core::codec;
use scorecard_core::config::load_config_from;
use scorecard_core::fragment::share_url;
use scorecard_core::parser::{parse_answers, parse_exam, validate_exam};
use scorecard_core::report::ScoreReport;

use super::output::{print_summary, write_reports};

pub fn execute(
    exam_path: PathBuf,
    answers_path: PathBuf,
    output: Option<PathBuf>,
    format: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let exam = parse_exam(&exam_path)?;
    for w in validate_exam(&exam) {
        let section = w.section_id.as_deref().unwrap_or("-");
        tracing::warn!("[{section}] {}", w.message);
    }
    let student = parse_answers(&answers_path, &exam)?;

    let report = ScoreReport::new(exam, student);
    print_summary(&report);

    // Reports still get written when the exam cannot be packed into a link.
    let link = match codec::encode_report(&report.exam, &report.student) {
        Ok(token) => Some(share_url(&config.base_url, &token)),
        Err(e) => {
            tracing::warn!("no share link: {e}");
            None
        }
    };

    let output = output.unwrap_or_else(|| config.output_dir.clone());
    let format = format.unwrap_or_else(|| config.default_format.clone());
    write_reports(&report, &format, &output, &config.page, link.as_deref())?;

    Ok(())
}
