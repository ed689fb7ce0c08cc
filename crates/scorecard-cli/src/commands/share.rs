//! The `scorecard share` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use scorecard_core::codec;
use scorecard_core::config::load_config_from;
use scorecard_core::fragment::share_url;
use scorecard_core::parser::{parse_answers, parse_exam};

pub fn execute(
    exam_path: PathBuf,
    answers_path: PathBuf,
    base_url: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let base_url = match base_url {
        Some(url) => url,
        None => load_config_from(config_path.as_deref())?.base_url,
    };

    let exam = parse_exam(&exam_path)?;
    let student = parse_answers(&answers_path, &exam)?;

    let token = codec::encode_report(&exam, &student).context("cannot build share link")?;
    println!("{}", share_url(&base_url, &token));

    Ok(())
}
