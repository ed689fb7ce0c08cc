//! The `scorecard import` command.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};

use scorecard_core::import::apply_bulk_paste;
use scorecard_core::parser::{exam_to_toml, parse_exam};

pub fn execute(
    exam_path: PathBuf,
    section: String,
    file: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut exam = parse_exam(&exam_path)?;

    let text = match &file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let updated = apply_bulk_paste(&mut exam, &section, &text)?;
    eprintln!("Updated {updated} question(s) in section {section}");

    let toml = exam_to_toml(&exam)?;
    match output {
        Some(path) => {
            std::fs::write(&path, toml)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Exam saved to: {}", path.display());
        }
        None => print!("{toml}"),
    }

    Ok(())
}
