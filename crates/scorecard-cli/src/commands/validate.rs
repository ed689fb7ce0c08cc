//! The `scorecard validate` command.

use std::path::PathBuf;

use anyhow::Result;

use scorecard_core::parser::{parse_exam, validate_exam};
use scorecard_core::scoring::baseline_for;

pub fn execute(exam_path: PathBuf) -> Result<()> {
    let exam = parse_exam(&exam_path)?;

    println!(
        "Exam: {} ({} sections, {} questions)",
        exam_path.display(),
        exam.sections().len(),
        exam.question_count()
    );
    for s in exam.sections() {
        let points: f64 = exam.questions_in(&s.id).map(|q| q.points).sum();
        println!(
            "  {}: {} ({} questions, {} points, baseline {})",
            s.id,
            s.name,
            s.question_count,
            points,
            baseline_for(&s.name)
        );
    }

    let warnings = validate_exam(&exam);
    for w in &warnings {
        let prefix = w
            .section_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Exam is valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
