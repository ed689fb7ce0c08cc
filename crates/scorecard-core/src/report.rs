//! Score report envelope with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{EvaluationResult, Exam, StudentInput};
use crate::scoring::{self, SectionScore};

/// A scored answer sheet, with everything needed to render it again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    pub exam: Exam,
    pub student: StudentInput,
    pub result: EvaluationResult,
    /// Per-section breakdown in section order.
    pub sections: Vec<SectionScore>,
}

impl ScoreReport {
    /// Score `student` against `exam`.
    pub fn new(exam: Exam, student: StudentInput) -> Self {
        let result = scoring::evaluate(exam.sections(), exam.questions(), &student);
        let sections = scoring::section_scores(exam.sections(), exam.questions(), &student);
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            exam,
            student,
            result,
            sections,
        }
    }

    /// Sum of all section scores.
    pub fn total_score(&self) -> f64 {
        self.sections.iter().map(|s| s.scaled).sum()
    }

    /// Default file stem for exported reports, e.g. `김민지_성적표`.
    pub fn file_stem(&self) -> String {
        let name = self.student.name.trim();
        let name = if name.is_empty() { "student" } else { name };
        let safe: String = name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("{safe}_성적표")
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: ScoreReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
