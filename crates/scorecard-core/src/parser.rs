//! TOML exam and answer-sheet files.
//!
//! An exam file lists sections and, optionally, per-question overrides:
//!
//! ```toml
//! [[sections]]
//! id = "reading"
//! name = "독해"
//! question_count = 3
//! color = "blue"
//! category = "일반 독해"
//! answer_key = ["3", "1", "5"]
//!
//! [[questions]]
//! section = "reading"
//! number = 2
//! category = "빈칸 추론"
//! points = 2.0
//! ```
//!
//! Questions without an override get the section's defaults. Answer sheets
//! give answers by question id, by position within a section, or both.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Color, Exam, Question, Section, StudentInput, DEFAULT_CATEGORY, PALETTE};

/// Characters that cannot appear in text carried by a share link.
const RESERVED: [char; 3] = ['~', ';', ','];

#[derive(Debug, Serialize, Deserialize)]
struct TomlExamFile {
    #[serde(default)]
    sections: Vec<TomlSection>,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlSection {
    id: String,
    name: String,
    question_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    /// Category for questions without an override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    /// Points for questions without an override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    points: Option<f64>,
    /// Answer keys by position.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    answer_key: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlQuestion {
    section: String,
    number: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    points: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlAnswersFile {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    answers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    by_section: BTreeMap<String, Vec<String>>,
}

/// Parse an exam file.
pub fn parse_exam(path: &Path) -> Result<Exam> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exam file: {}", path.display()))?;

    parse_exam_str(&content, path)
}

/// Parse exam TOML from a string (useful for testing).
pub fn parse_exam_str(content: &str, source_path: &Path) -> Result<Exam> {
    let parsed: TomlExamFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mut sections = Vec::with_capacity(parsed.sections.len());
    let mut questions = Vec::new();

    for (index, s) in parsed.sections.iter().enumerate() {
        let color = match &s.color {
            Some(c) => c.parse::<Color>().map_err(|e| anyhow::anyhow!("{}", e))?,
            None => PALETTE[index % PALETTE.len()],
        };
        anyhow::ensure!(
            s.answer_key.len() <= s.question_count,
            "section {} has {} questions but {} answer keys",
            s.id,
            s.question_count,
            s.answer_key.len()
        );

        for number in 1..=s.question_count {
            let mut q = Question::blank(format!("{}-{number}", s.id), &s.id, number);
            q.category = s
                .category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
            q.correct_answer = s.answer_key.get(number - 1).cloned().unwrap_or_default();
            q.points = s.points.unwrap_or(1.0);
            questions.push(q);
        }

        sections.push(Section {
            id: s.id.clone(),
            name: s.name.clone(),
            question_count: s.question_count,
            color,
        });
    }

    let mut overridden = HashSet::new();
    for o in parsed.questions {
        let Some(section) = sections.iter().find(|s| s.id == o.section) else {
            anyhow::bail!(
                "question {} refers to unknown section: {}",
                o.number,
                o.section
            );
        };
        anyhow::ensure!(
            (1..=section.question_count).contains(&o.number),
            "section {} has {} questions, found question {}",
            section.id,
            section.question_count,
            o.number
        );
        anyhow::ensure!(
            overridden.insert((o.section.clone(), o.number)),
            "section {} lists question {} more than once",
            o.section,
            o.number
        );

        let Some(q) = questions
            .iter_mut()
            .find(|q| q.section_id == o.section && q.number == o.number)
        else {
            continue;
        };
        if let Some(id) = o.id {
            q.id = id;
        }
        if let Some(category) = o.category {
            q.category = category;
        }
        if let Some(answer) = o.answer {
            q.correct_answer = answer;
        }
        if let Some(points) = o.points {
            q.points = points;
        }
    }

    Exam::new(sections, questions)
        .with_context(|| format!("invalid exam: {}", source_path.display()))
}

/// Serialize an exam to TOML, listing every question explicitly.
pub fn exam_to_toml(exam: &Exam) -> Result<String> {
    let file = TomlExamFile {
        sections: exam
            .sections()
            .iter()
            .map(|s| TomlSection {
                id: s.id.clone(),
                name: s.name.clone(),
                question_count: s.question_count,
                color: Some(s.color.to_string()),
                category: None,
                points: None,
                answer_key: Vec::new(),
            })
            .collect(),
        questions: exam
            .questions()
            .iter()
            .map(|q| TomlQuestion {
                section: q.section_id.clone(),
                number: q.number,
                id: Some(q.id.clone()),
                category: Some(q.category.clone()),
                answer: Some(q.correct_answer.clone()),
                points: Some(q.points),
            })
            .collect(),
    };
    toml::to_string(&file).context("failed to serialize exam")
}

/// Parse an answer sheet for `exam`.
pub fn parse_answers(path: &Path, exam: &Exam) -> Result<StudentInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;

    parse_answers_str(&content, path, exam)
}

/// Parse answer-sheet TOML from a string.
///
/// Positional `by_section` lists are applied first; `answers` entries keyed by
/// question id win over them.
pub fn parse_answers_str(content: &str, source_path: &Path, exam: &Exam) -> Result<StudentInput> {
    let parsed: TomlAnswersFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mut student = StudentInput::new(parsed.name);

    for (section_id, answers) in parsed.by_section {
        let section = exam
            .section(&section_id)
            .with_context(|| format!("answers given for unknown section: {section_id}"))?;
        anyhow::ensure!(
            answers.len() <= section.question_count,
            "section {} has {} questions but {} answers were given",
            section_id,
            section.question_count,
            answers.len()
        );
        for (q, answer) in exam.questions_in(&section_id).zip(answers) {
            student.answers.insert(q.id.clone(), answer);
        }
    }

    for (id, answer) in parsed.answers {
        if exam.question(&id).is_none() {
            tracing::warn!("{}: ignoring answer for unknown question {id}", source_path.display());
            continue;
        }
        student.answers.insert(id, answer);
    }

    Ok(student)
}

/// Serialize an answer sheet positionally, one list per section.
pub fn answers_to_toml(exam: &Exam, student: &StudentInput) -> Result<String> {
    let by_section = exam
        .sections()
        .iter()
        .map(|s| {
            let answers = exam
                .questions_in(&s.id)
                .map(|q| student.answer(&q.id).to_string())
                .collect();
            (s.id.clone(), answers)
        })
        .collect();

    let file = TomlAnswersFile {
        name: student.name.clone(),
        answers: BTreeMap::new(),
        by_section,
    };
    toml::to_string(&file).context("failed to serialize answers")
}

/// A warning from exam validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The section id (if applicable).
    pub section_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check an exam for problems that do not prevent scoring.
pub fn validate_exam(exam: &Exam) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |section: &Section, message: String| {
        warnings.push(ValidationWarning {
            section_id: Some(section.id.clone()),
            message,
        });
    };

    let mut seen_names = HashSet::new();
    for section in exam.sections() {
        if !seen_names.insert(section.name.as_str()) {
            warn(section, format!("duplicate section name: {}", section.name));
        }
        if let Some(c) = reserved_char(&section.name) {
            warn(
                section,
                format!("section name contains {c:?} and cannot be shared"),
            );
        }

        let questions: Vec<&Question> = exam.questions_in(&section.id).collect();
        if questions.is_empty() {
            warn(section, "section has no questions".into());
            continue;
        }

        let unkeyed: Vec<String> = questions
            .iter()
            .filter(|q| q.correct_answer.trim().is_empty())
            .map(|q| q.number.to_string())
            .collect();
        if !unkeyed.is_empty() {
            warn(
                section,
                format!(
                    "{} question(s) have no answer key and can never be correct: {}",
                    unkeyed.len(),
                    unkeyed.join(", ")
                ),
            );
        }

        if questions.iter().all(|q| q.points == 0.0) {
            warn(section, "all questions are worth 0 points".into());
        }

        for q in &questions {
            if let Some(c) = reserved_char(&q.category) {
                warn(
                    section,
                    format!(
                        "question {} category contains {c:?} and cannot be shared",
                        q.number
                    ),
                );
            }
            if let Some(c) = reserved_char(&q.correct_answer) {
                warn(
                    section,
                    format!(
                        "question {} answer key contains {c:?} and cannot be shared",
                        q.number
                    ),
                );
            }
        }
    }

    warnings
}

fn reserved_char(s: &str) -> Option<char> {
    s.chars().find(|c| RESERVED.contains(c))
}
