//! Core data model types for scorecard.
//!
//! An [`Exam`] owns its sections and questions. Questions belong to a section
//! by id, and a section with `question_count = N` owns exactly the questions
//! numbered `1..=N`. [`StudentInput`] is keyed by question id and is allowed
//! to go stale when the exam is restructured.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExamError;

/// Category given to questions created without one.
pub const DEFAULT_CATEGORY: &str = "일반";

/// Section name reported for questions whose section no longer exists.
pub const ORPHAN_SECTION_NAME: &str = "기타";

/// Section colours, in palette order. The position is what share links carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Blue,
    Emerald,
    Rose,
    Amber,
    Violet,
}

/// The fixed palette. `PALETTE[i].index() == i`.
pub const PALETTE: [Color; 5] = [
    Color::Blue,
    Color::Emerald,
    Color::Rose,
    Color::Amber,
    Color::Violet,
];

impl Color {
    /// Position in [`PALETTE`].
    pub fn index(self) -> usize {
        PALETTE.iter().position(|&c| c == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Color> {
        PALETTE.get(index).copied()
    }

    /// Gradient start and end colours as CSS hex strings.
    pub fn gradient(self) -> (&'static str, &'static str) {
        match self {
            Color::Blue => ("#3b82f6", "#4f46e5"),
            Color::Emerald => ("#10b981", "#0d9488"),
            Color::Rose => ("#f43f5e", "#db2777"),
            Color::Amber => ("#f59e0b", "#ea580c"),
            Color::Violet => ("#8b5cf6", "#9333ea"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Blue => write!(f, "blue"),
            Color::Emerald => write!(f, "emerald"),
            Color::Rose => write!(f, "rose"),
            Color::Amber => write!(f, "amber"),
            Color::Violet => write!(f, "violet"),
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "blue" | "indigo" => Ok(Color::Blue),
            "emerald" | "teal" | "green" => Ok(Color::Emerald),
            "rose" | "pink" | "red" => Ok(Color::Rose),
            "amber" | "orange" => Ok(Color::Amber),
            "violet" | "purple" => Ok(Color::Violet),
            other => Err(format!("unknown color: {other}")),
        }
    }
}

/// A named group of questions sharing a scoring baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique within an exam.
    pub id: String,
    /// Display name. Also selects the scoring baseline.
    pub name: String,
    /// Number of questions, numbered `1..=question_count`.
    pub question_count: usize,
    #[serde(default)]
    pub color: Color,
}

/// One scored item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique and stable across edits.
    pub id: String,
    /// 1-based position within the section.
    pub number: usize,
    /// Id of the owning section.
    pub section_id: String,
    /// Free-text label used for the report breakdown.
    pub category: String,
    /// Answer key, compared case- and whitespace-insensitively.
    pub correct_answer: String,
    /// Weight, `>= 0`.
    pub points: f64,
}

impl Question {
    /// A question with the default category, an empty key and one point.
    pub fn blank(id: impl Into<String>, section_id: impl Into<String>, number: usize) -> Self {
        Self {
            id: id.into(),
            number,
            section_id: section_id.into(),
            category: DEFAULT_CATEGORY.to_string(),
            correct_answer: String::new(),
            points: 1.0,
        }
    }
}

/// One student's submitted answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentInput {
    pub name: String,
    /// Question id to submitted text. Absent entries are unanswered.
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
}

impl StudentInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            answers: BTreeMap::new(),
        }
    }

    /// The submitted answer for a question, or `""` if there is none.
    pub fn answer(&self, question_id: &str) -> &str {
        self.answers
            .get(question_id)
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Per-category accuracy within one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: String,
    /// Id of the owning section. Orphaned questions keep their stale id.
    pub section_id: String,
    pub section_name: String,
    pub total_questions: usize,
    pub correct_count: usize,
    /// `100 * correct_count / total_questions`.
    pub percentage: f64,
}

/// Scored output for one student. Derived from its inputs and never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub student_name: String,
    /// Section id to scaled score, for every section.
    pub score_by_section: BTreeMap<String, f64>,
    /// Section id to maximum score (always 100), for every section.
    pub max_score_by_section: BTreeMap<String, f64>,
    /// In order of first occurrence.
    pub category_results: Vec<CategoryResult>,
    /// Question id to correctness, for every question.
    pub is_correct: BTreeMap<String, bool>,
}

/// Sections and their questions, with the numbering invariant enforced.
///
/// Questions are kept in section order, then by number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExamParts")]
pub struct Exam {
    sections: Vec<Section>,
    questions: Vec<Question>,
}

#[derive(Deserialize)]
struct ExamParts {
    sections: Vec<Section>,
    questions: Vec<Question>,
}

impl TryFrom<ExamParts> for Exam {
    type Error = ExamError;

    fn try_from(parts: ExamParts) -> Result<Self, Self::Error> {
        Exam::new(parts.sections, parts.questions)
    }
}

impl Exam {
    /// Build an exam, checking ids, numbering and point weights.
    pub fn new(sections: Vec<Section>, questions: Vec<Question>) -> Result<Self, ExamError> {
        let mut section_ids = HashSet::new();
        for section in &sections {
            if !section_ids.insert(section.id.as_str()) {
                return Err(ExamError::DuplicateSection(section.id.clone()));
            }
        }

        let mut question_ids = HashSet::new();
        for q in &questions {
            if !question_ids.insert(q.id.as_str()) {
                return Err(ExamError::DuplicateQuestion(q.id.clone()));
            }
            if !q.points.is_finite() || q.points < 0.0 {
                return Err(ExamError::InvalidPoints {
                    id: q.id.clone(),
                    points: q.points,
                });
            }
            if !section_ids.contains(q.section_id.as_str()) {
                return Err(ExamError::UnknownSection(q.section_id.clone()));
            }
        }

        let mut ordered = Vec::with_capacity(questions.len());
        let mut remaining = questions;
        for section in &sections {
            let (mut own, rest): (Vec<Question>, Vec<Question>) = remaining
                .into_iter()
                .partition(|q| q.section_id == section.id);
            remaining = rest;
            own.sort_by_key(|q| q.number);

            for (i, q) in own.iter().enumerate() {
                if q.number == 0 || q.number > section.question_count {
                    return Err(ExamError::NumberOutOfRange {
                        section: section.id.clone(),
                        number: q.number,
                        count: section.question_count,
                    });
                }
                if q.number < i + 1 {
                    return Err(ExamError::DuplicateNumber {
                        section: section.id.clone(),
                        number: q.number,
                    });
                }
                if q.number > i + 1 {
                    return Err(ExamError::MissingNumber {
                        section: section.id.clone(),
                        number: i + 1,
                    });
                }
            }
            if own.len() < section.question_count {
                return Err(ExamError::MissingNumber {
                    section: section.id.clone(),
                    number: own.len() + 1,
                });
            }
            ordered.extend(own);
        }

        Ok(Self {
            sections,
            questions: ordered,
        })
    }

    /// An exam with no sections.
    pub fn empty() -> Self {
        Self {
            sections: Vec::new(),
            questions: Vec::new(),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Questions of one section, numbered 1..=N in order.
    pub fn questions_in<'a>(&'a self, section_id: &'a str) -> impl Iterator<Item = &'a Question> {
        self.questions
            .iter()
            .filter(move |q| q.section_id == section_id)
    }

    /// Total number of questions.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub(crate) fn sections_mut(&mut self) -> &mut Vec<Section> {
        &mut self.sections
    }

    pub(crate) fn questions_mut(&mut self) -> &mut Vec<Question> {
        &mut self.questions
    }

    pub fn into_parts(self) -> (Vec<Section>, Vec<Question>) {
        (self.sections, self.questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: &str, count: usize) -> Section {
        Section {
            id: id.into(),
            name: id.to_uppercase(),
            question_count: count,
            color: Color::Blue,
        }
    }

    #[test]
    fn color_palette_order() {
        for (i, color) in PALETTE.iter().enumerate() {
            assert_eq!(color.index(), i);
            assert_eq!(Color::from_index(i), Some(*color));
        }
        assert_eq!(Color::from_index(5), None);
        assert_eq!("Emerald".parse::<Color>().unwrap(), Color::Emerald);
        assert_eq!("purple".parse::<Color>().unwrap(), Color::Violet);
        assert!("black".parse::<Color>().is_err());
        assert_eq!(Color::Amber.to_string(), "amber");
    }

    #[test]
    fn exam_orders_questions_by_section_then_number() {
        let exam = Exam::new(
            vec![section("a", 2), section("b", 1)],
            vec![
                Question::blank("b1", "b", 1),
                Question::blank("a2", "a", 2),
                Question::blank("a1", "a", 1),
            ],
        )
        .unwrap();
        let ids: Vec<&str> = exam.questions().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "b1"]);
        assert_eq!(exam.questions_in("a").count(), 2);
    }

    #[test]
    fn exam_rejects_gaps_and_duplicates() {
        let gap = Exam::new(
            vec![section("a", 2)],
            vec![Question::blank("a1", "a", 1)],
        );
        assert!(matches!(gap, Err(ExamError::MissingNumber { number: 2, .. })));

        let dup = Exam::new(
            vec![section("a", 2)],
            vec![Question::blank("x", "a", 1), Question::blank("y", "a", 1)],
        );
        assert!(matches!(dup, Err(ExamError::DuplicateNumber { number: 1, .. })));

        let out_of_range = Exam::new(
            vec![section("a", 1)],
            vec![Question::blank("x", "a", 2)],
        );
        assert!(matches!(out_of_range, Err(ExamError::NumberOutOfRange { .. })));

        let orphan = Exam::new(vec![section("a", 0)], vec![Question::blank("x", "z", 1)]);
        assert_eq!(orphan, Err(ExamError::UnknownSection("z".into())));

        let dup_section = Exam::new(vec![section("a", 0), section("a", 0)], vec![]);
        assert_eq!(dup_section, Err(ExamError::DuplicateSection("a".into())));
    }

    #[test]
    fn exam_rejects_negative_points() {
        let mut q = Question::blank("a1", "a", 1);
        q.points = -1.0;
        let result = Exam::new(vec![section("a", 1)], vec![q]);
        assert!(matches!(result, Err(ExamError::InvalidPoints { .. })));
    }

    #[test]
    fn exam_serde_validates() {
        let exam = Exam::new(vec![section("a", 1)], vec![Question::blank("a1", "a", 1)]).unwrap();
        let json = serde_json::to_string(&exam).unwrap();
        let back: Exam = serde_json::from_str(&json).unwrap();
        assert_eq!(back, exam);

        let broken = json.replace("\"question_count\":1", "\"question_count\":3");
        assert!(serde_json::from_str::<Exam>(&broken).is_err());
    }

    #[test]
    fn student_answer_defaults_to_empty() {
        let mut input = StudentInput::new("Kim");
        input.answers.insert("q1".into(), "B".into());
        assert_eq!(input.answer("q1"), "B");
        assert_eq!(input.answer("q2"), "");
    }
}
