//! Exam setup: the default exam and the edits an instructor makes to it.
//!
//! Every operation keeps each section's questions numbered `1..=N`.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::ExamError;
use crate::model::{Color, Exam, Question, Section, PALETTE};

/// Question count of a newly added section.
pub const NEW_SECTION_QUESTIONS: usize = 10;

/// A single-field change to a question.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionEdit {
    Category(String),
    CorrectAnswer(String),
    /// Negative or non-finite values are stored as 0.
    Points(f64),
}

impl Default for Exam {
    /// A 28-question reading section and a 22-question grammar section.
    fn default() -> Self {
        let sections = vec![
            Section {
                id: "sec-1".into(),
                name: "독해".into(),
                question_count: 28,
                color: Color::Blue,
            },
            Section {
                id: "sec-2".into(),
                name: "문법".into(),
                question_count: 22,
                color: Color::Emerald,
            },
        ];

        let mut questions = Vec::new();
        for section in &sections {
            let category = if section.name == "독해" {
                "일반 독해"
            } else {
                "문장 형식"
            };
            for number in 1..=section.question_count {
                let mut q = Question::blank(format!("{}-{number}", section.id), &section.id, number);
                q.category = category.to_string();
                questions.push(q);
            }
        }

        match Exam::new(sections, questions) {
            Ok(exam) => exam,
            Err(_) => Exam::empty(),
        }
    }
}

impl Exam {
    /// Append a section named `Section {n}` with ten blank questions.
    ///
    /// Returns the new section's id.
    pub fn add_section(&mut self) -> String {
        let taken: HashSet<&str> = self.sections().iter().map(|s| s.id.as_str()).collect();
        let id = (self.sections().len() + 1..)
            .map(|n| format!("sec-{n}"))
            .find(|candidate| !taken.contains(candidate.as_str()))
            .unwrap_or_default();

        let color = PALETTE[self.sections().len() % PALETTE.len()];
        let name = format!("Section {}", self.sections().len() + 1);
        self.sections_mut().push(Section {
            id: id.clone(),
            name,
            question_count: 0,
            color,
        });
        self.grow(&id, NEW_SECTION_QUESTIONS, false);
        id
    }

    /// Remove a section and all of its questions.
    pub fn remove_section(&mut self, section_id: &str) -> Result<Section, ExamError> {
        let index = self.section_index(section_id)?;
        let removed = self.sections_mut().remove(index);
        self.questions_mut().retain(|q| q.section_id != section_id);
        Ok(removed)
    }

    pub fn rename_section(&mut self, section_id: &str, name: &str) -> Result<(), ExamError> {
        let index = self.section_index(section_id)?;
        self.sections_mut()[index].name = name.to_string();
        Ok(())
    }

    pub fn recolor_section(&mut self, section_id: &str, color: Color) -> Result<(), ExamError> {
        let index = self.section_index(section_id)?;
        self.sections_mut()[index].color = color;
        Ok(())
    }

    /// Change a section's question count.
    ///
    /// Growing appends blank questions with fresh ids. Shrinking drops the
    /// highest-numbered questions.
    pub fn resize_section(&mut self, section_id: &str, count: usize) -> Result<(), ExamError> {
        let index = self.section_index(section_id)?;
        let current = self.sections()[index].question_count;

        if count < current {
            self.questions_mut()
                .retain(|q| q.section_id != section_id || q.number <= count);
            self.sections_mut()[index].question_count = count;
        } else if count > current {
            self.grow(section_id, count - current, true);
        }
        Ok(())
    }

    /// Apply one edit to a question.
    pub fn update_question(&mut self, question_id: &str, edit: QuestionEdit) -> Result<(), ExamError> {
        let q = self
            .questions_mut()
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or_else(|| ExamError::UnknownQuestion(question_id.to_string()))?;

        match edit {
            QuestionEdit::Category(category) => q.category = category,
            QuestionEdit::CorrectAnswer(answer) => q.correct_answer = answer,
            QuestionEdit::Points(points) => {
                q.points = if points.is_finite() && points > 0.0 {
                    points
                } else {
                    0.0
                };
            }
        }
        Ok(())
    }

    /// Mutable access to a section's question by number.
    pub(crate) fn question_by_number_mut(
        &mut self,
        section_id: &str,
        number: usize,
    ) -> Option<&mut Question> {
        self.questions_mut()
            .iter_mut()
            .find(|q| q.section_id == section_id && q.number == number)
    }

    pub(crate) fn section_index(&self, section_id: &str) -> Result<usize, ExamError> {
        self.sections()
            .iter()
            .position(|s| s.id == section_id)
            .ok_or_else(|| ExamError::UnknownSection(section_id.to_string()))
    }

    /// Append `extra` blank questions to a section, keeping section order.
    ///
    /// With `unique_suffix`, ids carry a random suffix so that an id dropped by
    /// an earlier shrink is never handed out again.
    fn grow(&mut self, section_id: &str, extra: usize, unique_suffix: bool) {
        let Ok(index) = self.section_index(section_id) else {
            return;
        };
        let current = self.sections()[index].question_count;

        let taken: HashSet<&str> = self.questions().iter().map(|q| q.id.as_str()).collect();
        let mut fresh = Vec::with_capacity(extra);
        for number in current + 1..=current + extra {
            let mut id = format!("{section_id}-{number}");
            while unique_suffix || taken.contains(id.as_str()) {
                let suffix = Uuid::new_v4().simple().to_string();
                id = format!("{section_id}-{number}-{}", &suffix[..8]);
                if !taken.contains(id.as_str()) {
                    break;
                }
            }
            fresh.push(Question::blank(id, section_id, number));
        }

        // Insert after the section's last question so slot order is kept.
        let insert_at = self
            .questions()
            .iter()
            .rposition(|q| q.section_id == section_id)
            .map(|i| i + 1)
            .unwrap_or_else(|| {
                let later: HashSet<&str> = self.sections()[index + 1..]
                    .iter()
                    .map(|s| s.id.as_str())
                    .collect();
                self.questions()
                    .iter()
                    .position(|q| later.contains(q.section_id.as_str()))
                    .unwrap_or(self.questions().len())
            });

        let questions = self.questions_mut();
        let tail = questions.split_off(insert_at);
        questions.extend(fresh);
        questions.extend(tail);
        self.sections_mut()[index].question_count = current + extra;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_CATEGORY;

    fn numbers(exam: &Exam, section_id: &str) -> Vec<usize> {
        exam.questions_in(section_id).map(|q| q.number).collect()
    }

    /// Rebuilding through `Exam::new` re-checks every invariant.
    fn assert_consistent(exam: &Exam) {
        let (sections, questions) = exam.clone().into_parts();
        let rebuilt = Exam::new(sections, questions).unwrap();
        assert_eq!(&rebuilt, exam);
    }

    #[test]
    fn default_exam_layout() {
        let exam = Exam::default();
        assert_eq!(exam.sections().len(), 2);
        assert_eq!(exam.question_count(), 50);
        assert_eq!(exam.questions()[0].id, "sec-1-1");
        assert_eq!(exam.questions()[0].category, "일반 독해");
        assert_eq!(exam.questions()[28].category, "문장 형식");
        assert_eq!(exam.sections()[1].color, Color::Emerald);
        assert_consistent(&exam);
    }

    #[test]
    fn add_section_uses_next_palette_color() {
        let mut exam = Exam::default();
        let id = exam.add_section();
        let section = exam.section(&id).unwrap();
        assert_eq!(section.name, "Section 3");
        assert_eq!(section.color, Color::Rose);
        assert_eq!(section.question_count, NEW_SECTION_QUESTIONS);
        assert_eq!(numbers(&exam, &id), (1..=10).collect::<Vec<_>>());
        assert!(exam.questions_in(&id).all(|q| q.category == DEFAULT_CATEGORY && q.points == 1.0));
        assert_consistent(&exam);
    }

    #[test]
    fn add_section_avoids_taken_ids() {
        let mut exam = Exam::default();
        exam.remove_section("sec-1").unwrap();
        let first = exam.add_section();
        let second = exam.add_section();
        assert_ne!(first, "sec-2");
        assert_ne!(first, second);
        assert_consistent(&exam);
    }

    #[test]
    fn remove_section_cascades() {
        let mut exam = Exam::default();
        let removed = exam.remove_section("sec-1").unwrap();
        assert_eq!(removed.name, "독해");
        assert_eq!(exam.question_count(), 22);
        assert!(exam.questions().iter().all(|q| q.section_id == "sec-2"));
        assert!(matches!(
            exam.remove_section("sec-1"),
            Err(ExamError::UnknownSection(_))
        ));
    }

    #[test]
    fn resize_grows_and_shrinks() {
        let mut exam = Exam::default();
        exam.resize_section("sec-1", 3).unwrap();
        assert_eq!(numbers(&exam, "sec-1"), vec![1, 2, 3]);

        exam.resize_section("sec-1", 5).unwrap();
        assert_eq!(numbers(&exam, "sec-1"), vec![1, 2, 3, 4, 5]);
        assert_eq!(exam.section("sec-1").unwrap().question_count, 5);
        // The section's questions stay ahead of the next section's.
        assert_eq!(exam.questions()[5].section_id, "sec-2");

        exam.resize_section("sec-1", 0).unwrap();
        assert_eq!(exam.questions_in("sec-1").count(), 0);
        exam.resize_section("sec-1", 2).unwrap();
        assert_eq!(exam.questions()[0].section_id, "sec-1");
        assert_consistent(&exam);
    }

    #[test]
    fn regrown_questions_get_fresh_ids() {
        let mut exam = Exam::default();
        exam.update_question("sec-2-22", QuestionEdit::CorrectAnswer("d".into()))
            .unwrap();
        exam.resize_section("sec-2", 21).unwrap();
        exam.resize_section("sec-2", 22).unwrap();

        let q = exam.questions_in("sec-2").last().unwrap();
        assert_eq!(q.number, 22);
        assert_ne!(q.id, "sec-2-22");
        assert!(q.id.starts_with("sec-2-22-"));
        assert_eq!(q.correct_answer, "");
        assert_consistent(&exam);
    }

    #[test]
    fn update_question_fields() {
        let mut exam = Exam::default();
        exam.update_question("sec-1-1", QuestionEdit::Category("빈칸 추론".into()))
            .unwrap();
        exam.update_question("sec-1-1", QuestionEdit::CorrectAnswer("3".into()))
            .unwrap();
        exam.update_question("sec-1-1", QuestionEdit::Points(2.5)).unwrap();
        exam.update_question("sec-1-2", QuestionEdit::Points(f64::NAN)).unwrap();

        let q = exam.question("sec-1-1").unwrap();
        assert_eq!(q.category, "빈칸 추론");
        assert_eq!(q.correct_answer, "3");
        assert_eq!(q.points, 2.5);
        assert_eq!(exam.question("sec-1-2").unwrap().points, 0.0);

        assert!(matches!(
            exam.update_question("nope", QuestionEdit::Points(1.0)),
            Err(ExamError::UnknownQuestion(_))
        ));
    }

    #[test]
    fn rename_and_recolor() {
        let mut exam = Exam::default();
        exam.rename_section("sec-2", "Grammar II").unwrap();
        exam.recolor_section("sec-2", Color::Violet).unwrap();
        let s = exam.section("sec-2").unwrap();
        assert_eq!(s.name, "Grammar II");
        assert_eq!(s.color, Color::Violet);
        assert!(exam.rename_section("sec-9", "x").is_err());
    }
}
