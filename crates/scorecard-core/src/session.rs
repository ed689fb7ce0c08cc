//! Application state for one scoring session.
//!
//! A session moves through three steps: setup, answer input, and report.
//! Opening a share link loads the exam and answers it carries and switches
//! the session into shared mode, which shows only the report.

use crate::codec::{self, SharedReport};
use crate::error::CodecError;
use crate::fragment;
use crate::model::{EvaluationResult, Exam, StudentInput};
use crate::scoring::{self, SectionScore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Setup,
    Input,
    Report,
}

#[derive(Debug, Clone)]
pub struct Session {
    step: Step,
    /// Furthest step reached; navigation back is free, forward is not.
    reached: Step,
    shared: bool,
    pub exam: Exam,
    pub student: StudentInput,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Exam::default())
    }
}

impl Session {
    pub fn new(exam: Exam) -> Self {
        Self {
            step: Step::Setup,
            reached: Step::Setup,
            shared: false,
            exam,
            student: StudentInput::default(),
        }
    }

    /// Start a session from a URL or fragment.
    ///
    /// Falls back to a fresh session when the fragment holds no decodable
    /// share link.
    pub fn from_fragment(input: &str) -> Self {
        let mut session = Self::default();
        session.apply_fragment(input);
        session
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn is_shared(&self) -> bool {
        self.shared
    }

    /// Steps the navigation bar lets the user pick. Empty in shared mode.
    pub fn available_steps(&self) -> Vec<Step> {
        if self.shared {
            return Vec::new();
        }
        [Step::Setup, Step::Input, Step::Report]
            .into_iter()
            .filter(|s| *s <= self.reached)
            .collect()
    }

    /// Jump to a step already reached. Returns whether the step changed.
    pub fn go_to(&mut self, step: Step) -> bool {
        if self.shared || step > self.reached || step == self.step {
            return false;
        }
        self.step = step;
        true
    }

    /// Setup is done; move on to answer input.
    pub fn finish_setup(&mut self) {
        if !self.shared {
            self.advance(Step::Input);
        }
    }

    /// Answers are in; show the report.
    pub fn submit(&mut self) {
        if !self.shared {
            self.advance(Step::Report);
        }
    }

    fn advance(&mut self, step: Step) {
        self.step = step;
        self.reached = self.reached.max(step);
    }

    /// Load a share link. Returns `true` if the session changed.
    ///
    /// An undecodable or legacy link leaves the session untouched.
    pub fn apply_fragment(&mut self, input: &str) -> bool {
        let Some(report) = fragment::decode_fragment(input) else {
            return false;
        };
        self.load_shared(report)
    }

    fn load_shared(&mut self, report: SharedReport) -> bool {
        match report.into_parts() {
            Ok((exam, student)) => {
                self.exam = exam;
                self.student = student;
                self.shared = true;
                self.step = Step::Report;
                self.reached = Step::Report;
                true
            }
            Err(e) => {
                tracing::warn!("ignoring inconsistent share link: {e}");
                false
            }
        }
    }

    /// Start over.
    ///
    /// Shared mode returns to a fresh session. Otherwise the answers are
    /// cleared and the exam kept, ready for the next student.
    pub fn reset(&mut self) {
        if self.shared {
            *self = Self::default();
        } else {
            self.student = StudentInput::default();
            self.step = Step::Input;
        }
    }

    /// Score the current answers.
    pub fn evaluate(&self) -> EvaluationResult {
        scoring::evaluate(self.exam.sections(), self.exam.questions(), &self.student)
    }

    pub fn section_scores(&self) -> Vec<SectionScore> {
        scoring::section_scores(self.exam.sections(), self.exam.questions(), &self.student)
    }

    /// Token for the current exam and answers.
    pub fn share_token(&self) -> Result<String, CodecError> {
        codec::encode_report(&self.exam, &self.student)
    }

    /// Full share URL for the current exam and answers.
    pub fn share_url(&self, base: &str) -> Result<String, CodecError> {
        Ok(fragment::share_url(base, &self.share_token()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::QuestionEdit;

    #[test]
    fn forward_navigation_requires_progress() {
        let mut session = Session::default();
        assert_eq!(session.step(), Step::Setup);
        assert_eq!(session.available_steps(), vec![Step::Setup]);
        assert!(!session.go_to(Step::Report));

        session.finish_setup();
        assert_eq!(session.step(), Step::Input);
        session.submit();
        assert_eq!(session.step(), Step::Report);

        assert!(session.go_to(Step::Setup));
        assert_eq!(session.available_steps().len(), 3);
        assert!(session.go_to(Step::Report));
    }

    #[test]
    fn reset_keeps_exam_outside_shared_mode() {
        let mut session = Session::default();
        session
            .exam
            .update_question("sec-1-1", QuestionEdit::CorrectAnswer("2".into()))
            .unwrap();
        session.student.name = "Kim".into();
        session.student.answers.insert("sec-1-1".into(), "2".into());
        session.finish_setup();
        session.submit();

        session.reset();
        assert_eq!(session.step(), Step::Input);
        assert!(session.student.answers.is_empty());
        assert_eq!(session.exam.question("sec-1-1").unwrap().correct_answer, "2");
    }

    #[test]
    fn share_link_round_trip_enters_shared_mode() {
        let mut author = Session::default();
        author
            .exam
            .update_question("sec-2-1", QuestionEdit::CorrectAnswer("b".into()))
            .unwrap();
        author.student.name = "Yoon".into();
        author.student.answers.insert("sec-2-1".into(), "B".into());
        let url = author.share_url("https://example.com/").unwrap();

        let viewer = Session::from_fragment(&url);
        assert!(viewer.is_shared());
        assert_eq!(viewer.step(), Step::Report);
        assert!(viewer.available_steps().is_empty());
        assert_eq!(viewer.student.name, "Yoon");

        let before = author.evaluate();
        let after = viewer.evaluate();
        assert_eq!(after.score_by_section["sec-v6-1"], before.score_by_section["sec-2"]);
        assert_eq!(after.category_results, before.category_results);
    }

    #[test]
    fn bad_fragment_keeps_prior_state() {
        let mut session = Session::default();
        session.student.name = "Han".into();
        session.finish_setup();

        assert!(!session.apply_fragment("#s=AAAA"));
        assert!(!session.apply_fragment("#v4=whatever"));
        assert!(!session.apply_fragment("#results"));
        assert!(!session.is_shared());
        assert_eq!(session.step(), Step::Input);
        assert_eq!(session.student.name, "Han");
    }

    #[test]
    fn reset_in_shared_mode_starts_fresh() {
        let author = Session::default();
        let url = author.share_url("https://example.com/").unwrap();
        let mut viewer = Session::from_fragment(&url);
        assert!(viewer.is_shared());

        viewer.reset();
        assert!(!viewer.is_shared());
        assert_eq!(viewer.step(), Step::Setup);
        assert_eq!(viewer.exam.sections()[0].id, "sec-1");
    }

    #[test]
    fn shared_mode_ignores_navigation() {
        let url = Session::default().share_url("https://example.com/").unwrap();
        let mut viewer = Session::from_fragment(&url);
        assert!(!viewer.go_to(Step::Setup));
        viewer.finish_setup();
        assert_eq!(viewer.step(), Step::Report);
    }
}
