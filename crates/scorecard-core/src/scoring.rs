//! Scoring engine.
//!
//! [`evaluate`] is a pure function of its inputs and is cheap enough to rerun
//! on every edit. Section scores use a floor-and-stretch transform:
//!
//! ```text
//! scaled = round1(baseline + earned / max * (100 - baseline))
//! ```
//!
//! where `baseline` is 37 for reading sections, 40 for grammar sections and 0
//! otherwise.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::{
    CategoryResult, EvaluationResult, Question, Section, StudentInput, ORPHAN_SECTION_NAME,
};

/// Every section is reported out of 100.
pub const MAX_SECTION_SCORE: f64 = 100.0;

pub const READING_BASELINE: f64 = 37.0;
pub const GRAMMAR_BASELINE: f64 = 40.0;

const READING_MARKERS: [&str; 2] = ["독해", "reading"];
const GRAMMAR_MARKERS: [&str; 2] = ["문법", "grammar"];

/// Raw and scaled figures for one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScore {
    pub section_id: String,
    pub name: String,
    pub baseline: f64,
    pub raw_earned: f64,
    pub raw_max: f64,
    /// `raw_earned / raw_max`, with a zero maximum counted as 1.
    pub ratio: f64,
    pub scaled: f64,
    pub max_score: f64,
    /// Questions with a non-blank answer.
    pub answered: usize,
    pub correct: usize,
    pub total: usize,
}

/// Whether a submitted answer matches the key.
///
/// Comparison ignores case and surrounding whitespace. A blank answer is
/// never correct, even against a blank key.
pub fn is_answer_correct(submitted: &str, key: &str) -> bool {
    let submitted = submitted.trim().to_lowercase();
    !submitted.is_empty() && submitted == key.trim().to_lowercase()
}

/// Score floor for a section, chosen by markers in its name.
pub fn baseline_for(section_name: &str) -> f64 {
    let name = section_name.to_lowercase();
    if READING_MARKERS.iter().any(|m| name.contains(m)) {
        READING_BASELINE
    } else if GRAMMAR_MARKERS.iter().any(|m| name.contains(m)) {
        GRAMMAR_BASELINE
    } else {
        0.0
    }
}

/// Round half up to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Apply the floor-and-stretch transform to an earned/max pair.
pub fn scaled_score(baseline: f64, raw_earned: f64, raw_max: f64) -> f64 {
    let ratio = ratio(raw_earned, raw_max);
    round1(baseline + ratio * (MAX_SECTION_SCORE - baseline))
}

fn ratio(raw_earned: f64, raw_max: f64) -> f64 {
    let max = if raw_max == 0.0 { 1.0 } else { raw_max };
    raw_earned / max
}

/// Score one student's answers.
pub fn evaluate(
    sections: &[Section],
    questions: &[Question],
    student: &StudentInput,
) -> EvaluationResult {
    let tally = Tally::new(sections, questions, student);

    let mut score_by_section = BTreeMap::new();
    let mut max_score_by_section = BTreeMap::new();
    for score in tally.section_scores() {
        score_by_section.insert(score.section_id.clone(), score.scaled);
        max_score_by_section.insert(score.section_id, score.max_score);
    }

    EvaluationResult {
        student_name: student.name.clone(),
        score_by_section,
        max_score_by_section,
        category_results: tally.category_results(),
        is_correct: tally.is_correct,
    }
}

/// Raw and scaled figures for every section, in section order.
pub fn section_scores(
    sections: &[Section],
    questions: &[Question],
    student: &StudentInput,
) -> Vec<SectionScore> {
    Tally::new(sections, questions, student).section_scores()
}

#[derive(Default)]
struct SectionTally {
    earned: f64,
    max: f64,
    answered: usize,
    correct: usize,
    total: usize,
}

struct CategoryTally {
    category: String,
    section_id: String,
    section_name: String,
    total: usize,
    correct: usize,
}

struct Tally<'a> {
    sections: &'a [Section],
    per_section: Vec<SectionTally>,
    categories: Vec<CategoryTally>,
    is_correct: BTreeMap<String, bool>,
}

impl<'a> Tally<'a> {
    fn new(sections: &'a [Section], questions: &[Question], student: &StudentInput) -> Self {
        let section_index: HashMap<&str, usize> = sections
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.as_str(), i))
            .collect();

        // Section order, then number; questions of unknown sections last.
        let mut ordered: Vec<(Option<usize>, &Question)> = questions
            .iter()
            .map(|q| (section_index.get(q.section_id.as_str()).copied(), q))
            .collect();
        ordered.sort_by_key(|(section, q)| match section {
            Some(i) => (0, *i, q.number),
            None => (1, 0, 0),
        });

        let mut tally = Self {
            sections,
            per_section: (0..sections.len()).map(|_| SectionTally::default()).collect(),
            categories: Vec::new(),
            is_correct: BTreeMap::new(),
        };
        let mut category_index: HashMap<(&str, &str), usize> = HashMap::new();

        for (section, q) in ordered {
            let answer = student.answer(&q.id);
            let correct = is_answer_correct(answer, &q.correct_answer);
            tally.is_correct.insert(q.id.clone(), correct);

            if let Some(i) = section {
                let s = &mut tally.per_section[i];
                s.max += q.points;
                s.total += 1;
                if !answer.trim().is_empty() {
                    s.answered += 1;
                }
                if correct {
                    s.earned += q.points;
                    s.correct += 1;
                }
            }

            let key = (q.section_id.as_str(), q.category.as_str());
            let slot = *category_index.entry(key).or_insert_with(|| {
                tally.categories.push(CategoryTally {
                    category: q.category.clone(),
                    section_id: q.section_id.clone(),
                    section_name: section
                        .map(|i| sections[i].name.clone())
                        .unwrap_or_else(|| ORPHAN_SECTION_NAME.to_string()),
                    total: 0,
                    correct: 0,
                });
                tally.categories.len() - 1
            });
            tally.categories[slot].total += 1;
            if correct {
                tally.categories[slot].correct += 1;
            }
        }

        tally
    }

    fn section_scores(&self) -> Vec<SectionScore> {
        self.sections
            .iter()
            .zip(&self.per_section)
            .map(|(section, t)| {
                let baseline = baseline_for(&section.name);
                SectionScore {
                    section_id: section.id.clone(),
                    name: section.name.clone(),
                    baseline,
                    raw_earned: t.earned,
                    raw_max: t.max,
                    ratio: ratio(t.earned, t.max),
                    scaled: scaled_score(baseline, t.earned, t.max),
                    max_score: MAX_SECTION_SCORE,
                    answered: t.answered,
                    correct: t.correct,
                    total: t.total,
                }
            })
            .collect()
    }

    fn category_results(&self) -> Vec<CategoryResult> {
        self.categories
            .iter()
            .map(|c| CategoryResult {
                category: c.category.clone(),
                section_id: c.section_id.clone(),
                section_name: c.section_name.clone(),
                total_questions: c.total,
                correct_count: c.correct,
                percentage: 100.0 * c.correct as f64 / c.total as f64,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Color;

    fn section(id: &str, name: &str, count: usize) -> Section {
        Section {
            id: id.into(),
            name: name.into(),
            question_count: count,
            color: Color::Blue,
        }
    }

    fn question(section: &str, number: usize, category: &str, key: &str) -> Question {
        Question {
            id: format!("{section}-{number}"),
            number,
            section_id: section.into(),
            category: category.into(),
            correct_answer: key.into(),
            points: 1.0,
        }
    }

    fn student(answers: &[(&str, &str)]) -> StudentInput {
        let mut input = StudentInput::new("Kim");
        for (id, answer) in answers {
            input.answers.insert((*id).into(), (*answer).into());
        }
        input
    }

    #[test]
    fn correctness_ignores_case_and_whitespace() {
        assert!(is_answer_correct(" B ", "b"));
        assert!(is_answer_correct("which", " WHICH"));
        assert!(!is_answer_correct("c", "b"));
    }

    #[test]
    fn blank_answer_is_never_correct() {
        assert!(!is_answer_correct("", ""));
        assert!(!is_answer_correct("   ", " "));
        assert!(!is_answer_correct("", "a"));
    }

    #[test]
    fn baseline_markers() {
        assert_eq!(baseline_for("독해"), 37.0);
        assert_eq!(baseline_for("Reading Comprehension"), 37.0);
        assert_eq!(baseline_for("문법 1"), 40.0);
        assert_eq!(baseline_for("GRAMMAR"), 40.0);
        assert_eq!(baseline_for("Listening"), 0.0);
        // Reading wins when both markers are present.
        assert_eq!(baseline_for("독해/문법"), 37.0);
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round1(70.0), 70.0);
        assert_eq!(round1(66.66), 66.7);
        assert_eq!(round1(66.64), 66.6);
        assert_eq!(round1(12.25), 12.3);
    }

    #[test]
    fn end_to_end_grammar_example() {
        let sections = vec![section("g", "Grammar", 2)];
        let questions = vec![question("g", 1, "verbs", "a"), question("g", 2, "verbs", "b")];
        let input = student(&[("g-1", "A"), ("g-2", "c")]);

        let result = evaluate(&sections, &questions, &input);
        assert_eq!(result.student_name, "Kim");
        assert!(result.is_correct["g-1"]);
        assert!(!result.is_correct["g-2"]);
        assert_eq!(result.score_by_section["g"], 70.0);
        assert_eq!(result.max_score_by_section["g"], 100.0);

        let scores = section_scores(&sections, &questions, &input);
        assert_eq!(scores[0].raw_earned, 1.0);
        assert_eq!(scores[0].raw_max, 2.0);
        assert_eq!(scores[0].ratio, 0.5);
        assert_eq!(scores[0].answered, 2);
    }

    #[test]
    fn grammar_floor_and_ceiling() {
        let sections = vec![section("g", "문법", 2)];
        let questions = vec![question("g", 1, "c", "a"), question("g", 2, "c", "b")];

        let none = evaluate(&sections, &questions, &student(&[]));
        assert_eq!(none.score_by_section["g"], 40.0);

        let all = evaluate(&sections, &questions, &student(&[("g-1", "a"), ("g-2", "B")]));
        assert_eq!(all.score_by_section["g"], 100.0);
    }

    #[test]
    fn unmarked_section_is_a_plain_percentage() {
        let sections = vec![section("l", "Listening", 4)];
        let questions: Vec<Question> = (1..=4).map(|n| question("l", n, "c", "x")).collect();

        let zero = evaluate(&sections, &questions, &student(&[]));
        assert_eq!(zero.score_by_section["l"], 0.0);

        let half = evaluate(&sections, &questions, &student(&[("l-1", "x"), ("l-3", "X")]));
        assert_eq!(half.score_by_section["l"], 50.0);
    }

    #[test]
    fn weighted_points() {
        let sections = vec![section("l", "Listening", 2)];
        let mut questions = vec![question("l", 1, "c", "x"), question("l", 2, "c", "y")];
        questions[1].points = 3.0;

        let result = evaluate(&sections, &questions, &student(&[("l-2", "y")]));
        assert_eq!(result.score_by_section["l"], 75.0);
    }

    #[test]
    fn empty_and_zero_point_sections() {
        let sections = vec![section("e", "독해", 0), section("z", "Extra", 1)];
        let mut questions = vec![question("z", 1, "c", "x")];
        questions[0].points = 0.0;

        let result = evaluate(&sections, &questions, &student(&[("z-1", "x")]));
        assert_eq!(result.score_by_section["e"], 37.0);
        assert_eq!(result.score_by_section["z"], 0.0);
        assert_eq!(result.max_score_by_section.len(), 2);
        assert!(result.is_correct["z-1"]);
    }

    #[test]
    fn categories_stay_separate_per_section() {
        let sections = vec![section("a", "Part A", 2), section("b", "Part B", 1)];
        let questions = vec![
            question("a", 1, "vocab", "x"),
            question("a", 2, "vocab", "y"),
            question("b", 1, "vocab", "z"),
        ];
        let result = evaluate(&sections, &questions, &student(&[("a-1", "x"), ("b-1", "z")]));

        assert_eq!(result.category_results.len(), 2);
        let a = &result.category_results[0];
        assert_eq!((a.section_name.as_str(), a.total_questions, a.correct_count), ("Part A", 2, 1));
        assert_eq!(a.percentage, 50.0);
        let b = &result.category_results[1];
        assert_eq!((b.section_name.as_str(), b.total_questions, b.correct_count), ("Part B", 1, 1));
        assert_eq!(b.percentage, 100.0);
    }

    #[test]
    fn same_named_sections_keep_their_ids() {
        let sections = vec![section("a", "문법", 1), section("b", "문법", 1)];
        let questions = vec![question("a", 1, "시제", "x"), question("b", 1, "시제", "y")];
        let result = evaluate(&sections, &questions, &student(&[("a-1", "x")]));

        let ids: Vec<(&str, usize)> = result
            .category_results
            .iter()
            .map(|c| (c.section_id.as_str(), c.correct_count))
            .collect();
        assert_eq!(ids, vec![("a", 1), ("b", 0)]);
    }

    #[test]
    fn category_order_follows_sections_then_numbers() {
        let sections = vec![section("b", "Second", 2), section("a", "First", 1)];
        let questions = vec![
            question("a", 1, "alpha", "x"),
            question("b", 2, "gamma", "x"),
            question("b", 1, "beta", "x"),
        ];
        let result = evaluate(&sections, &questions, &student(&[]));
        let order: Vec<&str> = result
            .category_results
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(order, vec!["beta", "gamma", "alpha"]);
    }

    #[test]
    fn orphaned_questions_are_reported_last() {
        let sections = vec![section("a", "Part A", 1)];
        let questions = vec![question("gone", 1, "lost", "x"), question("a", 1, "kept", "y")];
        let result = evaluate(&sections, &questions, &student(&[("gone-1", "x")]));

        assert_eq!(result.is_correct.len(), 2);
        assert!(result.is_correct["gone-1"]);
        assert_eq!(result.score_by_section.len(), 1);
        assert_eq!(result.score_by_section["a"], 0.0);
        let last = result.category_results.last().unwrap();
        assert_eq!(last.category, "lost");
        assert_eq!(last.section_name, ORPHAN_SECTION_NAME);
        assert_eq!(last.section_id, "gone");
    }

    #[test]
    fn stale_answers_are_ignored() {
        let sections = vec![section("a", "Part A", 1)];
        let questions = vec![question("a", 1, "c", "x")];
        let result = evaluate(&sections, &questions, &student(&[("old-id", "x")]));
        assert_eq!(result.is_correct.len(), 1);
        assert!(!result.is_correct["a-1"]);
    }
}
