//! Share-link codec.
//!
//! A token packs one exam and one student's answers into five `~`-separated
//! fields, then compresses the result with LZ-string:
//!
//! ```text
//! name ~ sections ~ categories ~ questions ~ answers
//! ```
//!
//! * `sections`: `name,questionCount,colorIndex` entries joined by `;`
//! * `categories`: the distinct categories in first-seen order, joined by `,`
//! * `questions`: `categoryIndex,correctAnswer,points` entries joined by `;`,
//!   one per slot, with `points` left empty when it is exactly 1
//! * `answers`: raw answers joined by `;`, one per slot
//!
//! A slot is a question's position in section order, then number order.
//! Ids are not carried; decoding assigns fresh ones derived from position.

use std::collections::BTreeMap;

use crate::error::{CodecError, ExamError};
use crate::lz;
use crate::model::{Color, Exam, Question, Section, StudentInput, DEFAULT_CATEGORY};

const FIELD_SEP: char = '~';
const ITEM_SEP: char = ';';
const COLUMN_SEP: char = ',';

/// Everything a share token carries, with ids regenerated on decode.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedReport {
    pub name: String,
    pub sections: Vec<Section>,
    pub questions: Vec<Question>,
    /// Keyed by the regenerated question ids.
    pub answers: BTreeMap<String, String>,
}

impl SharedReport {
    /// Split into an exam and the student's input.
    pub fn into_parts(self) -> Result<(Exam, StudentInput), ExamError> {
        let exam = Exam::new(self.sections, self.questions)?;
        let student = StudentInput {
            name: self.name,
            answers: self.answers,
        };
        Ok((exam, student))
    }
}

/// Encode one exam and one student's answers into a URL-fragment-safe token.
pub fn encode(
    name: &str,
    sections: &[Section],
    questions: &[Question],
    answers: &BTreeMap<String, String>,
) -> Result<String, CodecError> {
    let packed = pack(name, sections, questions, answers)?;
    let token = lz::compress_to_encoded_uri_component(&packed);
    tracing::debug!(
        packed_len = packed.len(),
        token_len = token.len(),
        "encoded share token"
    );
    Ok(token)
}

/// Encode an [`Exam`] together with a [`StudentInput`].
pub fn encode_report(exam: &Exam, student: &StudentInput) -> Result<String, CodecError> {
    encode(&student.name, exam.sections(), exam.questions(), &student.answers)
}

/// Decode a token produced by [`encode`].
pub fn decode(token: &str) -> Result<SharedReport, CodecError> {
    let packed = lz::decompress_from_encoded_uri_component(token)
        .filter(|s| !s.is_empty())
        .ok_or(CodecError::Decompress)?;
    unpack(&packed)
}

/// Decode a token, logging and discarding any failure.
///
/// Callers keep whatever state they had when this returns `None`.
pub fn try_decode(token: &str) -> Option<SharedReport> {
    match decode(token) {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::warn!("ignoring undecodable share token: {e}");
            None
        }
    }
}

/// Build the uncompressed packed string.
pub fn pack(
    name: &str,
    sections: &[Section],
    questions: &[Question],
    answers: &BTreeMap<String, String>,
) -> Result<String, CodecError> {
    check_text("student name", name, &[FIELD_SEP])?;

    let mut categories: Vec<&str> = Vec::new();
    for q in questions {
        if !categories.contains(&q.category.as_str()) {
            check_text("category", &q.category, &[FIELD_SEP, ITEM_SEP, COLUMN_SEP])?;
            categories.push(&q.category);
        }
    }

    let mut section_items = Vec::with_capacity(sections.len());
    for s in sections {
        check_text("section name", &s.name, &[FIELD_SEP, ITEM_SEP, COLUMN_SEP])?;
        section_items.push(format!(
            "{}{COLUMN_SEP}{}{COLUMN_SEP}{}",
            s.name,
            s.question_count,
            s.color.index()
        ));
    }

    let slots = slots(sections, questions)?;

    let mut question_items = Vec::with_capacity(slots.len());
    let mut answer_items = Vec::with_capacity(slots.len());
    for q in slots {
        check_text(
            "correct answer",
            &q.correct_answer,
            &[FIELD_SEP, ITEM_SEP, COLUMN_SEP],
        )?;
        let category_index = categories
            .iter()
            .position(|c| *c == q.category)
            .unwrap_or(0);
        let points = if q.points == 1.0 {
            String::new()
        } else {
            q.points.to_string()
        };
        question_items.push(format!(
            "{category_index}{COLUMN_SEP}{}{COLUMN_SEP}{points}",
            q.correct_answer
        ));

        let answer = answers.get(&q.id).map(String::as_str).unwrap_or("");
        check_text("answer", answer, &[FIELD_SEP, ITEM_SEP])?;
        answer_items.push(answer);
    }

    let fields = [
        name.to_string(),
        section_items.join(&ITEM_SEP.to_string()),
        categories.join(&COLUMN_SEP.to_string()),
        question_items.join(&ITEM_SEP.to_string()),
        answer_items.join(&ITEM_SEP.to_string()),
    ];
    Ok(fields.join(&FIELD_SEP.to_string()))
}

/// Parse a packed string back into sections, questions and answers.
pub fn unpack(packed: &str) -> Result<SharedReport, CodecError> {
    let fields: Vec<&str> = packed.split(FIELD_SEP).collect();
    let [name, sections_field, categories_field, questions_field, answers_field] =
        fields.as_slice()
    else {
        return Err(CodecError::FieldCount(fields.len()));
    };

    let categories: Vec<&str> = categories_field.split(COLUMN_SEP).collect();

    let sections = split_items(sections_field)
        .enumerate()
        .map(|(i, item)| parse_section(i, item))
        .collect::<Result<Vec<_>, _>>()?;

    let raw_questions: Vec<&str> = split_items(questions_field).collect();
    let raw_answers: Vec<&str> = answers_field.split(ITEM_SEP).collect();

    let mut questions = Vec::new();
    let mut answers = BTreeMap::new();
    let mut slot = 0usize;

    for section in &sections {
        for number in 1..=section.question_count {
            let item = raw_questions
                .get(slot)
                .ok_or(CodecError::MissingSlot(slot))?;
            let columns = columns(*item, "question", slot)?;

            let category_index: usize = parse_number("category index", columns[0])?;
            let category = categories
                .get(category_index)
                .copied()
                .unwrap_or(DEFAULT_CATEGORY);

            let points = if columns[2].is_empty() {
                1.0
            } else {
                let points: f64 = parse_number("points", columns[2])?;
                if !points.is_finite() || points < 0.0 {
                    return Err(CodecError::InvalidNumber {
                        field: "points",
                        value: columns[2].to_string(),
                    });
                }
                points
            };

            let id = format!("qs-{}-{number}", section.id);
            let answer = raw_answers.get(slot).copied().unwrap_or("");
            answers.insert(id.clone(), answer.to_string());
            questions.push(Question {
                id,
                number,
                section_id: section.id.clone(),
                category: category.to_string(),
                correct_answer: columns[1].to_string(),
                points,
            });
            slot += 1;
        }
    }

    Ok(SharedReport {
        name: name.to_string(),
        sections,
        questions,
        answers,
    })
}

/// Questions in slot order: each section's questions `1..=question_count`.
pub fn slots<'a>(
    sections: &'a [Section],
    questions: &'a [Question],
) -> Result<Vec<&'a Question>, CodecError> {
    let mut out = Vec::with_capacity(questions.len());
    for section in sections {
        for number in 1..=section.question_count {
            let q = questions
                .iter()
                .find(|q| q.section_id == section.id && q.number == number)
                .ok_or_else(|| CodecError::MissingQuestion {
                    section: section.name.clone(),
                    number,
                })?;
            out.push(q);
        }
    }
    Ok(out)
}

fn parse_section(index: usize, item: &str) -> Result<Section, CodecError> {
    let columns = columns(item, "section", index)?;
    let question_count = parse_number("question count", columns[1])?;
    let color = columns[2]
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(Color::from_index)
        .unwrap_or_default();

    Ok(Section {
        id: format!("sec-v6-{index}"),
        name: columns[0].to_string(),
        question_count,
        color,
    })
}

/// Items of a `;`-list. An empty field is an empty list.
fn split_items(field: &str) -> impl Iterator<Item = &str> {
    field.split(ITEM_SEP).filter(move |_| !field.is_empty())
}

fn columns<'a>(
    item: &'a str,
    kind: &'static str,
    index: usize,
) -> Result<[&'a str; 3], CodecError> {
    let parts: Vec<&str> = item.split(COLUMN_SEP).collect();
    <[&str; 3]>::try_from(parts.as_slice()).map_err(|_| CodecError::ColumnCount {
        kind,
        index,
        found: parts.len(),
    })
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, CodecError> {
    value
        .trim()
        .parse()
        .map_err(|_| CodecError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

fn check_text(field: &'static str, value: &str, reserved: &[char]) -> Result<(), CodecError> {
    match value.chars().find(|c| reserved.contains(c)) {
        Some(delimiter) => Err(CodecError::ReservedDelimiter {
            field,
            value: value.to_string(),
            delimiter,
        }),
        None => Ok(()),
    }
}
