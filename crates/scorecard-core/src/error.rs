//! Error types for the exam model and the share-link codec.

use thiserror::Error;

/// Errors produced while packing or unpacking a share token.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// The token could not be decompressed, or decompressed to nothing.
    #[error("token could not be decompressed")]
    Decompress,

    /// The packed payload did not have exactly five `~`-separated fields.
    #[error("expected 5 fields in packed payload, found {0}")]
    FieldCount(usize),

    /// A section or question entry had the wrong number of columns.
    #[error("{kind} entry {index} has {found} columns, expected 3")]
    ColumnCount {
        kind: &'static str,
        index: usize,
        found: usize,
    },

    /// A numeric column did not parse.
    #[error("invalid {field} {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// The payload ran out of question entries before every section was filled.
    #[error("payload is missing question slot {0}")]
    MissingSlot(usize),

    /// A section has no question for one of its numbers, so slots cannot be laid out.
    #[error("section {section:?} has no question numbered {number}")]
    MissingQuestion { section: String, number: usize },

    /// A free-text field contains a character the wire format uses as a delimiter.
    #[error("{field} {value:?} contains reserved character {delimiter:?}")]
    ReservedDelimiter {
        field: &'static str,
        value: String,
        delimiter: char,
    },
}

/// Errors produced while building or editing an exam.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExamError {
    /// No section with this id exists.
    #[error("unknown section: {0}")]
    UnknownSection(String),

    /// No question with this id exists.
    #[error("unknown question: {0}")]
    UnknownQuestion(String),

    /// Two sections share an id.
    #[error("duplicate section id: {0}")]
    DuplicateSection(String),

    /// Two questions share an id.
    #[error("duplicate question id: {0}")]
    DuplicateQuestion(String),

    /// A question number falls outside `1..=question_count`.
    #[error("section {section} has {count} questions, found number {number}")]
    NumberOutOfRange {
        section: String,
        number: usize,
        count: usize,
    },

    /// Two questions of one section share a number.
    #[error("section {section} has more than one question numbered {number}")]
    DuplicateNumber { section: String, number: usize },

    /// A section is missing one of its numbered questions.
    #[error("section {section} is missing question {number}")]
    MissingNumber { section: String, number: usize },

    /// A point weight is negative or not finite.
    #[error("question {id} has invalid points {points}")]
    InvalidPoints { id: String, points: f64 },
}
