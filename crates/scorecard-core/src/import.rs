//! Bulk answer-key import.
//!
//! Pasted text from a spreadsheet updates one section at a time. Line `i`
//! updates question `i + 1`; columns are `category, answer, points`,
//! separated by tabs or commas.

use crate::error::ExamError;
use crate::model::Exam;

/// Apply a pasted answer key to one section.
///
/// Returns the number of questions updated. A missing column leaves its
/// field unchanged. A points column that does not start with a number sets
/// the points to 0, unlike share links where an empty points field means 1.
/// A blank line still counts as a row: it clears that question's category.
/// Lines past the end of the section are skipped.
pub fn apply_bulk_paste(exam: &mut Exam, section_id: &str, text: &str) -> Result<usize, ExamError> {
    exam.section_index(section_id)?;

    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }

    let mut updated = 0;
    for (index, line) in text.lines().enumerate() {
        let Some(question) = exam.question_by_number_mut(section_id, index + 1) else {
            continue;
        };

        let mut columns = line.split(['\t', ',']);
        if let Some(category) = columns.next() {
            question.category = category.trim().to_string();
        }
        if let Some(answer) = columns.next() {
            question.correct_answer = answer.trim().to_string();
        }
        if let Some(points) = columns.next() {
            question.points = parse_float_prefix(points)
                .filter(|p| p.is_finite())
                .unwrap_or(0.0)
                .max(0.0);
        }
        updated += 1;
    }

    tracing::debug!(section = section_id, updated, "applied bulk answer key");
    Ok(updated)
}

/// Parse the longest numeric prefix of `s`, after leading whitespace.
///
/// `"2.5pt"` parses as 2.5 and `"abc"` as `None`.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
