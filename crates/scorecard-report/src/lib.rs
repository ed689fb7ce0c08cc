//! scorecard-report: HTML and PDF rendering of score reports.

pub mod descriptions;
pub mod error;
pub mod html;
pub mod pdf;

pub use error::ExportError;

/// Bar colour for a category percentage: green from 80, indigo from 50,
/// rose below.
pub fn bar_color(percentage: f64) -> &'static str {
    if percentage >= 80.0 {
        "#10b981"
    } else if percentage >= 50.0 {
        "#6366f1"
    } else {
        "#f43f5e"
    }
}

/// Percentage label, rounded half up to a whole number.
pub fn percent_label(percentage: f64) -> String {
    format!("{}%", (percentage + 0.5).floor())
}
