//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined and the category
//! charts drawn as inline SVG.

use std::path::Path;

use scorecard_core::model::CategoryResult;
use scorecard_core::report::ScoreReport;
use scorecard_core::scoring::is_answer_correct;

use crate::descriptions::category_description;
use crate::error::{write_file, ExportError};
use crate::{bar_color, percent_label};

/// Escape a string for safe HTML insertion.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report. `share_url` adds a link back to the web view.
pub fn generate_html(report: &ScoreReport, share_url: Option<&str>) -> String {
    let mut html = String::new();
    let name = html_escape(&report.student.name);

    html.push_str("<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{name} 성적표</title>\n"));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header with one score card per section
    html.push_str("<header>\n");
    html.push_str("<span class=\"badge\">Official Student Report</span>\n");
    html.push_str(&format!("<h1>{name} 학생</h1>\n"));
    html.push_str(&format!(
        "<p class=\"meta\">{}</p>\n",
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    html.push_str("<div class=\"cards\">\n");
    for section in report.exam.sections() {
        let score = report.result.score_by_section.get(&section.id).copied().unwrap_or(0.0);
        let max = report
            .result
            .max_score_by_section
            .get(&section.id)
            .copied()
            .unwrap_or(100.0);
        let (from, to) = section.color.gradient();
        html.push_str(&format!(
            "<div class=\"card\" style=\"border-top: 4px solid {from}; background-image: linear-gradient(135deg, {from}22, {to}22)\">\
             <span class=\"card-label\">{} SCORE</span>\
             <div><span class=\"score\">{score}</span> <span class=\"max\">/ {max}</span></div></div>\n",
            html_escape(&section.name),
        ));
    }
    html.push_str("</div>\n");
    if let Some(url) = share_url {
        html.push_str(&format!(
            "<p class=\"share\"><a href=\"{}\">공유 링크</a></p>\n",
            html_escape(url)
        ));
    }
    html.push_str("</header>\n");

    // Category analysis per section
    for section in report.exam.sections() {
        let rows: Vec<&CategoryResult> = report
            .result
            .category_results
            .iter()
            .filter(|c| c.section_id == section.id)
            .collect();
        let score = report.result.score_by_section.get(&section.id).copied().unwrap_or(0.0);

        html.push_str("<section class=\"analysis\">\n");
        html.push_str(&format!(
            "<h2><span class=\"swatch\" style=\"background: {}\"></span>{} Analysis <span class=\"pill\">{score} / 100</span></h2>\n",
            section.color.gradient().0,
            html_escape(&section.name),
        ));
        if rows.is_empty() {
            html.push_str("<p class=\"meta\">No questions.</p>\n");
        } else {
            html.push_str(&generate_bar_chart(&rows));
        }
        html.push_str("</section>\n");
    }

    // Answer sheet
    html.push_str("<section class=\"answers\">\n");
    html.push_str("<h2>Answer Sheet</h2>\n");
    for section in report.exam.sections() {
        html.push_str(&format!("<h3>{}</h3>\n", html_escape(&section.name)));
        html.push_str("<table>\n");
        html.push_str("<thead><tr><th>No.</th><th>Category</th><th>Key</th><th>Answer</th><th>Points</th><th></th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for q in report.exam.questions_in(&section.id) {
            let answer = report.student.answer(&q.id);
            let correct = report
                .result
                .is_correct
                .get(&q.id)
                .copied()
                .unwrap_or_else(|| is_answer_correct(answer, &q.correct_answer));
            let (class, mark) = if correct { ("pass", "O") } else { ("fail", "X") };
            html.push_str(&format!(
                "<tr class=\"{class}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{mark}</td></tr>\n",
                q.number,
                html_escape(&q.category),
                html_escape(&q.correct_answer),
                html_escape(answer),
                q.points,
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(
    report: &ScoreReport,
    share_url: Option<&str>,
    path: &Path,
) -> Result<(), ExportError> {
    let html = generate_html(report, share_url);
    write_file(path, html.as_bytes())?;
    tracing::debug!("wrote HTML report to {}", path.display());
    Ok(())
}

/// Horizontal bars of category percentages on a 0..100 axis.
fn generate_bar_chart(rows: &[&CategoryResult]) -> String {
    let bar_height = 28;
    let max_width = 420.0;
    let padding = 12;
    let label_width = 150;

    let total_height = rows.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg class=\"chart\" width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width as usize + 60,
        total_height
    );

    for (i, row) in rows.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (row.percentage.clamp(0.0, 100.0) / 100.0 * max_width).round();
        let title = match category_description(&row.category) {
            Some(description) => format!(
                "{} ({}/{}): {}",
                row.category, row.correct_count, row.total_questions, description
            ),
            None => format!("{} ({}/{})", row.category, row.correct_count, row.total_questions),
        };

        svg.push_str("  <g>\n");
        svg.push_str(&format!("    <title>{}</title>\n", html_escape(&title)));
        svg.push_str(&format!(
            "    <text x=\"{}\" y=\"{}\" font-size=\"11\" font-weight=\"700\" fill=\"#64748b\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&row.category)
        ));
        svg.push_str(&format!(
            "    <rect x=\"{label_width}\" y=\"{y}\" width=\"{max_width}\" height=\"{bar_height}\" fill=\"#f1f5f9\" rx=\"6\"/>\n",
        ));
        svg.push_str(&format!(
            "    <rect x=\"{label_width}\" y=\"{y}\" width=\"{width}\" height=\"{bar_height}\" fill=\"{}\" rx=\"6\"/>\n",
            bar_color(row.percentage)
        ));
        svg.push_str(&format!(
            "    <text x=\"{}\" y=\"{}\" font-size=\"11\" font-weight=\"700\" fill=\"#64748b\" dominant-baseline=\"middle\">{}</text>\n",
            label_width as f64 + width + 8.0,
            y + bar_height / 2,
            percent_label(row.percentage)
        ));
        svg.push_str("  </g>\n");
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #f8fafc; --fg: #1e293b; --card: #fff; --border: #e2e8f0; --muted: #64748b; --pass: #dcfce7; --fail: #ffe4e6; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #0f172a; --fg: #f1f5f9; --card: #1e293b; --border: #334155; --muted: #94a3b8; --pass: #064e3b; --fail: #881337; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Apple SD Gothic Neo', 'Noto Sans KR', sans-serif; margin: 0 auto; max-width: 72rem; padding: 2rem; background: var(--bg); color: var(--fg); }
header { background: linear-gradient(135deg, #1e293b, #0f172a); color: #fff; border-radius: 2rem; padding: 2rem 2.5rem; }
header h1 { font-size: 2.25rem; margin: 0.75rem 0 0.25rem; }
.badge { display: inline-block; font-size: 0.65rem; font-weight: 700; letter-spacing: 0.1em; text-transform: uppercase; padding: 0.25rem 1rem; border-radius: 999px; background: rgba(99, 102, 241, 0.2); border: 1px solid rgba(99, 102, 241, 0.3); }
.meta { color: var(--muted); }
header .meta { color: #94a3b8; }
.cards { display: flex; flex-wrap: wrap; gap: 1rem; margin-top: 1.5rem; }
.card { min-width: 160px; padding: 1rem 1.5rem; border-radius: 1.5rem; background-color: rgba(255, 255, 255, 0.1); text-align: center; }
.card-label { display: block; font-size: 0.7rem; font-weight: 900; letter-spacing: 0.1em; color: #a5b4fc; }
.score { font-size: 2.25rem; font-weight: 900; }
.max { opacity: 0.4; font-weight: 700; }
.share a { color: #a5b4fc; }
section { background: var(--card); border: 1px solid var(--border); border-radius: 2rem; padding: 2rem; margin-top: 1.5rem; page-break-inside: avoid; }
h2 { display: flex; align-items: center; gap: 0.5rem; margin-top: 0; font-size: 1.25rem; }
.swatch { display: inline-block; width: 0.5rem; height: 1.5rem; border-radius: 999px; }
.pill { margin-left: auto; font-size: 0.85rem; color: var(--muted); border: 1px solid var(--border); border-radius: 999px; padding: 0.25rem 1rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.4rem 0.8rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg.chart { max-width: 100%; }
"#;
