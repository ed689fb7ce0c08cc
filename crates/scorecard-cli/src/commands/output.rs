//! Summary tables and report files shared by `score` and `open`.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};

use scorecard_core::config::PageConfig;
use scorecard_core::report::ScoreReport;
use scorecard_report::html::write_html_report;
use scorecard_report::pdf::write_pdf_report;

pub fn print_summary(report: &ScoreReport) {
    let name = if report.student.name.is_empty() {
        "(unnamed)"
    } else {
        report.student.name.as_str()
    };
    println!("Student: {name}");

    let mut table = Table::new();
    table.set_header(vec!["Section", "Baseline", "Raw", "Correct", "Answered", "Score"]);
    for s in &report.sections {
        table.add_row(vec![
            Cell::new(&s.name),
            Cell::new(format!("{:.0}", s.baseline)),
            Cell::new(format!("{}/{}", s.raw_earned, s.raw_max)),
            Cell::new(format!("{}/{}", s.correct, s.total)),
            Cell::new(s.answered),
            Cell::new(format!("{:.1} / {:.0}", s.scaled, s.max_score)),
        ]);
    }
    println!("{table}");

    if report.result.category_results.is_empty() {
        return;
    }
    let mut categories = Table::new();
    categories.set_header(vec!["Section", "Category", "Correct", "%"]);
    for c in &report.result.category_results {
        categories.add_row(vec![
            Cell::new(&c.section_name),
            Cell::new(&c.category),
            Cell::new(format!("{}/{}", c.correct_count, c.total_questions)),
            Cell::new(scorecard_report::percent_label(c.percentage)),
        ]);
    }
    println!("{categories}");
}

/// Write `report` in each requested format.
pub fn write_reports(
    report: &ScoreReport,
    format: &str,
    output: &Path,
    page: &PageConfig,
    share_url: Option<&str>,
) -> Result<()> {
    std::fs::create_dir_all(output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let stem = format!("{}-{timestamp}", report.file_stem());

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html", "pdf"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("{stem}.json"));
                report.save_json(&path)?;
                eprintln!("JSON report: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("{stem}.html"));
                write_html_report(report, share_url, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            "pdf" => {
                let path = output.join(format!("{stem}.pdf"));
                write_pdf_report(report, page, &path)?;
                eprintln!("PDF report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}
