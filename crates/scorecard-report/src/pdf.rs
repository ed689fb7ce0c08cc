//! PDF report export.
//!
//! The report is laid out top-down on one tall canvas, in millimetres, and
//! then cut into page-height slices: page `k` shows `[k * h, (k + 1) * h)`.
//! Blocks that would straddle a cut are moved to the next page.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect, Rgb};

use scorecard_core::config::PageConfig;
use scorecard_core::report::ScoreReport;

use crate::error::{write_file, ExportError};
use crate::{bar_color, percent_label};

const PT_TO_MM: f32 = 0.3528;

/// An sRGB fill colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill(pub f32, pub f32, pub f32);

impl Fill {
    /// Parse `#rrggbb`. Malformed components read as 0.
    pub fn hex(s: &str) -> Fill {
        let s = s.trim_start_matches('#');
        let channel = |i: usize| {
            s.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .map_or(0.0, |v| f32::from(v) / 255.0)
        };
        Fill(channel(0), channel(2), channel(4))
    }
}

const INK: Fill = Fill(0.118, 0.161, 0.231);
const WHITE: Fill = Fill(1.0, 1.0, 1.0);
const MUTED: Fill = Fill(0.392, 0.455, 0.545);
const TRACK: Fill = Fill(0.945, 0.961, 0.976);

/// A drawing operation. `y` grows downwards from the top of the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Fill,
    },
    /// `y` is the baseline; `size` is in points.
    Text {
        x: f32,
        y: f32,
        size: f32,
        text: String,
        fill: Fill,
    },
}

impl Op {
    /// Topmost canvas coordinate the op touches.
    pub fn top(&self) -> f32 {
        match self {
            Op::Rect { y, .. } => *y,
            Op::Text { y, size, .. } => *y - size * PT_TO_MM,
        }
    }

    fn shifted(&self, dy: f32) -> Op {
        let mut op = self.clone();
        match &mut op {
            Op::Rect { y, .. } | Op::Text { y, .. } => *y -= dy,
        }
        op
    }
}

/// A tall virtual page that content is stacked onto.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: f32,
    page_height: f32,
    margin: f32,
    cursor: f32,
    ops: Vec<Op>,
}

impl Canvas {
    pub fn new(page: &PageConfig) -> Self {
        Self {
            width: page.width_mm,
            page_height: page.height_mm,
            margin: page.margin_mm,
            cursor: page.margin_mm,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Canvas height used so far, including the bottom margin.
    pub fn height(&self) -> f32 {
        self.cursor + self.margin
    }

    fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Reserve `height` millimetres and return the block's top.
    ///
    /// A block that fits on one page never crosses a page cut.
    fn block(&mut self, height: f32) -> f32 {
        let page_bottom =
            ((self.cursor / self.page_height).floor() + 1.0) * self.page_height - self.margin;
        let fits_on_a_page = height <= self.page_height - 2.0 * self.margin;
        if self.cursor + height > page_bottom && fits_on_a_page {
            self.cursor = page_bottom + 2.0 * self.margin;
        }
        let top = self.cursor;
        self.cursor += height;
        top
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Fill) {
        self.ops.push(Op::Rect {
            x,
            y,
            width,
            height,
            fill,
        });
    }

    fn text(&mut self, x: f32, y: f32, size: f32, text: impl Into<String>, fill: Fill) {
        self.ops.push(Op::Text {
            x,
            y,
            size,
            text: text.into(),
            fill,
        });
    }

    /// Split the canvas into pages, translating each op into its page.
    ///
    /// Always returns at least one page.
    pub fn paginate(&self) -> Vec<Vec<Op>> {
        paginate(&self.ops, self.height(), self.page_height)
    }
}

/// Assign each op to the page slice containing its top edge.
pub fn paginate(ops: &[Op], canvas_height: f32, page_height: f32) -> Vec<Vec<Op>> {
    let page_count = ((canvas_height / page_height).ceil() as usize).max(1);
    let mut pages = vec![Vec::new(); page_count];
    for op in ops {
        let k = (op.top().max(0.0) / page_height).floor() as usize;
        if k >= pages.len() {
            pages.resize(k + 1, Vec::new());
        }
        pages[k].push(op.shifted(k as f32 * page_height));
    }
    pages
}

/// Rough rendered width of `text`, for layout only.
fn text_width(text: &str, size: f32) -> f32 {
    let em = size * PT_TO_MM;
    text.chars()
        .map(|c| if c.is_ascii() { 0.55 * em } else { em })
        .sum()
}

fn truncate(text: &str, size: f32, max_width: f32) -> String {
    if text_width(text, size) <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    for c in text.chars() {
        out.push(c);
        if text_width(&out, size) > max_width - size * PT_TO_MM {
            out.pop();
            out.push_str("...");
            break;
        }
    }
    out
}

/// Lay out a report onto a canvas.
pub fn layout(report: &ScoreReport, page: &PageConfig) -> Canvas {
    let mut c = Canvas::new(page);
    let left = c.margin;
    let width = c.content_width();
    let score_of = |id: &str| report.result.score_by_section.get(id).copied().unwrap_or(0.0);

    // Header
    let top = c.block(34.0);
    c.rect(left, top, width, 30.0, INK);
    c.text(left + 6.0, top + 9.0, 7.0, "OFFICIAL STUDENT REPORT", Fill::hex("#a5b4fc"));
    c.text(left + 6.0, top + 19.0, 20.0, format!("{} 학생", report.student.name), WHITE);
    c.text(
        left + 6.0,
        top + 26.0,
        8.0,
        report.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        Fill::hex("#94a3b8"),
    );

    // Score cards
    let (card_w, card_h, gap) = (44.0, 20.0, 4.0);
    let per_row = (((width + gap) / (card_w + gap)).floor() as usize).max(1);
    for row in report.exam.sections().chunks(per_row) {
        let top = c.block(card_h + gap);
        for (i, section) in row.iter().enumerate() {
            let x = left + i as f32 * (card_w + gap);
            c.rect(x, top, card_w, card_h, Fill::hex(section.color.gradient().0));
            let label = truncate(&format!("{} SCORE", section.name), 7.0, card_w - 6.0);
            c.text(x + 3.0, top + 6.0, 7.0, label, WHITE);
            c.text(
                x + 3.0,
                top + 15.0,
                14.0,
                format!("{} / 100", score_of(&section.id)),
                WHITE,
            );
        }
    }

    // Category analysis
    let label_w = 45.0;
    let track_w = (width - label_w - 16.0).max(10.0);
    for section in report.exam.sections() {
        let top = c.block(12.0);
        c.rect(left, top + 2.0, 1.5, 6.0, Fill::hex(section.color.gradient().0));
        c.text(left + 4.0, top + 7.5, 13.0, format!("{} Analysis", section.name), INK);
        c.text(
            left + width - 24.0,
            top + 7.5,
            10.0,
            format!("{} / 100", score_of(&section.id)),
            MUTED,
        );

        let rows = report
            .result
            .category_results
            .iter()
            .filter(|r| r.section_id == section.id);
        for row in rows {
            let top = c.block(8.0);
            c.text(left, top + 5.0, 8.0, truncate(&row.category, 8.0, label_w - 2.0), MUTED);
            c.rect(left + label_w, top + 1.0, track_w, 6.0, TRACK);
            let filled = track_w * (row.percentage.clamp(0.0, 100.0) / 100.0) as f32;
            c.rect(left + label_w, top + 1.0, filled, 6.0, Fill::hex(bar_color(row.percentage)));
            c.text(
                left + label_w + track_w + 2.0,
                top + 5.5,
                8.0,
                percent_label(row.percentage),
                MUTED,
            );
        }
        c.block(4.0);
    }

    // Answer sheet
    let top = c.block(12.0);
    c.text(left, top + 8.0, 13.0, "Answer Sheet", INK);
    let columns = [0.0, 12.0, 70.0, 105.0, 140.0];
    for section in report.exam.sections() {
        let top = c.block(14.0);
        c.text(left, top + 6.0, 10.0, section.name.clone(), INK);
        for (x, heading) in columns.iter().zip(["No.", "Category", "Key", "Answer", ""]) {
            c.text(left + x, top + 12.0, 7.0, heading, MUTED);
        }
        for q in report.exam.questions_in(&section.id) {
            let correct = report.result.is_correct.get(&q.id).copied().unwrap_or(false);
            let (fill, mark) = if correct {
                (Fill::hex("#dcfce7"), "O")
            } else {
                (Fill::hex("#ffe4e6"), "X")
            };
            let top = c.block(6.0);
            c.rect(left, top, width, 5.5, fill);
            let cells = [
                q.number.to_string(),
                truncate(&q.category, 8.0, columns[2] - columns[1] - 2.0),
                truncate(&q.correct_answer, 8.0, columns[3] - columns[2] - 2.0),
                truncate(report.student.answer(&q.id), 8.0, columns[4] - columns[3] - 2.0),
                mark.to_string(),
            ];
            for (x, cell) in columns.iter().zip(cells) {
                c.text(left + x + 1.0, top + 4.0, 8.0, cell, INK);
            }
        }
        c.block(4.0);
    }

    c
}

fn pdf_error(e: printpdf::Error) -> ExportError {
    ExportError::Pdf(e.to_string())
}

fn check_page(page: &PageConfig) -> Result<(), ExportError> {
    let ok = page.width_mm.is_finite()
        && page.height_mm.is_finite()
        && page.margin_mm.is_finite()
        && page.margin_mm >= 0.0
        && page.width_mm > 2.0 * page.margin_mm + 50.0
        && page.height_mm > 2.0 * page.margin_mm + 40.0;
    if ok {
        Ok(())
    } else {
        Err(ExportError::PageSize {
            width_mm: page.width_mm,
            height_mm: page.height_mm,
            margin_mm: page.margin_mm,
        })
    }
}

/// The built-in fonts only cover Latin text.
fn builtin_safe(text: &str) -> String {
    text.chars()
        .map(|c| if (' '..='~').contains(&c) { c } else { '?' })
        .collect()
}

fn draw(layer: &PdfLayerReference, ops: &[Op], page_height: f32, font: &IndirectFontRef, builtin: bool) {
    for op in ops {
        match op {
            Op::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => {
                if *width <= 0.0 || *height <= 0.0 {
                    continue;
                }
                layer.set_fill_color(Color::Rgb(Rgb::new(fill.0, fill.1, fill.2, None)));
                layer.add_rect(Rect::new(
                    Mm(*x),
                    Mm(page_height - y - height),
                    Mm(x + width),
                    Mm(page_height - y),
                ));
            }
            Op::Text {
                x,
                y,
                size,
                text,
                fill,
            } => {
                let text = if builtin { builtin_safe(text) } else { text.clone() };
                layer.set_fill_color(Color::Rgb(Rgb::new(fill.0, fill.1, fill.2, None)));
                layer.use_text(text, *size, Mm(*x), Mm(page_height - y), font);
            }
        }
    }
}

/// Render a report to PDF bytes.
pub fn render_pdf(report: &ScoreReport, page: &PageConfig) -> Result<Vec<u8>, ExportError> {
    check_page(page)?;
    let pages = layout(report, page).paginate();

    let title = format!("{} 성적표", report.student.name);
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(page.width_mm), Mm(page.height_mm), "Layer 1");

    let font = match &page.font_path {
        Some(path) => {
            let file = File::open(path).map_err(|source| ExportError::Font {
                path: path.clone(),
                source,
            })?;
            doc.add_external_font(BufReader::new(file)).map_err(pdf_error)?
        }
        None => doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?,
    };
    let builtin = page.font_path.is_none();

    for (k, ops) in pages.iter().enumerate() {
        let layer = if k == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (p, l) = doc.add_page(Mm(page.width_mm), Mm(page.height_mm), "Layer 1");
            doc.get_page(p).get_layer(l)
        };
        draw(&layer, ops, page.height_mm, &font, builtin);
    }

    tracing::debug!(pages = pages.len(), "rendered PDF report");
    doc.save_to_bytes().map_err(pdf_error)
}

/// Write a PDF report to a file.
pub fn write_pdf_report(
    report: &ScoreReport,
    page: &PageConfig,
    path: &Path,
) -> Result<(), ExportError> {
    let bytes = render_pdf(report, page)?;
    write_file(path, &bytes)?;
    tracing::debug!("wrote PDF report to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorecard_core::model::{Exam, StudentInput};

    fn report() -> ScoreReport {
        let mut student = StudentInput::new("Park");
        student.answers.insert("sec-1-1".into(), "1".into());
        ScoreReport::new(Exam::default(), student)
    }

    fn text(y: f32) -> Op {
        Op::Text {
            x: 10.0,
            y,
            size: 10.0,
            text: "x".into(),
            fill: INK,
        }
    }

    #[test]
    fn paginate_by_page_slices() {
        let rect = Op::Rect {
            x: 0.0,
            y: 600.0,
            width: 5.0,
            height: 5.0,
            fill: INK,
        };
        let pages = paginate(&[text(20.0), text(310.0), rect], 700.0, 297.0);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0], vec![text(20.0)]);
        assert!((pages[1][0].top() - (310.0 - 297.0 - 10.0 * PT_TO_MM)).abs() < 1e-4);
        assert!((pages[2][0].top() - 6.0).abs() < 1e-4);
    }

    #[test]
    fn paginate_always_yields_a_page() {
        assert_eq!(paginate(&[], 0.0, 297.0).len(), 1);
    }

    #[test]
    fn blocks_never_straddle_a_cut() {
        let page = PageConfig::default();
        let canvas = layout(&report(), &page);
        // 50 answer rows do not fit on one A4 page.
        let pages = canvas.paginate();
        assert!(pages.len() >= 2);

        for op in canvas.ops() {
            if let Op::Rect { y, height, .. } = op {
                let start = (y / page.height_mm).floor();
                let end = ((y + height - 0.001) / page.height_mm).floor();
                assert_eq!(start, end, "rect at {y} crosses a page cut");
            }
        }
    }

    #[test]
    fn pdf_bytes() {
        let bytes = render_pdf(&report(), &PageConfig::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn invalid_page_or_font_is_an_error() {
        let tiny = PageConfig {
            width_mm: 30.0,
            ..PageConfig::default()
        };
        assert!(matches!(render_pdf(&report(), &tiny), Err(ExportError::PageSize { .. })));

        let missing_font = PageConfig {
            font_path: Some("/nonexistent/font.ttf".into()),
            ..PageConfig::default()
        };
        assert!(matches!(
            render_pdf(&report(), &missing_font),
            Err(ExportError::Font { .. })
        ));
    }

    #[test]
    fn write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pdf").join("report.pdf");
        write_pdf_report(&report(), &PageConfig::default(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn helpers() {
        assert_eq!(Fill::hex("#ffffff"), WHITE);
        assert_eq!(Fill::hex("#zz"), Fill(0.0, 0.0, 0.0));
        assert_eq!(builtin_safe("김 Kim"), "? Kim");
        assert_eq!(truncate("short", 8.0, 100.0), "short");
        assert!(truncate(&"long ".repeat(40), 8.0, 30.0).ends_with("..."));
    }
}
