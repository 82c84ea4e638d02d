// ABOUTME: Sectioned PDF report for an analysis result
// ABOUTME: Title, summary, justification, risk/recommendation tables, diagnostics

use nape_core::AnalysisResult;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::error::ExportError;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 14.0;
const LINE_MM: f32 = 6.0;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;

/// Column split for the two-column tables, measured in characters of
/// 10pt Helvetica that comfortably fit the column.
const LEFT_COL_CHARS: usize = 38;
const RIGHT_COL_CHARS: usize = 52;
const RIGHT_COL_X_MM: f32 = 96.0;

struct ReportWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl ReportWriter {
    fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "report");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT_MM - 20.0,
        })
    }

    fn ensure_space(&mut self, needed_mm: f32) {
        if self.y - needed_mm < MARGIN_MM {
            let (page, layer) =
                self.doc
                    .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "report");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - 20.0;
        }
    }

    fn line(&mut self, text: &str, size: f32, x: f32, bold: bool) {
        self.ensure_space(LINE_MM);
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
        self.y -= LINE_MM;
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn heading(&mut self, text: &str) {
        self.ensure_space(LINE_MM * 2.0);
        self.line(text, HEADING_SIZE, MARGIN_MM, true);
    }

    fn body(&mut self, text: &str) {
        self.line(text, BODY_SIZE, MARGIN_MM + 2.0, false);
    }

    fn wrapped(&mut self, text: &str, width_chars: usize) {
        for line in wrap_text(text, width_chars) {
            self.line(&line, BODY_SIZE, MARGIN_MM + 2.0, false);
        }
    }

    /// A striped two-column table drawn as aligned text rows.
    fn table(&mut self, head: [&str; 2], rows: &[(String, String)]) {
        self.ensure_space(LINE_MM * 2.0);
        self.layer
            .use_text(head[0], BODY_SIZE, Mm(MARGIN_MM + 2.0), Mm(self.y), &self.bold);
        self.layer
            .use_text(head[1], BODY_SIZE, Mm(RIGHT_COL_X_MM), Mm(self.y), &self.bold);
        self.y -= LINE_MM;

        for (left, right) in rows {
            let left_lines = wrap_text(left, LEFT_COL_CHARS);
            let right_lines = wrap_text(right, RIGHT_COL_CHARS);
            let height = left_lines.len().max(right_lines.len()) as f32 * LINE_MM;
            self.ensure_space(height);

            let row_top = self.y;
            for (i, line) in left_lines.iter().enumerate() {
                self.layer.use_text(
                    line.as_str(),
                    BODY_SIZE,
                    Mm(MARGIN_MM + 2.0),
                    Mm(row_top - i as f32 * LINE_MM),
                    &self.regular,
                );
            }
            for (i, line) in right_lines.iter().enumerate() {
                self.layer.use_text(
                    line.as_str(),
                    BODY_SIZE,
                    Mm(RIGHT_COL_X_MM),
                    Mm(row_top - i as f32 * LINE_MM),
                    &self.regular,
                );
            }
            self.y -= height;
        }
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        Ok(self.doc.save_to_bytes()?)
    }
}

/// Greedy word wrap; overlong words are kept on their own line rather than
/// split mid-word.
fn wrap_text(text: &str, width_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= width_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join("; ")
    }
}

/// Renders the analysis as a PDF document with the same sections as the CSV
/// export.
pub fn analysis_to_pdf(result: &AnalysisResult) -> Result<Vec<u8>, ExportError> {
    let title = format!("Project Analysis Report: {}", result.project_name);
    let mut writer = ReportWriter::new(&title)?;

    writer.line(&title, TITLE_SIZE, MARGIN_MM, true);
    writer.line(
        &format!("Analysis as of: {}", result.as_of_date),
        BODY_SIZE,
        MARGIN_MM,
        false,
    );
    writer.gap(6.0);

    writer.heading("Summary");
    writer.body(&format!(
        "- Status: {} (Confidence: {})",
        result.project_status, result.confidence_level
    ));
    writer.body(&format!(
        "- Projected Completion: {}",
        result.projected_completion_date
    ));
    writer.body(&format!(
        "- Completion: {} Adjusted (vs. {} Raw)",
        percent(result.adjusted_completion_percent),
        percent(result.raw_completion_percent)
    ));
    writer.gap(4.0);

    writer.heading("Justification");
    writer.wrapped(&result.justification, 90);
    writer.gap(4.0);

    writer.heading("Top Risks");
    let risk_rows: Vec<(String, String)> = result
        .top_risks
        .iter()
        .map(|r| (r.risk.clone(), r.details.clone()))
        .collect();
    writer.table(["Risk", "Details"], &risk_rows);
    writer.gap(4.0);

    writer.heading("Recommendations");
    let rec_rows: Vec<(String, String)> = result
        .recommendations
        .iter()
        .map(|r| (r.action.clone(), r.details.clone()))
        .collect();
    writer.table(["Action", "Details"], &rec_rows);
    writer.gap(4.0);

    writer.heading("Diagnostics");
    writer.wrapped(
        &format!("Missing Data: {}", join_or_none(&result.diagnostics.missing)),
        90,
    );
    writer.wrapped(
        &format!(
            "Assumptions: {}",
            join_or_none(&result.diagnostics.assumptions)
        ),
        90,
    );
    writer.wrapped(
        &format!(
            "Suggested Data: {}",
            join_or_none(&result.diagnostics.suggested_data)
        ),
        90,
    );

    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nape_core::{ConfidenceLevel, Diagnostics, ProjectStatus, Recommendation, Risk};

    fn sample() -> AnalysisResult {
        AnalysisResult {
            project_id: "42".into(),
            project_name: "Apollo".into(),
            as_of_date: "2024-10-02".into(),
            projected_completion_date: "2024-12-05".into(),
            project_status: ProjectStatus::OnTrack,
            confidence_level: ConfidenceLevel::High,
            raw_completion_percent: 0.83,
            adjusted_completion_percent: 0.8,
            estimated_weeks_remaining: 4.0,
            estimated_days_remaining: 28.0,
            velocity_trend: vec![],
            burndown_trend: None,
            justification: "A long justification. ".repeat(20),
            top_risks: (0..40)
                .map(|i| Risk {
                    risk: format!("Risk {i}"),
                    details: "A fairly wordy description that needs wrapping across lines."
                        .to_string(),
                })
                .collect(),
            recommendations: vec![Recommendation {
                action: "Rebalance".into(),
                details: "Shift load".into(),
            }],
            diagnostics: Diagnostics::default(),
        }
    }

    #[test]
    fn produces_a_pdf_byte_stream() {
        let bytes = analysis_to_pdf(&sample()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn wrap_text_respects_the_width_limit() {
        let lines = wrap_text("one two three four five six", 10);
        assert!(lines.iter().all(|l| l.len() <= 10));
        assert_eq!(lines.join(" "), "one two three four five six");
    }

    #[test]
    fn wrap_text_keeps_overlong_words_whole() {
        let lines = wrap_text("tiny supercalifragilistic word", 8);
        assert!(lines.contains(&"supercalifragilistic".to_string()));
    }
}
