// ABOUTME: Export artifacts for NAPE analysis results
// ABOUTME: Sectioned CSV and PDF reports assembled directly from the result fields

pub mod csv_report;
pub mod error;
pub mod pdf_report;

pub use csv_report::analysis_to_csv;
pub use error::ExportError;
pub use pdf_report::analysis_to_pdf;

/// File stem for export artifacts: `NAPE_Analysis_<name>` with whitespace
/// runs collapsed to underscores.
pub fn export_file_stem(project_name: &str) -> String {
    let cleaned = project_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("NAPE_Analysis_{cleaned}")
}
