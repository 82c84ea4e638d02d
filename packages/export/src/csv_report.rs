// ABOUTME: Sectioned CSV report for an analysis result
// ABOUTME: Mirrors the dashboard export layout: summary, justification, risks, recommendations, diagnostics

use csv::WriterBuilder;
use nape_core::AnalysisResult;

use crate::error::ExportError;

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Renders the analysis as a sectioned CSV document.
///
/// Fields containing commas, quotes, or newlines are quoted with internal
/// quotes doubled, so the output survives any standard CSV parser.
pub fn analysis_to_csv(result: &AnalysisResult) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    {
        let mut writer = WriterBuilder::new().flexible(true).from_writer(&mut buf);

        writer.write_record(["Project Analysis Report"])?;
        writer.write_record([""])?;
        writer.write_record(["Project Name", &result.project_name])?;
        writer.write_record(["Project ID", &result.project_id])?;
        writer.write_record(["Analysis Date", &result.as_of_date])?;
        writer.write_record([""])?;

        writer.write_record(["--SUMMARY--"])?;
        writer.write_record(["Project Status", &result.project_status.to_string()])?;
        writer.write_record(["Confidence Level", &result.confidence_level.to_string()])?;
        writer.write_record([
            "Projected Completion Date",
            &result.projected_completion_date,
        ])?;
        writer.write_record(["Raw Completion", &percent(result.raw_completion_percent)])?;
        writer.write_record([
            "Adjusted Completion",
            &percent(result.adjusted_completion_percent),
        ])?;
        writer.write_record([""])?;

        writer.write_record(["--JUSTIFICATION--"])?;
        writer.write_record([result.justification.as_str()])?;
        writer.write_record([""])?;

        writer.write_record(["--TOP RISKS--"])?;
        writer.write_record(["Risk", "Details"])?;
        for risk in &result.top_risks {
            writer.write_record([risk.risk.as_str(), risk.details.as_str()])?;
        }
        writer.write_record([""])?;

        writer.write_record(["--RECOMMENDATIONS--"])?;
        writer.write_record(["Action", "Details"])?;
        for rec in &result.recommendations {
            writer.write_record([rec.action.as_str(), rec.details.as_str()])?;
        }
        writer.write_record([""])?;

        writer.write_record(["--DIAGNOSTICS--"])?;
        writer.write_record(["Missing Data", &result.diagnostics.missing.join("; ")])?;
        writer.write_record([
            "Assumptions Made",
            &result.diagnostics.assumptions.join("; "),
        ])?;
        writer.write_record([
            "Suggested Data to Collect",
            &result.diagnostics.suggested_data.join("; "),
        ])?;

        writer.flush()?;
    }

    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nape_core::{ConfidenceLevel, Diagnostics, ProjectStatus, Recommendation, Risk};
    use pretty_assertions::assert_eq;

    fn result_with_awkward_fields() -> AnalysisResult {
        AnalysisResult {
            project_id: "42".into(),
            project_name: "Apollo, \"Q3\" Launch".into(),
            as_of_date: "2024-10-02".into(),
            projected_completion_date: "2024-12-05".into(),
            project_status: ProjectStatus::AtRisk,
            confidence_level: ConfidenceLevel::Medium,
            raw_completion_percent: 0.833,
            adjusted_completion_percent: 0.781,
            estimated_weeks_remaining: 4.5,
            estimated_days_remaining: 32.0,
            velocity_trend: vec![],
            burndown_trend: None,
            justification: "Line one.\nLine two, with a comma.".into(),
            top_risks: vec![Risk {
                risk: "Blocker on \"critical\" path".into(),
                details: "AP-7 blocks AP-8, AP-9".into(),
            }],
            recommendations: vec![Recommendation {
                action: "Rebalance".into(),
                details: "Shift load".into(),
            }],
            diagnostics: Diagnostics {
                missing: vec!["team[].scheduled_pto".into()],
                assumptions: vec!["1h equals 1 point".into()],
                suggested_data: vec![],
            },
        }
    }

    #[test]
    fn awkward_fields_round_trip_through_a_standard_parser() {
        let csv_text = analysis_to_csv(&result_with_awkward_fields()).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_reader(csv_text.as_bytes());
        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();

        let name_row = records
            .iter()
            .find(|r| r.get(0) == Some("Project Name"))
            .unwrap();
        assert_eq!(name_row.get(1), Some("Apollo, \"Q3\" Launch"));

        let justification_row = records
            .iter()
            .find(|r| r.get(0).is_some_and(|f| f.starts_with("Line one.")))
            .unwrap();
        assert_eq!(
            justification_row.get(0),
            Some("Line one.\nLine two, with a comma.")
        );

        let risk_row = records
            .iter()
            .find(|r| r.get(0) == Some("Blocker on \"critical\" path"))
            .unwrap();
        assert_eq!(risk_row.get(1), Some("AP-7 blocks AP-8, AP-9"));
    }

    #[test]
    fn quotes_are_doubled_in_the_raw_output() {
        let csv_text = analysis_to_csv(&result_with_awkward_fields()).unwrap();
        assert!(csv_text.contains(r#""Apollo, ""Q3"" Launch""#));
    }

    #[test]
    fn summary_section_formats_percentages() {
        let csv_text = analysis_to_csv(&result_with_awkward_fields()).unwrap();
        assert!(csv_text.contains("Raw Completion,83.3%"));
        assert!(csv_text.contains("Adjusted Completion,78.1%"));
    }
}
