use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::*;
use nape_ai::AnalysisService;
use nape_core::{AnalysisResult, ConfidenceLevel, ProjectStatus};
use nape_export::{analysis_to_csv, analysis_to_pdf};

use crate::commands::build_source;
use crate::config::{AppConfig, ConfigOverrides};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Project ID to analyze
    pub project_id: String,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Print the mapped snapshot as JSON and skip the model call
    #[arg(long)]
    pub snapshot_only: bool,

    /// Propagate PMS failures instead of substituting mock data
    #[arg(long)]
    pub no_fallback: bool,

    /// Write the full analysis result as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Write the CSV report to this path
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Write the PDF report to this path
    #[arg(long, value_name = "PATH")]
    pub pdf: Option<PathBuf>,
}

pub async fn analyze(config: &AppConfig, args: AnalyzeArgs) -> Result<()> {
    let (source, using_mock) = build_source(config, args.no_fallback);
    if using_mock {
        println!(
            "{}",
            "No PMS API key configured — analyzing mock data.".yellow()
        );
    }

    let snapshot = source
        .snapshot(&args.project_id)
        .await
        .context("Failed to fetch project data")?;

    if args.snapshot_only {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let service =
        AnalysisService::new(config.gemini_api_key.clone()).with_model(config.model.clone());
    let result = service
        .analyze(&snapshot)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;

    print_summary(&result);

    if let Some(path) = &args.json {
        std::fs::write(path, serde_json::to_string_pretty(&result)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{} {}", "Wrote".green(), path.display());
    }
    if let Some(path) = &args.csv {
        std::fs::write(path, analysis_to_csv(&result)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{} {}", "Wrote".green(), path.display());
    }
    if let Some(path) = &args.pdf {
        std::fs::write(path, analysis_to_pdf(&result)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{} {}", "Wrote".green(), path.display());
    }

    Ok(())
}

fn colored_status(status: ProjectStatus) -> ColoredString {
    match status {
        ProjectStatus::OnTrack => status.to_string().green().bold(),
        ProjectStatus::AtRisk => status.to_string().yellow().bold(),
        ProjectStatus::OffTrack => status.to_string().red().bold(),
    }
}

fn colored_confidence(level: ConfidenceLevel) -> ColoredString {
    match level {
        ConfidenceLevel::High => level.to_string().green(),
        ConfidenceLevel::Medium => level.to_string().yellow(),
        ConfidenceLevel::Low => level.to_string().red(),
    }
}

fn print_summary(result: &AnalysisResult) {
    println!();
    println!("{}", result.project_name.bold());
    println!("{}", format!("Analysis as of: {}", result.as_of_date).dimmed());
    println!();
    println!(
        "  Status:               {} (confidence: {})",
        colored_status(result.project_status),
        colored_confidence(result.confidence_level)
    );
    println!(
        "  Projected completion: {}",
        result.projected_completion_date
    );
    println!(
        "  Completion:           {:.1}% adjusted (vs. {:.1}% raw)",
        result.adjusted_completion_percent * 100.0,
        result.raw_completion_percent * 100.0
    );
    println!(
        "  Remaining:            {:.1} weeks ({:.0} days)",
        result.estimated_weeks_remaining, result.estimated_days_remaining
    );
    println!();
    println!("{}", "Justification".bold());
    println!("  {}", result.justification);

    if !result.top_risks.is_empty() {
        println!();
        println!("{}", "Top Risks".bold());
        for risk in &result.top_risks {
            println!("  {} {}", "•".red(), risk.risk.as_str().red());
            println!("    {}", risk.details.dimmed());
        }
    }

    if !result.recommendations.is_empty() {
        println!();
        println!("{}", "Recommendations".bold());
        for rec in &result.recommendations {
            println!("  {} {}", "•".blue(), rec.action);
            println!("    {}", rec.details.dimmed());
        }
    }

    let diagnostics = &result.diagnostics;
    if !diagnostics.is_empty() {
        println!();
        println!("{}", "Diagnostics".bold());
        if !diagnostics.missing.is_empty() {
            println!("  Missing: {}", diagnostics.missing.join(", ").dimmed());
        }
        if !diagnostics.assumptions.is_empty() {
            println!(
                "  Assumptions: {}",
                diagnostics.assumptions.join("; ").dimmed()
            );
        }
        if !diagnostics.suggested_data.is_empty() {
            println!(
                "  Suggested data: {}",
                diagnostics.suggested_data.join(", ").dimmed()
            );
        }
    }
    println!();
}
