use anyhow::{Context, Result};
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use crate::commands::build_source;
use crate::config::AppConfig;

pub async fn list_projects(config: &AppConfig, no_fallback: bool) -> Result<()> {
    let (source, using_mock) = build_source(config, no_fallback);

    let projects = source
        .projects()
        .await
        .context("Failed to fetch project list")?;

    if using_mock {
        println!(
            "{}",
            "No PMS API key configured — showing mock projects.".yellow()
        );
        println!();
    }

    if projects.is_empty() {
        println!("{}", "No projects found".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Name"]);
    for project in &projects {
        table.add_row(vec![project.id.as_str(), project.name.as_str()]);
    }
    println!("{table}");

    Ok(())
}
