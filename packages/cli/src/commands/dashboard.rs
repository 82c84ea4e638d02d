use std::sync::Arc;

use anyhow::Result;
use nape_ai::AnalysisService;
use nape_tui::DashboardContext;

use crate::commands::build_source;
use crate::config::AppConfig;

pub async fn dashboard(config: &AppConfig, no_fallback: bool) -> Result<()> {
    let (source, using_mock) = build_source(config, no_fallback);
    let analysis = Arc::new(
        AnalysisService::new(config.gemini_api_key.clone()).with_model(config.model.clone()),
    );

    nape_tui::run(DashboardContext {
        source,
        analysis,
        export_dir: std::env::current_dir()?,
        using_mock,
    })
    .await
}
