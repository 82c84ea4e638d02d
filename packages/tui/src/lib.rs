// ABOUTME: Terminal dashboard for NAPE
// ABOUTME: Renders analysis results as gauges, charts, lists, and tables

pub mod app;
pub mod events;
pub mod state;
pub mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use nape_ai::AnalysisService;
use nape_pms::SnapshotSource;
use ratatui::{backend::CrosstermBackend, Terminal};

use app::App;

/// Everything the dashboard needs, wired up by the composition root.
pub struct DashboardContext {
    pub source: Arc<dyn SnapshotSource>,
    pub analysis: Arc<AnalysisService>,
    /// Directory export artifacts are written into.
    pub export_dir: PathBuf,
    /// True when the source is the canned data set; shown as a banner.
    pub using_mock: bool,
}

/// Runs the dashboard until the user quits, restoring the terminal on exit.
pub async fn run(ctx: DashboardContext) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(ctx);
    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
