use crate::events::{AnalysisOutcome, AppEvent, EventHandler};
use crate::state::{AppState, Screen};
use crate::ui;
use crate::DashboardContext;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use nape_export::{analysis_to_csv, analysis_to_pdf, export_file_stem};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::UnboundedSender;

/// Main TUI application struct
pub struct App {
    pub state: AppState,
    ctx: DashboardContext,
    should_quit: bool,
}

impl App {
    pub fn new(ctx: DashboardContext) -> Self {
        Self {
            state: AppState::new(ctx.using_mock),
            ctx,
            should_quit: false,
        }
    }

    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<()> {
        let mut event_handler = EventHandler::new(100); // 100ms tick rate

        self.load_projects(event_handler.sender());

        while !self.should_quit {
            terminal.draw(|frame| {
                ui::render(frame, &self.state);
            })?;

            if let Some(event) = event_handler.next().await {
                match event {
                    AppEvent::Key(key_event) => {
                        if key_event.kind == KeyEventKind::Press {
                            self.handle_key_event(key_event, event_handler.sender());
                        }
                    }
                    AppEvent::Tick => {
                        self.state.tick();
                    }
                    AppEvent::ProjectsLoaded(Ok(projects)) => {
                        self.state.loading = false;
                        self.state.set_projects(projects);
                    }
                    AppEvent::ProjectsLoaded(Err(message)) => {
                        self.state.fail(message);
                    }
                    AppEvent::AnalysisReady(outcome) => {
                        self.state.finish_analysis(*outcome);
                    }
                    AppEvent::AnalysisFailed(message) => {
                        self.state.fail(message);
                    }
                }
            }
        }

        Ok(())
    }

    fn load_projects(&mut self, sender: UnboundedSender<AppEvent>) {
        self.state.begin_loading();
        let source = self.ctx.source.clone();
        tokio::spawn(async move {
            let loaded = source
                .projects()
                .await
                .map_err(|e| format!("Failed to fetch project list: {e}"));
            let _ = sender.send(AppEvent::ProjectsLoaded(loaded));
        });
    }

    fn start_analysis(&mut self, sender: UnboundedSender<AppEvent>) {
        if self.state.loading {
            return;
        }
        let Some(project) = self.state.selected_project() else {
            self.state.error = Some("Please select a project to analyze.".to_string());
            return;
        };
        let project_id = project.id.clone();
        self.state.begin_loading();

        let source = self.ctx.source.clone();
        let analysis = self.ctx.analysis.clone();
        tokio::spawn(async move {
            let snapshot = match source.snapshot(&project_id).await {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    let _ = sender.send(AppEvent::AnalysisFailed(format!(
                        "Failed to fetch project data: {err}"
                    )));
                    return;
                }
            };

            match analysis.analyze(&snapshot).await {
                Ok(result) => {
                    let _ = sender.send(AppEvent::AnalysisReady(Box::new(AnalysisOutcome {
                        snapshot,
                        result,
                    })));
                }
                Err(err) => {
                    let _ = sender.send(AppEvent::AnalysisFailed(err.user_message()));
                }
            }
        });
    }

    fn handle_key_event(&mut self, key: KeyEvent, sender: UnboundedSender<AppEvent>) {
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Esc => match self.state.screen {
                Screen::Dashboard => self.state.screen = Screen::Projects,
                Screen::Projects => self.quit(),
            },
            KeyCode::Tab => {
                self.state.screen = match self.state.screen {
                    Screen::Projects if self.state.analysis.is_some() => Screen::Dashboard,
                    Screen::Projects => Screen::Projects,
                    Screen::Dashboard => Screen::Projects,
                };
            }
            KeyCode::Up => match self.state.screen {
                Screen::Projects => self.state.select_previous(),
                Screen::Dashboard => self.state.scroll_tasks_up(),
            },
            KeyCode::Down => match self.state.screen {
                Screen::Projects => self.state.select_next(),
                Screen::Dashboard => self.state.scroll_tasks_down(),
            },
            KeyCode::Enter => {
                if self.state.screen == Screen::Projects {
                    self.start_analysis(sender);
                }
            }
            KeyCode::Char('r') => {
                if self.state.screen == Screen::Projects {
                    self.load_projects(sender);
                }
            }
            KeyCode::Char('d') => {
                if self.state.screen == Screen::Dashboard {
                    self.state.toggle_diagnostics();
                }
            }
            KeyCode::Char('c') => self.export_csv(),
            KeyCode::Char('p') => self.export_pdf(),
            _ => {}
        }
    }

    fn export_csv(&mut self) {
        let Some(analysis) = &self.state.analysis else {
            return;
        };
        let path = self
            .ctx
            .export_dir
            .join(format!("{}.csv", export_file_stem(&analysis.project_name)));
        let outcome = analysis_to_csv(analysis)
            .map_err(anyhow::Error::from)
            .and_then(|text| std::fs::write(&path, text).map_err(anyhow::Error::from));
        match outcome {
            Ok(()) => self.state.info = Some(format!("Exported {}", path.display())),
            Err(err) => self.state.error = Some(format!("CSV export failed: {err}")),
        }
    }

    fn export_pdf(&mut self) {
        let Some(analysis) = &self.state.analysis else {
            return;
        };
        let path = self
            .ctx
            .export_dir
            .join(format!("{}.pdf", export_file_stem(&analysis.project_name)));
        let outcome = analysis_to_pdf(analysis)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| std::fs::write(&path, bytes).map_err(anyhow::Error::from));
        match outcome {
            Ok(()) => self.state.info = Some(format!("Exported {}", path.display())),
            Err(err) => self.state.error = Some(format!("PDF export failed: {err}")),
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
