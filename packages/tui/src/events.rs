use crossterm::event::{self, Event, KeyEvent};
use nape_core::{AnalysisResult, Project, ProjectSnapshot};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// A completed analysis round-trip: the snapshot that was sent and the
/// verdict that came back.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub snapshot: ProjectSnapshot,
    pub result: AnalysisResult,
}

/// Event types for the dashboard application
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    ProjectsLoaded(Result<Vec<Project>, String>),
    AnalysisReady(Box<AnalysisOutcome>),
    AnalysisFailed(String),
}

/// Event handler bridging terminal input, the animation tick, and results
/// posted back by spawned background work.
pub struct EventHandler {
    sender: mpsc::UnboundedSender<AppEvent>,
    receiver: mpsc::UnboundedReceiver<AppEvent>,
    handler: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate: u64) -> Self {
        let tick_rate = Duration::from_millis(tick_rate);
        let (sender, receiver) = mpsc::unbounded_channel();
        let _sender = sender.clone();

        let handler = tokio::task::spawn_blocking(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or_else(|| Duration::from_secs(0));

                if let Ok(has_event) = event::poll(timeout) {
                    if has_event {
                        if let Ok(Event::Key(key)) = event::read() {
                            if key.kind == event::KeyEventKind::Press
                                && _sender.send(AppEvent::Key(key)).is_err()
                            {
                                return;
                            }
                        }
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if _sender.send(AppEvent::Tick).is_err() {
                        return;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self {
            sender,
            receiver,
            handler,
        }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.receiver.recv().await
    }

    /// Sender handed to spawned tasks so they can post results back.
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.sender.clone()
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
