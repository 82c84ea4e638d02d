pub mod dashboard;
pub mod projects;
pub mod theme;

use crate::state::{AppState, Screen};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Top-level render dispatch plus the shared status bar.
pub fn render(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(frame.area());

    match state.screen {
        Screen::Projects => projects::render(frame, state, chunks[0]),
        Screen::Dashboard => dashboard::render(frame, state, chunks[0]),
    }

    render_status_bar(frame, state, chunks[1]);
}

fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let line = if let Some(error) = &state.error {
        Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else if state.loading {
        Line::from(Span::styled(
            format!("{} Analyzing…", state.spinner()),
            Style::default().fg(theme::ACCENT),
        ))
    } else if let Some(info) = &state.info {
        Line::from(Span::styled(info.clone(), Style::default().fg(Color::Green)))
    } else {
        let help = match state.screen {
            Screen::Projects => "↑/↓ select   Enter analyze   r refresh   Tab dashboard   q quit",
            Screen::Dashboard => {
                "↑/↓ scroll tasks   d diagnostics   c export CSV   p export PDF   Esc back   q quit"
            }
        };
        Line::from(Span::styled(help, Style::default().fg(Color::DarkGray)))
    };

    frame.render_widget(Paragraph::new(line), area);
}
