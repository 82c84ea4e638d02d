use crate::state::AppState;
use crate::ui::theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Render the project selection screen
pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let chunks =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).split(area);

    let mut title = vec![Span::styled(
        "NAPE — Nuance-Adjusted Predictive Engine",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if state.using_mock {
        title.push(Span::styled(
            "  [mock data]",
            Style::default().fg(Color::Yellow),
        ));
    }
    let header = Paragraph::new(vec![
        Line::from(title),
        Line::from(Span::styled(
            "Recursive Reasoning for Predictive Project Analytics",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    if state.projects.is_empty() {
        let placeholder = if state.loading {
            "Loading projects…"
        } else {
            "No projects found. Press r to refresh."
        };
        frame.render_widget(
            Paragraph::new(placeholder)
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::bordered().title("Projects")),
            chunks[1],
        );
        return;
    }

    let items: Vec<ListItem> = state
        .projects
        .iter()
        .map(|p| {
            ListItem::new(Line::from(vec![
                Span::styled(p.name.clone(), Style::default()),
                Span::styled(
                    format!("  ({})", p.id),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::bordered().title("Projects"))
        .highlight_style(
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("❯ ");

    let mut list_state = ListState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(list, chunks[1], &mut list_state);
}
