use crate::state::AppState;
use crate::ui::theme;
use nape_core::{AnalysisResult, ProjectSnapshot};
use ratatui::prelude::*;
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Block, Cell, Chart, Dataset, Gauge, GraphType, List, ListItem, Paragraph, Row, Table,
    Wrap,
};

/// Render the dashboard screen for the current analysis
pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let Some(analysis) = &state.analysis else {
        frame.render_widget(
            Paragraph::new("Select a project and press Enter to generate predictive insights.")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::bordered().title("Dashboard")),
            area,
        );
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(4),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Min(4),
    ])
    .split(area);

    render_header(frame, state, analysis, chunks[0]);
    render_metric_cards(frame, analysis, chunks[1]);
    render_gauges_and_justification(frame, state, analysis, chunks[2]);
    render_charts(frame, analysis, chunks[3]);
    render_lists(frame, analysis, chunks[4]);
    if state.show_diagnostics {
        render_diagnostics(frame, analysis, chunks[5]);
    } else {
        render_tasks(frame, state.snapshot.as_ref(), state.task_offset, chunks[5]);
    }
}

fn render_header(frame: &mut Frame, state: &AppState, analysis: &AnalysisResult, area: Rect) {
    let mut title = vec![Span::styled(
        analysis.project_name.clone(),
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
            format!("Analysis as of: {}", analysis.as_of_date),
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    frame.render_widget(header, area);
}

fn metric_card<'a>(title: &'a str, value: Line<'a>) -> Paragraph<'a> {
    Paragraph::new(value)
        .alignment(Alignment::Center)
        .block(Block::bordered().title(title))
}

fn render_metric_cards(frame: &mut Frame, analysis: &AnalysisResult, area: Rect) {
    let cards = Layout::horizontal([
        Constraint::Ratio(1, 4),
        Constraint::Ratio(1, 4),
        Constraint::Ratio(1, 4),
        Constraint::Ratio(1, 4),
    ])
    .split(area);

    let status = Line::from(Span::styled(
        analysis.project_status.to_string(),
        Style::default()
            .fg(theme::status_color(analysis.project_status))
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(metric_card("Project Status", status), cards[0]);

    let completion = Line::from(Span::styled(
        analysis.projected_completion_date.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(metric_card("Projected Completion", completion), cards[1]);

    let confidence = Line::from(Span::styled(
        analysis.confidence_level.to_string(),
        Style::default()
            .fg(theme::confidence_color(analysis.confidence_level))
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(metric_card("Confidence Level", confidence), cards[2]);

    let days = Line::from(Span::styled(
        format!("{:.0}", analysis.estimated_days_remaining),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(metric_card("Days Remaining", days), cards[3]);
}

fn render_gauges_and_justification(
    frame: &mut Frame,
    state: &AppState,
    analysis: &AnalysisResult,
    area: Rect,
) {
    let halves =
        Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)]).split(area);
    let gauges =
        Layout::vertical([Constraint::Length(4), Constraint::Length(4)]).split(halves[0]);

    let raw = state.raw_gauge.display();
    frame.render_widget(
        Gauge::default()
            .block(Block::bordered().title("Raw Completion"))
            .gauge_style(Style::default().fg(theme::ACCENT))
            .percent(raw)
            .label(format!("{raw}%")),
        gauges[0],
    );

    let adjusted = state.adjusted_gauge.display();
    frame.render_widget(
        Gauge::default()
            .block(Block::bordered().title("Adjusted Completion"))
            .gauge_style(Style::default().fg(theme::ACCENT))
            .percent(adjusted)
            .label(format!("{adjusted}%")),
        gauges[1],
    );

    frame.render_widget(
        Paragraph::new(analysis.justification.clone())
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title("Analysis Justification")),
        halves[1],
    );
}

fn render_charts(frame: &mut Frame, analysis: &AnalysisResult, area: Rect) {
    let halves =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);
    render_burndown(frame, analysis, halves[0]);
    render_velocity(frame, analysis, halves[1]);
}

fn render_burndown(frame: &mut Frame, analysis: &AnalysisResult, area: Rect) {
    let block = Block::bordered().title("Project Burndown (story points)");
    let Some(points) = analysis
        .burndown_trend
        .as_ref()
        .filter(|points| !points.is_empty())
    else {
        frame.render_widget(
            Paragraph::new("No burndown data in this analysis.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    };

    let ideal: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.ideal_remaining))
        .collect();
    let actual: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.actual_remaining))
        .collect();

    let max_y = points
        .iter()
        .map(|p| p.ideal_remaining.max(p.actual_remaining))
        .fold(0.0_f64, f64::max)
        .max(10.0)
        * 1.1;
    let max_x = (points.len().saturating_sub(1)).max(1) as f64;

    let datasets = vec![
        Dataset::default()
            .name("Ideal")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&ideal),
        Dataset::default()
            .name("Actual")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::ACCENT))
            .data(&actual),
    ];

    let first = points.first().map(|p| p.sprint.clone()).unwrap_or_default();
    let last = points.last().map(|p| p.sprint.clone()).unwrap_or_default();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, max_x])
                .labels(vec![Span::from(first), Span::from(last)]),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, max_y])
                .labels(vec![Span::from("0"), Span::from(format!("{max_y:.0}"))]),
        );
    frame.render_widget(chart, area);
}

fn render_velocity(frame: &mut Frame, analysis: &AnalysisResult, area: Rect) {
    let block = Block::bordered().title(format!(
        "Velocity Trend (last {} sprints)",
        analysis.velocity_trend.len()
    ));
    if analysis.velocity_trend.is_empty() {
        frame.render_widget(
            Paragraph::new("No velocity data in this analysis.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let data: Vec<(f64, f64)> = analysis
        .velocity_trend
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.points))
        .collect();

    let max_y = data
        .iter()
        .map(|(_, y)| *y)
        .fold(0.0_f64, f64::max)
        .max(10.0)
        * 1.2;
    let max_x = (data.len().saturating_sub(1)).max(1) as f64;

    let datasets = vec![Dataset::default()
        .name("Points")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme::ACCENT))
        .data(&data)];

    let first = analysis
        .velocity_trend
        .first()
        .map(|p| p.sprint.clone())
        .unwrap_or_default();
    let last = analysis
        .velocity_trend
        .last()
        .map(|p| p.sprint.clone())
        .unwrap_or_default();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, max_x])
                .labels(vec![Span::from(first), Span::from(last)]),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, max_y])
                .labels(vec![Span::from("0"), Span::from(format!("{max_y:.0}"))]),
        );
    frame.render_widget(chart, area);
}

fn render_lists(frame: &mut Frame, analysis: &AnalysisResult, area: Rect) {
    let halves =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);

    let risks: Vec<ListItem> = analysis
        .top_risks
        .iter()
        .map(|r| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    r.risk.clone(),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("  {}", r.details),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();
    frame.render_widget(
        List::new(risks).block(Block::bordered().title("Top Risks")),
        halves[0],
    );

    let recommendations: Vec<ListItem> = analysis
        .recommendations
        .iter()
        .map(|r| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    r.action.clone(),
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("  {}", r.details),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();
    frame.render_widget(
        List::new(recommendations).block(Block::bordered().title("Recommendations")),
        halves[1],
    );
}

fn render_tasks(frame: &mut Frame, snapshot: Option<&ProjectSnapshot>, offset: usize, area: Rect) {
    let Some(snapshot) = snapshot.filter(|s| !s.tasks.is_empty()) else {
        frame.render_widget(
            Paragraph::new("No task data in this snapshot.")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::bordered().title("Task Overview")),
            area,
        );
        return;
    };

    let offset = offset.min(snapshot.tasks.len() - 1);
    let rows: Vec<Row> = snapshot.tasks[offset..]
        .iter()
        .map(|task| {
            let status_style = if theme::task_is_done(&task.status) {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(theme::ACCENT)
            };
            let deps = if task.dependencies.is_empty() {
                "-".to_string()
            } else {
                task.dependencies.len().to_string()
            };
            Row::new(vec![
                Cell::from(task.task_id.clone()),
                Cell::from(task.status.clone()).style(status_style),
                Cell::from(task.priority.clone()),
                Cell::from(task.assignee_id.clone()),
                Cell::from(deps),
            ])
        })
        .collect();

    let overdue = snapshot.overdue_count();
    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(6),
        ],
    )
    .header(
        Row::new(vec!["ID", "Status", "Priority", "Assignee", "Deps"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::bordered().title(format!(
        "Task Overview ({} tasks, {overdue} overdue)",
        snapshot.tasks.len()
    )));
    frame.render_widget(table, area);
}

fn render_diagnostics(frame: &mut Frame, analysis: &AnalysisResult, area: Rect) {
    let diagnostics = &analysis.diagnostics;
    let mut lines = Vec::new();

    let section = |lines: &mut Vec<Line>, title: &'static str, items: &[String]| {
        lines.push(Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        if items.is_empty() {
            lines.push(Line::from(Span::styled(
                "  None",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            for item in items {
                lines.push(Line::from(format!("  • {item}")));
            }
        }
    };

    section(&mut lines, "Missing Data Fields:", &diagnostics.missing);
    section(&mut lines, "Assumptions Made:", &diagnostics.assumptions);
    section(
        &mut lines,
        "Suggested Data to Collect:",
        &diagnostics.suggested_data,
    );

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::bordered().title("Diagnostics (d to hide)")),
        area,
    );
}
