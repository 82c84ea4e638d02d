// ABOUTME: Color mapping for analysis verdicts
// ABOUTME: Status and confidence levels map onto green/yellow/red thresholds

use nape_core::{ConfidenceLevel, ProjectStatus};
use ratatui::style::Color;

pub const ACCENT: Color = Color::Blue;

pub fn status_color(status: ProjectStatus) -> Color {
    match status {
        ProjectStatus::OnTrack => Color::Green,
        ProjectStatus::AtRisk => Color::Yellow,
        ProjectStatus::OffTrack => Color::Red,
    }
}

pub fn confidence_color(level: ConfidenceLevel) -> Color {
    match level {
        ConfidenceLevel::High => Color::Green,
        ConfidenceLevel::Medium => Color::Yellow,
        ConfidenceLevel::Low => Color::Red,
    }
}

pub fn task_is_done(status: &str) -> bool {
    status.eq_ignore_ascii_case("done") || status.eq_ignore_ascii_case("closed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdicts_map_to_traffic_light_colors() {
        assert_eq!(status_color(ProjectStatus::OnTrack), Color::Green);
        assert_eq!(status_color(ProjectStatus::AtRisk), Color::Yellow);
        assert_eq!(status_color(ProjectStatus::OffTrack), Color::Red);
        assert_eq!(confidence_color(ConfidenceLevel::Low), Color::Red);
    }

    #[test]
    fn done_detection_ignores_case() {
        assert!(task_is_done("Done"));
        assert!(task_is_done("CLOSED"));
        assert!(!task_is_done("In Progress"));
    }
}
