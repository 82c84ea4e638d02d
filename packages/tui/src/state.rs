// ABOUTME: Application state for the dashboard
// ABOUTME: Screen routing, project selection, and the gauge count-up animation

use nape_core::{AnalysisResult, Project, ProjectSnapshot};

use crate::events::AnalysisOutcome;

const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Ticks a gauge takes to reach its target (1.2s at the 100ms tick rate).
const GAUGE_ANIMATION_TICKS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Projects,
    Dashboard,
}

/// Ease-out count-up toward a whole-percentage target.
///
/// Retargeting mid-flight restarts the ease from the currently displayed
/// value; once settled the displayed value is exactly the target.
#[derive(Debug)]
pub struct GaugeAnimation {
    start: f64,
    current: f64,
    target: f64,
    ticks: u32,
}

impl GaugeAnimation {
    pub fn new() -> Self {
        Self {
            start: 0.0,
            current: 0.0,
            target: 0.0,
            ticks: GAUGE_ANIMATION_TICKS,
        }
    }

    /// Points the gauge at `fraction` (0.0..=1.0); the settled display value
    /// is `round(fraction * 100)`.
    pub fn retarget(&mut self, fraction: f64) {
        let target = (fraction * 100.0).round().clamp(0.0, 100.0);
        if target != self.target {
            self.start = self.current;
            self.target = target;
            self.ticks = 0;
        }
    }

    pub fn tick(&mut self) {
        if self.ticks >= GAUGE_ANIMATION_TICKS {
            return;
        }
        self.ticks += 1;
        if self.ticks == GAUGE_ANIMATION_TICKS {
            self.current = self.target;
        } else {
            let t = f64::from(self.ticks) / f64::from(GAUGE_ANIMATION_TICKS);
            let eased = 1.0 - (1.0 - t).powi(3);
            self.current = self.start + (self.target - self.start) * eased;
        }
    }

    pub fn settled(&self) -> bool {
        self.ticks >= GAUGE_ANIMATION_TICKS
    }

    /// Whole percentage currently shown.
    pub fn display(&self) -> u16 {
        self.current.round() as u16
    }
}

impl Default for GaugeAnimation {
    fn default() -> Self {
        Self::new()
    }
}

pub struct AppState {
    pub screen: Screen,
    pub projects: Vec<Project>,
    pub selected: usize,
    pub loading: bool,
    pub spinner_frame: usize,
    pub error: Option<String>,
    pub info: Option<String>,
    pub snapshot: Option<ProjectSnapshot>,
    pub analysis: Option<AnalysisResult>,
    pub raw_gauge: GaugeAnimation,
    pub adjusted_gauge: GaugeAnimation,
    pub show_diagnostics: bool,
    pub task_offset: usize,
    pub using_mock: bool,
}

impl AppState {
    pub fn new(using_mock: bool) -> Self {
        Self {
            screen: Screen::Projects,
            projects: Vec::new(),
            selected: 0,
            loading: false,
            spinner_frame: 0,
            error: None,
            info: None,
            snapshot: None,
            analysis: None,
            raw_gauge: GaugeAnimation::new(),
            adjusted_gauge: GaugeAnimation::new(),
            show_diagnostics: false,
            task_offset: 0,
            using_mock,
        }
    }

    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.selected = 0;
        self.projects = projects;
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.projects.get(self.selected)
    }

    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.projects.len() {
            self.selected += 1;
        }
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
        self.error = None;
        self.info = None;
    }

    pub fn finish_analysis(&mut self, outcome: AnalysisOutcome) {
        self.loading = false;
        self.raw_gauge.retarget(outcome.result.raw_completion_percent);
        self.adjusted_gauge
            .retarget(outcome.result.adjusted_completion_percent);
        self.snapshot = Some(outcome.snapshot);
        self.analysis = Some(outcome.result);
        self.task_offset = 0;
        self.screen = Screen::Dashboard;
    }

    pub fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    /// Advances the spinner and the gauge animations by one tick.
    pub fn tick(&mut self) {
        if self.loading {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
        self.raw_gauge.tick();
        self.adjusted_gauge.tick();
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame]
    }

    pub fn toggle_diagnostics(&mut self) {
        self.show_diagnostics = !self.show_diagnostics;
    }

    pub fn scroll_tasks_up(&mut self) {
        self.task_offset = self.task_offset.saturating_sub(1);
    }

    pub fn scroll_tasks_down(&mut self) {
        let task_count = self.snapshot.as_ref().map_or(0, |s| s.tasks.len());
        if self.task_offset + 1 < task_count {
            self.task_offset += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(gauge: &mut GaugeAnimation) {
        for _ in 0..64 {
            gauge.tick();
        }
    }

    #[test]
    fn gauge_settles_exactly_at_the_rounded_percentage() {
        let mut gauge = GaugeAnimation::new();
        gauge.retarget(0.834);
        settle(&mut gauge);

        assert!(gauge.settled());
        assert_eq!(gauge.display(), 83);

        gauge.retarget(0.835);
        settle(&mut gauge);
        assert_eq!(gauge.display(), 84);
    }

    #[test]
    fn gauge_moves_monotonically_toward_a_higher_target() {
        let mut gauge = GaugeAnimation::new();
        gauge.retarget(0.8);

        let mut last = gauge.display();
        for _ in 0..GAUGE_ANIMATION_TICKS {
            gauge.tick();
            assert!(gauge.display() >= last);
            last = gauge.display();
        }
        assert_eq!(last, 80);
    }

    #[test]
    fn retargeting_midflight_restarts_from_the_current_value() {
        let mut gauge = GaugeAnimation::new();
        gauge.retarget(1.0);
        gauge.tick();
        gauge.tick();
        let midway = gauge.display();
        assert!(midway > 0 && midway < 100);

        gauge.retarget(0.1);
        assert!(!gauge.settled());
        settle(&mut gauge);
        assert_eq!(gauge.display(), 10);
    }

    #[test]
    fn retargeting_the_same_value_does_not_restart() {
        let mut gauge = GaugeAnimation::new();
        gauge.retarget(0.5);
        settle(&mut gauge);
        gauge.retarget(0.5);
        assert!(gauge.settled());
    }

    #[test]
    fn selection_stays_within_bounds() {
        let mut state = AppState::new(true);
        state.set_projects(vec![
            Project {
                id: "a".into(),
                name: "A".into(),
            },
            Project {
                id: "b".into(),
                name: "B".into(),
            },
        ]);

        state.select_previous();
        assert_eq!(state.selected, 0);
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 1);
        assert_eq!(state.selected_project().unwrap().id, "b");
    }

    #[test]
    fn task_scrolling_is_bounded_by_the_snapshot() {
        let mut state = AppState::new(true);
        state.scroll_tasks_down();
        assert_eq!(state.task_offset, 0);
        state.scroll_tasks_up();
        assert_eq!(state.task_offset, 0);
    }
}
