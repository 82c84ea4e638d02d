// ABOUTME: Project snapshot type definitions
// ABOUTME: The normalized project/task/team/metrics bundle sent to the model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A selectable project as returned by the upstream list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// Scope and progress fields of the project under analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project_id: String,
    pub project_name: String,
    pub target_due_date: NaiveDate,
    pub total_story_points: u32,
    pub completed_story_points: u32,
    pub last_update_date: NaiveDate,
}

/// One task mapped from an upstream issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: String,
    pub status: String,
    pub assignee_id: String,
    pub priority: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub is_overdue: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_logged_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_estimate_hours: Option<f64>,
}

/// A team member derived from issue assignees and project memberships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub user_id: String,
    pub user_name: String,
    pub role_seniority: String,
    /// Open workload in story points across not-yet-complete tasks.
    pub current_task_load: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_pto: Option<Vec<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_join_date: Option<NaiveDate>,
}

/// Heuristic adjustments layered onto raw completion percentage.
///
/// The upstream tracker does not provide these; they are synthesized from the
/// issue data or filled with placeholder constants. A snapshot always carries
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuanceMetrics {
    pub team_historical_velocity: u32,
    pub team_historical_estimation_accuracy: f64,
    pub task_reopen_rate: f64,
    pub avg_blocker_resolution_time_days: f64,
    pub task_churn_rate: f64,
    pub new_team_member_flag: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentTrends {
    pub velocity_change_pct_last_3_sprints: f64,
    pub completed_points_last_week: u32,
}

/// The full bundle handed to the analysis prompt.
///
/// Built fresh per analysis request and discarded after use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub project: ProjectSummary,
    pub tasks: Vec<TaskRecord>,
    pub team: Vec<TeamMember>,
    pub nuance_metrics: NuanceMetrics,
    pub recent_trends: RecentTrends,
    pub timestamp: DateTime<Utc>,
}

impl ProjectSnapshot {
    /// Number of tasks currently flagged overdue.
    pub fn overdue_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_overdue).count()
    }
}
