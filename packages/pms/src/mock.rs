// ABOUTME: Canned projects and snapshots used when the PMS is unreachable
// ABOUTME: Keyed by project id; unknown ids substitute the designated default entry

use chrono::{DateTime, Duration, Utc};
use nape_core::{
    NuanceMetrics, Project, ProjectSnapshot, ProjectSummary, RecentTrends, TaskRecord, TeamMember,
};

/// Entry substituted when a requested id has no mock of its own.
pub const DEFAULT_MOCK_PROJECT_ID: &str = "proj-apollo";

pub fn mock_projects() -> Vec<Project> {
    vec![
        Project {
            id: "proj-apollo".to_string(),
            name: "Project Apollo - Q3 Launch Campaign (Mock)".to_string(),
        },
        Project {
            id: "proj-vulcan".to_string(),
            name: "Project Vulcan - Internal Tools Platform (Mock)".to_string(),
        },
    ]
}

/// Looks up the canned snapshot for `project_id`, falling back to the
/// default entry for ids without one.
pub fn mock_snapshot(project_id: &str, now: DateTime<Utc>) -> ProjectSnapshot {
    match project_id {
        "proj-vulcan" => vulcan(now),
        _ => apollo(now),
    }
}

fn apollo(now: DateTime<Utc>) -> ProjectSnapshot {
    let today = now.date_naive();

    let tasks: Vec<TaskRecord> = (0..50)
        .map(|i| TaskRecord {
            task_id: format!("AP-{}", i + 1),
            status: if i < 45 { "Done" } else { "In Progress" }.to_string(),
            assignee_id: format!("user-0{}", (i % 4) + 1),
            priority: "Medium".to_string(),
            dependencies: if i % 7 == 0 && i > 0 {
                vec![format!("AP-{i}")]
            } else {
                Vec::new()
            },
            is_overdue: false,
            time_logged_hours: None,
            original_estimate_hours: None,
        })
        .collect();

    ProjectSnapshot {
        project: ProjectSummary {
            project_id: "proj-apollo".to_string(),
            project_name: "Project Apollo - Q3 Launch Campaign".to_string(),
            target_due_date: today + Duration::days(60),
            total_story_points: 300,
            completed_story_points: 250,
            last_update_date: today - Duration::days(1),
        },
        tasks,
        team: vec![
            TeamMember {
                user_id: "user-01".to_string(),
                user_name: "Alice".to_string(),
                role_seniority: "Senior Engineer".to_string(),
                current_task_load: 1.0,
                scheduled_pto: None,
                team_join_date: None,
            },
            TeamMember {
                user_id: "user-02".to_string(),
                user_name: "Bob".to_string(),
                role_seniority: "Mid-level Engineer".to_string(),
                current_task_load: 2.0,
                scheduled_pto: None,
                team_join_date: None,
            },
        ],
        nuance_metrics: NuanceMetrics {
            team_historical_velocity: 22,
            team_historical_estimation_accuracy: 0.97,
            task_reopen_rate: 0.03,
            avg_blocker_resolution_time_days: 1.5,
            task_churn_rate: 0.05,
            new_team_member_flag: false,
        },
        recent_trends: RecentTrends {
            velocity_change_pct_last_3_sprints: 0.08,
            completed_points_last_week: 24,
        },
        timestamp: now,
    }
}

fn vulcan(now: DateTime<Utc>) -> ProjectSnapshot {
    let today = now.date_naive();

    let tasks: Vec<TaskRecord> = (0..20)
        .map(|i| TaskRecord {
            task_id: format!("VU-{}", i + 1),
            status: if i < 8 { "Done" } else { "In Progress" }.to_string(),
            assignee_id: format!("user-1{}", (i % 3) + 1),
            priority: if i % 5 == 0 { "High" } else { "Medium" }.to_string(),
            dependencies: Vec::new(),
            is_overdue: i >= 8 && i < 11,
            time_logged_hours: None,
            original_estimate_hours: None,
        })
        .collect();

    ProjectSnapshot {
        project: ProjectSummary {
            project_id: "proj-vulcan".to_string(),
            project_name: "Project Vulcan - Internal Tools Platform".to_string(),
            target_due_date: today + Duration::days(30),
            total_story_points: 120,
            completed_story_points: 46,
            last_update_date: today - Duration::days(3),
        },
        tasks,
        team: vec![
            TeamMember {
                user_id: "user-11".to_string(),
                user_name: "Carol".to_string(),
                role_seniority: "Staff Engineer".to_string(),
                current_task_load: 5.0,
                scheduled_pto: None,
                team_join_date: None,
            },
            TeamMember {
                user_id: "user-12".to_string(),
                user_name: "Dan".to_string(),
                role_seniority: "Mid-level Engineer".to_string(),
                current_task_load: 4.0,
                scheduled_pto: None,
                team_join_date: None,
            },
            TeamMember {
                user_id: "user-13".to_string(),
                user_name: "Erin".to_string(),
                role_seniority: "Junior Engineer".to_string(),
                current_task_load: 3.0,
                scheduled_pto: None,
                team_join_date: Some(today - Duration::days(21)),
            },
        ],
        nuance_metrics: NuanceMetrics {
            team_historical_velocity: 14,
            team_historical_estimation_accuracy: 0.85,
            task_reopen_rate: 0.08,
            avg_blocker_resolution_time_days: 3.0,
            task_churn_rate: 0.15,
            new_team_member_flag: true,
        },
        recent_trends: RecentTrends {
            velocity_change_pct_last_3_sprints: -0.12,
            completed_points_last_week: 9,
        },
        timestamp: now,
    }
}
