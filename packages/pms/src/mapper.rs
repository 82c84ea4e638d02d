// ABOUTME: Transformation from upstream issue-tracker payloads to the snapshot schema
// ABOUTME: Pure functions over already-fetched wire data; no network access here

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use nape_core::{NuanceMetrics, ProjectSnapshot, ProjectSummary, RecentTrends, TaskRecord, TeamMember};

use crate::wire::{RemoteIssue, RemoteMembership, RemoteProject};

/// Hour-equivalent assumed for issues without an estimate.
const DEFAULT_POINTS: f64 = 1.0;
/// Seniority placeholder for assignees without a membership role.
const DEFAULT_ROLE: &str = "Developer";
/// Days added to "today" when the project has no due date.
const FALLBACK_DUE_DAYS: i64 = 30;

const ASSUMED_REOPEN_RATE: f64 = 0.05;
const ASSUMED_BLOCKER_RESOLUTION_DAYS: f64 = 2.0;
const ASSUMED_CHURN_RATE: f64 = 0.1;
/// Estimation accuracy flips to this pessimistic constant once more than two
/// tasks are overdue.
const PESSIMISTIC_ACCURACY: f64 = 0.8;
const OPTIMISTIC_ACCURACY: f64 = 1.05;
const OVERDUE_ACCURACY_THRESHOLD: usize = 2;

fn issue_is_done(issue: &RemoteIssue) -> bool {
    issue.status.name.eq_ignore_ascii_case("closed") || issue.done_ratio == Some(100)
}

/// Builds the canonical snapshot from the three joined upstream payloads.
///
/// The nuance metrics and recent trends are synthesized: the upstream tracker
/// does not measure them, so plausible values are derived from the issue
/// state (and admitted as assumptions downstream).
pub fn map_snapshot(
    project: RemoteProject,
    issues: Vec<RemoteIssue>,
    memberships: Vec<RemoteMembership>,
    now: DateTime<Utc>,
) -> ProjectSnapshot {
    let today = now.date_naive();

    let roles: HashMap<u64, String> = memberships
        .into_iter()
        .filter_map(|m| {
            let user = m.user?;
            let role = m.roles.into_iter().next()?;
            Some((user.id, role.name))
        })
        .collect();

    let mut total_points = 0.0;
    let mut completed_points = 0.0;
    let mut team: Vec<TeamMember> = Vec::new();
    let mut roster: HashMap<u64, usize> = HashMap::new();

    let tasks: Vec<TaskRecord> = issues
        .iter()
        .map(|issue| {
            let points = issue.estimated_hours.unwrap_or(DEFAULT_POINTS);
            let done = issue_is_done(issue);

            total_points += points;
            if done {
                completed_points += points;
            }

            if let Some(assignee) = &issue.assigned_to {
                let slot = *roster.entry(assignee.id).or_insert_with(|| {
                    team.push(TeamMember {
                        user_id: assignee.id.to_string(),
                        user_name: assignee.name.clone(),
                        role_seniority: roles
                            .get(&assignee.id)
                            .cloned()
                            .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
                        current_task_load: 0.0,
                        scheduled_pto: None,
                        team_join_date: None,
                    });
                    team.len() - 1
                });
                if !done {
                    team[slot].current_task_load += points;
                }
            }

            TaskRecord {
                task_id: issue.id.to_string(),
                status: issue.status.name.clone(),
                assignee_id: issue
                    .assigned_to
                    .as_ref()
                    .map(|a| a.id.to_string())
                    .unwrap_or_else(|| "unassigned".to_string()),
                priority: issue.priority.name.clone(),
                // The list endpoint does not include issue relations.
                dependencies: Vec::new(),
                is_overdue: issue.due_date.is_some_and(|due| due < today) && !done,
                time_logged_hours: Some(issue.spent_hours.unwrap_or(0.0)),
                original_estimate_hours: Some(issue.estimated_hours.unwrap_or(0.0)),
            }
        })
        .collect();

    let overdue_count = tasks.iter().filter(|t| t.is_overdue).count();
    let accuracy = if overdue_count > OVERDUE_ACCURACY_THRESHOLD {
        PESSIMISTIC_ACCURACY
    } else {
        OPTIMISTIC_ACCURACY
    };

    ProjectSnapshot {
        project: ProjectSummary {
            project_id: project.id.to_string(),
            project_name: project.name,
            target_due_date: project
                .due_date
                .unwrap_or_else(|| today + Duration::days(FALLBACK_DUE_DAYS)),
            total_story_points: total_points.round() as u32,
            completed_story_points: completed_points.round() as u32,
            last_update_date: project.updated_on.map(|d| d.date_naive()).unwrap_or(today),
        },
        tasks,
        team,
        nuance_metrics: NuanceMetrics {
            // Rough estimate: everything completed, spread over four weeks.
            team_historical_velocity: ((completed_points / 4.0).round() as u32).max(10),
            team_historical_estimation_accuracy: accuracy,
            task_reopen_rate: ASSUMED_REOPEN_RATE,
            avg_blocker_resolution_time_days: ASSUMED_BLOCKER_RESOLUTION_DAYS,
            task_churn_rate: ASSUMED_CHURN_RATE,
            new_team_member_flag: false,
        },
        recent_trends: RecentTrends {
            velocity_change_pct_last_3_sprints: 0.0,
            completed_points_last_week: (completed_points / 10.0).round() as u32,
        },
        timestamp: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::NamedRef;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 2, 12, 0, 0).unwrap()
    }

    fn project() -> RemoteProject {
        RemoteProject {
            id: 42,
            name: "Apollo".to_string(),
            due_date: None,
            updated_on: None,
        }
    }

    fn issue(id: u64, status: &str) -> RemoteIssue {
        RemoteIssue {
            id,
            status: NamedRef {
                id: 1,
                name: status.to_string(),
            },
            priority: NamedRef {
                id: 2,
                name: "Normal".to_string(),
            },
            assigned_to: None,
            estimated_hours: None,
            spent_hours: None,
            done_ratio: None,
            due_date: None,
        }
    }

    fn assigned(mut i: RemoteIssue, user_id: u64, name: &str) -> RemoteIssue {
        i.assigned_to = Some(NamedRef {
            id: user_id,
            name: name.to_string(),
        });
        i
    }

    #[test]
    fn overdue_count_matches_past_due_incomplete_issues() {
        let past = chrono::NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        let future = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let mut late_open = issue(1, "In Progress");
        late_open.due_date = Some(past);
        let mut late_closed = issue(2, "Closed");
        late_closed.due_date = Some(past);
        let mut on_time = issue(3, "In Progress");
        on_time.due_date = Some(future);
        let mut late_done_ratio = issue(4, "In Progress");
        late_done_ratio.due_date = Some(past);
        late_done_ratio.done_ratio = Some(100);
        let undated = issue(5, "New");

        let snapshot = map_snapshot(
            project(),
            vec![late_open, late_closed, on_time, late_done_ratio, undated],
            vec![],
            now(),
        );

        assert_eq!(snapshot.overdue_count(), 1);
        assert!(snapshot.tasks[0].is_overdue);
    }

    #[test]
    fn story_points_sum_estimates_and_default_missing_to_one() {
        let mut estimated = issue(1, "Closed");
        estimated.estimated_hours = Some(8.0);
        let unestimated_done = issue(2, "Closed");
        let unestimated_open = issue(3, "New");

        let snapshot = map_snapshot(
            project(),
            vec![estimated, unestimated_done, unestimated_open],
            vec![],
            now(),
        );

        assert_eq!(snapshot.project.total_story_points, 10);
        assert_eq!(snapshot.project.completed_story_points, 9);
    }

    #[test]
    fn team_roster_deduplicates_and_accumulates_open_load() {
        let mut a1 = assigned(issue(1, "In Progress"), 7, "Alice");
        a1.estimated_hours = Some(3.0);
        let mut a2 = assigned(issue(2, "Closed"), 7, "Alice");
        a2.estimated_hours = Some(5.0);
        let a3 = assigned(issue(3, "New"), 7, "Alice");
        let b1 = assigned(issue(4, "New"), 9, "Bob");

        let snapshot = map_snapshot(project(), vec![a1, a2, a3, b1], vec![], now());

        assert_eq!(snapshot.team.len(), 2);
        let alice = &snapshot.team[0];
        assert_eq!(alice.user_name, "Alice");
        // 3.0 from the in-progress issue plus the 1.0 default; the closed one
        // does not count toward open load.
        assert_eq!(alice.current_task_load, 4.0);
        assert_eq!(snapshot.team[1].current_task_load, 1.0);
    }

    #[test]
    fn membership_roles_override_the_role_placeholder() {
        let memberships = vec![
            RemoteMembership {
                user: Some(NamedRef {
                    id: 7,
                    name: "Alice".to_string(),
                }),
                roles: vec![NamedRef {
                    id: 1,
                    name: "Senior Engineer".to_string(),
                }],
            },
            RemoteMembership {
                user: None,
                roles: vec![NamedRef {
                    id: 2,
                    name: "Group Role".to_string(),
                }],
            },
        ];
        let issues = vec![
            assigned(issue(1, "New"), 7, "Alice"),
            assigned(issue(2, "New"), 9, "Bob"),
        ];

        let snapshot = map_snapshot(project(), issues, memberships, now());

        assert_eq!(snapshot.team[0].role_seniority, "Senior Engineer");
        assert_eq!(snapshot.team[1].role_seniority, "Developer");
    }

    #[test]
    fn estimation_accuracy_turns_pessimistic_past_two_overdue() {
        let past = chrono::NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        let make_late = |id| {
            let mut i = issue(id, "In Progress");
            i.due_date = Some(past);
            i
        };

        let two = map_snapshot(project(), vec![make_late(1), make_late(2)], vec![], now());
        assert_eq!(two.nuance_metrics.team_historical_estimation_accuracy, 1.05);

        let three = map_snapshot(
            project(),
            vec![make_late(1), make_late(2), make_late(3)],
            vec![],
            now(),
        );
        assert_eq!(three.nuance_metrics.team_historical_estimation_accuracy, 0.8);
    }

    #[test]
    fn project_summary_falls_back_for_missing_dates() {
        let snapshot = map_snapshot(project(), vec![], vec![], now());

        assert_eq!(
            snapshot.project.target_due_date,
            chrono::NaiveDate::from_ymd_opt(2024, 11, 1).unwrap()
        );
        assert_eq!(
            snapshot.project.last_update_date,
            chrono::NaiveDate::from_ymd_opt(2024, 10, 2).unwrap()
        );
        // Velocity floor applies when nothing is completed yet.
        assert_eq!(snapshot.nuance_metrics.team_historical_velocity, 10);
    }

    #[test]
    fn unassigned_issues_map_to_the_unassigned_marker() {
        let snapshot = map_snapshot(project(), vec![issue(1, "New")], vec![], now());

        assert_eq!(snapshot.tasks[0].assignee_id, "unassigned");
        assert!(snapshot.team.is_empty());
    }
}
