// ABOUTME: Wire-format structs for the Redmine-compatible REST API
// ABOUTME: Deserialization targets only; mapping to domain types lives in mapper.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

/// An `{id, name}` reference as Redmine embeds it for statuses, priorities,
/// users, and roles.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteProject {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub updated_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteIssue {
    pub id: u64,
    pub status: NamedRef,
    pub priority: NamedRef,
    #[serde(default)]
    pub assigned_to: Option<NamedRef>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub spent_hours: Option<f64>,
    #[serde(default)]
    pub done_ratio: Option<u32>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// A membership row; Redmine omits `user` for group memberships.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteMembership {
    #[serde(default)]
    pub user: Option<NamedRef>,
    #[serde(default)]
    pub roles: Vec<NamedRef>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectsPayload {
    #[serde(default)]
    pub projects: Vec<RemoteProject>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectPayload {
    pub project: RemoteProject,
}

#[derive(Debug, Deserialize)]
pub struct IssuesPayload {
    #[serde(default)]
    pub issues: Vec<RemoteIssue>,
}

#[derive(Debug, Deserialize)]
pub struct MembershipsPayload {
    #[serde(default)]
    pub memberships: Vec<RemoteMembership>,
}
