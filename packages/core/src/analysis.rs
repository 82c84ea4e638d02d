// ABOUTME: Analysis result type definitions
// ABOUTME: The model's JSON verdict reshaped into a fixed record

use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall schedule verdict for the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "At Risk")]
    AtRisk,
    #[serde(rename = "Off Track")]
    OffTrack,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectStatus::OnTrack => write!(f, "On Track"),
            ProjectStatus::AtRisk => write!(f, "At Risk"),
            ProjectStatus::OffTrack => write!(f, "Off Track"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLevel::High => write!(f, "High"),
            ConfidenceLevel::Medium => write!(f, "Medium"),
            ConfidenceLevel::Low => write!(f, "Low"),
        }
    }
}

/// Completed points for one sprint of the velocity trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityPoint {
    pub sprint: String,
    pub points: f64,
}

/// Remaining-work sample for one sprint of the burndown trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurndownPoint {
    pub sprint: String,
    pub ideal_remaining: f64,
    pub actual_remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub risk: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: String,
    pub details: String,
}

/// The model's own account of gaps in its input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    #[serde(default)]
    pub missing: Vec<String>,
    #[serde(default)]
    pub assumptions: Vec<String>,
    #[serde(default)]
    pub suggested_data: Vec<String>,
}

impl Diagnostics {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.assumptions.is_empty() && self.suggested_data.is_empty()
    }
}

/// The model's reply, parsed from its JSON body.
///
/// Dates stay as the `YYYY-MM-DD` strings the prompt demands; beyond JSON
/// shape nothing here is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub project_id: String,
    pub project_name: String,
    pub as_of_date: String,
    pub projected_completion_date: String,
    pub project_status: ProjectStatus,
    pub confidence_level: ConfidenceLevel,
    pub raw_completion_percent: f64,
    pub adjusted_completion_percent: f64,
    #[serde(default)]
    pub estimated_weeks_remaining: f64,
    #[serde(default)]
    pub estimated_days_remaining: f64,
    #[serde(default)]
    pub velocity_trend: Vec<VelocityPoint>,
    /// Only some model revisions emit this; charts render it when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burndown_trend: Option<Vec<BurndownPoint>>,
    pub justification: String,
    #[serde(default)]
    pub top_risks: Vec<Risk>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub diagnostics: Diagnostics,
}
