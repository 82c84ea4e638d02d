// ABOUTME: Core domain types for NAPE
// ABOUTME: Snapshot and analysis records shared across all NAPE packages

pub mod analysis;
pub mod snapshot;

// Re-export main types
pub use analysis::{
    AnalysisResult, BurndownPoint, ConfidenceLevel, Diagnostics, ProjectStatus, Recommendation,
    Risk, VelocityPoint,
};
pub use snapshot::{
    NuanceMetrics, Project, ProjectSnapshot, ProjectSummary, RecentTrends, TaskRecord, TeamMember,
};
