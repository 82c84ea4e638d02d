// ABOUTME: Snapshot source selection and the explicit mock-fallback policy
// ABOUTME: Live client errors are typed; substitution happens only in the decorator

use async_trait::async_trait;
use chrono::Utc;
use nape_core::{Project, ProjectSnapshot};
use tracing::warn;

use crate::client::PmsClient;
use crate::error::PmsError;
use crate::mock::{mock_projects, mock_snapshot};

/// Where project lists and snapshots come from.
///
/// The composition root picks the implementation: mock when no credential is
/// configured, live (optionally wrapped in [`FallbackPms`]) otherwise.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn projects(&self) -> Result<Vec<Project>, PmsError>;
    async fn snapshot(&self, project_id: &str) -> Result<ProjectSnapshot, PmsError>;
}

/// The real PMS. Failures surface as typed errors, never as substituted data.
pub struct LivePms {
    client: PmsClient,
}

impl LivePms {
    pub fn new(client: PmsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SnapshotSource for LivePms {
    async fn projects(&self) -> Result<Vec<Project>, PmsError> {
        self.client.list_projects().await
    }

    async fn snapshot(&self, project_id: &str) -> Result<ProjectSnapshot, PmsError> {
        self.client.fetch_snapshot(project_id).await
    }
}

/// The canned data set, used directly when no PMS credential is configured.
pub struct MockPms;

#[async_trait]
impl SnapshotSource for MockPms {
    async fn projects(&self) -> Result<Vec<Project>, PmsError> {
        Ok(mock_projects())
    }

    async fn snapshot(&self, project_id: &str) -> Result<ProjectSnapshot, PmsError> {
        Ok(mock_snapshot(project_id, Utc::now()))
    }
}

/// Decorator that substitutes mock data when the inner source fails.
///
/// The substitution is logged; callers that want failures propagated use the
/// inner source directly instead of wrapping it.
pub struct FallbackPms<S> {
    inner: S,
}

impl<S> FallbackPms<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: SnapshotSource> SnapshotSource for FallbackPms<S> {
    async fn projects(&self) -> Result<Vec<Project>, PmsError> {
        match self.inner.projects().await {
            Ok(projects) => Ok(projects),
            Err(err) => {
                warn!(error = %err, "project list fetch failed, substituting mock data");
                Ok(mock_projects())
            }
        }
    }

    async fn snapshot(&self, project_id: &str) -> Result<ProjectSnapshot, PmsError> {
        match self.inner.snapshot(project_id).await {
            Ok(snapshot) => Ok(snapshot),
            Err(err) => {
                warn!(
                    error = %err,
                    project_id,
                    "snapshot fetch failed, substituting mock data"
                );
                Ok(mock_snapshot(project_id, Utc::now()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSource;

    #[async_trait]
    impl SnapshotSource for FailingSource {
        async fn projects(&self) -> Result<Vec<Project>, PmsError> {
            Err(PmsError::Status {
                context: "list projects",
                status: 502,
            })
        }

        async fn snapshot(&self, _project_id: &str) -> Result<ProjectSnapshot, PmsError> {
            Err(PmsError::Status {
                context: "fetch project",
                status: 502,
            })
        }
    }

    #[tokio::test]
    async fn failed_project_list_returns_the_mock_list() {
        let source = FallbackPms::new(FailingSource);
        let projects = source.projects().await.unwrap();
        assert_eq!(projects, mock_projects());
    }

    #[tokio::test]
    async fn failed_snapshot_returns_the_mock_entry_for_that_id() {
        let source = FallbackPms::new(FailingSource);
        let got = source.snapshot("proj-vulcan").await.unwrap();
        let expected = mock_snapshot("proj-vulcan", got.timestamp);
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn unknown_ids_fall_back_to_the_default_entry() {
        let source = FallbackPms::new(FailingSource);
        let got = source.snapshot("proj-nonexistent").await.unwrap();
        let expected = mock_snapshot(crate::mock::DEFAULT_MOCK_PROJECT_ID, got.timestamp);
        assert_eq!(got, expected);
    }
}
