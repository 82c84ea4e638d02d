// ABOUTME: REST client for a Redmine-compatible PMS
// ABOUTME: Fetches project, issue, and membership payloads and maps them to snapshots

use chrono::Utc;
use nape_core::{Project, ProjectSnapshot};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::PmsError;
use crate::mapper;
use crate::wire::{IssuesPayload, MembershipsPayload, ProjectPayload, ProjectsPayload};

const API_KEY_HEADER: &str = "X-Redmine-API-Key";
/// Page size for list endpoints; enough for the dashboard's purposes.
const PAGE_LIMIT: u32 = 100;

pub struct PmsClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl PmsClient {
    fn create_client() -> Client {
        Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client")
    }

    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Self::create_client(),
            base_url,
            api_key: api_key.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path_and_query: String,
        context: &'static str,
    ) -> Result<T, PmsError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        debug!(%url, context, "PMS request");

        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(context, status = status.as_u16(), "PMS request failed");
            return Err(PmsError::Status {
                context,
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| PmsError::Parse {
            context,
            message: e.to_string(),
        })
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, PmsError> {
        let payload: ProjectsPayload = self
            .get_json(format!("/projects.json?limit={PAGE_LIMIT}"), "list projects")
            .await?;

        Ok(payload
            .projects
            .into_iter()
            .map(|p| Project {
                id: p.id.to_string(),
                name: p.name,
            })
            .collect())
    }

    /// Fetches project detail, issues, and memberships in parallel and maps
    /// the joined payloads into a snapshot.
    pub async fn fetch_snapshot(&self, project_id: &str) -> Result<ProjectSnapshot, PmsError> {
        let (project, issues, memberships) = tokio::try_join!(
            self.get_json::<ProjectPayload>(
                format!("/projects/{project_id}.json"),
                "fetch project",
            ),
            self.get_json::<IssuesPayload>(
                format!("/issues.json?project_id={project_id}&status_id=*&limit={PAGE_LIMIT}"),
                "fetch issues",
            ),
            self.get_json::<MembershipsPayload>(
                format!("/projects/{project_id}/memberships.json"),
                "fetch memberships",
            ),
        )?;

        Ok(mapper::map_snapshot(
            project.project,
            issues.issues,
            memberships.memberships,
            Utc::now(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn list_projects_maps_ids_to_strings() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects.json"))
            .and(header("X-Redmine-API-Key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "projects": [
                    {"id": 1, "name": "Apollo"},
                    {"id": 2, "name": "Vulcan"}
                ]
            })))
            .mount(&server)
            .await;

        let client = PmsClient::new(server.uri(), "secret");
        let projects = client.list_projects().await.unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].id, "1");
        assert_eq!(projects[0].name, "Apollo");
    }

    #[tokio::test]
    async fn non_success_status_surfaces_as_typed_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects.json"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = PmsClient::new(server.uri(), "bad-key");
        let err = client.list_projects().await.unwrap_err();

        assert!(matches!(
            err,
            PmsError::Status {
                context: "list projects",
                status: 401
            }
        ));
    }

    #[tokio::test]
    async fn malformed_body_surfaces_as_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let client = PmsClient::new(server.uri(), "secret");
        let err = client.list_projects().await.unwrap_err();

        assert!(matches!(err, PmsError::Parse { .. }));
    }

    #[tokio::test]
    async fn fetch_snapshot_joins_the_three_endpoints() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/42.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "project": {"id": 42, "name": "Apollo", "due_date": "2024-11-30"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/issues.json"))
            .and(query_param("project_id", "42"))
            .and(query_param("status_id", "*"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "issues": [
                    {
                        "id": 7,
                        "status": {"id": 1, "name": "Closed"},
                        "priority": {"id": 2, "name": "High"},
                        "assigned_to": {"id": 5, "name": "Alice"},
                        "estimated_hours": 6.0
                    },
                    {
                        "id": 8,
                        "status": {"id": 3, "name": "In Progress"},
                        "priority": {"id": 2, "name": "Normal"}
                    }
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/projects/42/memberships.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "memberships": [
                    {"user": {"id": 5, "name": "Alice"}, "roles": [{"id": 9, "name": "Tech Lead"}]}
                ]
            })))
            .mount(&server)
            .await;

        let client = PmsClient::new(server.uri(), "secret");
        let snapshot = client.fetch_snapshot("42").await.unwrap();

        assert_eq!(snapshot.project.project_name, "Apollo");
        assert_eq!(snapshot.tasks.len(), 2);
        assert_eq!(snapshot.project.total_story_points, 7);
        assert_eq!(snapshot.project.completed_story_points, 6);
        assert_eq!(snapshot.team.len(), 1);
        assert_eq!(snapshot.team[0].role_seniority, "Tech Lead");
    }

    #[tokio::test]
    async fn fetch_snapshot_fails_when_any_leg_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/42.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "project": {"id": 42, "name": "Apollo"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/issues.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/projects/42/memberships.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"memberships": []})))
            .mount(&server)
            .await;

        let client = PmsClient::new(server.uri(), "secret");
        let err = client.fetch_snapshot("42").await.unwrap_err();

        assert!(matches!(err, PmsError::Status { status: 503, .. }));
    }
}
