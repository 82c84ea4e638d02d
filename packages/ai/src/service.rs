// ABOUTME: Analysis service for the hosted model's generate-content endpoint
// ABOUTME: Handles the single-attempt request, fence stripping, and reply parsing

use nape_core::{AnalysisResult, ProjectSnapshot};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::prompts::{render_request_text, render_user_prompt, SYSTEM_PROMPT};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-pro";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("model API key is required")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("model reply contained no content")]
    EmptyReply,

    #[error("failed to parse model reply: {0}")]
    MalformedReply(String),
}

impl AnalysisError {
    /// Whether the upstream error text identifies a rejected API key.
    ///
    /// The hosted API has no dedicated error code for this; the original
    /// client matched these substrings and so do we.
    pub fn is_invalid_key(&self) -> bool {
        match self {
            AnalysisError::Api { message, .. } => {
                message.contains("API key not valid") || message.contains("API_KEY_INVALID")
            }
            _ => false,
        }
    }

    /// The message shown to the user for this failure. Only the rejected-key
    /// case gets a distinct message; everything else is a generic analysis
    /// failure.
    pub fn user_message(&self) -> String {
        if matches!(self, AnalysisError::MissingApiKey) {
            "A model API key is required. Configure one before analyzing.".to_string()
        } else if self.is_invalid_key() {
            "The configured model API key is not valid. Please check the configuration."
                .to_string()
        } else {
            "Failed to get analysis from the model. Check the logs for details.".to_string()
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    system_instruction: ContentBody,
    contents: Vec<ContentBody>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct ContentBody {
    parts: Vec<TextPart>,
}

#[derive(Serialize)]
struct TextPart {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Client for the hosted model's generate-content call.
///
/// One attempt per analysis; no retry, no backoff. A failed call is terminal
/// for that user action.
pub struct AnalysisService {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl AnalysisService {
    fn create_client() -> Client {
        Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client")
    }

    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Self::create_client(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_API_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Points the service at a different API host. Tests use this to target
    /// a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends the snapshot through the fixed prompt template and parses the
    /// model's JSON verdict.
    pub async fn analyze(&self, snapshot: &ProjectSnapshot) -> Result<AnalysisResult, AnalysisError> {
        let api_key = self.api_key.as_ref().ok_or(AnalysisError::MissingApiKey)?;

        let user_prompt = render_user_prompt(snapshot)?;
        let request = GenerateRequest {
            system_instruction: ContentBody {
                parts: vec![TextPart {
                    text: SYSTEM_PROMPT.to_string(),
                }],
            },
            contents: vec![ContentBody {
                parts: vec![TextPart {
                    text: render_request_text(&user_prompt),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        info!(model = %self.model, "requesting project analysis");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_api_error(&body);
            error!(status = status.as_u16(), %message, "model API error");
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::MalformedReply(e.to_string()))?;

        let text = reply
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or(AnalysisError::EmptyReply)?;

        let json_text = strip_code_fence(text);
        serde_json::from_str(json_text).map_err(|e| {
            let snippet: String = json_text.chars().take(500).collect();
            error!("model reply parse failed: {e}; snippet: {snippet}");
            AnalysisError::MalformedReply(e.to_string())
        })
    }
}

/// Pulls the human-readable message out of an API error body, falling back
/// to the raw body text.
fn extract_api_error(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

/// Strips an optional markdown code fence (```json ... ``` or ``` ... ```)
/// wrapping the reply.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let start = trimmed.find('\n').map(|i| i + 1).unwrap_or(0);
    let end = trimmed[start..]
        .rfind("```")
        .map(|i| i + start)
        .unwrap_or(trimmed.len());
    trimmed[start..end].trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use nape_core::{NuanceMetrics, ProjectStatus, ProjectSummary, RecentTrends};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const REPLY_JSON: &str = r#"{
        "projectId": "42",
        "projectName": "Apollo",
        "asOfDate": "2024-10-02",
        "projectedCompletionDate": "2024-12-05",
        "projectStatus": "On Track",
        "confidenceLevel": "High",
        "rawCompletionPercent": 0.83,
        "adjustedCompletionPercent": 0.8,
        "estimatedWeeksRemaining": 4.0,
        "estimatedDaysRemaining": 28,
        "justification": "Stable velocity."
    }"#;

    fn snapshot() -> ProjectSnapshot {
        ProjectSnapshot {
            project: ProjectSummary {
                project_id: "42".into(),
                project_name: "Apollo".into(),
                target_due_date: NaiveDate::from_ymd_opt(2024, 11, 30).unwrap(),
                total_story_points: 300,
                completed_story_points: 250,
                last_update_date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            },
            tasks: vec![],
            team: vec![],
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
            timestamp: Utc.with_ymd_and_hms(2024, 10, 2, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn fence_stripping_handles_the_common_wrappings() {
        let bare = r#"{"a": 1}"#;
        assert_eq!(strip_code_fence(bare), bare);
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), bare);
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), bare);
        assert_eq!(strip_code_fence("  ```json\n{\"a\": 1}\n```  "), bare);
    }

    #[test]
    fn fenced_reply_parses_identically_to_bare_json() {
        let bare: AnalysisResult = serde_json::from_str(REPLY_JSON).unwrap();
        let fenced_text = format!("```json\n{REPLY_JSON}\n```");
        let fenced: AnalysisResult =
            serde_json::from_str(strip_code_fence(&fenced_text)).unwrap();
        assert_eq!(bare, fenced);
    }

    #[tokio::test]
    async fn missing_key_blocks_before_any_network_call() {
        let service = AnalysisService::new(None);
        let err = service.analyze(&snapshot()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::MissingApiKey));
    }

    #[tokio::test]
    async fn analyze_round_trips_a_fenced_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-pro:generateContent"))
            .and(header("x-goog-api-key", "model-key"))
            .and(body_partial_json(json!({
                "generation_config": {"response_mime_type": "application/json"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"parts": [{"text": format!("```json\n{REPLY_JSON}\n```")}]}
                }]
            })))
            .mount(&server)
            .await;

        let service = AnalysisService::new(Some("model-key".into())).with_base_url(server.uri());
        let result = service.analyze(&snapshot()).await.unwrap();

        assert_eq!(result.project_status, ProjectStatus::OnTrack);
        assert_eq!(result.project_name, "Apollo");
    }

    #[tokio::test]
    async fn rejected_key_is_distinguishable_from_other_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT"
                }
            })))
            .mount(&server)
            .await;

        let service = AnalysisService::new(Some("bad".into())).with_base_url(server.uri());
        let err = service.analyze(&snapshot()).await.unwrap_err();

        assert!(err.is_invalid_key());
    }

    #[tokio::test]
    async fn server_errors_are_not_misread_as_key_problems() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let service = AnalysisService::new(Some("key".into())).with_base_url(server.uri());
        let err = service.analyze(&snapshot()).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Api { status: 500, .. }));
        assert!(!err.is_invalid_key());
    }

    #[tokio::test]
    async fn unparseable_reply_text_is_a_malformed_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "the model rambled instead of emitting JSON"}]}
                }]
            })))
            .mount(&server)
            .await;

        let service = AnalysisService::new(Some("key".into())).with_base_url(server.uri());
        let err = service.analyze(&snapshot()).await.unwrap_err();

        assert!(matches!(err, AnalysisError::MalformedReply(_)));
    }
}
