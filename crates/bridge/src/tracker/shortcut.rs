//! Shortcut REST API client implementation.
//!
//! API Documentation: <https://developer.shortcut.com/api/rest/v3>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::{Tracker, TrackerError};
use crate::models::{
    CommentRequest, Group, Iteration, Project, Story, StorySearchRequest, StoryStateChange,
    Workflow,
};

/// Base URL for the Shortcut API.
const API_BASE_URL: &str = "https://api.app.shortcut.com";

/// Header carrying the API token.
const TOKEN_HEADER: &str = "Shortcut-Token";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Shortcut tracker client.
#[derive(Clone)]
pub struct ShortcutClient {
    /// HTTP client.
    client: Client,
    /// API base URL.
    base_url: String,
    /// API token.
    token: String,
}

impl ShortcutClient {
    /// Create a new Shortcut client.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(token: impl Into<String>) -> Result<Self, TrackerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            token: token.into(),
        })
    }

    /// Create a client with a custom API URL (for testing).
    #[cfg(test)]
    pub fn with_base_url(
        token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, TrackerError> {
        let mut client = Self::new(token)?;
        client.base_url = base_url.into();
        Ok(client)
    }

    /// Make an authenticated GET request and decode the JSON response.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TrackerError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "GET request");

        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&text).map_err(|e| {
                warn!(error = %e, body = %text, "Failed to parse response");
                TrackerError::Serialization(e)
            })
        } else {
            Err(TrackerError::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }

    /// Make an authenticated JSON POST request, checking only the status.
    async fn post_json<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
        expected: StatusCode,
    ) -> Result<(), TrackerError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "POST request");

        let response = self
            .client
            .post(&url)
            .header(TOKEN_HEADER, &self.token)
            .json(body)
            .send()
            .await?;

        Self::expect_status(response, expected).await
    }

    /// Fail with the response body unless the status matches.
    async fn expect_status(
        response: reqwest::Response,
        expected: StatusCode,
    ) -> Result<(), TrackerError> {
        let status = response.status();
        if status == expected {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %message, "Unexpected tracker response");
        Err(TrackerError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl Tracker for ShortcutClient {
    async fn current_iteration(&self) -> Result<Iteration, TrackerError> {
        let iterations: Vec<Iteration> = self.get("/api/v3/iterations").await?;

        iterations
            .into_iter()
            .filter(|i| i.status == "started")
            .max_by_key(|i| i.id)
            .ok_or_else(|| TrackerError::NotFound("no started iteration".to_string()))
    }

    async fn story_by_external_id(&self, external_id: &str) -> Result<Story, TrackerError> {
        let url = format!("{}/api/v3/stories/search", self.base_url);
        debug!(url = %url, external_id = %external_id, "Searching story");

        let payload = StorySearchRequest {
            external_id: external_id.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .header(TOKEN_HEADER, &self.token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let message = response.text().await.unwrap_or_default();
            return Err(TrackerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let stories: Vec<Story> = response.json().await?;
        stories
            .into_iter()
            .next()
            .ok_or_else(|| TrackerError::NotFound(format!("no story for {external_id}")))
    }

    async fn workflow_state_id(&self, workflow: &str, state: &str) -> Result<u64, TrackerError> {
        let workflows: Vec<Workflow> = self.get("/api/v3/workflows").await?;

        workflows
            .iter()
            .find(|w| w.name == workflow)
            .and_then(|w| w.states.iter().find(|s| s.name == state))
            .map(|s| s.id)
            .ok_or_else(|| TrackerError::NotFound(format!("workflow state {workflow}/{state}")))
    }

    async fn project_id(&self, name: &str) -> Result<u64, TrackerError> {
        let projects: Vec<Project> = self.get("/api/v3/projects").await?;

        projects
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.id)
            .ok_or_else(|| TrackerError::NotFound(format!("project {name}")))
    }

    async fn group_id(&self, name: &str) -> Result<Option<String>, TrackerError> {
        let groups: Vec<Group> = self.get("/api/v3/groups").await?;

        // The group is optional story metadata, so a miss is not an error.
        Ok(groups
            .into_iter()
            .find(|g| g.name == name || g.mention_name == name)
            .map(|g| g.id))
    }

    async fn create_story(&self, story: &Story) -> Result<(), TrackerError> {
        info!(
            name = %story.name,
            external_id = %story.external_id,
            project_id = story.project_id,
            "Creating story"
        );
        self.post_json("/api/v3/stories", story, StatusCode::CREATED)
            .await
    }

    async fn add_comment(&self, story_id: u64, text: &str) -> Result<(), TrackerError> {
        let payload = CommentRequest {
            text: text.to_string(),
        };
        self.post_json(
            &format!("/api/v3/stories/{story_id}/comments"),
            &payload,
            StatusCode::CREATED,
        )
        .await
    }

    async fn update_story_state(&self, story_id: u64, state_id: u64) -> Result<(), TrackerError> {
        let url = format!("{}/api/v3/stories/{story_id}", self.base_url);
        info!(story_id, state_id, "Updating story state");

        let payload = StoryStateChange {
            workflow_state_id: state_id,
        };

        let response = self
            .client
            .put(&url)
            .header(TOKEN_HEADER, &self.token)
            .json(&payload)
            .send()
            .await?;

        Self::expect_status(response, StatusCode::OK).await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn client(server: &MockServer) -> ShortcutClient {
        ShortcutClient::with_base_url("test-token", server.uri()).unwrap()
    }

    #[tokio::test]
    async fn test_current_iteration_prefers_started() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/iterations"))
            .and(header(TOKEN_HEADER, "test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 123, "status": "started", "name": "Sprint 12"},
                {"id": 234, "status": "end", "name": "Sprint 13"}
            ])))
            .mount(&server)
            .await;

        let iteration = client(&server).await.current_iteration().await.unwrap();
        assert_eq!(iteration.id, 123);
    }

    #[tokio::test]
    async fn test_current_iteration_picks_highest_started_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/iterations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 12, "status": "started", "name": "old"},
                {"id": 34, "status": "started", "name": "current"}
            ])))
            .mount(&server)
            .await;

        let iteration = client(&server).await.current_iteration().await.unwrap();
        assert_eq!(iteration.id, 34);
        assert_eq!(iteration.name, "current");
    }

    #[tokio::test]
    async fn test_current_iteration_none_started() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/iterations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 123, "status": "end", "name": "done"},
                {"id": 234, "status": "end", "name": "also done"}
            ])))
            .mount(&server)
            .await;

        let result = client(&server).await.current_iteration().await;
        assert!(matches!(result, Err(TrackerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_workflow_state_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/workflows"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": 1,
                "name": "Dev",
                "states": [
                    {"id": 122, "name": "Created"},
                    {"id": 123, "name": "Completed"}
                ]
            }])))
            .mount(&server)
            .await;

        let c = client(&server).await;
        let id = c.workflow_state_id("Dev", "Completed").await.unwrap();
        assert_eq!(id, 123);

        let missing_state = c.workflow_state_id("Dev", "Archived").await;
        assert!(matches!(missing_state, Err(TrackerError::NotFound(_))));

        let missing_workflow = c.workflow_state_id("Ops", "Completed").await;
        assert!(matches!(missing_workflow, Err(TrackerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_project_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 123, "name": "Internal"},
                {"id": 55, "name": "Support"}
            ])))
            .mount(&server)
            .await;

        let c = client(&server).await;
        assert_eq!(c.project_id("Support").await.unwrap(), 55);
        assert!(matches!(
            c.project_id("Unknown").await,
            Err(TrackerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_group_lookup_miss_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/groups"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "team-id", "name": "Support", "mention_name": "support"}
            ])))
            .mount(&server)
            .await;

        let c = client(&server).await;
        assert_eq!(
            c.group_id("Support").await.unwrap(),
            Some("team-id".to_string())
        );
        // Mention name matches too.
        assert_eq!(
            c.group_id("support").await.unwrap(),
            Some("team-id".to_string())
        );
        assert_eq!(c.group_id("Nonexistent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_story() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/stories"))
            .and(header(TOKEN_HEADER, "test-token"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let story = Story {
            project_id: 55,
            name: "[Acme] unit test".to_string(),
            external_id: "zendesk-7777".to_string(),
            ..Story::default()
        };
        client(&server).await.create_story(&story).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_story_error_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/stories"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(serde_json::json!({"message": "project_id is required"})),
            )
            .mount(&server)
            .await;

        let result = client(&server).await.create_story(&Story::default()).await;
        match result {
            Err(TrackerError::Api { status, message }) => {
                assert_eq!(status, 422);
                assert!(message.contains("project_id is required"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_story_search() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/stories/search"))
            .and(body_json(serde_json::json!({"external_id": "zendesk-777"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([
                {"id": 777, "iteration_id": 123, "workflow_state_id": 123}
            ])))
            .mount(&server)
            .await;

        let story = client(&server)
            .await
            .story_by_external_id("zendesk-777")
            .await
            .unwrap();
        assert_eq!(story.id, 777);
        assert_eq!(story.workflow_state_id, 123);
    }

    #[tokio::test]
    async fn test_story_search_zero_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/stories/search"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let result = client(&server)
            .await
            .story_by_external_id("zendesk-gone")
            .await;
        assert!(matches!(result, Err(TrackerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_comment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/stories/777/comments"))
            .and(body_json(serde_json::json!({"text": "Unit test"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        client(&server)
            .await
            .add_comment(777, "Unit test")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_story_state() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v3/stories/777"))
            .and(body_json(serde_json::json!({"workflow_state_id": 123})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        client(&server)
            .await
            .update_story_state(777, 123)
            .await
            .unwrap();
    }
}
