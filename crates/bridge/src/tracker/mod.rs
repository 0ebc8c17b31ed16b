//! Tracker client trait and common types.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Iteration, Story};

mod fixture;
mod shortcut;

pub use fixture::FixtureTracker;
pub use shortcut::ShortcutClient;

/// Sentinel token value that selects the fixture tracker client.
pub const MOCK_TOKEN: &str = "MOCK_SHORTCUT";

/// Errors that can occur during tracker operations.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// A lookup yielded no results.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Typed facade over the Shortcut REST API.
///
/// Each operation performs one or two HTTP round-trips and decodes the JSON
/// response. Name lookups are case-sensitive exact matches.
#[async_trait]
pub trait Tracker: Send + Sync {
    /// The started iteration with the highest id, or `NotFound` if no
    /// iteration is started.
    async fn current_iteration(&self) -> Result<Iteration, TrackerError>;

    /// Locate a story by its correlation external id. `NotFound` on zero
    /// results; the first match otherwise.
    async fn story_by_external_id(&self, external_id: &str) -> Result<Story, TrackerError>;

    /// Resolve a workflow state id by workflow name and state name.
    async fn workflow_state_id(&self, workflow: &str, state: &str) -> Result<u64, TrackerError>;

    /// Resolve a project id by name.
    async fn project_id(&self, name: &str) -> Result<u64, TrackerError>;

    /// Resolve a group (team) id by name or mention name. The group is
    /// optional story metadata, so a miss yields `Ok(None)` rather than an
    /// error.
    async fn group_id(&self, name: &str) -> Result<Option<String>, TrackerError>;

    /// Submit a new story.
    async fn create_story(&self, story: &Story) -> Result<(), TrackerError>;

    /// Append a comment to an existing story.
    async fn add_comment(&self, story_id: u64, text: &str) -> Result<(), TrackerError>;

    /// Move an existing story to another workflow state.
    async fn update_story_state(&self, story_id: u64, state_id: u64) -> Result<(), TrackerError>;
}

/// Build a tracker client for the configured token.
///
/// The sentinel token [`MOCK_TOKEN`] yields the deterministic fixture client;
/// anything else yields the real Shortcut client.
///
/// # Errors
/// Returns error if the HTTP client cannot be constructed.
pub fn tracker_for_token(token: &str) -> Result<Arc<dyn Tracker>, TrackerError> {
    if token == MOCK_TOKEN {
        Ok(Arc::new(FixtureTracker::default()))
    } else {
        Ok(Arc::new(ShortcutClient::new(token)?))
    }
}
