//! Wire types for the Zendesk webhook payload and the Shortcut REST API.

use serde::{Deserialize, Serialize};

/// Ticket payload as delivered by the Zendesk webhook.
///
/// Every field defaults to empty so a sparse payload still decodes; the
/// handler flows validate what they actually need.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ZendeskTicket {
    pub title: String,
    pub description: String,
    pub organization: String,
    /// Zendesk-side ticket identifier, carried as a string.
    pub id: String,
    pub url: String,
    /// Zendesk status label, e.g. "Pending".
    pub status: String,
}

/// A Shortcut story, as submitted on create and returned by story search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Story {
    /// Shortcut-assigned story id; zero until the story exists.
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    pub project_id: u64,
    pub story_type: String,
    pub name: String,
    pub description: String,
    pub external_links: Vec<String>,
    /// Correlation key linking the story back to its Zendesk ticket.
    pub external_id: String,
    pub iteration_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub workflow_state_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// A Shortcut iteration (sprint). Status "started" marks an active one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Iteration {
    pub id: u64,
    pub status: String,
    pub name: String,
}

/// A named workflow with its ordered set of states.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Workflow {
    pub id: u64,
    pub name: String,
    pub states: Vec<WorkflowState>,
}

/// A single state within a workflow.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkflowState {
    pub id: u64,
    pub name: String,
}

/// A Shortcut project.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: u64,
    pub name: String,
}

/// A Shortcut group (team).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub mention_name: String,
}

/// Request body for `POST /stories/search`.
#[derive(Debug, Serialize)]
pub struct StorySearchRequest {
    pub external_id: String,
}

/// Request body for `POST /stories/{id}/comments`.
#[derive(Debug, Serialize)]
pub struct CommentRequest {
    pub text: String,
}

/// Request body for `PUT /stories/{id}` when moving a story between states.
#[derive(Debug, Serialize)]
pub struct StoryStateChange {
    pub workflow_state_id: u64,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(n: &u64) -> bool {
    *n == 0
}
