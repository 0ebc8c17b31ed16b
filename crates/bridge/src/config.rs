//! Configuration for the bridge service.

use std::env;

/// Bridge configuration, read from the environment once at startup and
/// injected into the handler state.
#[derive(Clone)]
pub struct Config {
    /// HTTP server port.
    pub port: u16,
    /// Shortcut API token. Required for ticket flows; the sentinel value
    /// `MOCK_SHORTCUT` selects the fixture tracker client.
    pub token: String,
    /// Basic auth username. Empty together with the password disables the
    /// auth check entirely.
    pub auth_user: String,
    /// Basic auth password.
    pub auth_password: String,
    /// Shortcut project name for new stories.
    pub project: String,
    /// Shortcut team (group) name for new stories. Optional metadata: an
    /// unmatched name is tolerated.
    pub team: String,
    /// Story type tag for new stories.
    pub story_type: String,
    /// Workflow name that scopes all state lookups.
    pub workflow: String,
    /// Workflow state assigned to freshly created stories.
    pub created_state: String,
    /// Workflow state for tickets reported as pending.
    pub pending_state: String,
    /// Workflow state for closed tickets.
    pub completed_state: String,
    /// Zendesk status label that triggers the pending state transition.
    pub pending_status: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: env::var("BRIDGE_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            token: env::var("SHORTCUT_TOKEN").unwrap_or_default(),
            auth_user: env::var("AUTH_USER").unwrap_or_default(),
            auth_password: env::var("AUTH_PASSWORD").unwrap_or_default(),
            project: env::var("SHORTCUT_PROJECT").unwrap_or_else(|_| "Support".to_string()),
            team: env::var("SHORTCUT_TEAM").unwrap_or_else(|_| "Support".to_string()),
            story_type: env::var("SHORTCUT_STORY_TYPE").unwrap_or_else(|_| "chore".to_string()),
            workflow: env::var("SHORTCUT_WORKFLOW").unwrap_or_else(|_| "Support".to_string()),
            created_state: env::var("SHORTCUT_CREATED_STATE")
                .unwrap_or_else(|_| "Created".to_string()),
            pending_state: env::var("SHORTCUT_PENDING_STATE")
                .unwrap_or_else(|_| "Blocks".to_string()),
            completed_state: env::var("SHORTCUT_COMPLETED_STATE")
                .unwrap_or_else(|_| "Completed".to_string()),
            pending_status: env::var("ZENDESK_PENDING_STATUS")
                .unwrap_or_else(|_| "Pending".to_string()),
        }
    }
}

impl Config {
    /// Whether the basic auth check is active.
    #[must_use]
    pub fn auth_enabled(&self) -> bool {
        !self.auth_user.is_empty() || !self.auth_password.is_empty()
    }
}
