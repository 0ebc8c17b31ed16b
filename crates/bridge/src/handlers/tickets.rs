//! The three ticket event flows: create, update, close.
//!
//! Each flow is a short linear sequence of tracker calls with early exit on
//! the first failure. There is no rollback: a create that fails midway has
//! only performed lookups, so no tracker-side artifact is left behind.

use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::mapping::{external_id, story_from_ticket, StoryContext};
use crate::models::ZendeskTicket;
use crate::tracker::{Tracker, TrackerError};

/// Errors surfaced by the ticket flows.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Required request fields or credentials are missing.
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    /// The request body is not a valid ticket payload.
    #[error("Payload decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A tracker call failed.
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// Mirror a newly created Zendesk ticket into a new Shortcut story.
///
/// Resolves project, team, and the configured "created" workflow state,
/// maps the ticket fields, pins the story to the current iteration, and
/// submits it.
pub async fn create_ticket(
    config: &Config,
    tracker: &dyn Tracker,
    body: &[u8],
) -> Result<(), BridgeError> {
    let ticket: ZendeskTicket = serde_json::from_slice(body)?;

    if config.token.is_empty() {
        return Err(BridgeError::InvalidInput("tracker token not configured"));
    }
    if ticket.title.is_empty() || ticket.id.is_empty() || ticket.url.is_empty() {
        return Err(BridgeError::InvalidInput("title, id and url are required"));
    }

    let project_id = tracker.project_id(&config.project).await?;
    let group_id = tracker.group_id(&config.team).await?;
    let workflow_state_id = tracker
        .workflow_state_id(&config.workflow, &config.created_state)
        .await?;

    let context = StoryContext {
        project_id,
        group_id,
        story_type: config.story_type.clone(),
        workflow_state_id,
    };
    let mut story = story_from_ticket(&ticket, &context);

    let iteration = tracker.current_iteration().await?;
    story.iteration_id = iteration.id;

    tracker.create_story(&story).await?;

    info!(
        ticket_id = %ticket.id,
        external_id = %story.external_id,
        iteration_id = story.iteration_id,
        "Ticket mirrored to new story"
    );
    Ok(())
}

/// Mirror a Zendesk ticket update onto its existing story.
///
/// Appends the ticket description as a comment. If the ticket reports the
/// configured pending status, the story is moved to the pending workflow
/// state; repeating the same update is a no-op.
pub async fn update_ticket(
    config: &Config,
    tracker: &dyn Tracker,
    body: &[u8],
) -> Result<(), BridgeError> {
    let ticket: ZendeskTicket = serde_json::from_slice(body)?;

    if config.token.is_empty() {
        return Err(BridgeError::InvalidInput("tracker token not configured"));
    }
    if ticket.id.is_empty() {
        return Err(BridgeError::InvalidInput("id is required"));
    }

    let correlation_id = external_id(&ticket.id);
    let story = tracker.story_by_external_id(&correlation_id).await?;

    tracker.add_comment(story.id, &ticket.description).await?;

    if ticket.status == config.pending_status {
        let pending_state_id = tracker
            .workflow_state_id(&config.workflow, &config.pending_state)
            .await?;

        if pending_state_id == story.workflow_state_id {
            debug!(story_id = story.id, "Story already in pending state");
        } else {
            tracker
                .update_story_state(story.id, pending_state_id)
                .await?;
        }
    }

    info!(ticket_id = %ticket.id, story_id = story.id, "Ticket update mirrored");
    Ok(())
}

/// Mirror a Zendesk ticket closure by moving its story to the completed state.
///
/// Succeeds without a tracker mutation when the story is already completed.
pub async fn close_ticket(
    config: &Config,
    tracker: &dyn Tracker,
    body: &[u8],
) -> Result<(), BridgeError> {
    let ticket: ZendeskTicket = serde_json::from_slice(body)?;

    if config.token.is_empty() {
        return Err(BridgeError::InvalidInput("tracker token not configured"));
    }
    if ticket.id.is_empty() {
        return Err(BridgeError::InvalidInput("id is required"));
    }

    let correlation_id = external_id(&ticket.id);
    let story = tracker.story_by_external_id(&correlation_id).await?;

    let completed_state_id = tracker
        .workflow_state_id(&config.workflow, &config.completed_state)
        .await?;

    if completed_state_id == story.workflow_state_id {
        debug!(story_id = story.id, "Story already completed");
        return Ok(());
    }

    tracker
        .update_story_state(story.id, completed_state_id)
        .await?;

    info!(ticket_id = %ticket.id, story_id = story.id, "Ticket closure mirrored");
    Ok(())
}
