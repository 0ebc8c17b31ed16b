//! Deterministic canned tracker client.
//!
//! Implements the full [`Tracker`] contract without network calls so the
//! handler flows can be exercised end to end. Selected by the sentinel token
//! in [`super::tracker_for_token`].

use async_trait::async_trait;

use super::{Tracker, TrackerError};
use crate::models::{Iteration, Story};

/// Canned project id.
pub const FIXTURE_PROJECT_ID: u64 = 55;
/// Canned group id.
pub const FIXTURE_GROUP_ID: &str = "team-id";
/// Canned workflow state id, returned for every state lookup.
pub const FIXTURE_STATE_ID: u64 = 500_000_011;
/// Canned story id.
pub const FIXTURE_STORY_ID: u64 = 7777;
/// External id for which story lookups report not-found.
pub const MISSING_EXTERNAL_ID: &str = "zendesk-NON_EXIST_ID";

/// Tracker double with fixed ids and no I/O.
#[derive(Debug, Clone, Default)]
pub struct FixtureTracker;

#[async_trait]
impl Tracker for FixtureTracker {
    async fn current_iteration(&self) -> Result<Iteration, TrackerError> {
        Ok(Iteration {
            id: 1,
            status: "started".to_string(),
            name: "fixture iteration".to_string(),
        })
    }

    async fn story_by_external_id(&self, external_id: &str) -> Result<Story, TrackerError> {
        if external_id == MISSING_EXTERNAL_ID {
            return Err(TrackerError::NotFound(format!(
                "no story for {external_id}"
            )));
        }
        // Workflow state stays 0, distinct from FIXTURE_STATE_ID, so the
        // update/close flows issue a state change.
        Ok(Story {
            id: FIXTURE_STORY_ID,
            external_id: external_id.to_string(),
            ..Story::default()
        })
    }

    async fn workflow_state_id(&self, _workflow: &str, _state: &str) -> Result<u64, TrackerError> {
        Ok(FIXTURE_STATE_ID)
    }

    async fn project_id(&self, _name: &str) -> Result<u64, TrackerError> {
        Ok(FIXTURE_PROJECT_ID)
    }

    async fn group_id(&self, _name: &str) -> Result<Option<String>, TrackerError> {
        Ok(Some(FIXTURE_GROUP_ID.to_string()))
    }

    async fn create_story(&self, _story: &Story) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn add_comment(&self, _story_id: u64, _text: &str) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn update_story_state(&self, _story_id: u64, _state_id: u64) -> Result<(), TrackerError> {
        Ok(())
    }
}
