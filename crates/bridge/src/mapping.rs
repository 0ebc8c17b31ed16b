//! Field mapping from a Zendesk ticket to a Shortcut story.

use crate::models::{Story, ZendeskTicket};

/// Prefix for the correlation external id. Later update/close requests
/// re-locate the story by rebuilding the identical string; it is the only
/// identifier shared between the two systems.
pub const EXTERNAL_ID_PREFIX: &str = "zendesk";

/// Build the correlation external id for a Zendesk ticket id.
#[must_use]
pub fn external_id(ticket_id: &str) -> String {
    format!("{EXTERNAL_ID_PREFIX}-{ticket_id}")
}

/// Resolved Shortcut-side context a new story is created in.
#[derive(Debug, Clone)]
pub struct StoryContext {
    pub project_id: u64,
    pub group_id: Option<String>,
    pub story_type: String,
    pub workflow_state_id: u64,
}

/// Map a Zendesk ticket into a fresh Shortcut story.
///
/// Pure and total: no I/O, never fails, inputs are untouched. The iteration
/// id is left unassigned; the create flow fills it in after resolving the
/// current iteration.
#[must_use]
pub fn story_from_ticket(ticket: &ZendeskTicket, context: &StoryContext) -> Story {
    Story {
        name: format!("[{}] {}", ticket.organization, ticket.title),
        description: ticket.description.clone(),
        project_id: context.project_id,
        group_id: context.group_id.clone(),
        story_type: context.story_type.clone(),
        external_links: vec![ticket.url.clone()],
        external_id: external_id(&ticket.id),
        workflow_state_id: context.workflow_state_id,
        ..Story::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket() -> ZendeskTicket {
        ZendeskTicket {
            title: "Widget is broken".to_string(),
            description: "It no longer widgets.".to_string(),
            organization: "Acme".to_string(),
            id: "7777".to_string(),
            url: "https://acme.zendesk.com/tickets/7777".to_string(),
            status: "Open".to_string(),
        }
    }

    fn context() -> StoryContext {
        StoryContext {
            project_id: 55,
            group_id: Some("team-id".to_string()),
            story_type: "chore".to_string(),
            workflow_state_id: 500_000_011,
        }
    }

    #[test]
    fn test_name_combines_organization_and_title() {
        let story = story_from_ticket(&ticket(), &context());
        assert_eq!(story.name, "[Acme] Widget is broken");
    }

    #[test]
    fn test_correlation_external_id() {
        let story = story_from_ticket(&ticket(), &context());
        assert_eq!(story.external_id, "zendesk-7777");
        assert_eq!(story.external_id, external_id(&ticket().id));
    }

    #[test]
    fn test_description_copied_verbatim() {
        let story = story_from_ticket(&ticket(), &context());
        assert_eq!(story.description, "It no longer widgets.");
    }

    #[test]
    fn test_context_fields_and_link() {
        let story = story_from_ticket(&ticket(), &context());
        assert_eq!(story.project_id, 55);
        assert_eq!(story.group_id.as_deref(), Some("team-id"));
        assert_eq!(story.story_type, "chore");
        assert_eq!(story.workflow_state_id, 500_000_011);
        assert_eq!(
            story.external_links,
            vec!["https://acme.zendesk.com/tickets/7777".to_string()]
        );
        // Iteration is assigned by the create flow, not the mapping.
        assert_eq!(story.iteration_id, 0);
        assert_eq!(story.id, 0);
    }
}
