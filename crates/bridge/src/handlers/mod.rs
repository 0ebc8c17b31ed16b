//! Handlers for ticket lifecycle events.

pub mod tickets;

pub use tickets::{close_ticket, create_ticket, update_ticket, BridgeError};
