//! Zendesk to Shortcut webhook bridge.
//!
//! Mirrors Zendesk support tickets into Shortcut stories. Inbound webhook
//! requests describe ticket lifecycle events (create, update, close); each is
//! translated into one or more calls against the Shortcut REST API, mapping
//! ticket fields, workflow states, and project/team identifiers between the
//! two systems.

pub mod config;
pub mod handlers;
pub mod mapping;
pub mod models;
pub mod server;
pub mod tracker;

pub use config::Config;
pub use tracker::{tracker_for_token, Tracker, TrackerError};
