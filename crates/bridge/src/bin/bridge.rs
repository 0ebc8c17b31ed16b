//! Bridge service binary.
//!
//! Standalone HTTP service mirroring Zendesk tickets into Shortcut.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use zendesk_bridge::{config::Config, server, tracker, tracker_for_token};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("zendesk_bridge=info".parse()?))
        .init();

    info!("Starting Zendesk bridge service...");

    // Load configuration
    let config = Config::default();

    if config.token.is_empty() {
        error!("SHORTCUT_TOKEN is not set. Ticket events will be rejected.");
    }
    if config.token == tracker::MOCK_TOKEN {
        warn!("Fixture tracker selected - no Shortcut API calls will be made");
    }
    if !config.auth_enabled() {
        info!("No AUTH_USER/AUTH_PASSWORD configured - basic auth check disabled");
    }

    // Construct the tracker client once; handlers receive it via state.
    let tracker = tracker_for_token(&config.token).context("Failed to create tracker client")?;

    // Build application state
    let state = server::AppState {
        config: config.clone(),
        tracker,
    };

    // Build router
    let app = server::build_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(port = config.port, "Zendesk bridge listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
