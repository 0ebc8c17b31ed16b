//! HTTP server for Zendesk webhooks.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::Json,
    routing::{any, get},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use subtle::ConstantTimeEq;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::handlers::{close_ticket, create_ticket, update_ticket, BridgeError};
use crate::tracker::{Tracker, TrackerError};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Configuration.
    pub config: Config,
    /// Tracker API client.
    pub tracker: Arc<dyn Tracker>,
}

/// Build the HTTP router for the bridge service.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Webhook endpoint: the HTTP method selects the ticket flow
        .route("/", any(ticket_webhook))
        // Health check
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Readiness check endpoint.
async fn readiness_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    if state.config.token.is_empty() {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    Ok(Json(json!({ "status": "ready" })))
}

/// Handle an inbound Zendesk ticket event.
///
/// This handler:
/// 1. Verifies basic auth credentials (if configured)
/// 2. Dispatches on the HTTP method: POST create, PUT update, DELETE close
/// 3. Maps the flow result to a bare status code (empty body)
pub async fn ticket_webhook(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if !authorized(&headers, &state.config.auth_user, &state.config.auth_password) {
        warn!("Basic auth check failed");
        return StatusCode::UNAUTHORIZED;
    }

    info!(method = %method, bytes = body.len(), "Received ticket event");

    let result = if method == Method::POST {
        create_ticket(&state.config, state.tracker.as_ref(), &body).await
    } else if method == Method::PUT {
        update_ticket(&state.config, state.tracker.as_ref(), &body).await
    } else if method == Method::DELETE {
        close_ticket(&state.config, state.tracker.as_ref(), &body).await
    } else {
        debug!(method = %method, "Unsupported method");
        return StatusCode::IM_A_TEAPOT;
    };

    match result {
        Ok(()) => StatusCode::CREATED,
        Err(e) => {
            error!(method = %method, error = %e, "Ticket event failed");
            status_for(&e)
        }
    }
}

/// Map a flow error to its boundary status code.
fn status_for(error: &BridgeError) -> StatusCode {
    match error {
        BridgeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        BridgeError::Tracker(TrackerError::NotFound(_)) => StatusCode::NOT_FOUND,
        BridgeError::Decode(_) | BridgeError::Tracker(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Check the Authorization header against the configured credentials.
///
/// Both values empty disables the check entirely. Comparison is constant
/// time.
fn authorized(headers: &HeaderMap, user: &str, password: &str) -> bool {
    if user.is_empty() && password.is_empty() {
        return true;
    }

    let Some(auth) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let Some(encoded) = auth.strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = STANDARD.decode(encoded) else {
        return false;
    };
    let Some((got_user, got_password)) = std::str::from_utf8(&decoded)
        .ok()
        .and_then(|s| s.split_once(':'))
    else {
        return false;
    };

    bool::from(got_user.as_bytes().ct_eq(user.as_bytes()))
        & bool::from(got_password.as_bytes().ct_eq(password.as_bytes()))
}
