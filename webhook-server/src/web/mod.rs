//! Web server module for handling inbound webhooks.
//!
//! This module provides a thin web server that:
//! - Receives webhooks on a single configurable route
//! - Verifies the HMAC signature against the raw body
//! - Rejects unverified requests with 401 before any processing

pub mod handlers;
pub mod header;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{health, webhook, AppState, HealthResponse, WebhookResponse};
pub use header::{decode_tag, extract_tag, SignatureEncoding, SignatureHeaderError};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let webhook_path = state.config.webhook_path.clone();
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health))
        .route(&webhook_path, post(webhook))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
