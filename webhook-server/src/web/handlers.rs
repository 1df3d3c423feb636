//! Webhook endpoint handlers.
//!
//! The webhook handler only authenticates and acknowledges. It hands the
//! raw body bytes to the [`SignatureValidator`] exactly as received, and a
//! request that fails verification is rejected before anything else looks
//! at its payload.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::signature::SignatureValidator;
use crate::web::header::extract_tag;
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub validator: Arc<SignatureValidator>,
}

impl AppState {
    pub fn new(config: Config, validator: SignatureValidator) -> Self {
        Self {
            config: Arc::new(config),
            validator: Arc::new(validator),
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Webhook
// =============================================================================

/// Webhook response.
#[derive(Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_bytes: Option<usize>,
}

impl WebhookResponse {
    fn unauthorized() -> (StatusCode, Json<WebhookResponse>) {
        (
            StatusCode::UNAUTHORIZED,
            Json(WebhookResponse {
                status: "unauthorized",
                payload_bytes: None,
            }),
        )
    }
}

/// Webhook endpoint.
///
/// This endpoint:
/// 1. Decodes the tag from the configured signature header
/// 2. Verifies it against the raw body
/// 3. Returns 401 on any failure, 200 otherwise
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<WebhookResponse>) {
    let config = &state.config;

    info!(
        payload_bytes = body.len(),
        has_signature = headers.contains_key(config.signature_header.as_str()),
        "webhook_received"
    );

    let received_tag = match extract_tag(
        &headers,
        &config.signature_header,
        config.signature_encoding,
    ) {
        Ok(tag) => tag,
        Err(e) => {
            warn!(
                reason = e.reason(),
                error = %e,
                header = %config.signature_header,
                encoding = %config.signature_encoding,
                "webhook_signature_unreadable"
            );
            return WebhookResponse::unauthorized();
        }
    };

    if !state.validator.verify(&body, &received_tag) {
        warn!(
            payload_bytes = body.len(),
            received_tag_length = received_tag.len(),
            "webhook_signature_invalid"
        );
        return WebhookResponse::unauthorized();
    }

    info!(payload_bytes = body.len(), "webhook_accepted");

    (
        StatusCode::OK,
        Json(WebhookResponse {
            status: "accepted",
            payload_bytes: Some(body.len()),
        }),
    )
}
