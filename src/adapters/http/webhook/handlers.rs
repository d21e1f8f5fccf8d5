//! HTTP handlers for webhook endpoints.
//!
//! `POST /webhook` takes the body as raw `Bytes`: the signature covers the
//! exact bytes the provider sent, so nothing may parse or re-encode them
//! before verification.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    Json,
};

use crate::application::handlers::webhook::{
    GetRecentEventsHandler, IngestWebhookCommand, IngestWebhookHandler,
};
use crate::domain::webhook::{RecentEvents, SignatureVerifier, WebhookError, SIGNATURE_HEADER};
use crate::ports::WebhookLogSink;

use super::dto::{HealthResponse, WebhookAckResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for webhook endpoints.
///
/// Cloned per request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct WebhookAppState {
    pub verifier: Arc<SignatureVerifier>,
    pub recent_events: Arc<RecentEvents>,
    pub log_sink: Arc<dyn WebhookLogSink>,
}

impl WebhookAppState {
    pub fn new(
        verifier: SignatureVerifier,
        recent_events: Arc<RecentEvents>,
        log_sink: Arc<dyn WebhookLogSink>,
    ) -> Self {
        Self {
            verifier: Arc::new(verifier),
            recent_events,
            log_sink,
        }
    }

    pub fn ingest_handler(&self) -> IngestWebhookHandler {
        IngestWebhookHandler::new(
            self.verifier.clone(),
            self.recent_events.clone(),
            self.log_sink.clone(),
        )
    }

    pub fn recent_events_handler(&self) -> GetRecentEventsHandler {
        GetRecentEventsHandler::new(self.recent_events.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhook - Receive a provider webhook
pub async fn receive_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let handler = state.ingest_handler();
    let cmd = IngestWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    handler.handle(cmd)?;

    Ok(Json(WebhookAckResponse::received()))
}

/// GET /webhook - List recently received events
pub async fn list_recent_events(State(state): State<WebhookAppState>) -> impl IntoResponse {
    Json(state.recent_events_handler().handle())
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::ok())
}
