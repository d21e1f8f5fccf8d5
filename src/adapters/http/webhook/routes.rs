//! Axum router configuration for webhook endpoints.

use axum::{routing::get, Router};

use super::handlers::{health, list_recent_events, receive_webhook, WebhookAppState};

/// Create the webhook router.
///
/// # Routes
/// - `POST /webhook` - Receive a provider webhook (signature verified)
/// - `GET /webhook` - Recently received events
/// - `GET /health` - Liveness probe
pub fn webhook_router() -> Router<WebhookAppState> {
    Router::new()
        .route("/webhook", get(list_recent_events).post(receive_webhook))
        .route("/health", get(health))
}
