//! HTTP adapters - REST API implementations.
//!
//! The webhook endpoints are the only routes; [`app_router`] wraps them
//! with request tracing and a timeout.

pub mod webhook;

use std::time::Duration;

use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

// Re-export key types for convenience
pub use webhook::webhook_router;
pub use webhook::WebhookAppState;

/// Builds the complete application router.
///
/// No body-parsing middleware is installed: `POST /webhook` must see the
/// raw request bytes.
pub fn app_router(state: WebhookAppState, request_timeout: Duration) -> Router {
    webhook_router()
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
