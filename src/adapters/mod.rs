//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum routes for the webhook endpoint
//! - `webhook_log` - Rotating, gzip-archived event log on the filesystem

pub mod http;
pub mod webhook_log;

pub use http::{app_router, WebhookAppState};
pub use webhook_log::{WebhookLogHandle, WebhookLogOptions, WebhookLogWriter};
