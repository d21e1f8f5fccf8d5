//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Webhook Ports
//!
//! - `WebhookLogSink` - Fire-and-forget persistence of accepted webhook events

mod webhook_log_sink;

pub use webhook_log_sink::WebhookLogSink;
