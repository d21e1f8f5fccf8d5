//! Webhook handlers.
//!
//! ## Commands
//! - Ingesting provider webhook deliveries
//!
//! ## Queries
//! - Listing recently received events

mod get_recent_events;
mod ingest_webhook;

pub use get_recent_events::GetRecentEventsHandler;
pub use ingest_webhook::{IngestWebhookCommand, IngestWebhookHandler, IngestWebhookResult};
