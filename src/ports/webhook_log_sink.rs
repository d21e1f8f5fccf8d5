//! WebhookLogSink port - Interface for recording accepted webhook events.
//!
//! Recording is a best-effort side channel. The ingestion path hands the
//! entry over and moves on; it never waits for the write and never learns
//! whether it succeeded.

use crate::domain::webhook::LogEntry;

/// Port for the durable webhook log.
///
/// Implementations must ensure:
/// - `submit` returns without waiting on I/O
/// - `submit` never panics and never reports failure to the caller
/// - Failures are made visible to operators (e.g. through tracing)
pub trait WebhookLogSink: Send + Sync {
    /// Hand an entry over for appending.
    fn submit(&self, entry: LogEntry);
}
