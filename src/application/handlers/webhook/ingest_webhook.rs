//! IngestWebhookHandler - Command handler for inbound provider webhooks.
//!
//! Verify, buffer, hand off to the log, dispatch by type. Only a
//! verification failure is returned to the caller; logging is handed off
//! without waiting so a slow or failing disk never delays acknowledgment.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::webhook::{
    EventCategory, RecentEvents, SignatureVerifier, VerifiedEvent, WebhookError,
};
use crate::ports::WebhookLogSink;

/// Command to ingest one webhook delivery.
#[derive(Debug, Clone)]
pub struct IngestWebhookCommand {
    /// Raw, unmodified request body.
    pub payload: Vec<u8>,
    /// Signature header value, if the request carried one.
    pub signature: Option<String>,
}

/// Result of an accepted delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestWebhookResult {
    pub event_id: Option<String>,
    pub category: EventCategory,
}

/// Handler for inbound webhook deliveries.
pub struct IngestWebhookHandler {
    verifier: Arc<SignatureVerifier>,
    recent_events: Arc<RecentEvents>,
    log_sink: Arc<dyn WebhookLogSink>,
}

impl IngestWebhookHandler {
    pub fn new(
        verifier: Arc<SignatureVerifier>,
        recent_events: Arc<RecentEvents>,
        log_sink: Arc<dyn WebhookLogSink>,
    ) -> Self {
        Self {
            verifier,
            recent_events,
            log_sink,
        }
    }

    pub fn handle(&self, cmd: IngestWebhookCommand) -> Result<IngestWebhookResult, WebhookError> {
        // 1. Verify signature and parse; rejection leaves no trace in state
        let event = self
            .verifier
            .verify(&cmd.payload, cmd.signature.as_deref())
            .inspect_err(|e| {
                tracing::warn!(
                    trust_mode = self.verifier.mode().as_str(),
                    error = %e,
                    "Rejected webhook"
                );
            })?;

        // 2. Buffer before responding
        let received_at = Utc::now();
        self.recent_events.push(event.to_buffered(received_at));

        // 3. Log without waiting
        self.log_sink.submit(event.to_log_entry(received_at));

        // 4. Dispatch
        let category = dispatch(&event);

        Ok(IngestWebhookResult {
            event_id: event.id().map(str::to_string),
            category,
        })
    }
}

/// Records which kind of event arrived. Has no other effect.
fn dispatch(event: &VerifiedEvent) -> EventCategory {
    let category = event.category();
    let event_id = event.id().unwrap_or("-");
    let event_type = event.event_type().unwrap_or("-");

    match category {
        EventCategory::PaymentIntentSucceeded
        | EventCategory::CheckoutSessionCompleted
        | EventCategory::InvoicePaid
        | EventCategory::InvoicePaymentSucceeded => {
            tracing::info!(event_id, event_type, %category, "Payment completed");
        }
        EventCategory::PaymentIntentFailed | EventCategory::InvoicePaymentFailed => {
            tracing::warn!(event_id, event_type, %category, "Payment failed");
        }
        EventCategory::SubscriptionCreated
        | EventCategory::SubscriptionUpdated
        | EventCategory::SubscriptionDeleted => {
            tracing::info!(event_id, event_type, %category, "Subscription changed");
        }
        EventCategory::Unhandled => {
            tracing::debug!(event_id, event_type, "Unhandled webhook event type");
        }
    }

    category
}
