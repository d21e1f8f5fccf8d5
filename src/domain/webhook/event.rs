//! Webhook event types.
//!
//! A payload becomes a [`VerifiedEvent`] exactly once, after the signature
//! verifier accepts it. The other types here are projections of that event
//! for the in-memory buffer and the durable log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::WebhookError;

/// An accepted provider event.
///
/// Only `id`, `type` and `data.object` are interpreted; the full parsed body
/// is kept as-is for callers that need more.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedEvent {
    id: Option<String>,
    event_type: Option<String>,
    object: Option<Value>,
    raw: Value,
}

impl VerifiedEvent {
    /// Parses raw payload bytes into an event.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MalformedPayload` if the bytes are not JSON or
    /// the JSON value is not an object.
    pub fn from_slice(payload: &[u8]) -> Result<Self, WebhookError> {
        let raw: Value = serde_json::from_slice(payload)
            .map_err(|e| WebhookError::malformed_payload(e.to_string()))?;
        Self::from_json(raw)
    }

    /// Builds an event from an already parsed JSON value.
    pub fn from_json(raw: Value) -> Result<Self, WebhookError> {
        let fields = raw
            .as_object()
            .ok_or_else(|| WebhookError::malformed_payload("payload must be a JSON object"))?;

        let id = fields.get("id").and_then(Value::as_str).map(str::to_string);
        let event_type = fields.get("type").and_then(Value::as_str).map(str::to_string);
        let object = fields
            .get("data")
            .and_then(|data| data.get("object"))
            .cloned();

        Ok(Self {
            id,
            event_type,
            object,
            raw,
        })
    }

    /// Provider-assigned event id (`evt_...`), if present.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Dot-delimited event type, e.g. `payment_intent.succeeded`.
    pub fn event_type(&self) -> Option<&str> {
        self.event_type.as_deref()
    }

    /// The inner `data.object` payload.
    pub fn object(&self) -> Option<&Value> {
        self.object.as_ref()
    }

    /// The whole parsed body.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn category(&self) -> EventCategory {
        self.event_type
            .as_deref()
            .map(EventCategory::from_type)
            .unwrap_or(EventCategory::Unhandled)
    }

    /// Projection kept in the recent-events buffer.
    pub fn to_buffered(&self, received_at: DateTime<Utc>) -> BufferedEventRecord {
        BufferedEventRecord {
            id: self.id.clone(),
            event_type: self.event_type.clone(),
            received_at,
            data: self.object.clone(),
        }
    }

    /// Projection appended to the durable log. The payload falls back to the
    /// whole event when there is no `data.object`.
    pub fn to_log_entry(&self, received_at: DateTime<Utc>) -> LogEntry {
        LogEntry {
            received_at,
            id: self.id.clone(),
            event_type: self.event_type.clone(),
            payload: self.object.clone().unwrap_or_else(|| self.raw.clone()),
        }
    }
}

/// A recently received event, as exposed by `GET /webhook`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferedEventRecord {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub received_at: DateTime<Utc>,
    pub data: Option<Value>,
}

/// One line of the newline-delimited webhook log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub received_at: DateTime<Utc>,
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub payload: Value,
}

/// Event types the ingestion handler recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    PaymentIntentSucceeded,
    PaymentIntentFailed,
    CheckoutSessionCompleted,
    SubscriptionCreated,
    SubscriptionUpdated,
    SubscriptionDeleted,
    InvoicePaid,
    InvoicePaymentSucceeded,
    InvoicePaymentFailed,
    /// Anything else, including a missing type.
    Unhandled,
}

impl EventCategory {
    /// Parse a category from the provider's event type string.
    pub fn from_type(s: &str) -> Self {
        match s {
            "payment_intent.succeeded" => Self::PaymentIntentSucceeded,
            "payment_intent.payment_failed" => Self::PaymentIntentFailed,
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            "customer.subscription.created" => Self::SubscriptionCreated,
            "customer.subscription.updated" => Self::SubscriptionUpdated,
            "customer.subscription.deleted" => Self::SubscriptionDeleted,
            "invoice.paid" => Self::InvoicePaid,
            "invoice.payment_succeeded" => Self::InvoicePaymentSucceeded,
            "invoice.payment_failed" => Self::InvoicePaymentFailed,
            _ => Self::Unhandled,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentIntentSucceeded => "payment_intent.succeeded",
            Self::PaymentIntentFailed => "payment_intent.payment_failed",
            Self::CheckoutSessionCompleted => "checkout.session.completed",
            Self::SubscriptionCreated => "customer.subscription.created",
            Self::SubscriptionUpdated => "customer.subscription.updated",
            Self::SubscriptionDeleted => "customer.subscription.deleted",
            Self::InvoicePaid => "invoice.paid",
            Self::InvoicePaymentSucceeded => "invoice.payment_succeeded",
            Self::InvoicePaymentFailed => "invoice.payment_failed",
            Self::Unhandled => "unhandled",
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
