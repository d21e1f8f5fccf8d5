//! Webhook error types for inbound provider notifications.
//!
//! Only verification failures ever reach the HTTP response. Everything
//! downstream of a verified event is best-effort and reported through
//! tracing instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that reject an inbound webhook before it is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// The signature header is missing, unparseable, stale, or does not match
    /// the payload under the configured secret.
    #[error("{0}")]
    SignatureMismatch(String),

    /// The payload is not a well-formed JSON object.
    #[error("{0}")]
    MalformedPayload(String),
}

impl WebhookError {
    pub fn signature_mismatch(message: impl Into<String>) -> Self {
        WebhookError::SignatureMismatch(message.into())
    }

    pub fn malformed_payload(message: impl Into<String>) -> Self {
        WebhookError::MalformedPayload(message.into())
    }

    /// Maps the error to an HTTP status code.
    ///
    /// Both variants are client errors: the provider should not retry a
    /// payload that failed verification or parsing.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::SignatureMismatch(_) | WebhookError::MalformedPayload(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (self.status_code(), format!("Webhook Error: {}", self)).into_response()
    }
}
