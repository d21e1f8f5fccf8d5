//! Webhook domain module.
//!
//! Verification, parsing and in-memory retention of inbound payment
//! provider notifications.
//!
//! # Module Structure
//!
//! - `errors` - Rejection reasons surfaced to the provider
//! - `event` - Verified events and their buffer/log projections
//! - `recent_events` - Bounded recent-events buffer
//! - `verifier` - Signature verification and trust modes

mod errors;
mod event;
mod recent_events;
mod verifier;

pub use errors::WebhookError;
pub use event::{BufferedEventRecord, EventCategory, LogEntry, VerifiedEvent};
pub use recent_events::{EventsSnapshot, RecentEvents, DEFAULT_CAPACITY};
pub use verifier::{
    compute_signature, sign_payload, SignatureHeader, SignatureVerifier, TrustMode,
    DEFAULT_TOLERANCE_SECS, SIGNATURE_HEADER,
};
