//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `webhook` - Signature verification, event envelopes, recent-event buffer

pub mod webhook;
