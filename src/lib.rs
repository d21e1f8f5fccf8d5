//! Payment Relay - payment provider webhook ingestion
//!
//! Receives Stripe webhook deliveries, verifies their signatures, keeps the
//! most recent events in memory and appends every accepted event to a
//! size-rotated, gzip-archived log before dispatching it by type.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
