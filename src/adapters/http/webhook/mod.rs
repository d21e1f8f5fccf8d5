//! HTTP adapter for webhook endpoints.
//!
//! - `POST /webhook` - Receive a provider webhook
//! - `GET /webhook` - Recently received events
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::WebhookAppState;
pub use routes::webhook_router;
