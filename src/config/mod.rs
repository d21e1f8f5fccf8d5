//! Application configuration module
//!
//! Configuration is read from environment variables with the `PAYMENT_RELAY`
//! prefix; nested values are separated by double underscores. Every section
//! has defaults, so an empty environment yields a runnable (unverified)
//! development server.
//!
//! # Example
//!
//! ```no_run
//! use payment_relay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod error;
mod payment;
mod server;
mod webhook_log;

pub use error::{ConfigError, ValidationError};
pub use payment::{PaymentConfig, TrustModeSetting};
pub use server::{Environment, ServerConfig};
pub use webhook_log::WebhookLogConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Payment configuration (Stripe webhook verification)
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Webhook log configuration (directory, rotation threshold)
    #[serde(default)]
    pub webhook_log: WebhookLogConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PAYMENT_RELAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PAYMENT_RELAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PAYMENT_RELAY__PAYMENT__STRIPE_WEBHOOK_SECRET=whsec_...`
    /// - `PAYMENT_RELAY__WEBHOOK_LOG__MAX_BYTES=1048576`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PAYMENT_RELAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate()?;
        self.webhook_log.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Production deployments accepting unsigned webhooks deserve a loud warning.
    pub fn accepts_unsigned_in_production(&self) -> bool {
        self.is_production() && !self.payment.trust_mode().is_verified()
    }
}
