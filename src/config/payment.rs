//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::webhook::{TrustMode, DEFAULT_TOLERANCE_SECS};

use super::error::ValidationError;

/// Explicit webhook trust mode setting.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrustModeSetting {
    Verified,
    Unverified,
}

/// Payment configuration (Stripe webhooks)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe webhook signing secret
    #[serde(default)]
    pub stripe_webhook_secret: Option<SecretString>,

    /// Trust mode; derived from the presence of a secret when unset
    #[serde(default)]
    pub trust_mode: Option<TrustModeSetting>,

    /// Allowed distance between the signed timestamp and now, in seconds
    #[serde(default = "default_signature_tolerance")]
    pub signature_tolerance_secs: i64,
}

impl PaymentConfig {
    /// Resolve the trust mode the webhook endpoint runs in.
    pub fn trust_mode(&self) -> TrustMode {
        let mode = match self.trust_mode {
            Some(TrustModeSetting::Unverified) => TrustMode::Unverified,
            Some(TrustModeSetting::Verified) | None => {
                TrustMode::from_secret(self.stripe_webhook_secret.clone())
            }
        };
        mode.with_tolerance(self.signature_tolerance_secs)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(secret) = &self.stripe_webhook_secret {
            if !secret.expose_secret().starts_with("whsec_") {
                return Err(ValidationError::InvalidStripeWebhookSecret);
            }
        }
        if self.trust_mode == Some(TrustModeSetting::Verified) && self.stripe_webhook_secret.is_none()
        {
            return Err(ValidationError::VerifiedModeWithoutSecret);
        }
        if self.signature_tolerance_secs <= 0 {
            return Err(ValidationError::InvalidSignatureTolerance);
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_webhook_secret: None,
            trust_mode: None,
            signature_tolerance_secs: default_signature_tolerance(),
        }
    }
}

fn default_signature_tolerance() -> i64 {
    DEFAULT_TOLERANCE_SECS
}
