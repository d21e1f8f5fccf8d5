//! Stripe-compatible webhook signature verification.
//!
//! Verified mode checks an HMAC-SHA256 signature over `"<t>.<payload>"` with
//! a timestamp tolerance to reject replays. Unverified mode only checks that
//! the payload is a JSON object and exists for local and manual testing.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::WebhookError;
use super::event::VerifiedEvent;

type HmacSha256 = Hmac<Sha256>;

/// Header the provider sends the signature in.
pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

/// Default allowed distance between the signed timestamp and now (5 minutes).
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// How much an inbound payload is trusted.
#[derive(Debug, Clone)]
pub enum TrustMode {
    /// A valid signature under `secret` is required.
    Verified {
        secret: SecretString,
        tolerance_secs: i64,
    },
    /// Payloads are accepted without any cryptographic check.
    Unverified,
}

impl TrustMode {
    /// Verified mode with the default tolerance.
    pub fn verified(secret: impl Into<String>) -> Self {
        TrustMode::Verified {
            secret: SecretString::new(secret.into()),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Verified when a secret is configured, unverified otherwise.
    pub fn from_secret(secret: Option<SecretString>) -> Self {
        match secret {
            Some(secret) => TrustMode::Verified {
                secret,
                tolerance_secs: DEFAULT_TOLERANCE_SECS,
            },
            None => TrustMode::Unverified,
        }
    }

    /// Override the timestamp tolerance. No-op in unverified mode.
    pub fn with_tolerance(self, secs: i64) -> Self {
        match self {
            TrustMode::Verified { secret, .. } => TrustMode::Verified {
                secret,
                tolerance_secs: secs,
            },
            TrustMode::Unverified => TrustMode::Unverified,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, TrustMode::Verified { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrustMode::Verified { .. } => "verified",
            TrustMode::Unverified => "unverified",
        }
    }
}

/// Parsed components of a `Stripe-Signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp the signature was generated at.
    pub timestamp: i64,
    /// Every `v1` signature present; the provider sends several during
    /// secret rotation.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses `t=<timestamp>,v1=<hex>[,v1=<hex>...]`.
    ///
    /// Unknown keys (including legacy `v0`) are ignored.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::SignatureMismatch` when the header has no
    /// timestamp, no `v1` entry, or a value that fails to decode.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part
                .trim()
                .split_once('=')
                .ok_or_else(|| WebhookError::signature_mismatch("Invalid signature header format"))?;

            match key {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| {
                        WebhookError::signature_mismatch("Invalid timestamp in signature header")
                    })?);
                }
                "v1" => {
                    v1_signatures.push(hex::decode(value).map_err(|_| {
                        WebhookError::signature_mismatch("Invalid v1 signature encoding")
                    })?);
                }
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or_else(|| {
            WebhookError::signature_mismatch("Unable to extract timestamp from signature header")
        })?;
        if v1_signatures.is_empty() {
            return Err(WebhookError::signature_mismatch(
                "No v1 signatures found in signature header",
            ));
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
        })
    }
}

/// Turns raw webhook bodies into [`VerifiedEvent`]s according to a [`TrustMode`].
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    mode: TrustMode,
}

impl SignatureVerifier {
    pub fn new(mode: TrustMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> &TrustMode {
        &self.mode
    }

    /// Verifies `payload` against `signature_header` and parses it.
    ///
    /// # Errors
    ///
    /// - `SignatureMismatch` - verified mode and the header is missing,
    ///   malformed, outside the tolerance window, or does not match
    /// - `MalformedPayload` - the payload is not a JSON object
    pub fn verify(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
    ) -> Result<VerifiedEvent, WebhookError> {
        self.verify_at(payload, signature_header, chrono::Utc::now().timestamp())
    }

    /// Same as [`verify`](Self::verify) with an explicit clock.
    pub fn verify_at(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
        now: i64,
    ) -> Result<VerifiedEvent, WebhookError> {
        if let TrustMode::Verified {
            secret,
            tolerance_secs,
        } = &self.mode
        {
            let header = signature_header
                .ok_or_else(|| WebhookError::signature_mismatch("No signature header"))?;
            let header = SignatureHeader::parse(header)?;

            // The timestamp is attacker-controlled; an overflowing drift is out of range.
            let within_tolerance = now
                .checked_sub(header.timestamp)
                .map(i64::unsigned_abs)
                .is_some_and(|drift| drift <= tolerance_secs.unsigned_abs());
            if !within_tolerance {
                tracing::warn!(
                    event_timestamp = header.timestamp,
                    current_time = now,
                    "Webhook timestamp outside tolerance - possible replay"
                );
                return Err(WebhookError::signature_mismatch(
                    "Timestamp outside the tolerance zone",
                ));
            }

            let expected = compute_signature(secret.expose_secret(), header.timestamp, payload)?;
            let matched = header
                .v1_signatures
                .iter()
                .any(|candidate| constant_time_compare(&expected, candidate));
            if !matched {
                return Err(WebhookError::signature_mismatch(
                    "No signatures found matching the expected signature for payload",
                ));
            }
        }

        VerifiedEvent::from_slice(payload)
    }
}

/// Computes the raw HMAC-SHA256 signature for `timestamp` and `payload`.
pub fn compute_signature(
    secret: &str,
    timestamp: i64,
    payload: &[u8],
) -> Result<Vec<u8>, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| WebhookError::signature_mismatch("Invalid signing secret"))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Produces a complete `Stripe-Signature` header value for `payload`.
///
/// Used by tests and by local tooling that replays captured events.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> Result<String, WebhookError> {
    let signature = compute_signature(secret, timestamp, payload)?;
    Ok(format!("t={},v1={}", timestamp, hex::encode(signature)))
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
