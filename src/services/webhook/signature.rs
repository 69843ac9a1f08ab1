//! Stripe webhook signature verification
//!
//! The `stripe-signature` header carries `t=<unix>,v1=<hex>[,v1=<hex>...]`.
//! Each `v1` value is HMAC-SHA256 over `"{t}." ++ body`, keyed with the
//! endpoint secret. The body must be the exact bytes received.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use super::events::VerifiedEvent;
use super::WebhookError;

pub const SIGNATURE_HEADER: &str = "stripe-signature";
pub const DEFAULT_TOLERANCE_SECS: u64 = 300;

const SIGNATURE_SCHEME: &str = "v1";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug)]
struct SignatureHeader<'a> {
    /// Signed verbatim; `timestamp` is only used for the freshness check
    raw_timestamp: &'a str,
    timestamp: i64,
    signatures: Vec<Vec<u8>>,
}

fn parse_header(header: &str) -> Result<SignatureHeader<'_>, WebhookError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for item in header.split(',') {
        let Some((key, value)) = item.trim().split_once('=') else {
            continue;
        };
        match key.trim() {
            "t" => {
                let raw = value.trim();
                let parsed = raw.parse::<i64>().map_err(|_| {
                    WebhookError::InvalidSignature(
                        "Unable to extract timestamp from header".to_string(),
                    )
                })?;
                timestamp = Some((raw, parsed));
            }
            // Malformed hex can never match, so it is skipped rather than fatal
            SIGNATURE_SCHEME => {
                if let Ok(bytes) = hex::decode(value.trim()) {
                    signatures.push(bytes);
                }
            }
            _ => {}
        }
    }

    let (raw_timestamp, timestamp) = timestamp.ok_or_else(|| {
        WebhookError::InvalidSignature("Unable to extract timestamp from header".to_string())
    })?;

    if signatures.is_empty() {
        return Err(WebhookError::InvalidSignature(
            "No signatures found with expected scheme".to_string(),
        ));
    }

    Ok(SignatureHeader {
        raw_timestamp,
        timestamp,
        signatures,
    })
}

fn signed_mac(payload: &[u8], secret: &str, timestamp: &str) -> Result<HmacSha256, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| WebhookError::InvalidSignature(format!("Invalid HMAC secret: {}", e)))?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Build a header value that [`SignatureVerifier`] accepts for `payload`.
pub fn sign(payload: &[u8], secret: &str, timestamp: i64) -> Result<String, WebhookError> {
    let digest = signed_mac(payload, secret, &timestamp.to_string())?
        .finalize()
        .into_bytes();
    Ok(format!(
        "t={},{}={}",
        timestamp,
        SIGNATURE_SCHEME,
        hex::encode(digest)
    ))
}

/// Verifies payloads against one endpoint secret.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    secret: String,
    tolerance_secs: u64,
}

impl SignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    pub fn with_tolerance(mut self, tolerance_secs: u64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    pub fn verify(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<VerifiedEvent, WebhookError> {
        self.verify_at(payload, signature_header, Utc::now().timestamp())
    }

    /// Same as [`Self::verify`] with an explicit clock reading (unix seconds).
    pub fn verify_at(
        &self,
        payload: &[u8],
        signature_header: &str,
        now: i64,
    ) -> Result<VerifiedEvent, WebhookError> {
        let header = parse_header(signature_header)?;
        let mac = signed_mac(payload, &self.secret, header.raw_timestamp)?;

        let matched = header
            .signatures
            .iter()
            .any(|candidate| mac.clone().verify_slice(candidate).is_ok());
        if !matched {
            return Err(WebhookError::InvalidSignature(
                "No signatures found matching the expected signature for payload".to_string(),
            ));
        }

        let skew = now.saturating_sub(header.timestamp).unsigned_abs();
        if skew > self.tolerance_secs {
            debug!(
                timestamp = header.timestamp,
                now,
                tolerance = self.tolerance_secs,
                "Webhook timestamp outside tolerance"
            );
            return Err(WebhookError::InvalidSignature(
                "Timestamp outside the tolerance zone".to_string(),
            ));
        }

        VerifiedEvent::from_slice(payload)
    }
}

/// Verify `payload` with the default tolerance.
pub fn verify(
    payload: &[u8],
    signature_header: &str,
    secret: &str,
) -> Result<VerifiedEvent, WebhookError> {
    SignatureVerifier::new(secret).verify(payload, signature_header)
}
