//! Stripe webhook ingestion
//!
//! Raw body + `stripe-signature` header go through [`SignatureVerifier`],
//! the resulting [`VerifiedEvent`] through [`dispatch`], and the caller gets
//! back an [`OutcomeRecord`]. Nothing is stored: duplicate or out-of-order
//! deliveries are processed independently.

use metrics::counter;
use thiserror::Error;
use tracing::{info, warn};

pub mod dispatcher;
pub mod events;
pub mod signature;

pub use dispatcher::{dispatch, OutcomeRecord, SubscriptionChange};
pub use events::{EventKind, VerifiedEvent};
pub use signature::{sign, verify, SignatureVerifier, DEFAULT_TOLERANCE_SECS, SIGNATURE_HEADER};

/// Terminal failures of webhook verification. Neither is retried here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WebhookError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
}

impl WebhookError {
    fn reason(&self) -> &'static str {
        match self {
            WebhookError::InvalidPayload(_) => "invalid_payload",
            WebhookError::InvalidSignature(_) => "invalid_signature",
        }
    }
}

/// Verify-then-dispatch for the webhook endpoint
#[derive(Debug, Clone)]
pub struct WebhookService {
    verifier: SignatureVerifier,
}

impl WebhookService {
    pub fn new(secret: impl Into<String>, tolerance_secs: u64) -> Self {
        Self {
            verifier: SignatureVerifier::new(secret).with_tolerance(tolerance_secs),
        }
    }

    pub fn process(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
    ) -> Result<OutcomeRecord, WebhookError> {
        let result = signature_header
            .ok_or_else(|| {
                WebhookError::InvalidSignature(format!("Missing {} header", SIGNATURE_HEADER))
            })
            .and_then(|header| self.verifier.verify(payload, header));

        let event = match result {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, payload_bytes = payload.len(), "Rejected webhook delivery");
                counter!("webhook_rejections_total", "reason" => e.reason()).increment(1);
                return Err(e);
            }
        };

        let outcome = dispatch(&event);

        info!(
            event_id = %event.id(),
            kind = %event.kind(),
            event_type = outcome.event_type(),
            livemode = event.livemode(),
            "Processed webhook event"
        );
        counter!("webhook_events_total", "event_type" => outcome.event_type()).increment(1);

        Ok(outcome)
    }
}
