//! Stripe event envelope
//!
//! A [`VerifiedEvent`] can only be built from a payload whose signature has
//! already been checked, so its constructor is crate-private.

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::WebhookError;

/// Event kinds with a dedicated projection.
///
/// Anything the provider sends that is not listed here lands in
/// [`EventKind::Other`] with the raw tag preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    PaymentIntentSucceeded,
    PaymentIntentPaymentFailed,
    PaymentIntentCanceled,
    CustomerCreated,
    CustomerDeleted,
    SubscriptionCreated,
    SubscriptionUpdated,
    SubscriptionDeleted,
    InvoicePaymentSucceeded,
    InvoicePaymentFailed,
    Other(String),
}

impl EventKind {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "payment_intent.succeeded" => Self::PaymentIntentSucceeded,
            "payment_intent.payment_failed" => Self::PaymentIntentPaymentFailed,
            "payment_intent.canceled" => Self::PaymentIntentCanceled,
            "customer.created" => Self::CustomerCreated,
            "customer.deleted" => Self::CustomerDeleted,
            "customer.subscription.created" => Self::SubscriptionCreated,
            "customer.subscription.updated" => Self::SubscriptionUpdated,
            "customer.subscription.deleted" => Self::SubscriptionDeleted,
            "invoice.payment_succeeded" => Self::InvoicePaymentSucceeded,
            "invoice.payment_failed" => Self::InvoicePaymentFailed,
            other => Self::Other(other.to_string()),
        }
    }

    /// The provider's tag for this kind
    pub fn as_str(&self) -> &str {
        match self {
            Self::PaymentIntentSucceeded => "payment_intent.succeeded",
            Self::PaymentIntentPaymentFailed => "payment_intent.payment_failed",
            Self::PaymentIntentCanceled => "payment_intent.canceled",
            Self::CustomerCreated => "customer.created",
            Self::CustomerDeleted => "customer.deleted",
            Self::SubscriptionCreated => "customer.subscription.created",
            Self::SubscriptionUpdated => "customer.subscription.updated",
            Self::SubscriptionDeleted => "customer.subscription.deleted",
            Self::InvoicePaymentSucceeded => "invoice.payment_succeeded",
            Self::InvoicePaymentFailed => "invoice.payment_failed",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    created: Option<i64>,
    #[serde(default)]
    livemode: bool,
    data: EnvelopeData,
}

#[derive(Debug, Deserialize)]
struct EnvelopeData {
    object: Map<String, Value>,
}

/// A decoded event whose payload passed signature verification.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedEvent {
    id: String,
    kind: EventKind,
    object: Map<String, Value>,
    created: Option<i64>,
    livemode: bool,
}

impl VerifiedEvent {
    /// Decode the envelope. Callers must have verified `bytes` first.
    pub(crate) fn from_slice(bytes: &[u8]) -> Result<Self, WebhookError> {
        let envelope: Envelope = serde_json::from_slice(bytes)
            .map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;

        Ok(Self {
            id: envelope.id,
            kind: EventKind::parse(&envelope.kind),
            object: envelope.data.object,
            created: envelope.created,
            livemode: envelope.livemode,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// The `data.object` mapping; its shape depends on [`Self::kind`]
    pub fn object(&self) -> &Map<String, Value> {
        &self.object
    }

    pub fn created(&self) -> Option<i64> {
        self.created
    }

    pub fn livemode(&self) -> bool {
        self.livemode
    }
}
