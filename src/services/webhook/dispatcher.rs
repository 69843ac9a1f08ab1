//! Event dispatch
//!
//! Projects a [`VerifiedEvent`] into an [`OutcomeRecord`]. Total over every
//! kind: a missing or ill-typed field becomes `null`, and unknown kinds map to
//! [`OutcomeRecord::Unhandled`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::events::{EventKind, VerifiedEvent};

/// Fields shared by every subscription lifecycle outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionChange {
    pub subscription_id: Option<String>,
    pub customer_id: Option<String>,
    pub status: Option<String>,
}

/// Normalized result of processing one webhook event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum OutcomeRecord {
    PaymentSucceeded {
        payment_intent_id: Option<String>,
        amount: Option<i64>,
        currency: Option<String>,
    },
    PaymentFailed {
        payment_intent_id: Option<String>,
        failure_code: Option<String>,
        failure_message: Option<String>,
    },
    PaymentCanceled {
        payment_intent_id: Option<String>,
        cancellation_reason: Option<String>,
    },
    CustomerCreated {
        customer_id: Option<String>,
        email: Option<String>,
    },
    CustomerDeleted {
        customer_id: Option<String>,
    },
    SubscriptionCreated(SubscriptionChange),
    SubscriptionUpdated(SubscriptionChange),
    SubscriptionDeleted(SubscriptionChange),
    InvoicePaid {
        invoice_id: Option<String>,
        customer_id: Option<String>,
        subscription_id: Option<String>,
        amount_paid: Option<i64>,
    },
    InvoicePaymentFailed {
        invoice_id: Option<String>,
        customer_id: Option<String>,
        subscription_id: Option<String>,
        amount_due: Option<i64>,
    },
    Unhandled {
        #[serde(rename = "type")]
        kind: String,
    },
}

impl OutcomeRecord {
    /// The normalized `event_type` tag
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::PaymentSucceeded { .. } => "payment_succeeded",
            Self::PaymentFailed { .. } => "payment_failed",
            Self::PaymentCanceled { .. } => "payment_canceled",
            Self::CustomerCreated { .. } => "customer_created",
            Self::CustomerDeleted { .. } => "customer_deleted",
            Self::SubscriptionCreated(_) => "subscription_created",
            Self::SubscriptionUpdated(_) => "subscription_updated",
            Self::SubscriptionDeleted(_) => "subscription_deleted",
            Self::InvoicePaid { .. } => "invoice_paid",
            Self::InvoicePaymentFailed { .. } => "invoice_payment_failed",
            Self::Unhandled { .. } => "unhandled",
        }
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn integer_field(object: &Map<String, Value>, key: &str) -> Option<i64> {
    object.get(key).and_then(Value::as_i64)
}

/// Reference fields arrive either as an id or as an expanded object.
fn reference_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(id) => Some(id.clone()),
        Value::Object(expanded) => string_field(expanded, "id"),
        _ => None,
    }
}

fn nested_string(object: &Map<String, Value>, parent: &str, key: &str) -> Option<String> {
    object
        .get(parent)
        .and_then(Value::as_object)
        .and_then(|inner| string_field(inner, key))
}

fn subscription_change(object: &Map<String, Value>) -> SubscriptionChange {
    SubscriptionChange {
        subscription_id: string_field(object, "id"),
        customer_id: reference_field(object, "customer"),
        status: string_field(object, "status"),
    }
}

pub fn dispatch(event: &VerifiedEvent) -> OutcomeRecord {
    let object = event.object();

    match event.kind() {
        EventKind::PaymentIntentSucceeded => OutcomeRecord::PaymentSucceeded {
            payment_intent_id: string_field(object, "id"),
            amount: integer_field(object, "amount"),
            currency: string_field(object, "currency"),
        },
        EventKind::PaymentIntentPaymentFailed => OutcomeRecord::PaymentFailed {
            payment_intent_id: string_field(object, "id"),
            failure_code: nested_string(object, "last_payment_error", "code"),
            failure_message: nested_string(object, "last_payment_error", "message"),
        },
        EventKind::PaymentIntentCanceled => OutcomeRecord::PaymentCanceled {
            payment_intent_id: string_field(object, "id"),
            cancellation_reason: string_field(object, "cancellation_reason"),
        },
        EventKind::CustomerCreated => OutcomeRecord::CustomerCreated {
            customer_id: string_field(object, "id"),
            email: string_field(object, "email"),
        },
        EventKind::CustomerDeleted => OutcomeRecord::CustomerDeleted {
            customer_id: string_field(object, "id"),
        },
        EventKind::SubscriptionCreated => {
            OutcomeRecord::SubscriptionCreated(subscription_change(object))
        }
        EventKind::SubscriptionUpdated => {
            OutcomeRecord::SubscriptionUpdated(subscription_change(object))
        }
        EventKind::SubscriptionDeleted => {
            OutcomeRecord::SubscriptionDeleted(subscription_change(object))
        }
        EventKind::InvoicePaymentSucceeded => OutcomeRecord::InvoicePaid {
            invoice_id: string_field(object, "id"),
            customer_id: reference_field(object, "customer"),
            subscription_id: reference_field(object, "subscription"),
            amount_paid: integer_field(object, "amount_paid"),
        },
        EventKind::InvoicePaymentFailed => OutcomeRecord::InvoicePaymentFailed {
            invoice_id: string_field(object, "id"),
            customer_id: reference_field(object, "customer"),
            subscription_id: reference_field(object, "subscription"),
            amount_due: integer_field(object, "amount_due"),
        },
        EventKind::Other(kind) => OutcomeRecord::Unhandled { kind: kind.clone() },
    }
}
