//! Stripe API objects, limited to the fields this service reads.
//!
//! Fields Stripe documents as nullable are `Option`; unknown fields are
//! ignored so newer API versions keep deserializing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Address, Shipping, SubscriptionStatus};

/// Objects addressable by id
pub trait StripeObject {
    fn id(&self) -> &str;
}

/// A reference that is either a bare id or the expanded object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    Id(String),
    Object(Box<T>),
}

impl<T: StripeObject> Expandable<T> {
    pub fn id(&self) -> &str {
        match self {
            Expandable::Id(id) => id,
            Expandable::Object(object) => object.id(),
        }
    }

    pub fn as_object(&self) -> Option<&T> {
        match self {
            Expandable::Id(_) => None,
            Expandable::Object(object) => Some(object),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripeAddress {
    pub city: Option<String>,
    pub country: Option<String>,
    pub line1: Option<String>,
    #[serde(default)]
    pub line2: Option<String>,
    pub postal_code: Option<String>,
    pub state: Option<String>,
}

impl From<StripeAddress> for Address {
    fn from(address: StripeAddress) -> Self {
        Address {
            city: address.city.unwrap_or_default(),
            country: address.country.unwrap_or_default(),
            line1: address.line1.unwrap_or_default(),
            postal_code: address.postal_code.unwrap_or_default(),
            state: address.state.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripeShipping {
    #[serde(default)]
    pub address: Option<StripeAddress>,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<StripeShipping> for Shipping {
    fn from(shipping: StripeShipping) -> Self {
        Shipping {
            address: shipping.address.unwrap_or_default().into(),
            name: shipping.name.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub shipping: Option<StripeShipping>,
    #[serde(default)]
    pub address: Option<StripeAddress>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl StripeObject for Customer {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedObject {
    pub id: String,
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub created: i64,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

impl StripeObject for PaymentIntent {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub created: i64,
    #[serde(default)]
    pub updated: Option<i64>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl StripeObject for Product {
    fn id(&self) -> &str {
        &self.id
    }
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecurring {
    pub interval: String,
    #[serde(default = "default_interval_count")]
    pub interval_count: u32,
    #[serde(default)]
    pub trial_period_days: Option<u32>,
}

fn default_interval_count() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub id: String,
    pub product: Expandable<Product>,
    #[serde(default)]
    pub unit_amount: Option<i64>,
    pub currency: String,
    pub created: i64,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub recurring: Option<PriceRecurring>,
}

impl StripeObject for Price {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionItem {
    pub id: String,
    pub price: Price,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    #[serde(default)]
    pub payment_intent: Option<Expandable<PaymentIntent>>,
}

impl StripeObject for Invoice {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub status: SubscriptionStatus,
    pub customer: Expandable<Customer>,
    pub start_date: i64,
    #[serde(default)]
    pub ended_at: Option<i64>,
    #[serde(default)]
    pub canceled_at: Option<i64>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    #[serde(default)]
    pub trial_start: Option<i64>,
    #[serde(default)]
    pub trial_end: Option<i64>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub items: List<SubscriptionItem>,
    #[serde(default)]
    pub latest_invoice: Option<Expandable<Invoice>>,
}

impl Subscription {
    pub fn first_price(&self) -> Option<&Price> {
        self.items.data.first().map(|item| &item.price)
    }

    /// Client secret of the first invoice's payment intent, when expanded
    pub fn payment_client_secret(&self) -> Option<&str> {
        self.latest_invoice
            .as_ref()?
            .as_object()?
            .payment_intent
            .as_ref()?
            .as_object()?
            .client_secret
            .as_deref()
    }
}

/// Error body returned by the Stripe API
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub param: Option<String>,
}
