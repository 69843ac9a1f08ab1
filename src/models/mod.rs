// API request/response models
// Provider wire objects live in services::provider::types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub mod customer;
pub mod payment;
pub mod product;
pub mod subscription;

pub use customer::{Address, CustomerCreate, CustomerResponse, DeletedCustomerResponse, Shipping};
pub use payment::{
    AllowRedirects, AutomaticPaymentMethods, CancelPaymentIntentResponse, PaymentIntentCreate,
    PaymentIntentResponse,
};
pub use product::{
    ArchivedPriceResponse, ArchivedProductResponse, PriceCreate, PriceResponse, ProductCreate,
    ProductResponse, Recurring,
};
pub use subscription::{CancelSubscriptionResponse, SubscriptionCreate, SubscriptionResponse};

pub const USER_ID_METADATA_KEY: &str = "user_id";
pub const PRODUCT_ID_METADATA_KEY: &str = "product_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Brl,
    Usd,
    Eur,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Brl => "brl",
            Currency::Usd => "usd",
            Currency::Eur => "eur",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionInterval {
    Day,
    Week,
    Month,
    Year,
}

impl SubscriptionInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionInterval::Day => "day",
            SubscriptionInterval::Week => "week",
            SubscriptionInterval::Month => "month",
            SubscriptionInterval::Year => "year",
        }
    }
}

/// Subscription status as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Canceled,
    PastDue,
    Paused,
    Unpaid,
    Trialing,
    Incomplete,
    IncompleteExpired,
    #[serde(other)]
    Unknown,
}

/// Links a provider object back to an application user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UserMetadata {
    #[validate(length(min = 1, message = "user_id must not be empty"))]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

impl UserMetadata {
    /// Pairs to attach as provider metadata
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![(USER_ID_METADATA_KEY, self.user_id.clone())];
        if let Some(product_id) = &self.product_id {
            pairs.push((PRODUCT_ID_METADATA_KEY, product_id.clone()));
        }
        pairs
    }

    /// `None` unless the provider metadata carries a user id
    pub fn from_map(metadata: &HashMap<String, String>) -> Option<Self> {
        metadata.get(USER_ID_METADATA_KEY).map(|user_id| Self {
            user_id: user_id.clone(),
            product_id: metadata.get(PRODUCT_ID_METADATA_KEY).cloned(),
        })
    }
}
