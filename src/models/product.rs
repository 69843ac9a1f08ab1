use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{Currency, SubscriptionInterval};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProductCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

fn default_interval_count() -> u32 {
    1
}

/// Recurring billing details of a price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Recurring {
    pub interval: SubscriptionInterval,
    #[serde(default = "default_interval_count")]
    #[validate(range(min = 1, message = "interval_count must be at least 1"))]
    pub interval_count: u32,
    #[serde(default)]
    pub trial_period_days: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PriceCreate {
    #[validate(length(min = 1))]
    pub product_id: String,
    /// Amount in cents
    #[validate(range(min = 1, message = "unit_amount must be greater than 0"))]
    pub unit_amount: i64,
    pub currency: Currency,
    #[validate(nested)]
    pub recurring: Recurring,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecurringResponse {
    pub interval: String,
    pub interval_count: u32,
    pub trial_period_days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PriceResponse {
    pub id: String,
    pub product_id: String,
    /// Name of the product the price belongs to
    pub name: String,
    pub unit_amount: Option<i64>,
    pub currency: String,
    pub created: i64,
    pub recurring: Option<RecurringResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
    pub created: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prices: Option<Vec<PriceResponse>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArchivedProductResponse {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub archived_at: Option<i64>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArchivedPriceResponse {
    pub id: String,
    pub product_id: String,
    pub active: bool,
    pub message: String,
}
