use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{SubscriptionStatus, UserMetadata};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubscriptionCreate {
    #[validate(length(min = 1))]
    pub customer_id: String,
    #[validate(length(min = 1))]
    pub price_id: String,
    #[serde(default)]
    pub trial_period_days: Option<u32>,
    #[serde(default)]
    #[validate(nested)]
    pub metadata: Option<UserMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: String,
    #[schema(value_type = String)]
    pub status: SubscriptionStatus,
    pub customer: String,
    pub start_date: i64,
    pub ended_at: Option<i64>,
    pub price_id: String,
    pub amount: Option<i64>,
    pub currency: String,
    pub interval: Option<String>,
    pub trial_start: Option<i64>,
    pub trial_end: Option<i64>,
    pub metadata: HashMap<String, String>,
    /// Secret for confirming the first payment client-side, while incomplete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CancelSubscriptionResponse {
    pub id: String,
    #[schema(value_type = String)]
    pub status: SubscriptionStatus,
    pub cancel_at_period_end: bool,
    pub canceled_at: Option<i64>,
    pub ended_at: Option<i64>,
}
