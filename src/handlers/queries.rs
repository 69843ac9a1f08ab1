//! Shared query parameter types for handler endpoints.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// `?limit=` for user-scoped searches
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, IntoParams)]
pub struct SearchLimitQuery {
    /// Maximum number of results (default: 1, max: 100)
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,
}

fn default_limit() -> u32 {
    1
}

impl Default for SearchLimitQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct ListProductsQuery {
    /// Include archived products (default: false)
    #[serde(default)]
    pub include_archived: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct CancelSubscriptionQuery {
    /// Cancel when the current period ends instead of immediately (default: true)
    #[serde(default = "default_at_period_end")]
    pub at_period_end: bool,
}

fn default_at_period_end() -> bool {
    true
}

impl Default for CancelSubscriptionQuery {
    fn default() -> Self {
        Self {
            at_period_end: default_at_period_end(),
        }
    }
}
