//! Payment provider abstraction.
//!
//! Services talk to the provider only through [`PaymentProvider`]; the
//! production implementation is [`StripeClient`]. Tests substitute an
//! in-memory fake.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CustomerCreate, PaymentIntentCreate, PriceCreate, ProductCreate, SubscriptionCreate};

pub mod form;
pub mod stripe_client;
pub mod types;

pub use stripe_client::StripeClient;
pub use types::{
    Customer, DeletedObject, Expandable, Invoice, List, PaymentIntent, Price, PriceRecurring,
    Product, StripeAddress, StripeShipping, Subscription, SubscriptionItem,
};

/// Failures reported by the payment provider
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Provider request timed out: {0}")]
    Timeout(String),

    #[error("Provider API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode provider response: {0}")]
    Decode(String),
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Escape a value for use inside a double-quoted search query term
pub fn escape_search_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Search query matching objects whose `metadata.user_id` equals `user_id`
pub fn user_id_query(user_id: &str) -> String {
    format!("metadata[\"user_id\"]:\"{}\"", escape_search_value(user_id))
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    // Customers
    async fn list_customers_by_email(&self, email: &str, limit: u32) -> ProviderResult<Vec<Customer>>;
    async fn search_customers_by_user_id(&self, user_id: &str) -> ProviderResult<Vec<Customer>>;
    async fn create_customer(&self, data: &CustomerCreate) -> ProviderResult<Customer>;
    async fn retrieve_customer(&self, customer_id: &str) -> ProviderResult<Customer>;
    async fn update_customer(&self, customer_id: &str, data: &CustomerCreate) -> ProviderResult<Customer>;
    async fn delete_customer(&self, customer_id: &str) -> ProviderResult<DeletedObject>;

    // Payment intents
    async fn create_payment_intent(&self, data: &PaymentIntentCreate) -> ProviderResult<PaymentIntent>;
    async fn retrieve_payment_intent(&self, payment_intent_id: &str) -> ProviderResult<PaymentIntent>;
    async fn search_payment_intents_by_user_id(
        &self,
        user_id: &str,
        limit: u32,
    ) -> ProviderResult<Vec<PaymentIntent>>;
    async fn cancel_payment_intent(&self, payment_intent_id: &str) -> ProviderResult<PaymentIntent>;

    // Products and prices
    async fn create_product(&self, data: &ProductCreate) -> ProviderResult<Product>;
    /// `active: None` lists products regardless of state
    async fn list_products(&self, active: Option<bool>) -> ProviderResult<Vec<Product>>;
    async fn archive_product(&self, product_id: &str) -> ProviderResult<Product>;
    /// Returned price has its product expanded
    async fn create_price(&self, data: &PriceCreate) -> ProviderResult<Price>;
    /// Returned prices have their product expanded
    async fn list_prices(&self, product_id: &str, active: Option<bool>) -> ProviderResult<Vec<Price>>;
    async fn archive_price(&self, price_id: &str) -> ProviderResult<Price>;

    // Subscriptions
    async fn create_subscription(&self, data: &SubscriptionCreate) -> ProviderResult<Subscription>;
    async fn search_subscriptions_by_user_id(&self, user_id: &str) -> ProviderResult<Vec<Subscription>>;
    async fn cancel_subscription_at_period_end(&self, subscription_id: &str) -> ProviderResult<Subscription>;
    async fn cancel_subscription(&self, subscription_id: &str) -> ProviderResult<Subscription>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_query_escapes_quotes() {
        assert_eq!(user_id_query("u_42"), r#"metadata["user_id"]:"u_42""#);
        assert_eq!(
            user_id_query(r#"a" OR email:"x\"#),
            r#"metadata["user_id"]:"a\" OR email:\"x\\""#
        );
    }
}
