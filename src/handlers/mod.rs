use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::app_state::AppState;

pub mod customers;
pub mod extractors;
pub mod health;
pub mod metrics;
pub mod payments;
pub mod products;
pub mod queries;
pub mod subscriptions;
pub mod webhooks;

// Re-export commonly used types
pub use extractors::{validation_error, ValidatedJson};
pub use queries::{CancelSubscriptionQuery, ListProductsQuery, SearchLimitQuery};

/// `/`, `/health` and `/metrics`
pub fn status_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::get_prometheus_metrics))
}

pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/customer", post(customers::create_customer))
        .route(
            "/customer/{customer_id}",
            get(customers::retrieve_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route(
            "/customer/user/{user_id}",
            get(customers::get_customer_by_user_id).delete(customers::delete_customer_by_user_id),
        )
}

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/payment-intents", post(payments::create_payment_intent))
        .route(
            "/payment-intents/{payment_intent_id}",
            get(payments::get_payment_intent),
        )
        .route(
            "/payment-intents/user/{user_id}",
            get(payments::get_payment_intents_by_user_id),
        )
        .route(
            "/payment-intents/{payment_intent_id}/cancel",
            post(payments::cancel_payment_intent),
        )
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            post(products::create_product).get(products::list_products),
        )
        .route("/products/{product_id}", delete(products::archive_product))
        .route("/products/prices", post(products::create_price))
        .route("/products/prices/{price_id}", delete(products::archive_price))
}

pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route("/subscriptions", post(subscriptions::create_subscription))
        .route(
            "/subscriptions/users/{user_id}",
            get(subscriptions::get_user_subscriptions),
        )
        .route(
            "/subscriptions/{subscription_id}/cancel",
            post(subscriptions::cancel_subscription),
        )
}

pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/webhooks/stripe", post(webhooks::stripe_webhook))
}
