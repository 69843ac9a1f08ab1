//! Router configuration module

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::handlers::{
    self, customer_routes, payment_routes, product_routes, status_routes, subscription_routes,
    webhook_routes,
};
use crate::middleware::{metrics_middleware, request_logger_middleware};
use crate::{error, models};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(title = "Stripe Gateway API", version = "0.1.0"),
    paths(
        handlers::health::root,
        handlers::health::health_check,
        handlers::metrics::get_prometheus_metrics,
        handlers::customers::create_customer,
        handlers::customers::retrieve_customer,
        handlers::customers::get_customer_by_user_id,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
        handlers::customers::delete_customer_by_user_id,
        handlers::payments::create_payment_intent,
        handlers::payments::get_payment_intent,
        handlers::payments::get_payment_intents_by_user_id,
        handlers::payments::cancel_payment_intent,
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::products::archive_product,
        handlers::products::create_price,
        handlers::products::archive_price,
        handlers::subscriptions::create_subscription,
        handlers::subscriptions::get_user_subscriptions,
        handlers::subscriptions::cancel_subscription,
        handlers::webhooks::stripe_webhook,
    ),
    components(schemas(
        error::ErrorResponse,
        error::ErrorCode,
        models::Currency,
        models::SubscriptionInterval,
        models::UserMetadata,
        models::Address,
        models::Shipping,
    )),
    tags(
        (name = "health", description = "Service status"),
        (name = "metrics", description = "Prometheus metrics"),
        (name = "customers", description = "Customer management"),
        (name = "payments", description = "Payment intents"),
        (name = "products", description = "Products and prices"),
        (name = "subscriptions", description = "Subscriptions"),
        (name = "webhooks", description = "Stripe webhook ingestion")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router.
pub fn build_router(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.config.cors_origins);
    let request_timeout = Duration::from_secs(app_state.config.request_timeout);

    Router::new()
        .merge(status_routes())
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(customer_routes())
        .merge(payment_routes())
        .merge(product_routes())
        .merge(subscription_routes())
        .merge(webhook_routes())
        .route_layer(middleware::from_fn(metrics_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logger_middleware))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                ))
                .layer(cors),
        )
        .with_state(app_state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
