//! Application state shared across all handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::Config;
use crate::services::{
    self, CustomerService, PaymentProvider, PaymentService, ProductService, SubscriptionService,
    WebhookService,
};

/// Application state shared across handlers.
///
/// Every service holds the same provider handle; cloning the state is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    pub customer_service: CustomerService,
    pub payment_service: PaymentService,
    pub product_service: ProductService,
    pub subscription_service: SubscriptionService,
    /// Signature verification and event dispatch
    pub webhook_service: WebhookService,
    /// Prometheus exporter handle, absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        config: Config,
        provider: Arc<dyn PaymentProvider>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let webhook_service = WebhookService::new(
            config.stripe.webhook_secret.clone(),
            config.stripe.webhook_tolerance_secs,
        );

        Self {
            customer_service: CustomerService::new(provider.clone()),
            payment_service: PaymentService::new(provider.clone()),
            product_service: ProductService::new(provider.clone()),
            subscription_service: SubscriptionService::new(provider),
            webhook_service,
            metrics,
            config: Arc::new(config),
        }
    }
}

impl axum::extract::FromRef<AppState> for services::WebhookService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.webhook_service.clone()
    }
}

impl axum::extract::FromRef<AppState> for services::CustomerService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.customer_service.clone()
    }
}

impl axum::extract::FromRef<AppState> for services::PaymentService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.payment_service.clone()
    }
}

impl axum::extract::FromRef<AppState> for services::ProductService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.product_service.clone()
    }
}

impl axum::extract::FromRef<AppState> for services::SubscriptionService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.subscription_service.clone()
    }
}
