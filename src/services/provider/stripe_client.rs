use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::form::{key, FormParams};
use super::types::{
    Customer, DeletedObject, ErrorEnvelope, List, PaymentIntent, Price, Product, Subscription,
};
use super::{user_id_query, PaymentProvider, ProviderError, ProviderResult};
use crate::config::StripeConfig;
use crate::models::{Address, CustomerCreate, PaymentIntentCreate, PriceCreate, ProductCreate, SubscriptionCreate};

/// Stripe REST client
#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    base_url: Url,
    secret_key: String,
    api_version: Option<String>,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl StripeClient {
    pub fn new(config: &StripeConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = Url::parse(&config.api_base)
            .map_err(|e| ProviderError::Transport(format!("Invalid API base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::Transport(format!(
                "Invalid API base URL: {}",
                config.api_base
            )));
        }

        Ok(Self {
            client,
            base_url,
            secret_key: config.secret_key.clone(),
            api_version: config.api_version.clone(),
        })
    }

    /// `{base}/v1/{segments...}` with each segment percent-encoded
    fn url(&self, segments: &[&str]) -> ProviderResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Transport("API base URL cannot take a path".to_string()))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        method: Method,
        url: Url,
        params: &FormParams,
    ) -> ProviderResult<T> {
        debug!(operation, %method, path = url.path(), "Stripe request");

        let mut request = self
            .client
            .request(method.clone(), url)
            .bearer_auth(&self.secret_key);
        if let Some(version) = &self.api_version {
            request = request.header("Stripe-Version", version);
        }
        if !params.is_empty() {
            request = if method == Method::GET {
                request.query(params.as_pairs())
            } else {
                request.form(params.as_pairs())
            };
        }

        let result = self.execute(request).await;
        let outcome = match &result {
            Ok(_) => "success",
            Err(ProviderError::NotFound(_)) => "not_found",
            Err(ProviderError::InvalidRequest(_)) | Err(ProviderError::Conflict(_)) => {
                "client_error"
            }
            Err(ProviderError::Timeout(_)) => "timeout",
            Err(_) => "error",
        };
        counter!("provider_requests_total", "operation" => operation, "outcome" => outcome)
            .increment(1);

        if let Err(e) = &result {
            warn!(operation, error = %e, "Stripe request failed");
        }
        result
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> ProviderResult<T> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(map_error_response(status, &body));
        }

        serde_json::from_slice(&body).map_err(|e| ProviderError::Decode(e.to_string()))
    }

    async fn search<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        resource: &str,
        user_id: &str,
        limit: Option<u32>,
        expand: &[&str],
    ) -> ProviderResult<Vec<T>> {
        let mut params = FormParams::new();
        params
            .push("query", user_id_query(user_id))
            .push_opt("limit", limit)
            .expand(expand);
        let list: List<T> = self
            .send(operation, Method::GET, self.url(&[resource, "search"])?, &params)
            .await?;
        Ok(list.data)
    }
}

fn map_transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(err.to_string())
    } else if err.is_decode() {
        ProviderError::Decode(err.to_string())
    } else {
        ProviderError::Transport(err.to_string())
    }
}

fn map_error_response(status: StatusCode, body: &[u8]) -> ProviderError {
    let parsed = serde_json::from_slice::<ErrorEnvelope>(body).ok().map(|e| e.error);
    let message = parsed
        .as_ref()
        .and_then(|e| e.message.clone())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown provider error")
                .to_string()
        });
    let code = parsed.as_ref().and_then(|e| e.code.as_deref());

    match (status, code) {
        (StatusCode::NOT_FOUND, _) | (_, Some("resource_missing")) => ProviderError::NotFound(message),
        (StatusCode::CONFLICT, _) => ProviderError::Conflict(message),
        (StatusCode::BAD_REQUEST, _) | (StatusCode::PAYMENT_REQUIRED, _) => {
            let message = match parsed.as_ref().and_then(|e| e.param.as_deref()) {
                Some(param) => format!("{} (param: {})", message, param),
                None => message,
            };
            ProviderError::InvalidRequest(message)
        }
        _ => ProviderError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

fn push_address(params: &mut FormParams, prefix: &str, address: &Address) {
    params
        .push(key(prefix, "city"), &address.city)
        .push(key(prefix, "country"), &address.country)
        .push(key(prefix, "line1"), &address.line1)
        .push(key(prefix, "postal_code"), &address.postal_code)
        .push(key(prefix, "state"), &address.state);
}

fn customer_params(data: &CustomerCreate) -> FormParams {
    let mut params = FormParams::new();
    params.push("email", &data.email).push("name", &data.name);
    push_address(&mut params, "address", &data.address);
    params.push("shipping[name]", &data.shipping.name);
    push_address(&mut params, "shipping[address]", &data.shipping.address);
    if let Some(metadata) = &data.metadata {
        for (name, value) in metadata.to_pairs() {
            params.push(key("metadata", name), value);
        }
    }
    params
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn list_customers_by_email(&self, email: &str, limit: u32) -> ProviderResult<Vec<Customer>> {
        let mut params = FormParams::new();
        params.push("email", email).push("limit", limit);
        let list: List<Customer> = self
            .send("customers.list", Method::GET, self.url(&["customers"])?, &params)
            .await?;
        Ok(list.data)
    }

    async fn search_customers_by_user_id(&self, user_id: &str) -> ProviderResult<Vec<Customer>> {
        self.search("customers.search", "customers", user_id, None, &[])
            .await
    }

    async fn create_customer(&self, data: &CustomerCreate) -> ProviderResult<Customer> {
        self.send(
            "customers.create",
            Method::POST,
            self.url(&["customers"])?,
            &customer_params(data),
        )
        .await
    }

    async fn retrieve_customer(&self, customer_id: &str) -> ProviderResult<Customer> {
        self.send(
            "customers.retrieve",
            Method::GET,
            self.url(&["customers", customer_id])?,
            &FormParams::new(),
        )
        .await
    }

    async fn update_customer(&self, customer_id: &str, data: &CustomerCreate) -> ProviderResult<Customer> {
        self.send(
            "customers.update",
            Method::POST,
            self.url(&["customers", customer_id])?,
            &customer_params(data),
        )
        .await
    }

    async fn delete_customer(&self, customer_id: &str) -> ProviderResult<DeletedObject> {
        self.send(
            "customers.delete",
            Method::DELETE,
            self.url(&["customers", customer_id])?,
            &FormParams::new(),
        )
        .await
    }

    async fn create_payment_intent(&self, data: &PaymentIntentCreate) -> ProviderResult<PaymentIntent> {
        let mut params = FormParams::new();
        params
            .push("amount", data.amount)
            .push("currency", data.currency.as_str())
            .push(
                "automatic_payment_methods[enabled]",
                data.automatic_payment_methods.enabled,
            );
        if data.automatic_payment_methods.enabled {
            params.push(
                "automatic_payment_methods[allow_redirects]",
                data.automatic_payment_methods.allow_redirects.as_str(),
            );
        }
        if let Some(metadata) = &data.metadata {
            for (name, value) in metadata.to_pairs() {
                params.push(key("metadata", name), value);
            }
        }

        self.send(
            "payment_intents.create",
            Method::POST,
            self.url(&["payment_intents"])?,
            &params,
        )
        .await
    }

    async fn retrieve_payment_intent(&self, payment_intent_id: &str) -> ProviderResult<PaymentIntent> {
        self.send(
            "payment_intents.retrieve",
            Method::GET,
            self.url(&["payment_intents", payment_intent_id])?,
            &FormParams::new(),
        )
        .await
    }

    async fn search_payment_intents_by_user_id(
        &self,
        user_id: &str,
        limit: u32,
    ) -> ProviderResult<Vec<PaymentIntent>> {
        self.search(
            "payment_intents.search",
            "payment_intents",
            user_id,
            Some(limit),
            &[],
        )
        .await
    }

    async fn cancel_payment_intent(&self, payment_intent_id: &str) -> ProviderResult<PaymentIntent> {
        self.send(
            "payment_intents.cancel",
            Method::POST,
            self.url(&["payment_intents", payment_intent_id, "cancel"])?,
            &FormParams::new(),
        )
        .await
    }

    async fn create_product(&self, data: &ProductCreate) -> ProviderResult<Product> {
        let mut params = FormParams::new();
        params
            .push("name", &data.name)
            .push_opt("description", data.description.as_ref());
        if let Some(metadata) = &data.metadata {
            params.push_map("metadata", metadata);
        }

        self.send("products.create", Method::POST, self.url(&["products"])?, &params)
            .await
    }

    async fn list_products(&self, active: Option<bool>) -> ProviderResult<Vec<Product>> {
        let mut params = FormParams::new();
        params.push_opt("active", active);
        let list: List<Product> = self
            .send("products.list", Method::GET, self.url(&["products"])?, &params)
            .await?;
        Ok(list.data)
    }

    async fn archive_product(&self, product_id: &str) -> ProviderResult<Product> {
        let mut params = FormParams::new();
        params.push("active", false);
        self.send(
            "products.archive",
            Method::POST,
            self.url(&["products", product_id])?,
            &params,
        )
        .await
    }

    async fn create_price(&self, data: &PriceCreate) -> ProviderResult<Price> {
        let mut params = FormParams::new();
        params
            .push("product", &data.product_id)
            .push("unit_amount", data.unit_amount)
            .push("currency", data.currency.as_str())
            .push("recurring[interval]", data.recurring.interval.as_str())
            .push("recurring[interval_count]", data.recurring.interval_count)
            .push_opt("recurring[trial_period_days]", data.recurring.trial_period_days)
            .expand(&["product"]);

        self.send("prices.create", Method::POST, self.url(&["prices"])?, &params)
            .await
    }

    async fn list_prices(&self, product_id: &str, active: Option<bool>) -> ProviderResult<Vec<Price>> {
        let mut params = FormParams::new();
        params
            .push("product", product_id)
            .push_opt("active", active)
            .expand(&["data.product"]);
        let list: List<Price> = self
            .send("prices.list", Method::GET, self.url(&["prices"])?, &params)
            .await?;
        Ok(list.data)
    }

    async fn archive_price(&self, price_id: &str) -> ProviderResult<Price> {
        let mut params = FormParams::new();
        params.push("active", false);
        self.send(
            "prices.archive",
            Method::POST,
            self.url(&["prices", price_id])?,
            &params,
        )
        .await
    }

    async fn create_subscription(&self, data: &SubscriptionCreate) -> ProviderResult<Subscription> {
        let mut params = FormParams::new();
        params
            .push("customer", &data.customer_id)
            .push("items[0][price]", &data.price_id)
            .push_opt("trial_period_days", data.trial_period_days)
            .push("payment_behavior", "default_incomplete")
            .push(
                "payment_settings[save_default_payment_method]",
                "on_subscription",
            )
            .expand(&["latest_invoice.payment_intent"]);
        if let Some(metadata) = &data.metadata {
            for (name, value) in metadata.to_pairs() {
                params.push(key("metadata", name), value);
            }
        }

        self.send(
            "subscriptions.create",
            Method::POST,
            self.url(&["subscriptions"])?,
            &params,
        )
        .await
    }

    async fn search_subscriptions_by_user_id(&self, user_id: &str) -> ProviderResult<Vec<Subscription>> {
        self.search(
            "subscriptions.search",
            "subscriptions",
            user_id,
            None,
            &["data.items.data.price"],
        )
        .await
    }

    async fn cancel_subscription_at_period_end(&self, subscription_id: &str) -> ProviderResult<Subscription> {
        let mut params = FormParams::new();
        params.push("cancel_at_period_end", true);
        self.send(
            "subscriptions.update",
            Method::POST,
            self.url(&["subscriptions", subscription_id])?,
            &params,
        )
        .await
    }

    async fn cancel_subscription(&self, subscription_id: &str) -> ProviderResult<Subscription> {
        self.send(
            "subscriptions.cancel",
            Method::DELETE,
            self.url(&["subscriptions", subscription_id])?,
            &FormParams::new(),
        )
        .await
    }
}
