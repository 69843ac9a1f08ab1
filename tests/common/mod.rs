#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use stripe_gateway::config::{Config, StripeConfig};
use stripe_gateway::models::{
    Address, CustomerCreate, PaymentIntentCreate, PriceCreate, ProductCreate, SubscriptionCreate,
    SubscriptionStatus, UserMetadata,
};
use stripe_gateway::services::provider::{
    Customer, DeletedObject, Expandable, List, PaymentIntent, PaymentProvider, Price,
    PriceRecurring, Product, ProviderError, ProviderResult, StripeAddress, StripeShipping,
    Subscription, SubscriptionItem,
};
use stripe_gateway::{build_router, AppState};

pub const WEBHOOK_SECRET: &str = "whsec_test_secret";

#[derive(Default)]
struct FakeState {
    next_id: u64,
    customers: Vec<Customer>,
    payment_intents: Vec<PaymentIntent>,
    products: Vec<Product>,
    prices: Vec<Price>,
    subscriptions: Vec<Subscription>,
    calls: Vec<String>,
}

impl FakeState {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}_{}", prefix, self.next_id)
    }
}

/// In-memory provider recording every call in order
#[derive(Default, Clone)]
pub struct FakeProvider {
    state: Arc<Mutex<FakeState>>,
}

fn not_found(kind: &str, id: &str) -> ProviderError {
    ProviderError::NotFound(format!("No such {}: '{}'", kind, id))
}

fn address(address: &Address) -> StripeAddress {
    StripeAddress {
        city: Some(address.city.clone()),
        country: Some(address.country.clone()),
        line1: Some(address.line1.clone()),
        line2: None,
        postal_code: Some(address.postal_code.clone()),
        state: Some(address.state.clone()),
    }
}

fn metadata_of(metadata: &Option<UserMetadata>) -> HashMap<String, String> {
    metadata
        .iter()
        .flat_map(|m| m.to_pairs())
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn insert_customer(&self, id: &str, email: &str, user_id: Option<&str>) {
        let mut state = self.state.lock().unwrap();
        let mut metadata = HashMap::new();
        if let Some(user_id) = user_id {
            metadata.insert("user_id".to_string(), user_id.to_string());
        }
        state.customers.push(Customer {
            id: id.to_string(),
            email: Some(email.to_string()),
            name: None,
            shipping: None,
            address: None,
            metadata,
        });
    }

    pub fn insert_product_with_prices(&self, product_id: &str, name: &str, price_ids: &[&str]) {
        let mut state = self.state.lock().unwrap();
        let product = Product {
            id: product_id.to_string(),
            name: name.to_string(),
            description: None,
            metadata: HashMap::new(),
            created: 1_700_000_000,
            updated: None,
            active: true,
        };
        for price_id in price_ids {
            state.prices.push(Price {
                id: price_id.to_string(),
                product: Expandable::Object(Box::new(product.clone())),
                unit_amount: Some(1000),
                currency: "usd".to_string(),
                created: 1_700_000_000,
                active: true,
                recurring: Some(PriceRecurring {
                    interval: "month".to_string(),
                    interval_count: 1,
                    trial_period_days: None,
                }),
            });
        }
        state.products.push(product);
    }

    fn record(&self, call: impl Into<String>) {
        self.state.lock().unwrap().calls.push(call.into());
    }
}

#[async_trait]
impl PaymentProvider for FakeProvider {
    async fn list_customers_by_email(&self, email: &str, limit: u32) -> ProviderResult<Vec<Customer>> {
        self.record("customers.list");
        let state = self.state.lock().unwrap();
        Ok(state
            .customers
            .iter()
            .filter(|c| c.email.as_deref() == Some(email))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn search_customers_by_user_id(&self, user_id: &str) -> ProviderResult<Vec<Customer>> {
        self.record("customers.search");
        let state = self.state.lock().unwrap();
        Ok(state
            .customers
            .iter()
            .filter(|c| c.metadata.get("user_id").map(String::as_str) == Some(user_id))
            .cloned()
            .collect())
    }

    async fn create_customer(&self, data: &CustomerCreate) -> ProviderResult<Customer> {
        self.record("customers.create");
        let mut state = self.state.lock().unwrap();
        let customer = Customer {
            id: state.id("cus"),
            email: Some(data.email.clone()),
            name: Some(data.name.clone()),
            shipping: Some(StripeShipping {
                address: Some(address(&data.shipping.address)),
                name: Some(data.shipping.name.clone()),
            }),
            address: Some(address(&data.address)),
            metadata: metadata_of(&data.metadata),
        };
        state.customers.push(customer.clone());
        Ok(customer)
    }

    async fn retrieve_customer(&self, customer_id: &str) -> ProviderResult<Customer> {
        self.record("customers.retrieve");
        let state = self.state.lock().unwrap();
        state
            .customers
            .iter()
            .find(|c| c.id == customer_id)
            .cloned()
            .ok_or_else(|| not_found("customer", customer_id))
    }

    async fn update_customer(&self, customer_id: &str, data: &CustomerCreate) -> ProviderResult<Customer> {
        self.record("customers.update");
        let mut state = self.state.lock().unwrap();
        let customer = state
            .customers
            .iter_mut()
            .find(|c| c.id == customer_id)
            .ok_or_else(|| not_found("customer", customer_id))?;
        customer.email = Some(data.email.clone());
        customer.name = Some(data.name.clone());
        customer.address = Some(address(&data.address));
        customer.metadata.extend(metadata_of(&data.metadata));
        Ok(customer.clone())
    }

    async fn delete_customer(&self, customer_id: &str) -> ProviderResult<DeletedObject> {
        self.record("customers.delete");
        let mut state = self.state.lock().unwrap();
        let before = state.customers.len();
        state.customers.retain(|c| c.id != customer_id);
        if state.customers.len() == before {
            return Err(not_found("customer", customer_id));
        }
        Ok(DeletedObject {
            id: customer_id.to_string(),
            deleted: true,
        })
    }

    async fn create_payment_intent(&self, data: &PaymentIntentCreate) -> ProviderResult<PaymentIntent> {
        self.record("payment_intents.create");
        let mut state = self.state.lock().unwrap();
        let id = state.id("pi");
        let intent = PaymentIntent {
            client_secret: Some(format!("{}_secret", id)),
            id,
            status: "requires_payment_method".to_string(),
            amount: data.amount,
            currency: data.currency.as_str().to_string(),
            metadata: metadata_of(&data.metadata),
            created: 1_700_000_000,
            cancellation_reason: None,
        };
        state.payment_intents.push(intent.clone());
        Ok(intent)
    }

    async fn retrieve_payment_intent(&self, payment_intent_id: &str) -> ProviderResult<PaymentIntent> {
        self.record("payment_intents.retrieve");
        let state = self.state.lock().unwrap();
        state
            .payment_intents
            .iter()
            .find(|p| p.id == payment_intent_id)
            .cloned()
            .ok_or_else(|| not_found("payment_intent", payment_intent_id))
    }

    async fn search_payment_intents_by_user_id(
        &self,
        user_id: &str,
        limit: u32,
    ) -> ProviderResult<Vec<PaymentIntent>> {
        self.record("payment_intents.search");
        let state = self.state.lock().unwrap();
        Ok(state
            .payment_intents
            .iter()
            .filter(|p| p.metadata.get("user_id").map(String::as_str) == Some(user_id))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn cancel_payment_intent(&self, payment_intent_id: &str) -> ProviderResult<PaymentIntent> {
        self.record("payment_intents.cancel");
        let mut state = self.state.lock().unwrap();
        let intent = state
            .payment_intents
            .iter_mut()
            .find(|p| p.id == payment_intent_id)
            .ok_or_else(|| not_found("payment_intent", payment_intent_id))?;
        if intent.status == "succeeded" {
            return Err(ProviderError::InvalidRequest(
                "You cannot cancel this PaymentIntent because it has a status of succeeded."
                    .to_string(),
            ));
        }
        intent.status = "canceled".to_string();
        intent.cancellation_reason = Some("requested_by_customer".to_string());
        Ok(intent.clone())
    }

    async fn create_product(&self, data: &ProductCreate) -> ProviderResult<Product> {
        self.record("products.create");
        let mut state = self.state.lock().unwrap();
        let product = Product {
            id: state.id("prod"),
            name: data.name.clone(),
            description: data.description.clone(),
            metadata: data.metadata.clone().unwrap_or_default(),
            created: 1_700_000_000,
            updated: None,
            active: true,
        };
        state.products.push(product.clone());
        Ok(product)
    }

    async fn list_products(&self, active: Option<bool>) -> ProviderResult<Vec<Product>> {
        self.record("products.list");
        let state = self.state.lock().unwrap();
        Ok(state
            .products
            .iter()
            .filter(|p| active.map_or(true, |a| p.active == a))
            .cloned()
            .collect())
    }

    async fn archive_product(&self, product_id: &str) -> ProviderResult<Product> {
        self.record(format!("products.archive:{}", product_id));
        let mut state = self.state.lock().unwrap();
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or_else(|| not_found("product", product_id))?;
        product.active = false;
        product.updated = Some(1_700_000_500);
        Ok(product.clone())
    }

    async fn create_price(&self, data: &PriceCreate) -> ProviderResult<Price> {
        self.record("prices.create");
        let mut state = self.state.lock().unwrap();
        let product = state
            .products
            .iter()
            .find(|p| p.id == data.product_id)
            .cloned()
            .ok_or_else(|| not_found("product", &data.product_id))?;
        let price = Price {
            id: state.id("price"),
            product: Expandable::Object(Box::new(product)),
            unit_amount: Some(data.unit_amount),
            currency: data.currency.as_str().to_string(),
            created: 1_700_000_000,
            active: true,
            recurring: Some(PriceRecurring {
                interval: data.recurring.interval.as_str().to_string(),
                interval_count: data.recurring.interval_count,
                trial_period_days: data.recurring.trial_period_days,
            }),
        };
        state.prices.push(price.clone());
        Ok(price)
    }

    async fn list_prices(&self, product_id: &str, active: Option<bool>) -> ProviderResult<Vec<Price>> {
        self.record(format!("prices.list:{}", product_id));
        let state = self.state.lock().unwrap();
        Ok(state
            .prices
            .iter()
            .filter(|p| p.product.id() == product_id)
            .filter(|p| active.map_or(true, |a| p.active == a))
            .cloned()
            .collect())
    }

    async fn archive_price(&self, price_id: &str) -> ProviderResult<Price> {
        self.record(format!("prices.archive:{}", price_id));
        let mut state = self.state.lock().unwrap();
        let price = state
            .prices
            .iter_mut()
            .find(|p| p.id == price_id)
            .ok_or_else(|| not_found("price", price_id))?;
        price.active = false;
        Ok(price.clone())
    }

    async fn create_subscription(&self, data: &SubscriptionCreate) -> ProviderResult<Subscription> {
        self.record("subscriptions.create");
        let mut state = self.state.lock().unwrap();
        if !state.customers.iter().any(|c| c.id == data.customer_id) {
            return Err(not_found("customer", &data.customer_id));
        }
        let price = state
            .prices
            .iter()
            .find(|p| p.id == data.price_id)
            .cloned()
            .ok_or_else(|| not_found("price", &data.price_id))?;
        let subscription = Subscription {
            id: state.id("sub"),
            status: SubscriptionStatus::Incomplete,
            customer: Expandable::Id(data.customer_id.clone()),
            start_date: 1_700_000_000,
            ended_at: None,
            canceled_at: None,
            cancel_at_period_end: false,
            trial_start: None,
            trial_end: None,
            metadata: metadata_of(&data.metadata),
            items: List {
                data: vec![SubscriptionItem {
                    id: state.id("si"),
                    price,
                }],
                has_more: false,
            },
            latest_invoice: None,
        };
        state.subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    async fn search_subscriptions_by_user_id(&self, user_id: &str) -> ProviderResult<Vec<Subscription>> {
        self.record("subscriptions.search");
        let state = self.state.lock().unwrap();
        Ok(state
            .subscriptions
            .iter()
            .filter(|s| s.metadata.get("user_id").map(String::as_str) == Some(user_id))
            .cloned()
            .collect())
    }

    async fn cancel_subscription_at_period_end(&self, subscription_id: &str) -> ProviderResult<Subscription> {
        self.record("subscriptions.update");
        let mut state = self.state.lock().unwrap();
        let subscription = state
            .subscriptions
            .iter_mut()
            .find(|s| s.id == subscription_id)
            .ok_or_else(|| not_found("subscription", subscription_id))?;
        subscription.cancel_at_period_end = true;
        Ok(subscription.clone())
    }

    async fn cancel_subscription(&self, subscription_id: &str) -> ProviderResult<Subscription> {
        self.record("subscriptions.cancel");
        let mut state = self.state.lock().unwrap();
        let subscription = state
            .subscriptions
            .iter_mut()
            .find(|s| s.id == subscription_id)
            .ok_or_else(|| not_found("subscription", subscription_id))?;
        subscription.status = SubscriptionStatus::Canceled;
        subscription.canceled_at = Some(1_700_000_900);
        subscription.ended_at = Some(1_700_000_900);
        Ok(subscription.clone())
    }
}

pub fn test_config() -> Config {
    Config {
        stripe: StripeConfig {
            secret_key: "sk_test_fake".to_string(),
            webhook_secret: WEBHOOK_SECRET.to_string(),
            ..StripeConfig::default()
        },
        ..Config::default()
    }
}

pub fn test_app(provider: FakeProvider) -> Router {
    build_router(AppState::new(test_config(), Arc::new(provider), None))
}

/// Send a request and return the status with the JSON body (`Null` when empty)
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn customer_body(email: &str, user_id: Option<&str>) -> Value {
    let address = serde_json::json!({
        "city": "São Paulo", "country": "BR", "line1": "Av. Paulista 1000",
        "postal_code": "01310-100", "state": "SP"
    });
    let mut body = serde_json::json!({
        "email": email,
        "name": "Maria Silva",
        "shipping": {"name": "Maria Silva", "address": address.clone()},
        "address": address
    });
    if let Some(user_id) = user_id {
        body["metadata"] = serde_json::json!({"user_id": user_id});
    }
    body
}
