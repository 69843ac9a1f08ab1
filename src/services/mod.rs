// Business logic services
// Customers, payments, products, subscriptions and webhook ingestion

pub mod customer;
pub mod payment;
pub mod product;
pub mod provider;
pub mod subscription;
pub mod webhook;

pub use customer::CustomerService;
pub use payment::PaymentService;
pub use product::ProductService;
pub use provider::{PaymentProvider, ProviderError, StripeClient};
pub use subscription::SubscriptionService;
pub use webhook::WebhookService;
