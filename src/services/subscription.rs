use std::sync::Arc;

use tracing::info;

use crate::error::{ApiError, Result};
use crate::models::{CancelSubscriptionResponse, SubscriptionCreate, SubscriptionResponse};
use crate::services::provider::{PaymentProvider, Subscription};

#[derive(Clone)]
pub struct SubscriptionService {
    provider: Arc<dyn PaymentProvider>,
}

impl SubscriptionService {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    /// Created incomplete; the first invoice's client secret is returned so the
    /// client can confirm payment.
    pub async fn create(&self, data: &SubscriptionCreate) -> Result<SubscriptionResponse> {
        let subscription = self.provider.create_subscription(data).await?;
        info!(
            subscription_id = %subscription.id,
            customer_id = %subscription.customer.id(),
            status = ?subscription.status,
            "Subscription created"
        );
        to_response(subscription)
    }

    pub async fn list_by_user_id(&self, user_id: &str) -> Result<Vec<SubscriptionResponse>> {
        self.provider
            .search_subscriptions_by_user_id(user_id)
            .await?
            .into_iter()
            .map(to_response)
            .collect()
    }

    pub async fn cancel(
        &self,
        subscription_id: &str,
        at_period_end: bool,
    ) -> Result<CancelSubscriptionResponse> {
        let subscription = if at_period_end {
            self.provider
                .cancel_subscription_at_period_end(subscription_id)
                .await?
        } else {
            self.provider.cancel_subscription(subscription_id).await?
        };

        info!(
            subscription_id = %subscription.id,
            at_period_end,
            "Subscription cancellation requested"
        );

        Ok(CancelSubscriptionResponse {
            id: subscription.id,
            status: subscription.status,
            cancel_at_period_end: subscription.cancel_at_period_end,
            canceled_at: subscription.canceled_at,
            ended_at: subscription.ended_at,
        })
    }
}

fn to_response(subscription: Subscription) -> Result<SubscriptionResponse> {
    let client_secret = subscription.payment_client_secret().map(str::to_string);
    let price = subscription.first_price().cloned().ok_or_else(|| {
        ApiError::ExternalService(format!("Subscription {} has no items", subscription.id))
    })?;

    Ok(SubscriptionResponse {
        customer: subscription.customer.id().to_string(),
        id: subscription.id,
        status: subscription.status,
        start_date: subscription.start_date,
        ended_at: subscription.ended_at,
        price_id: price.id,
        amount: price.unit_amount,
        currency: price.currency,
        interval: price.recurring.map(|recurring| recurring.interval),
        trial_start: subscription.trial_start,
        trial_end: subscription.trial_end,
        metadata: subscription.metadata,
        client_secret,
    })
}
