use std::sync::Arc;

use tracing::info;

use crate::error::{ApiError, Result};
use crate::models::{
    CancelPaymentIntentResponse, PaymentIntentCreate, PaymentIntentResponse, UserMetadata,
};
use crate::services::provider::{PaymentIntent, PaymentProvider};

pub const MAX_SEARCH_LIMIT: u32 = 100;

#[derive(Clone)]
pub struct PaymentService {
    provider: Arc<dyn PaymentProvider>,
}

impl PaymentService {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn create(&self, data: &PaymentIntentCreate) -> Result<PaymentIntentResponse> {
        let intent = self.provider.create_payment_intent(data).await?;
        info!(
            payment_intent_id = %intent.id,
            amount = intent.amount,
            currency = %intent.currency,
            "Payment intent created"
        );
        Ok(to_response(intent))
    }

    pub async fn retrieve(&self, payment_intent_id: &str) -> Result<PaymentIntentResponse> {
        let intent = self.provider.retrieve_payment_intent(payment_intent_id).await?;
        Ok(to_response(intent))
    }

    /// Most recent intents tagged with `user_id`, at most `limit` (1..=100)
    pub async fn list_by_user_id(&self, user_id: &str, limit: u32) -> Result<Vec<PaymentIntentResponse>> {
        if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
            return Err(ApiError::validation_field(
                "limit",
                format!("limit must be between 1 and {}", MAX_SEARCH_LIMIT),
            ));
        }

        let intents = self
            .provider
            .search_payment_intents_by_user_id(user_id, limit)
            .await?;
        Ok(intents.into_iter().map(to_response).collect())
    }

    pub async fn cancel(&self, payment_intent_id: &str) -> Result<CancelPaymentIntentResponse> {
        let intent = self.provider.cancel_payment_intent(payment_intent_id).await?;
        info!(payment_intent_id = %intent.id, status = %intent.status, "Payment intent canceled");
        Ok(CancelPaymentIntentResponse {
            id: intent.id,
            status: intent.status,
            cancellation_reason: intent.cancellation_reason,
        })
    }
}

fn to_response(intent: PaymentIntent) -> PaymentIntentResponse {
    PaymentIntentResponse {
        metadata: UserMetadata::from_map(&intent.metadata),
        id: intent.id,
        client_secret: intent.client_secret,
        status: intent.status,
        amount: intent.amount,
        currency: intent.currency,
        created: intent.created,
    }
}
