use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::Result;
use crate::services::webhook::{OutcomeRecord, SIGNATURE_HEADER};
use crate::services::WebhookService;

#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAck {
    pub received: bool,
    /// What the event was interpreted as
    #[schema(value_type = Object)]
    pub processed: OutcomeRecord,
}

/// Stripe webhook receiver
///
/// The body must be the exact bytes Stripe sent; it is verified against the
/// `stripe-signature` header before being parsed.
#[utoipa::path(
    post,
    path = "/webhooks/stripe",
    tag = "webhooks",
    request_body(content = String, description = "Raw Stripe event JSON", content_type = "application/json"),
    params(
        ("stripe-signature" = String, Header, description = "Stripe signature header")
    ),
    responses(
        (status = 200, description = "Event verified and processed", body = WebhookAck),
        (status = 400, description = "Invalid signature or payload")
    )
)]
pub async fn stripe_webhook(
    State(webhooks): State<WebhookService>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>> {
    // A non-ASCII header value is treated like a missing one
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    let processed = webhooks.process(&body, signature)?;

    Ok(Json(WebhookAck {
        received: true,
        processed,
    }))
}
