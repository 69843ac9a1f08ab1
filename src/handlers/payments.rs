use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Json,
};
use tracing::info;
use validator::Validate;

use crate::error::{handle_query_rejection, Result};
use crate::handlers::extractors::{validation_error, ValidatedJson};
use crate::handlers::queries::SearchLimitQuery;
use crate::models::{CancelPaymentIntentResponse, PaymentIntentCreate, PaymentIntentResponse};
use crate::services::PaymentService;

#[utoipa::path(
    post,
    path = "/payment-intents",
    tag = "payments",
    request_body = PaymentIntentCreate,
    responses(
        (status = 200, description = "Payment intent created", body = PaymentIntentResponse),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Payment provider error")
    )
)]
pub async fn create_payment_intent(
    State(payments): State<PaymentService>,
    ValidatedJson(data): ValidatedJson<PaymentIntentCreate>,
) -> Result<Json<PaymentIntentResponse>> {
    info!("Creating payment intent for {} {}", data.amount, data.currency.as_str());
    Ok(Json(payments.create(&data).await?))
}

#[utoipa::path(
    get,
    path = "/payment-intents/{payment_intent_id}",
    tag = "payments",
    params(
        ("payment_intent_id" = String, Path, description = "Payment intent ID")
    ),
    responses(
        (status = 200, description = "Payment intent", body = PaymentIntentResponse),
        (status = 404, description = "Payment intent not found")
    )
)]
pub async fn get_payment_intent(
    State(payments): State<PaymentService>,
    Path(payment_intent_id): Path<String>,
) -> Result<Json<PaymentIntentResponse>> {
    Ok(Json(payments.retrieve(&payment_intent_id).await?))
}

/// Payment intents tagged with an application user id
#[utoipa::path(
    get,
    path = "/payment-intents/user/{user_id}",
    tag = "payments",
    params(
        ("user_id" = String, Path, description = "Application user ID"),
        SearchLimitQuery
    ),
    responses(
        (status = 200, description = "Matching payment intents", body = Vec<PaymentIntentResponse>),
        (status = 400, description = "Invalid limit")
    )
)]
pub async fn get_payment_intents_by_user_id(
    State(payments): State<PaymentService>,
    Path(user_id): Path<String>,
    query: std::result::Result<Query<SearchLimitQuery>, QueryRejection>,
) -> Result<Json<Vec<PaymentIntentResponse>>> {
    let Query(query) = query.map_err(handle_query_rejection)?;
    query.validate().map_err(validation_error)?;

    let intents = payments.list_by_user_id(&user_id, query.limit).await?;
    Ok(Json(intents))
}

#[utoipa::path(
    post,
    path = "/payment-intents/{payment_intent_id}/cancel",
    tag = "payments",
    params(
        ("payment_intent_id" = String, Path, description = "Payment intent ID")
    ),
    responses(
        (status = 200, description = "Payment intent canceled", body = CancelPaymentIntentResponse),
        (status = 400, description = "Payment intent cannot be canceled"),
        (status = 404, description = "Payment intent not found")
    )
)]
pub async fn cancel_payment_intent(
    State(payments): State<PaymentService>,
    Path(payment_intent_id): Path<String>,
) -> Result<Json<CancelPaymentIntentResponse>> {
    info!("Canceling payment intent {}", payment_intent_id);
    Ok(Json(payments.cancel(&payment_intent_id).await?))
}
