use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Json,
};
use tracing::info;

use crate::error::{handle_query_rejection, Result};
use crate::handlers::extractors::ValidatedJson;
use crate::handlers::queries::CancelSubscriptionQuery;
use crate::models::{CancelSubscriptionResponse, SubscriptionCreate, SubscriptionResponse};
use crate::services::SubscriptionService;

/// Start a subscription in the incomplete state
#[utoipa::path(
    post,
    path = "/subscriptions",
    tag = "subscriptions",
    request_body = SubscriptionCreate,
    responses(
        (status = 200, description = "Subscription created", body = SubscriptionResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Customer or price not found")
    )
)]
pub async fn create_subscription(
    State(subscriptions): State<SubscriptionService>,
    ValidatedJson(data): ValidatedJson<SubscriptionCreate>,
) -> Result<Json<SubscriptionResponse>> {
    info!(
        "Creating subscription for customer {} on price {}",
        data.customer_id, data.price_id
    );
    Ok(Json(subscriptions.create(&data).await?))
}

#[utoipa::path(
    get,
    path = "/subscriptions/users/{user_id}",
    tag = "subscriptions",
    params(
        ("user_id" = String, Path, description = "Application user ID")
    ),
    responses(
        (status = 200, description = "Subscriptions for the user", body = Vec<SubscriptionResponse>)
    )
)]
pub async fn get_user_subscriptions(
    State(subscriptions): State<SubscriptionService>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<SubscriptionResponse>>> {
    Ok(Json(subscriptions.list_by_user_id(&user_id).await?))
}

#[utoipa::path(
    post,
    path = "/subscriptions/{subscription_id}/cancel",
    tag = "subscriptions",
    params(
        ("subscription_id" = String, Path, description = "Subscription ID"),
        CancelSubscriptionQuery
    ),
    responses(
        (status = 200, description = "Cancellation applied", body = CancelSubscriptionResponse),
        (status = 404, description = "Subscription not found")
    )
)]
pub async fn cancel_subscription(
    State(subscriptions): State<SubscriptionService>,
    Path(subscription_id): Path<String>,
    query: std::result::Result<Query<CancelSubscriptionQuery>, QueryRejection>,
) -> Result<Json<CancelSubscriptionResponse>> {
    let Query(query) = query.map_err(handle_query_rejection)?;
    info!(
        "Canceling subscription {} (at_period_end: {})",
        subscription_id, query.at_period_end
    );
    Ok(Json(
        subscriptions
            .cancel(&subscription_id, query.at_period_end)
            .await?,
    ))
}
