use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Json,
};
use tracing::info;

use crate::error::{handle_query_rejection, Result};
use crate::handlers::extractors::ValidatedJson;
use crate::handlers::queries::ListProductsQuery;
use crate::models::{
    ArchivedPriceResponse, ArchivedProductResponse, PriceCreate, PriceResponse, ProductCreate,
    ProductResponse,
};
use crate::services::ProductService;

#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = ProductCreate,
    responses(
        (status = 200, description = "Product created", body = ProductResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_product(
    State(products): State<ProductService>,
    ValidatedJson(data): ValidatedJson<ProductCreate>,
) -> Result<Json<ProductResponse>> {
    info!("Creating product {}", data.name);
    Ok(Json(products.create_product(&data).await?))
}

/// Products with their active prices
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "Products", body = Vec<ProductResponse>)
    )
)]
pub async fn list_products(
    State(products): State<ProductService>,
    query: std::result::Result<Query<ListProductsQuery>, QueryRejection>,
) -> Result<Json<Vec<ProductResponse>>> {
    let Query(query) = query.map_err(handle_query_rejection)?;
    Ok(Json(products.list_products(query.include_archived).await?))
}

/// Archive a product and all of its active prices
#[utoipa::path(
    delete,
    path = "/products/{product_id}",
    tag = "products",
    params(
        ("product_id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product archived", body = ArchivedProductResponse),
        (status = 404, description = "Product not found")
    )
)]
pub async fn archive_product(
    State(products): State<ProductService>,
    Path(product_id): Path<String>,
) -> Result<Json<ArchivedProductResponse>> {
    info!("Archiving product {}", product_id);
    Ok(Json(products.archive_product(&product_id).await?))
}

#[utoipa::path(
    post,
    path = "/products/prices",
    tag = "products",
    request_body = PriceCreate,
    responses(
        (status = 200, description = "Price created", body = PriceResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn create_price(
    State(products): State<ProductService>,
    ValidatedJson(data): ValidatedJson<PriceCreate>,
) -> Result<Json<PriceResponse>> {
    info!("Creating price for product {}", data.product_id);
    Ok(Json(products.create_price(&data).await?))
}

#[utoipa::path(
    delete,
    path = "/products/prices/{price_id}",
    tag = "products",
    params(
        ("price_id" = String, Path, description = "Price ID")
    ),
    responses(
        (status = 200, description = "Price archived", body = ArchivedPriceResponse),
        (status = 404, description = "Price not found")
    )
)]
pub async fn archive_price(
    State(products): State<ProductService>,
    Path(price_id): Path<String>,
) -> Result<Json<ArchivedPriceResponse>> {
    info!("Archiving price {}", price_id);
    Ok(Json(products.archive_price(&price_id).await?))
}
