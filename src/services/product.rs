use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Result;
use crate::models::product::RecurringResponse;
use crate::models::{
    ArchivedPriceResponse, ArchivedProductResponse, PriceCreate, PriceResponse, ProductCreate,
    ProductResponse,
};
use crate::services::provider::{PaymentProvider, Price, Product};

#[derive(Clone)]
pub struct ProductService {
    provider: Arc<dyn PaymentProvider>,
}

impl ProductService {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn create_product(&self, data: &ProductCreate) -> Result<ProductResponse> {
        let product = self.provider.create_product(data).await?;
        info!(product_id = %product.id, "Product created");
        Ok(product_response(product, None))
    }

    /// Products with their active prices. Archived products are skipped
    /// unless `include_archived` is set.
    pub async fn list_products(&self, include_archived: bool) -> Result<Vec<ProductResponse>> {
        let active = if include_archived { None } else { Some(true) };
        let products = self.provider.list_products(active).await?;

        let mut result = Vec::with_capacity(products.len());
        for product in products {
            let prices = self.provider.list_prices(&product.id, Some(true)).await?;
            debug!(product_id = %product.id, prices = prices.len(), "Loaded product prices");
            let prices = prices.into_iter().map(price_response).collect();
            result.push(product_response(product, Some(prices)));
        }
        Ok(result)
    }

    /// Archives every active price of the product, then the product itself
    pub async fn archive_product(&self, product_id: &str) -> Result<ArchivedProductResponse> {
        let prices = self.provider.list_prices(product_id, Some(true)).await?;
        for price in &prices {
            self.provider.archive_price(&price.id).await?;
        }

        let product = self.provider.archive_product(product_id).await?;
        info!(
            product_id = %product.id,
            archived_prices = prices.len(),
            "Product archived"
        );

        Ok(ArchivedProductResponse {
            id: product.id,
            name: product.name,
            active: product.active,
            archived_at: product.updated,
            message: "Product successfully archived".to_string(),
        })
    }

    pub async fn create_price(&self, data: &PriceCreate) -> Result<PriceResponse> {
        let price = self.provider.create_price(data).await?;
        info!(price_id = %price.id, product_id = %price.product.id(), "Price created");
        Ok(price_response(price))
    }

    pub async fn archive_price(&self, price_id: &str) -> Result<ArchivedPriceResponse> {
        let price = self.provider.archive_price(price_id).await?;
        info!(price_id = %price.id, "Price archived");

        Ok(ArchivedPriceResponse {
            product_id: price.product.id().to_string(),
            id: price.id,
            active: price.active,
            message: "Price successfully archived".to_string(),
        })
    }
}

fn product_response(product: Product, prices: Option<Vec<PriceResponse>>) -> ProductResponse {
    ProductResponse {
        id: product.id,
        name: product.name,
        description: product.description,
        metadata: Some(product.metadata).filter(|m| !m.is_empty()),
        created: product.created,
        prices,
    }
}

pub(crate) fn price_response(price: Price) -> PriceResponse {
    // Product name is only known when the product was expanded
    let name = price
        .product
        .as_object()
        .map(|product| product.name.clone())
        .unwrap_or_default();

    PriceResponse {
        product_id: price.product.id().to_string(),
        name,
        id: price.id,
        unit_amount: price.unit_amount,
        currency: price.currency,
        created: price.created,
        recurring: price.recurring.map(|recurring| RecurringResponse {
            interval: recurring.interval,
            interval_count: recurring.interval_count,
            trial_period_days: recurring.trial_period_days,
        }),
    }
}
