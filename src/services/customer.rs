use std::sync::Arc;

use tracing::info;

use crate::error::{ApiError, Result};
use crate::models::{CustomerCreate, CustomerResponse, DeletedCustomerResponse};
use crate::services::provider::{Customer, PaymentProvider, ProviderError};

const DELETED_MESSAGE: &str = "Customer successfully deleted";

/// Customer operations keyed by provider id or by application user id
#[derive(Clone)]
pub struct CustomerService {
    provider: Arc<dyn PaymentProvider>,
}

impl CustomerService {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    /// Refuses duplicates by email and by bound user id
    pub async fn create(&self, data: &CustomerCreate) -> Result<CustomerResponse> {
        let existing = self.provider.list_customers_by_email(&data.email, 1).await?;
        if !existing.is_empty() {
            return Err(ApiError::already_exists(
                "Customer with this email already exists.",
            ));
        }

        if let Some(metadata) = &data.metadata {
            let bound = self
                .provider
                .search_customers_by_user_id(&metadata.user_id)
                .await?;
            if !bound.is_empty() {
                return Err(ApiError::already_exists(
                    "Customer with this user ID already exists.",
                ));
            }
        }

        let customer = self.provider.create_customer(data).await?;
        info!(customer_id = %customer.id, "Customer created");
        Ok(to_response(customer))
    }

    pub async fn retrieve(&self, customer_id: &str) -> Result<CustomerResponse> {
        let customer = self.provider.retrieve_customer(customer_id).await?;
        Ok(to_response(customer))
    }

    pub async fn get_by_user_id(&self, user_id: &str) -> Result<CustomerResponse> {
        self.find_by_user_id(user_id).await.map(to_response)
    }

    pub async fn update(&self, customer_id: &str, data: &CustomerCreate) -> Result<CustomerResponse> {
        let customer = self.provider.update_customer(customer_id, data).await?;
        info!(customer_id = %customer.id, "Customer updated");
        Ok(to_response(customer))
    }

    pub async fn delete(&self, customer_id: &str) -> Result<DeletedCustomerResponse> {
        let deleted = self
            .provider
            .delete_customer(customer_id)
            .await
            .map_err(|e| match e {
                ProviderError::NotFound(_) => ApiError::not_found("Customer"),
                other => other.into(),
            })?;

        info!(customer_id = %deleted.id, "Customer deleted");
        Ok(DeletedCustomerResponse {
            id: deleted.id,
            deleted: deleted.deleted,
            message: DELETED_MESSAGE.to_string(),
        })
    }

    pub async fn delete_by_user_id(&self, user_id: &str) -> Result<DeletedCustomerResponse> {
        let customer = self.find_by_user_id(user_id).await?;
        self.delete(&customer.id).await
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Customer> {
        self.provider
            .search_customers_by_user_id(user_id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound("Customer not found for the provided user ID.".to_string()))
    }
}

pub(crate) fn to_response(customer: Customer) -> CustomerResponse {
    CustomerResponse {
        id: customer.id,
        email: customer.email,
        name: customer.name,
        shipping: customer.shipping.map(Into::into),
        address: customer.address.map(Into::into),
        metadata: customer.metadata,
    }
}
