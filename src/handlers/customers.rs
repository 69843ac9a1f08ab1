use axum::{
    extract::{Path, State},
    response::Json,
};
use tracing::info;

use crate::error::Result;
use crate::handlers::extractors::ValidatedJson;
use crate::models::{CustomerCreate, CustomerResponse, DeletedCustomerResponse};
use crate::services::CustomerService;

/// Create a customer
#[utoipa::path(
    post,
    path = "/customer",
    tag = "customers",
    request_body = CustomerCreate,
    responses(
        (status = 200, description = "Customer created", body = CustomerResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "A customer with this email or user ID already exists"),
        (status = 500, description = "Payment provider error")
    )
)]
pub async fn create_customer(
    State(customers): State<CustomerService>,
    ValidatedJson(data): ValidatedJson<CustomerCreate>,
) -> Result<Json<CustomerResponse>> {
    info!("Creating customer");
    Ok(Json(customers.create(&data).await?))
}

/// Retrieve a customer by provider id
#[utoipa::path(
    get,
    path = "/customer/{customer_id}",
    tag = "customers",
    params(
        ("customer_id" = String, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer details", body = CustomerResponse),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn retrieve_customer(
    State(customers): State<CustomerService>,
    Path(customer_id): Path<String>,
) -> Result<Json<CustomerResponse>> {
    Ok(Json(customers.retrieve(&customer_id).await?))
}

/// Retrieve the customer bound to an application user
#[utoipa::path(
    get,
    path = "/customer/user/{user_id}",
    tag = "customers",
    params(
        ("user_id" = String, Path, description = "Application user ID")
    ),
    responses(
        (status = 200, description = "Customer details", body = CustomerResponse),
        (status = 404, description = "No customer for this user")
    )
)]
pub async fn get_customer_by_user_id(
    State(customers): State<CustomerService>,
    Path(user_id): Path<String>,
) -> Result<Json<CustomerResponse>> {
    Ok(Json(customers.get_by_user_id(&user_id).await?))
}

/// Replace a customer's details
#[utoipa::path(
    put,
    path = "/customer/{customer_id}",
    tag = "customers",
    request_body = CustomerCreate,
    params(
        ("customer_id" = String, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn update_customer(
    State(customers): State<CustomerService>,
    Path(customer_id): Path<String>,
    ValidatedJson(data): ValidatedJson<CustomerCreate>,
) -> Result<Json<CustomerResponse>> {
    info!("Updating customer {}", customer_id);
    Ok(Json(customers.update(&customer_id, &data).await?))
}

#[utoipa::path(
    delete,
    path = "/customer/{customer_id}",
    tag = "customers",
    params(
        ("customer_id" = String, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer deleted", body = DeletedCustomerResponse),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn delete_customer(
    State(customers): State<CustomerService>,
    Path(customer_id): Path<String>,
) -> Result<Json<DeletedCustomerResponse>> {
    info!("Deleting customer {}", customer_id);
    Ok(Json(customers.delete(&customer_id).await?))
}

#[utoipa::path(
    delete,
    path = "/customer/user/{user_id}",
    tag = "customers",
    params(
        ("user_id" = String, Path, description = "Application user ID")
    ),
    responses(
        (status = 200, description = "Customer deleted", body = DeletedCustomerResponse),
        (status = 404, description = "No customer for this user")
    )
)]
pub async fn delete_customer_by_user_id(
    State(customers): State<CustomerService>,
    Path(user_id): Path<String>,
) -> Result<Json<DeletedCustomerResponse>> {
    info!("Deleting customer for user {}", user_id);
    Ok(Json(customers.delete_by_user_id(&user_id).await?))
}
