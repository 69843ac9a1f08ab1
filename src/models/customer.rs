use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::UserMetadata;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Address {
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub country: String,
    #[validate(length(min = 1))]
    pub line1: String,
    #[validate(length(min = 1))]
    pub postal_code: String,
    #[validate(length(min = 1))]
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Shipping {
    #[validate(nested)]
    pub address: Address,
    #[validate(length(min = 1))]
    pub name: String,
}

/// Body for creating or replacing a customer
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CustomerCreate {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(nested)]
    pub shipping: Shipping,
    #[validate(nested)]
    pub address: Address,
    #[serde(default)]
    #[validate(nested)]
    pub metadata: Option<UserMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub shipping: Option<Shipping>,
    pub address: Option<Address>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedCustomerResponse {
    pub id: String,
    pub deleted: bool,
    pub message: String,
}
