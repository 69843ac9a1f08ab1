//! Common extractors for API handlers.
//!
//! [`ValidatedJson`] deserializes a JSON body and runs its `validator`
//! rules, so handlers only ever see well-formed input.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::{handle_json_rejection, ApiError};

/// JSON body that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(handle_json_rejection)?;

        value.validate().map_err(validation_error)?;
        Ok(ValidatedJson(value))
    }
}

/// Report the first failing field, using dotted paths for nested structs
pub fn validation_error(errors: ValidationErrors) -> ApiError {
    let mut failures = Vec::new();
    collect_failures(&errors, String::new(), &mut failures);
    failures.sort();

    match failures.into_iter().next() {
        Some((field, message)) => ApiError::validation_field(field, message),
        None => ApiError::Validation(errors.to_string()),
    }
}

fn collect_failures(errors: &ValidationErrors, prefix: String, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(failures) => {
                for failure in failures {
                    let message = failure
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid ({})", path, failure.code));
                    out.push((path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_failures(nested, path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_failures(nested, format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CustomerCreate;
    use serde_json::json;

    #[test]
    fn test_nested_field_path_is_reported() {
        let create: CustomerCreate = serde_json::from_value(json!({
            "email": "ada@example.com",
            "name": "Ada",
            "shipping": {"name": "Ada", "address": {"city": "", "country": "GB", "line1": "1", "postal_code": "1", "state": "L"}},
            "address": {"city": "London", "country": "GB", "line1": "1", "postal_code": "1", "state": "L"}
        }))
        .unwrap();

        let err = validation_error(create.validate().unwrap_err());
        match err {
            ApiError::ValidationWithField { field, .. } => {
                assert_eq!(field, "shipping.address.city")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_custom_message_is_kept() {
        let create: CustomerCreate = serde_json::from_value(json!({
            "email": "nope",
            "name": "Ada",
            "shipping": {"name": "Ada", "address": {"city": "L", "country": "GB", "line1": "1", "postal_code": "1", "state": "L"}},
            "address": {"city": "L", "country": "GB", "line1": "1", "postal_code": "1", "state": "L"}
        }))
        .unwrap();

        match validation_error(create.validate().unwrap_err()) {
            ApiError::ValidationWithField { field, message } => {
                assert_eq!(field, "email");
                assert_eq!(message, "email must be a valid address");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
