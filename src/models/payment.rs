use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{Currency, UserMetadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AllowRedirects {
    Always,
    Never,
}

impl AllowRedirects {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllowRedirects::Always => "always",
            AllowRedirects::Never => "never",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AutomaticPaymentMethods {
    pub enabled: bool,
    pub allow_redirects: AllowRedirects,
}

// Redirect-based methods stay available unless the caller opts out
impl Default for AutomaticPaymentMethods {
    fn default() -> Self {
        Self {
            enabled: true,
            allow_redirects: AllowRedirects::Always,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PaymentIntentCreate {
    /// Amount in the smallest currency unit (e.g. cents)
    #[validate(range(min = 1, message = "amount must be greater than 0"))]
    pub amount: i64,
    pub currency: Currency,
    #[serde(default)]
    pub automatic_payment_methods: AutomaticPaymentMethods,
    #[serde(default)]
    #[validate(nested)]
    pub metadata: Option<UserMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentIntentResponse {
    pub id: String,
    pub client_secret: Option<String>,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    pub metadata: Option<UserMetadata>,
    pub created: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CancelPaymentIntentResponse {
    pub id: String,
    pub status: String,
    pub cancellation_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_automatic_payment_methods() {
        let create: PaymentIntentCreate =
            serde_json::from_value(json!({"amount": 1999, "currency": "usd"})).unwrap();

        assert!(create.validate().is_ok());
        assert_eq!(create.automatic_payment_methods, AutomaticPaymentMethods::default());
        assert_eq!(create.currency, Currency::Usd);
    }

    #[test]
    fn test_zero_amount_is_invalid() {
        let create: PaymentIntentCreate =
            serde_json::from_value(json!({"amount": 0, "currency": "eur"})).unwrap();

        assert!(create.validate().unwrap_err().errors().contains_key("amount"));
    }

    #[test]
    fn test_blank_user_id_in_metadata_is_invalid() {
        let create: PaymentIntentCreate = serde_json::from_value(json!({
            "amount": 100,
            "currency": "brl",
            "metadata": {"user_id": ""}
        }))
        .unwrap();

        assert!(create.validate().is_err());
    }
}
