use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

use crate::services::webhook::DEFAULT_TOLERANCE_SECS;

pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: String,
    pub host: String,
    pub port: u16,
    /// Server-side request timeout in seconds
    pub request_timeout: u64,
    pub cors_origins: Vec<String>,
    pub stripe: StripeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeConfig {
    #[serde(skip_serializing)]
    pub secret_key: String,
    #[serde(skip_serializing)]
    pub webhook_secret: String,
    pub api_base: String,
    pub api_version: Option<String>,
    pub timeout_secs: u64,
    pub webhook_tolerance_secs: u64,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            webhook_secret: String::new(),
            api_base: DEFAULT_STRIPE_API_BASE.to_string(),
            api_version: None,
            timeout_secs: 10,
            webhook_tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 4242,
            request_timeout: 30,
            cors_origins: default_cors_origins(),
            stripe: StripeConfig::default(),
        }
    }
}

fn default_cors_origins() -> Vec<String> {
    [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://localhost:4173",
        "http://localhost:4242",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let stripe_defaults = StripeConfig::default();

        Ok(Config {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", lookup("PORT"), defaults.port)?,
            request_timeout: parse_or(
                "REQUEST_TIMEOUT",
                lookup("REQUEST_TIMEOUT"),
                defaults.request_timeout,
            )?,
            cors_origins: lookup("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            stripe: StripeConfig {
                secret_key: lookup("STRIPE_SECRET_KEY")
                    .ok_or_else(|| anyhow!("STRIPE_SECRET_KEY environment variable is required"))?,
                webhook_secret: lookup("STRIPE_WEBHOOK_SECRET").ok_or_else(|| {
                    anyhow!("STRIPE_WEBHOOK_SECRET environment variable is required")
                })?,
                api_base: lookup("STRIPE_API_BASE")
                    .map(|base| base.trim_end_matches('/').to_string())
                    .unwrap_or(stripe_defaults.api_base),
                api_version: lookup("STRIPE_API_VERSION").filter(|v| !v.is_empty()),
                timeout_secs: parse_or(
                    "STRIPE_TIMEOUT_SECS",
                    lookup("STRIPE_TIMEOUT_SECS"),
                    stripe_defaults.timeout_secs,
                )?,
                webhook_tolerance_secs: parse_or(
                    "WEBHOOK_TOLERANCE_SECS",
                    lookup("WEBHOOK_TOLERANCE_SECS"),
                    stripe_defaults.webhook_tolerance_secs,
                )?,
            },
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check secret formats. Fatal in production, warnings elsewhere.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        let key = &self.stripe.secret_key;
        if !(key.starts_with("sk_") || key.starts_with("rk_")) {
            problems.push("STRIPE_SECRET_KEY must start with sk_ or rk_".to_string());
        }
        if !self.stripe.webhook_secret.starts_with("whsec_") {
            problems.push("STRIPE_WEBHOOK_SECRET does not start with whsec_".to_string());
        }
        if self.stripe.webhook_tolerance_secs == 0 {
            problems.push("WEBHOOK_TOLERANCE_SECS must be greater than 0".to_string());
        }

        if problems.is_empty() {
            return Ok(());
        }

        if self.is_production() {
            return Err(anyhow!("Invalid configuration: {}", problems.join("; ")));
        }

        for problem in &problems {
            warn!("Configuration: {}", problem);
        }
        Ok(())
    }
}

fn parse_or<T: std::str::FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| anyhow!("{} has an invalid value: {}", name, value)),
        None => Ok(default),
    }
}
