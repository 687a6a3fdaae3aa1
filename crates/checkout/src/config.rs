//! Checkout configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BAZAAR_ORDER_API_URL` - Base URL of the marketplace order API
//! - `BAZAAR_ORDER_API_TOKEN` - Bearer token for the order API
//!
//! ## Optional
//! - `BAZAAR_SUBMIT_TIMEOUT_SECS` - Order submission timeout (default: 30)
//! - `BAZAAR_FREE_SHIPPING_THRESHOLD` - Rupee subtotal above which shipping
//!   is free (default: 1000)
//! - `BAZAAR_FLAT_SHIPPING_FEE` - Flat shipping fee in rupees (default: 150)
//! - `BAZAAR_CART_DIR` - Directory for the durable cart slot
//!   (default: .hunar-bazaar)

use std::path::PathBuf;
use std::time::Duration;

use hunar_bazaar_core::Money;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::pricing::{DEFAULT_FLAT_SHIPPING_FEE, DEFAULT_FREE_SHIPPING_THRESHOLD, PricingConfig};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Checkout pipeline configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Order API connection settings.
    pub order_api: OrderApiConfig,
    /// Shipping price rules.
    pub pricing: PricingConfig,
    /// Directory holding the durable cart slot.
    pub cart_dir: PathBuf,
}

/// Order API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct OrderApiConfig {
    /// Base URL of the order API.
    pub base_url: Url,
    /// Bearer token presented on order submission.
    pub access_token: SecretString,
    /// Bound on how long a submission may stay in flight.
    pub submit_timeout: Duration,
}

impl std::fmt::Debug for OrderApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("access_token", &"[REDACTED]")
            .field("submit_timeout", &self.submit_timeout)
            .finish()
    }
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let order_api = OrderApiConfig::from_env()?;

        let pricing = PricingConfig {
            free_shipping_threshold: Money::new(get_parsed_or_default(
                "BAZAAR_FREE_SHIPPING_THRESHOLD",
                DEFAULT_FREE_SHIPPING_THRESHOLD.amount(),
            )?),
            flat_shipping_fee: Money::new(get_parsed_or_default(
                "BAZAAR_FLAT_SHIPPING_FEE",
                DEFAULT_FLAT_SHIPPING_FEE.amount(),
            )?),
        };

        let cart_dir = PathBuf::from(get_env_or_default("BAZAAR_CART_DIR", ".hunar-bazaar"));

        Ok(Self {
            order_api,
            pricing,
            cart_dir,
        })
    }
}

impl OrderApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_url = get_required_env("BAZAAR_ORDER_API_URL")?;
        let base_url = Url::parse(&raw_url).map_err(|e| {
            ConfigError::InvalidEnvVar("BAZAAR_ORDER_API_URL".to_string(), e.to_string())
        })?;

        let access_token = SecretString::from(get_required_env("BAZAAR_ORDER_API_TOKEN")?);

        let submit_timeout =
            Duration::from_secs(get_parsed_or_default("BAZAAR_SUBMIT_TIMEOUT_SECS", 30)?);

        Ok(Self {
            base_url,
            access_token,
            submit_timeout,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable parsed as `u64`, with a default.
fn get_parsed_or_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_api_debug_redacts_token() {
        let config = OrderApiConfig {
            base_url: Url::parse("https://api.hunarbazaar.pk").unwrap(),
            access_token: SecretString::from("super_secret_token"),
            submit_timeout: Duration::from_secs(30),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("https://api.hunarbazaar.pk"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_token"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("BAZAAR_ORDER_API_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: BAZAAR_ORDER_API_URL"
        );
    }
}
