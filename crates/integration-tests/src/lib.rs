//! Integration tests for the Hunar Bazaar checkout pipeline.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p hunar-bazaar-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Durable cart slot behavior across reloads
//! - `checkout_pipeline` - Full checkout flows against a mock order API
//!
//! The helpers here build the fixtures every test needs: catalog records,
//! a complete shipping form, and an order API config pointed at a local
//! mock server.

use std::time::Duration;

use hunar_bazaar_checkout::config::OrderApiConfig;
use hunar_bazaar_checkout::types::{CatalogProduct, ProductImage, ShippingInfo};
use hunar_bazaar_core::{Money, ProductId};
use secrecy::SecretString;
use url::Url;

/// Bearer token every test config presents.
pub const TEST_TOKEN: &str = "test-token";

/// A catalog product record.
#[must_use]
pub fn product(id: &str, price: u64, stock: u32) -> CatalogProduct {
    CatalogProduct {
        product_id: ProductId::new(id),
        name: format!("Product {id}"),
        localized_name: format!("پروڈکٹ {id}"),
        unit_price: Money::new(price),
        available_stock: stock,
        images: vec![ProductImage {
            url: format!("https://cdn.hunarbazaar.pk/{id}.jpg"),
            alt: None,
        }],
    }
}

/// A complete, valid shipping form.
#[must_use]
pub fn shipping() -> ShippingInfo {
    ShippingInfo {
        name: "Zainab Bibi".to_string(),
        email: "zainab@example.com".to_string(),
        phone: "0300-1234567".to_string(),
        address: "House 12, Street 4".to_string(),
        city: "Bahawalpur".to_string(),
        postal_code: "63100".to_string(),
        notes: "Call before delivery".to_string(),
    }
}

/// Order API config pointed at a mock server.
///
/// # Panics
///
/// Panics if `base_url` is not a valid URL (test fixture misuse).
#[must_use]
pub fn order_api_config(base_url: &str, submit_timeout: Duration) -> OrderApiConfig {
    #[allow(clippy::unwrap_used)]
    OrderApiConfig {
        base_url: Url::parse(base_url).unwrap(),
        access_token: SecretString::from(TEST_TOKEN),
        submit_timeout,
    }
}
