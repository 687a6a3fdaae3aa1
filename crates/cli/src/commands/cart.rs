//! Cart management commands.
//!
//! Operates on the same durable slot the marketplace client uses, so the
//! cart survives between invocations exactly as it survives page reloads.

use std::sync::Arc;

use hunar_bazaar_checkout::cart::{CartStore, FileStorage};
use hunar_bazaar_checkout::config::CheckoutConfig;
use hunar_bazaar_checkout::pricing::compute_totals;
use hunar_bazaar_checkout::types::CatalogProduct;
use hunar_bazaar_core::{Money, ProductId};

use super::CommandError;

fn open_store(config: &CheckoutConfig) -> CartStore {
    CartStore::load(Arc::new(FileStorage::new(&config.cart_dir)))
}

/// Add a catalog product to the cart.
pub fn add(
    product_id: &str,
    name: &str,
    localized_name: &str,
    price: u64,
    stock: u32,
    quantity: u32,
) -> Result<(), CommandError> {
    let config = CheckoutConfig::from_env()?;
    let store = open_store(&config);

    let product = CatalogProduct {
        product_id: ProductId::new(product_id),
        name: name.to_string(),
        localized_name: localized_name.to_string(),
        unit_price: Money::new(price),
        available_stock: stock,
        images: Vec::new(),
    };
    store.add_item(&product, quantity)?;

    tracing::info!(
        "Added {} x {} to cart ({} items total)",
        quantity,
        name,
        store.item_count()
    );
    Ok(())
}

/// Show cart contents and totals.
pub fn list() -> Result<(), CommandError> {
    let config = CheckoutConfig::from_env()?;
    let store = open_store(&config);

    let lines = store.snapshot();
    let totals = compute_totals(&lines, &config.pricing);

    #[allow(clippy::print_stdout)]
    {
        if lines.is_empty() {
            println!("Cart is empty");
            return Ok(());
        }

        for line in &lines {
            println!(
                "{:<12} {:<28} {:>3} x {:>10} = {:>10}",
                line.product_id,
                line.name,
                line.quantity,
                line.unit_price.display(),
                line.line_total().display(),
            );
        }
        println!();
        println!("Subtotal: {}", totals.subtotal.display());
        println!("Shipping: {}", totals.shipping_cost.display());
        println!("Total:    {}", totals.total.display());
    }
    Ok(())
}

/// Set the quantity of a cart line (clamped to the stock snapshot).
pub fn update(product_id: &str, quantity: u32) -> Result<(), CommandError> {
    let config = CheckoutConfig::from_env()?;
    let store = open_store(&config);

    store.update_quantity(&ProductId::new(product_id), quantity)?;
    tracing::info!("Updated {product_id}");
    Ok(())
}

/// Remove a cart line.
pub fn remove(product_id: &str) -> Result<(), CommandError> {
    let config = CheckoutConfig::from_env()?;
    let store = open_store(&config);

    store.remove_item(&ProductId::new(product_id))?;
    tracing::info!("Removed {product_id}");
    Ok(())
}

/// Empty the cart.
pub fn clear() -> Result<(), CommandError> {
    let config = CheckoutConfig::from_env()?;
    let store = open_store(&config);

    store.clear()?;
    tracing::info!("Cart cleared");
    Ok(())
}
