//! Hunar Bazaar Checkout - cart and checkout pipeline library.
//!
//! The one stateful core of the marketplace client: a durable local cart,
//! pure price computation, a checkout state machine, and the single boundary
//! that submits an order to the backend exactly once per attempt.
//!
//! # Architecture
//!
//! - [`cart`] - `CartStore`, sole owner of cart contents, write-through to a
//!   durable key-value slot
//! - [`pricing`] - pure subtotal/shipping/total computation
//! - [`wizard`] - the `Shipping -> Payment -> Submitting -> Confirmed | Failed`
//!   state machine with its double-submission guard
//! - [`order`] - the HTTP order-submission gateway
//! - [`config`] - environment-driven configuration
//! - [`types`] - domain records shared across the pipeline
//!
//! The catalog, authentication, and every rendering surface are external
//! collaborators: they hand in [`types::CatalogProduct`] and
//! [`types::UserProfile`] records and read snapshots back out.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use hunar_bazaar_checkout::cart::{CartStore, FileStorage};
//! use hunar_bazaar_checkout::config::CheckoutConfig;
//! use hunar_bazaar_checkout::order::HttpOrderGateway;
//! use hunar_bazaar_checkout::wizard::CheckoutWizard;
//!
//! let config = CheckoutConfig::from_env()?;
//! let cart = Arc::new(CartStore::load(Arc::new(FileStorage::new(&config.cart_dir))));
//! cart.add_item(&product, 1)?;
//!
//! let gateway = Arc::new(HttpOrderGateway::new(&config.order_api)?);
//! let wizard = CheckoutWizard::new(Arc::clone(&cart), gateway, config.pricing);
//! wizard.submit_shipping(shipping_info)?;
//! let outcome = wizard.submit_payment(payment_method).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod order;
pub mod pricing;
pub mod types;
pub mod wizard;
