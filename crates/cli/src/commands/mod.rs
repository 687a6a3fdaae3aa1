//! CLI command implementations.

pub mod cart;
pub mod checkout;

use hunar_bazaar_checkout::cart::StorageError;
use hunar_bazaar_checkout::config::ConfigError;
use hunar_bazaar_checkout::order::OrderError;
use hunar_bazaar_checkout::wizard::WizardError;
use thiserror::Error;

/// Errors that can occur running a CLI command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The durable cart slot could not be written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A checkout transition was rejected.
    #[error(transparent)]
    Wizard(#[from] WizardError),

    /// The order gateway could not be constructed.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Checkout was requested with an empty cart.
    #[error("cart is empty; add items before checking out")]
    EmptyCart,

    /// The order endpoint reported a failure.
    #[error("order submission failed: {0}")]
    SubmissionFailed(String),
}
