//! Checkout command: walk the wizard and submit the order.
//!
//! # Environment Variables
//!
//! - `BAZAAR_ORDER_API_URL` - Base URL of the marketplace order API
//! - `BAZAAR_ORDER_API_TOKEN` - Bearer token for the order API

use std::sync::Arc;

use hunar_bazaar_checkout::cart::{CartStore, FileStorage};
use hunar_bazaar_checkout::config::CheckoutConfig;
use hunar_bazaar_checkout::order::HttpOrderGateway;
use hunar_bazaar_checkout::types::{PaymentMethod, ShippingInfo};
use hunar_bazaar_checkout::wizard::{CheckoutWizard, SubmitOutcome};

use super::CommandError;

/// Run the full checkout flow with the given form data.
pub async fn run(shipping: ShippingInfo, payment: PaymentMethod) -> Result<(), CommandError> {
    let config = CheckoutConfig::from_env()?;

    let cart = Arc::new(CartStore::load(Arc::new(FileStorage::new(&config.cart_dir))));
    // The cart view's guard: the wizard is never entered with an empty cart.
    if cart.is_empty() {
        return Err(CommandError::EmptyCart);
    }

    let gateway = Arc::new(HttpOrderGateway::new(&config.order_api)?);
    let wizard = CheckoutWizard::new(Arc::clone(&cart), gateway, config.pricing);

    let totals = wizard.totals();
    tracing::info!(
        "Checking out {} items, {} ({} shipping)",
        cart.item_count(),
        totals.total.display(),
        totals.shipping_cost.display()
    );

    wizard.submit_shipping(shipping)?;

    match wizard.submit_payment(payment).await? {
        SubmitOutcome::Confirmed(order_id) => {
            #[allow(clippy::print_stdout)]
            {
                println!("Order confirmed: {order_id}");
            }
            Ok(())
        }
        SubmitOutcome::Failed(message) => Err(CommandError::SubmissionFailed(message)),
        SubmitOutcome::AlreadySubmitting => {
            // Unreachable with a single CLI invocation; report it anyway.
            tracing::warn!("A submission was already in flight");
            Ok(())
        }
    }
}
