//! Pure price computation over a cart snapshot.
//!
//! No side effects and no I/O: the same snapshot always produces the same
//! totals, so both the cart view and the checkout wizard can recompute on
//! every render.

use hunar_bazaar_core::Money;
use serde::{Deserialize, Serialize};

use crate::types::CartLineItem;

/// Default order value above which shipping is free, in rupees.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD: Money = Money::new(1000);

/// Default flat shipping fee, in rupees.
pub const DEFAULT_FLAT_SHIPPING_FEE: Money = Money::new(150);

/// Shipping price rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingConfig {
    /// Subtotals strictly above this ship free.
    pub free_shipping_threshold: Money,
    /// Fee charged below (and at) the threshold.
    pub flat_shipping_fee: Money,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            free_shipping_threshold: DEFAULT_FREE_SHIPPING_THRESHOLD,
            flat_shipping_fee: DEFAULT_FLAT_SHIPPING_FEE,
        }
    }
}

/// Derived totals for a cart snapshot. Never stored; recomputed on demand.
///
/// Invariant: `total == subtotal + shipping_cost`, and `shipping_cost` is
/// either zero or the configured flat fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSnapshot {
    /// Sum of `unit_price * quantity` across all lines.
    pub subtotal: Money,
    /// Zero above the free-shipping threshold, the flat fee otherwise.
    pub shipping_cost: Money,
    /// `subtotal + shipping_cost`.
    pub total: Money,
}

/// Compute subtotal, shipping, and total for a cart snapshot.
#[must_use]
pub fn compute_totals(lines: &[CartLineItem], config: &PricingConfig) -> PricingSnapshot {
    let subtotal: Money = lines.iter().map(CartLineItem::line_total).sum();

    let shipping_cost = if subtotal > config.free_shipping_threshold {
        Money::ZERO
    } else {
        config.flat_shipping_fee
    };

    PricingSnapshot {
        subtotal,
        shipping_cost,
        total: subtotal.saturating_add(shipping_cost),
    }
}
