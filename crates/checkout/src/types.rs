//! Domain types for the cart and checkout pipeline.
//!
//! These types mirror the JSON shapes exchanged with the marketplace backend
//! and the durable cart slot, so everything serializes in camelCase.

use hunar_bazaar_core::{Money, ProductId};
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog Types
// =============================================================================

/// A product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt: Option<String>,
}

/// A product record as supplied by the catalog.
///
/// The catalog (marketplace browsing, search) is an external collaborator;
/// this is the shape it hands over when a buyer adds a product to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    /// Product ID.
    pub product_id: ProductId,
    /// English display name.
    pub name: String,
    /// Urdu display name.
    pub localized_name: String,
    /// Price per unit in whole rupees.
    pub unit_price: Money,
    /// Units in stock at the time the record was fetched.
    pub available_stock: u32,
    /// Product images.
    pub images: Vec<ProductImage>,
}

// =============================================================================
// Cart Types
// =============================================================================

/// One product entry in the cart, uniquely keyed by product ID.
///
/// `available_stock` is the catalog snapshot taken when the product was
/// (last) added; it bounds quantity clamping and is not re-validated against
/// the server until order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Product ID.
    pub product_id: ProductId,
    /// English display name.
    pub name: String,
    /// Urdu display name.
    pub localized_name: String,
    /// Price per unit in whole rupees.
    pub unit_price: Money,
    /// Units of this product in the cart. Invariant: `1 <= quantity <= available_stock`.
    pub quantity: u32,
    /// Stock snapshot taken at add-time.
    pub available_stock: u32,
    /// Product images (display only).
    pub images: Vec<ProductImage>,
}

impl CartLineItem {
    /// Build a line from a catalog record with the given quantity.
    #[must_use]
    pub fn from_product(product: &CatalogProduct, quantity: u32) -> Self {
        Self {
            product_id: product.product_id.clone(),
            name: product.name.clone(),
            localized_name: product.localized_name.clone(),
            unit_price: product.unit_price,
            quantity,
            available_stock: product.available_stock,
            images: product.images.clone(),
        }
    }

    /// Total price for this line.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.saturating_mul(self.quantity)
    }
}

// =============================================================================
// Checkout Form Types
// =============================================================================

/// Profile of the authenticated buyer, as supplied by the user-context
/// collaborator. Used only to pre-fill the shipping form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
}

/// Shipping details collected in the first checkout step.
///
/// Every field is required and must be non-empty before the wizard advances
/// to the payment step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    /// Recipient name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Street address.
    pub address: String,
    /// City or village.
    pub city: String,
    /// Postal code.
    pub postal_code: String,
    /// Delivery notes.
    pub notes: String,
}

impl ShippingInfo {
    /// Pre-fill contact fields from the authenticated buyer's profile.
    ///
    /// Address fields stay empty; the buyer always types those.
    #[must_use]
    pub fn prefill_from(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            ..Self::default()
        }
    }
}

/// Card details collected when paying by card.
///
/// These are transmitted to the order endpoint verbatim; no client-side
/// payment processing happens anywhere in this pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    /// Card number.
    pub card_number: String,
    /// Name on the card.
    pub holder_name: String,
    /// Expiry in MM/YY form.
    pub expiry: String,
    /// Card verification value.
    pub cvv: String,
}

/// How the buyer pays.
///
/// Card details travel inside the variant, so "details present only when the
/// method is card" holds by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Pay by card; details are transmitted with the order.
    Card(CardDetails),
    /// Pay the courier on delivery.
    CashOnDelivery,
}

impl PaymentMethod {
    /// The wire name of this method (`"card"` or `"cashOnDelivery"`).
    #[must_use]
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Self::Card(_) => "card",
            Self::CashOnDelivery => "cashOnDelivery",
        }
    }

    /// Card details, when paying by card.
    #[must_use]
    pub const fn card_details(&self) -> Option<&CardDetails> {
        match self {
            Self::Card(details) => Some(details),
            Self::CashOnDelivery => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn clay_pot() -> CatalogProduct {
        CatalogProduct {
            product_id: ProductId::new("prod-1"),
            name: "Clay pot".to_string(),
            localized_name: "مٹی کا برتن".to_string(),
            unit_price: Money::new(450),
            available_stock: 5,
            images: vec![ProductImage {
                url: "https://cdn.example.com/pot.jpg".to_string(),
                alt: Some("Hand-thrown clay pot".to_string()),
            }],
        }
    }

    #[test]
    fn test_line_item_storage_schema_is_camel_case() {
        let line = CartLineItem::from_product(&clay_pot(), 2);
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["productId"], "prod-1");
        assert_eq!(json["localizedName"], "مٹی کا برتن");
        assert_eq!(json["unitPrice"], 450);
        assert_eq!(json["availableStock"], 5);
        assert_eq!(json["quantity"], 2);
    }

    #[test]
    fn test_line_total() {
        let line = CartLineItem::from_product(&clay_pot(), 3);
        assert_eq!(line.line_total(), Money::new(1350));
    }

    #[test]
    fn test_shipping_prefill_leaves_address_empty() {
        let profile = UserProfile {
            name: "Zainab Bibi".to_string(),
            email: "zainab@example.com".to_string(),
            phone: "0300-1234567".to_string(),
        };
        let info = ShippingInfo::prefill_from(&profile);
        assert_eq!(info.name, "Zainab Bibi");
        assert_eq!(info.email, "zainab@example.com");
        assert!(info.address.is_empty());
        assert!(info.postal_code.is_empty());
    }

    #[test]
    fn test_payment_method_wire_names() {
        let card = PaymentMethod::Card(CardDetails {
            card_number: "4242424242424242".to_string(),
            holder_name: "Zainab Bibi".to_string(),
            expiry: "12/27".to_string(),
            cvv: "123".to_string(),
        });
        assert_eq!(card.wire_name(), "card");
        assert!(card.card_details().is_some());
        assert_eq!(PaymentMethod::CashOnDelivery.wire_name(), "cashOnDelivery");
        assert!(PaymentMethod::CashOnDelivery.card_details().is_none());
    }
}
