//! The cart store: sole owner of cart contents.
//!
//! All cart mutation goes through [`CartStore`]. Every mutating operation
//! writes the full line list through to durable storage before returning, so
//! a reload reconstructs the exact prior cart. Quantity bounds are enforced
//! by silent clamping, never by rejection: out-of-range requests saturate to
//! the nearest valid value.

pub mod storage;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hunar_bazaar_core::ProductId;
use tracing::{debug, warn};

use crate::types::{CartLineItem, CatalogProduct};

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};

/// The durable slot the cart mirrors into.
pub const CART_SLOT: &str = "cart";

/// Owner of the cart's line items, shared between the cart view and the
/// checkout wizard.
///
/// State lives behind a mutex; each operation is a single
/// read-modify-write-persist step. There is exactly one writer context per
/// store instance - no cross-process or multi-tab synchronization exists.
pub struct CartStore {
    lines: Mutex<Vec<CartLineItem>>,
    storage: Arc<dyn KeyValueStorage>,
}

impl CartStore {
    /// Load the cart from durable storage.
    ///
    /// Absent or malformed durable data hydrates as an empty cart; corruption
    /// is logged and never surfaced to the caller.
    #[must_use]
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let lines = match storage.get(CART_SLOT) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
                Ok(lines) => lines,
                Err(e) => {
                    warn!(error = %e, "Stored cart is malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Stored cart is unreadable, starting empty");
                Vec::new()
            }
        };

        Self {
            lines: Mutex::new(lines),
            storage,
        }
    }

    /// Add `requested_quantity` units of a catalog product.
    ///
    /// If the product is already in the cart its quantity grows (clamped to
    /// the stock snapshot) and the snapshot refreshes from the incoming
    /// record; otherwise a new line is appended. Never duplicates a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart could not be persisted.
    pub fn add_item(
        &self,
        product: &CatalogProduct,
        requested_quantity: u32,
    ) -> Result<(), StorageError> {
        let mut lines = self.lock();

        if let Some(line) = lines
            .iter_mut()
            .find(|line| line.product_id == product.product_id)
        {
            // Latest catalog record wins: re-adding re-takes the stock snapshot.
            line.available_stock = product.available_stock;
            line.quantity = clamp_quantity(
                line.quantity.saturating_add(requested_quantity),
                line.available_stock,
            );
        } else {
            let quantity = clamp_quantity(requested_quantity, product.available_stock);
            lines.push(CartLineItem::from_product(product, quantity));
        }

        debug!(product_id = %product.product_id, "Added product to cart");
        self.persist(&lines)
    }

    /// Set the quantity of an existing line, clamped to `[1, available_stock]`.
    ///
    /// A no-op if the product is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart could not be persisted.
    pub fn update_quantity(
        &self,
        product_id: &ProductId,
        new_quantity: u32,
    ) -> Result<(), StorageError> {
        let mut lines = self.lock();

        let Some(line) = lines.iter_mut().find(|line| &line.product_id == product_id) else {
            return Ok(());
        };
        line.quantity = clamp_quantity(new_quantity, line.available_stock);

        debug!(product_id = %product_id, quantity = line.quantity, "Updated cart quantity");
        self.persist(&lines)
    }

    /// Remove the line for `product_id`. A no-op if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart could not be persisted.
    pub fn remove_item(&self, product_id: &ProductId) -> Result<(), StorageError> {
        let mut lines = self.lock();

        let before = lines.len();
        lines.retain(|line| &line.product_id != product_id);
        if lines.len() == before {
            return Ok(());
        }

        debug!(product_id = %product_id, "Removed product from cart");
        self.persist(&lines)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the empty cart could not be persisted.
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut lines = self.lock();
        lines.clear();
        debug!("Cleared cart");
        self.persist(&lines)
    }

    /// An immutable copy of the current contents, for pricing and checkout.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CartLineItem> {
        self.lock().clone()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Total unit count across all lines (the cart badge number).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lock()
            .iter()
            .fold(0_u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Mirror the given lines into the durable slot.
    fn persist(&self, lines: &[CartLineItem]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(lines)?;
        self.storage.put(CART_SLOT, &raw)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CartLineItem>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clamp a requested quantity into the valid range for a stock snapshot.
///
/// The floor is always one unit; a zero-stock record (which the catalog never
/// offers for adding) still yields a valid range instead of panicking.
const fn clamp_quantity(requested: u32, available_stock: u32) -> u32 {
    let ceiling = if available_stock == 0 {
        1
    } else {
        available_stock
    };
    if requested < 1 {
        1
    } else if requested > ceiling {
        ceiling
    } else {
        requested
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hunar_bazaar_core::Money;

    use super::*;

    fn product(id: &str, price: u64, stock: u32) -> CatalogProduct {
        CatalogProduct {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            localized_name: format!("پروڈکٹ {id}"),
            unit_price: Money::new(price),
            available_stock: stock,
            images: Vec::new(),
        }
    }

    fn memory_store() -> CartStore {
        CartStore::load(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_add_item_merges_and_clamps_to_stock() {
        let store = memory_store();
        let p = product("p1", 450, 5);

        store.add_item(&p, 1).unwrap();
        store.add_item(&p, 10).unwrap();

        let lines = store.snapshot();
        assert_eq!(lines.len(), 1, "re-adding must not duplicate the line");
        assert_eq!(lines[0].quantity, 5);
    }

    #[test]
    fn test_add_item_clamps_initial_quantity() {
        let store = memory_store();
        store.add_item(&product("p1", 450, 3), 99).unwrap();
        assert_eq!(store.snapshot()[0].quantity, 3);

        store.add_item(&product("p2", 100, 8), 0).unwrap();
        let lines = store.snapshot();
        assert_eq!(lines[1].quantity, 1, "requests below one floor at one");
    }

    #[test]
    fn test_re_add_refreshes_stock_snapshot() {
        let store = memory_store();
        store.add_item(&product("p1", 450, 5), 2).unwrap();
        store.add_item(&product("p1", 450, 10), 6).unwrap();

        let lines = store.snapshot();
        assert_eq!(lines[0].available_stock, 10);
        assert_eq!(lines[0].quantity, 8);
    }

    #[test]
    fn test_update_quantity_clamps_both_ends() {
        let store = memory_store();
        let p = product("p1", 450, 5);
        store.add_item(&p, 2).unwrap();

        store.update_quantity(&p.product_id, 0).unwrap();
        assert_eq!(store.snapshot()[0].quantity, 1);

        store.update_quantity(&p.product_id, 999).unwrap();
        assert_eq!(store.snapshot()[0].quantity, 5);

        store.update_quantity(&p.product_id, 3).unwrap();
        assert_eq!(store.snapshot()[0].quantity, 3);
    }

    #[test]
    fn test_update_quantity_absent_is_noop() {
        let store = memory_store();
        store.add_item(&product("p1", 450, 5), 2).unwrap();
        store.update_quantity(&ProductId::new("ghost"), 4).unwrap();

        let lines = store.snapshot();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
    }

    #[test]
    fn test_remove_item_leaves_others_untouched() {
        let store = memory_store();
        store.add_item(&product("p1", 450, 5), 1).unwrap();
        store.add_item(&product("p2", 200, 9), 4).unwrap();
        store.add_item(&product("p3", 80, 2), 2).unwrap();

        store.remove_item(&ProductId::new("p2")).unwrap();

        let ids: Vec<_> = store
            .snapshot()
            .iter()
            .map(|line| line.product_id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["p1", "p3"]);

        // Removing a missing product changes nothing.
        store.remove_item(&ProductId::new("p2")).unwrap();
        assert_eq!(store.snapshot().len(), 2);
    }

    #[test]
    fn test_clear_and_counts() {
        let store = memory_store();
        store.add_item(&product("p1", 450, 5), 2).unwrap();
        store.add_item(&product("p2", 200, 9), 3).unwrap();
        assert_eq!(store.item_count(), 5);
        assert!(!store.is_empty());

        store.clear().unwrap();
        assert!(store.is_empty());
        assert_eq!(store.item_count(), 0);
    }

    #[test]
    fn test_reload_reconstructs_exact_cart() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let store = CartStore::load(Arc::clone(&storage));
        store.add_item(&product("p1", 450, 5), 2).unwrap();
        store.add_item(&product("p2", 200, 9), 3).unwrap();
        let before = store.snapshot();

        // Simulate a reload: a fresh store over the same durable slots.
        let reloaded = CartStore::load(storage);
        assert_eq!(reloaded.snapshot(), before);
    }

    #[test]
    fn test_corrupt_slot_hydrates_empty() {
        let storage = Arc::new(MemoryStorage::with_slot(CART_SLOT, "{not json"));
        let store = CartStore::load(storage);
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_slot_hydrates_empty() {
        assert!(memory_store().is_empty());
    }
}
