//! Durable cart behavior across simulated reloads, on real files.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::sync::Arc;

use hunar_bazaar_checkout::cart::{CART_SLOT, CartStore, FileStorage, KeyValueStorage};
use hunar_bazaar_core::ProductId;
use hunar_bazaar_integration_tests::product;

fn file_store(dir: &std::path::Path) -> CartStore {
    CartStore::load(Arc::new(FileStorage::new(dir)))
}

#[test]
fn reload_reconstructs_the_exact_prior_cart() {
    let dir = tempfile::tempdir().unwrap();

    let store = file_store(dir.path());
    store.add_item(&product("p1", 450, 5), 2).unwrap();
    store.add_item(&product("p2", 120, 9), 3).unwrap();
    store.update_quantity(&ProductId::new("p2"), 1).unwrap();
    let before = store.snapshot();
    drop(store);

    let reloaded = file_store(dir.path());
    assert_eq!(reloaded.snapshot(), before);
    assert_eq!(reloaded.item_count(), 3);
}

#[test]
fn every_mutation_is_visible_to_a_fresh_load() {
    let dir = tempfile::tempdir().unwrap();

    let store = file_store(dir.path());
    store.add_item(&product("p1", 450, 5), 1).unwrap();
    assert_eq!(file_store(dir.path()).snapshot(), store.snapshot());

    store.remove_item(&ProductId::new("p1")).unwrap();
    assert!(file_store(dir.path()).is_empty());

    store.add_item(&product("p3", 80, 2), 2).unwrap();
    store.clear().unwrap();
    assert!(file_store(dir.path()).is_empty());
}

#[test]
fn corrupt_slot_file_hydrates_as_empty_cart() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cart.json"), "{definitely not json").unwrap();

    let store = file_store(dir.path());
    assert!(store.is_empty());

    // The store stays usable and overwrites the corrupt slot on the next write.
    store.add_item(&product("p1", 450, 5), 1).unwrap();
    assert_eq!(file_store(dir.path()).snapshot().len(), 1);
}

#[test]
fn slot_schema_is_a_camel_case_json_array() {
    let dir = tempfile::tempdir().unwrap();

    let store = file_store(dir.path());
    store.add_item(&product("p1", 450, 5), 2).unwrap();

    let raw = FileStorage::new(dir.path()).get(CART_SLOT).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let lines = value.as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["productId"], "p1");
    assert_eq!(lines[0]["unitPrice"], 450);
    assert_eq!(lines[0]["quantity"], 2);
    assert_eq!(lines[0]["availableStock"], 5);
}

#[test]
fn clamping_policy_survives_the_store_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(dir.path());
    let p = product("p1", 450, 5);

    // addItem(p, stock=5) then addItem(p, 10) => quantity 5, one line.
    store.add_item(&p, 1).unwrap();
    store.add_item(&p, 10).unwrap();
    let lines = store.snapshot();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 5);

    // updateQuantity(p, 0) => 1; updateQuantity(p, 999) => 5.
    store.update_quantity(&p.product_id, 0).unwrap();
    assert_eq!(store.snapshot()[0].quantity, 1);
    store.update_quantity(&p.product_id, 999).unwrap();
    assert_eq!(store.snapshot()[0].quantity, 5);
}
