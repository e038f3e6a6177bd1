//! Integration tests for cart persistence across sessions.
//!
//! Each test simulates application restarts by creating a fresh `Cart` over
//! the same storage directory.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use loomwise_cart::{
    CartConfig, CartPhase, CartProvider, CartStorage, FileStorage, Hydration, HydrationPolicy,
    use_cart,
};
use loomwise_core::Price;
use loomwise_integration_tests::{catalog, session};

// =============================================================================
// Session Round Trips
// =============================================================================

#[test]
fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = catalog().unwrap();

    {
        let mut cart = session(dir.path());
        cart.hydrate().unwrap();
        cart.add_to_cart("p1", &catalog).unwrap();
        cart.add_to_cart("p3", &catalog).unwrap();
        cart.add_to_cart("p1", &catalog).unwrap();
    }

    let mut cart = session(dir.path());
    assert_eq!(cart.hydrate().unwrap(), Hydration::Restored { items: 2 });

    let lines: Vec<_> = cart
        .items()
        .iter()
        .map(|i| (i.product.id.as_str(), i.quantity))
        .collect();
    assert_eq!(lines, [("p1", 2), ("p3", 1)]);
    assert_eq!(cart.cart_total().to_string(), "39.99");
    assert_eq!(cart.cart_items_count(), 3);
}

#[test]
fn test_restored_product_keeps_cms_fields() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = catalog().unwrap();

    let mut cart = session(dir.path());
    cart.add_to_cart("p1", &catalog).unwrap();

    let mut restored = session(dir.path());
    restored.hydrate().unwrap();
    assert_eq!(restored.items()[0].product, catalog[0]);
}

#[test]
fn test_snapshot_file_format() {
    let dir = tempfile::tempdir().unwrap();
    let mut cart = session(dir.path());
    cart.hydrate().unwrap();
    cart.add_to_cart("p2", &catalog().unwrap()).unwrap();

    let raw = std::fs::read_to_string(dir.path().join("shopping-cart.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["quantity"], 1);
    assert_eq!(entries[0]["product"]["_id"], "p2");
    assert_eq!(entries[0]["product"]["category"]["_ref"], "accessories");
}

// =============================================================================
// Empty Cart Policy
// =============================================================================

#[test]
fn test_emptying_cart_deletes_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut cart = session(dir.path());
    cart.hydrate().unwrap();
    cart.add_to_cart("p1", &catalog().unwrap()).unwrap();
    let path = dir.path().join("shopping-cart.json");
    assert!(path.exists());

    cart.empty_cart().unwrap();

    assert!(!path.exists());
    assert_eq!(cart.storage().get_item("shopping-cart").unwrap(), None);

    let mut next = session(dir.path());
    assert_eq!(next.hydrate().unwrap(), Hydration::Empty);
}

#[test]
fn test_update_to_zero_matches_remove_on_disk() {
    let catalog = catalog().unwrap();
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();

    let mut via_update = session(a.path());
    let mut via_remove = session(b.path());
    for cart in [&mut via_update, &mut via_remove] {
        cart.add_to_cart("p1", &catalog).unwrap();
        cart.add_to_cart("p2", &catalog).unwrap();
    }

    via_update.update_quantity("p1", 0).unwrap();
    via_remove.remove_from_cart("p1").unwrap();

    assert_eq!(via_update.items(), via_remove.items());
    assert_eq!(
        std::fs::read_to_string(a.path().join("shopping-cart.json")).unwrap(),
        std::fs::read_to_string(b.path().join("shopping-cart.json")).unwrap()
    );
}

// =============================================================================
// Hydration
// =============================================================================

#[test]
fn test_first_mutation_hydrates_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = catalog().unwrap();
    {
        let mut cart = session(dir.path());
        cart.add_to_cart("p3", &catalog).unwrap();
    }

    let mut cart = session(dir.path());
    assert_eq!(cart.phase(), CartPhase::Uninitialized);
    assert!(cart.is_empty());

    cart.add_to_cart("p2", &catalog).unwrap();

    assert_eq!(cart.phase(), CartPhase::Ready);
    assert_eq!(cart.cart_items_count(), 2);
    assert_eq!(cart.cart_total(), Price::from_cents(2249).unwrap());
}

#[test]
fn test_corrupt_file_lenient_recovery() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("shopping-cart.json"), "[{\"product\":").unwrap();

    let mut cart = session(dir.path());
    assert_eq!(cart.hydrate().unwrap(), Hydration::Discarded);
    assert!(!dir.path().join("shopping-cart.json").exists());

    cart.add_to_cart("p1", &catalog().unwrap()).unwrap();
    assert_eq!(cart.cart_items_count(), 1);
}

#[test]
fn test_corrupt_file_strict_failure() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("shopping-cart.json"), "not json").unwrap();
    let config = CartConfig {
        storage_dir: dir.path().to_path_buf(),
        ..CartConfig::default()
    }
    .with_hydration(HydrationPolicy::Strict);

    let mut cart = loomwise_cart::Cart::new(FileStorage::new(dir.path()), config);

    assert!(cart.hydrate().is_err());
    assert_eq!(cart.phase(), CartPhase::Uninitialized);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("shopping-cart.json")).unwrap(),
        "not json"
    );
}

// =============================================================================
// Provider Scope
// =============================================================================

#[test]
fn test_provider_over_file_storage() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = catalog().unwrap();
    {
        let mut cart = session(dir.path());
        cart.add_to_cart("p2", &catalog).unwrap();
    }

    let provider = CartProvider::new(FileStorage::new(dir.path()), CartConfig::default());
    let _guard = provider.mount().unwrap();

    use_cart(|cart| cart.update_quantity("p2", 4)).unwrap();

    assert_eq!(use_cart(|cart| cart.cart_items_count()), 4);
    assert_eq!(
        use_cart(|cart| cart.cart_total()),
        Price::from_cents(1000).unwrap()
    );
}
