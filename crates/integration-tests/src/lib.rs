//! Integration tests for Loomwise.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p loomwise-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart sessions against file-backed storage
//! - `product_schema` - Schema declaration vs. product records
//!
//! This library holds shared fixtures for the test files.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;

use loomwise_cart::{Cart, CartConfig, FileStorage};
use loomwise_core::{Color, ColorImage, ImageRef, Price, PriceError, Product};

/// A small catalog: `p1` at 10.00, `p2` at 2.50, `p3` at 19.99.
///
/// # Errors
///
/// Never in practice; prices are non-negative constants.
pub fn catalog() -> Result<Vec<Product>, PriceError> {
    Ok(vec![
        Product::new("p1", "Linen Shirt", Price::from_cents(1000)?, "Breathable", "shirts")
            .with_color_image(ColorImage {
                color: Some(Color {
                    hex: "#f5f5dc".to_string(),
                }),
                image: Some(ImageRef::new("image-linen-beige-800x800-jpg")),
            }),
        Product::new("p2", "Cotton Socks", Price::from_cents(250)?, "Pair", "accessories"),
        Product::new("p3", "Wool Scarf", Price::from_cents(1999)?, "Warm", "accessories"),
    ])
}

/// Start a new session cart over `dir`, without hydrating it.
#[must_use]
pub fn session(dir: &Path) -> Cart<FileStorage> {
    let config = CartConfig {
        storage_dir: dir.to_path_buf(),
        ..CartConfig::default()
    };
    Cart::new(FileStorage::new(dir), config)
}
