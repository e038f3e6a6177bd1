//! Cart session commands.
//!
//! # Environment Variables
//!
//! - `CART_STORAGE_DIR` - Directory holding the cart file (default: `.loomwise`)
//! - `CART_STORAGE_KEY` - Storage key / file stem (default: `shopping-cart`)
//! - `CART_HYDRATION` - `lenient` or `strict` (default: `lenient`)

use std::fmt::Write as _;
use std::path::PathBuf;

use loomwise_cart::{Cart, CartConfig, CartItem, FileStorage};
use loomwise_core::{Price, Product};
use tracing::{info, warn};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Create and hydrate the session cart.
fn open(storage_dir: Option<PathBuf>) -> Result<Cart<FileStorage>, Box<dyn std::error::Error>> {
    let mut config = CartConfig::from_env()?;
    if let Some(dir) = storage_dir {
        config.storage_dir = dir;
    }

    let storage = FileStorage::new(config.storage_dir.clone());
    let mut cart = Cart::new(storage, config);
    cart.hydrate()?;
    Ok(cart)
}

/// Add one unit of `product_id` from `catalog`.
///
/// # Errors
///
/// Returns an error if configuration, hydration, or the storage write fails.
pub fn add(storage_dir: Option<PathBuf>, product_id: &str, catalog: &[Product]) -> CommandResult {
    let mut cart = open(storage_dir)?;

    if cart.add_to_cart(product_id, catalog)? {
        info!(
            product_id,
            quantity = cart.quantity_of(product_id).unwrap_or(0),
            "Added to cart"
        );
    } else {
        warn!(product_id, "Product not found in catalog, cart unchanged");
    }
    summarize(&cart);
    Ok(())
}

/// Remove `product_id` from the cart.
///
/// # Errors
///
/// Returns an error if configuration, hydration, or the storage write fails.
pub fn remove(storage_dir: Option<PathBuf>, product_id: &str) -> CommandResult {
    let mut cart = open(storage_dir)?;
    cart.remove_from_cart(product_id)?;
    info!(product_id, "Removed from cart");
    summarize(&cart);
    Ok(())
}

/// Set the quantity of `product_id`.
///
/// # Errors
///
/// Returns an error if configuration, hydration, or the storage write fails.
pub fn update(storage_dir: Option<PathBuf>, product_id: &str, quantity: i64) -> CommandResult {
    let mut cart = open(storage_dir)?;

    if cart.quantity_of(product_id).is_none() {
        warn!(product_id, "Product is not in the cart");
    }
    cart.update_quantity(product_id, quantity)?;
    summarize(&cart);
    Ok(())
}

/// Remove everything from the cart.
///
/// # Errors
///
/// Returns an error if configuration, hydration, or the storage write fails.
pub fn empty(storage_dir: Option<PathBuf>) -> CommandResult {
    let mut cart = open(storage_dir)?;
    cart.empty_cart()?;
    info!("Cart emptied");
    Ok(())
}

/// Print the cart contents.
///
/// # Errors
///
/// Returns an error if configuration or hydration fails.
#[allow(clippy::print_stdout)]
pub fn show(storage_dir: Option<PathBuf>) -> CommandResult {
    let cart = open(storage_dir)?;
    print!(
        "{}",
        render(cart.items(), cart.cart_items_count(), cart.cart_total())
    );
    Ok(())
}

fn summarize(cart: &Cart<FileStorage>) {
    info!(
        lines = cart.items().len(),
        count = cart.cart_items_count(),
        total = %cart.cart_total(),
        "Cart"
    );
}

/// Format the cart as a plain-text table.
fn render(items: &[CartItem], count: u64, total: Price) -> String {
    if items.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in items {
        let _ = writeln!(
            out,
            "{:<16} {:<32} {:>4} x {:>10} = {:>10}",
            item.product.id,
            item.product.name,
            item.quantity,
            item.product.price,
            item.line_total()
        );
    }
    let _ = writeln!(out, "Items: {count}");
    let _ = writeln!(out, "Total: {total}");
    out
}
