//! Loomwise Cart - Client-side shopping cart state container.
//!
//! Keeps the authoritative in-memory cart for one session and mirrors every
//! change into a local key/value store so the cart survives restarts.
//!
//! # Architecture
//!
//! - [`Cart`] owns the line items and runs the two-phase startup
//!   (`Uninitialized`, then `Ready` after a single hydration read)
//! - [`CartStorage`] abstracts the persistent store; [`MemoryStorage`] and
//!   [`FileStorage`] are provided
//! - [`CartProvider`] scopes a shared cart to the current thread for UI code
//!   that cannot thread a `&mut Cart` through every call
//!
//! # Example
//!
//! ```
//! use loomwise_cart::{Cart, CartConfig, MemoryStorage};
//! use loomwise_core::{Price, Product};
//!
//! let catalog = vec![Product::new("p1", "Shirt", Price::from_cents(1000)?, "", "shirts")];
//!
//! let mut cart = Cart::new(MemoryStorage::new(), CartConfig::default());
//! cart.hydrate()?;
//! cart.add_to_cart("p1", &catalog)?;
//! cart.add_to_cart("p1", &catalog)?;
//!
//! assert_eq!(cart.cart_items_count(), 2);
//! assert_eq!(cart.cart_total().to_string(), "20.00");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod provider;
pub mod storage;

pub use cart::{Cart, CartItem, CartPhase, CartSnapshot, Hydration};
pub use config::{CartConfig, ConfigError, HydrationPolicy};
pub use error::{CartError, Result};
pub use provider::{CartProvider, DynCart, ProviderGuard, SharedCart, try_use_cart, use_cart};
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};
