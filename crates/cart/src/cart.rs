//! The cart state container.
//!
//! A [`Cart`] holds an ordered list of [`CartItem`]s, at most one per product,
//! each with a quantity of at least 1. Every mutation builds a new immutable
//! [`CartSnapshot`], writes it through to storage, and only then makes it the
//! current state, so a failed write leaves the cart untouched.
//!
//! # Startup
//!
//! A new cart is `Uninitialized` and empty. [`Cart::hydrate`] performs the one
//! storage read and moves it to `Ready`. Reads are served from the empty cart
//! until then; the first mutation hydrates implicitly so it cannot overwrite a
//! snapshot that has not been read yet.

use std::fmt;
use std::sync::Arc;

use loomwise_core::{Price, Product};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::{CartConfig, HydrationPolicy};
use crate::error::{CartError, Result};
use crate::storage::CartStorage;

/// An immutable view of the cart at one point in time.
pub type CartSnapshot = Arc<[CartItem]>;

type Listener = Box<dyn Fn(&CartSnapshot)>;

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// The product as it was in the catalog when first added.
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartItem {
    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }

    fn is_for(&self, product_id: &str) -> bool {
        self.product.id == *product_id
    }
}

/// Startup state of a [`Cart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartPhase {
    /// Allocated but storage has not been read yet.
    Uninitialized,
    /// The hydration read has happened.
    Ready,
}

/// Result of [`Cart::hydrate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// A persisted snapshot was loaded.
    Restored {
        /// Number of line items restored.
        items: usize,
    },
    /// Nothing was stored; the cart stays empty.
    Empty,
    /// A malformed snapshot was deleted (lenient policy).
    Discarded,
    /// Storage could not be read; the cart stays empty (lenient policy).
    Unavailable,
}

/// The shopping cart for one session.
pub struct Cart<S> {
    storage: S,
    config: CartConfig,
    phase: CartPhase,
    items: CartSnapshot,
    listeners: Vec<Listener>,
}

impl<S: fmt::Debug> fmt::Debug for Cart<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cart")
            .field("storage", &self.storage)
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("items", &self.items)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<S: CartStorage> Cart<S> {
    /// Create an empty, `Uninitialized` cart.
    ///
    /// Does not touch storage; call [`Cart::hydrate`] to load a saved cart.
    #[must_use]
    pub fn new(storage: S, config: CartConfig) -> Self {
        Self {
            storage,
            config,
            phase: CartPhase::Uninitialized,
            items: Arc::from(Vec::new()),
            listeners: Vec::new(),
        }
    }

    /// Current startup phase.
    #[must_use]
    pub const fn phase(&self) -> CartPhase {
        self.phase
    }

    /// The cart configuration.
    #[must_use]
    pub const fn config(&self) -> &CartConfig {
        &self.config
    }

    /// The underlying storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Current line items, in cart order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// A cheap handle to the current snapshot.
    ///
    /// The snapshot never changes; later mutations produce new ones.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        Arc::clone(&self.items)
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity of `product_id` in the cart, if present.
    #[must_use]
    pub fn quantity_of(&self, product_id: impl AsRef<str>) -> Option<u32> {
        let product_id = product_id.as_ref();
        self.items
            .iter()
            .find(|item| item.is_for(product_id))
            .map(|item| item.quantity)
    }

    /// Register a listener called with every new snapshot.
    ///
    /// Listeners run after a mutation has been persisted, and after a
    /// hydration that restored items.
    pub fn subscribe(&mut self, listener: impl Fn(&CartSnapshot) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Load the persisted snapshot, if any, and enter `Ready`.
    ///
    /// # Errors
    ///
    /// - [`CartError::AlreadyHydrated`] if called a second time.
    /// - With [`HydrationPolicy::Strict`]: [`CartError::MalformedSnapshot`]
    ///   if the stored value does not parse, or [`CartError::Storage`] if it
    ///   cannot be read. The cart stays `Uninitialized` in both cases.
    /// - With [`HydrationPolicy::Lenient`]: [`CartError::Storage`] only if a
    ///   malformed value cannot be deleted.
    #[instrument(skip_all, fields(key = %self.config.storage_key))]
    pub fn hydrate(&mut self) -> Result<Hydration> {
        if self.phase == CartPhase::Ready {
            return Err(CartError::AlreadyHydrated);
        }

        let key = self.config.storage_key.as_str();
        let strict = self.config.hydration == HydrationPolicy::Strict;

        let raw = match self.storage.get_item(key) {
            Ok(raw) => raw,
            Err(e) if strict => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "Cart storage unreadable, starting with an empty cart");
                self.phase = CartPhase::Ready;
                return Ok(Hydration::Unavailable);
            }
        };

        let outcome = match raw {
            None => Hydration::Empty,
            Some(raw) => match serde_json::from_str::<Vec<CartItem>>(&raw) {
                Ok(items) => {
                    let items = normalize(items);
                    let count = items.len();
                    self.items = items.into();
                    Hydration::Restored { items: count }
                }
                Err(source) if strict => {
                    return Err(CartError::MalformedSnapshot {
                        key: key.to_owned(),
                        source,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Discarding malformed cart snapshot");
                    self.storage.remove_item(key)?;
                    Hydration::Discarded
                }
            },
        };

        self.phase = CartPhase::Ready;
        info!(?outcome, "Cart hydrated");

        if matches!(outcome, Hydration::Restored { .. }) {
            self.notify();
        }

        Ok(outcome)
    }

    /// Add one unit of `product_id`, resolved against `catalog`.
    ///
    /// An existing line is incremented in place; otherwise a new line with
    /// quantity 1 is appended. Returns `Ok(false)` without touching the cart
    /// or storage if the product is not in the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if hydration or the storage write fails.
    #[instrument(skip_all, fields(product_id = product_id.as_ref()))]
    pub fn add_to_cart(&mut self, product_id: impl AsRef<str>, catalog: &[Product]) -> Result<bool> {
        let product_id = product_id.as_ref();

        let Some(product) = catalog.iter().find(|p| p.id == *product_id) else {
            warn!(catalog_size = catalog.len(), "Product not found in catalog");
            return Ok(false);
        };

        self.ensure_ready()?;

        let mut next = self.items.to_vec();
        match next.iter_mut().find(|item| item.is_for(product_id)) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => next.push(CartItem {
                product: product.clone(),
                quantity: 1,
            }),
        }

        self.commit(next)?;
        Ok(true)
    }

    /// Remove the line for `product_id`, if any.
    ///
    /// Storage is left alone when the product is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if hydration or the storage write fails.
    #[instrument(skip_all, fields(product_id = product_id.as_ref()))]
    pub fn remove_from_cart(&mut self, product_id: impl AsRef<str>) -> Result<()> {
        let product_id = product_id.as_ref();
        self.ensure_ready()?;

        if !self.items.iter().any(|item| item.is_for(product_id)) {
            debug!("Product not in cart, nothing to remove");
            return Ok(());
        }

        let next = self
            .items
            .iter()
            .filter(|item| !item.is_for(product_id))
            .cloned()
            .collect();

        self.commit(next)
    }

    /// Set the quantity of `product_id`, keeping its position.
    ///
    /// A quantity of zero or less removes the line. Products not in the cart
    /// are ignored without writing to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if hydration or the storage write fails.
    #[instrument(skip_all, fields(product_id = product_id.as_ref(), quantity = quantity))]
    pub fn update_quantity(&mut self, product_id: impl AsRef<str>, quantity: i64) -> Result<()> {
        if quantity <= 0 {
            return self.remove_from_cart(product_id);
        }

        let product_id = product_id.as_ref();
        self.ensure_ready()?;

        let Some(index) = self.items.iter().position(|item| item.is_for(product_id)) else {
            debug!("Product not in cart, nothing to update");
            return Ok(());
        };

        let mut next = self.items.to_vec();
        if let Some(item) = next.get_mut(index) {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }

        self.commit(next)
    }

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Returns an error if hydration or the storage write fails.
    #[instrument(skip_all)]
    pub fn empty_cart(&mut self) -> Result<()> {
        self.ensure_ready()?;
        self.commit(Vec::new())
    }

    /// Sum of `price × quantity` over all lines.
    ///
    /// Recomputed from the current items on every call. Saturates at
    /// [`Price::MAX`].
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn cart_items_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    fn ensure_ready(&mut self) -> Result<()> {
        if self.phase == CartPhase::Uninitialized {
            debug!("Mutation before hydration, hydrating first");
            self.hydrate()?;
        }
        Ok(())
    }

    /// Persist `next`, then make it the current snapshot.
    fn commit(&mut self, next: Vec<CartItem>) -> Result<()> {
        self.persist(&next)?;
        self.items = next.into();
        debug!(
            lines = self.items.len(),
            count = self.cart_items_count(),
            "Cart updated"
        );
        self.notify();
        Ok(())
    }

    fn persist(&mut self, items: &[CartItem]) -> Result<()> {
        let key = self.config.storage_key.as_str();

        // An emptied cart removes the key rather than storing `[]`
        if items.is_empty() {
            self.storage.remove_item(key)?;
        } else {
            let json = serde_json::to_string(items).map_err(CartError::Serialize)?;
            self.storage.set_item(key, &json)?;
        }
        Ok(())
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener(&self.items);
        }
    }
}

/// Restore cart invariants on a snapshot read from storage: drop lines with a
/// zero quantity and merge duplicate products into their first position.
fn normalize(items: Vec<CartItem>) -> Vec<CartItem> {
    let before = items.len();
    let mut merged: Vec<CartItem> = Vec::with_capacity(before);

    for item in items {
        if item.quantity == 0 {
            continue;
        }
        match merged.iter_mut().find(|m| m.product.id == item.product.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => merged.push(item),
        }
    }

    if merged.len() != before {
        debug!(before, after = merged.len(), "Normalized persisted cart");
    }
    merged
}
