//! Thread-scoped access to a shared cart.
//!
//! UI code often needs the cart deep inside a component tree where threading
//! `&mut Cart` through every call is impractical. A [`CartProvider`] owns a
//! shared cart; mounting it makes the cart reachable through [`use_cart`] for
//! the lifetime of the returned [`ProviderGuard`].
//!
//! Calling [`use_cart`] with no provider mounted is a programming error and
//! panics. Use [`try_use_cart`] to probe instead.
//!
//! ```
//! use loomwise_cart::{CartConfig, CartProvider, MemoryStorage, use_cart};
//!
//! let provider = CartProvider::new(MemoryStorage::new(), CartConfig::default());
//! let _guard = provider.mount()?;
//!
//! let count = use_cart(|cart| cart.cart_items_count());
//! assert_eq!(count, 0);
//! # Ok::<(), loomwise_cart::CartError>(())
//! ```

use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::rc::Rc;

use tracing::debug;

use crate::cart::Cart;
use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::storage::CartStorage;

/// A cart over any storage backend.
pub type DynCart = Cart<Box<dyn CartStorage>>;

/// Shared, single-threaded handle to a cart.
pub type SharedCart = Rc<RefCell<DynCart>>;

/// One mounted provider on the thread's stack.
struct Mount {
    id: u64,
    cart: SharedCart,
}

thread_local! {
    static ACTIVE: RefCell<Vec<Mount>> = const { RefCell::new(Vec::new()) };
    static NEXT_MOUNT: Cell<u64> = const { Cell::new(0) };
}

/// Owns the cart for one session and scopes it to the current thread.
#[derive(Clone)]
pub struct CartProvider {
    cart: SharedCart,
}

impl CartProvider {
    /// Create a provider around a new, unhydrated cart.
    #[must_use]
    pub fn new(storage: impl CartStorage + 'static, config: CartConfig) -> Self {
        let storage: Box<dyn CartStorage> = Box::new(storage);
        Self::from_cart(Cart::new(storage, config))
    }

    /// Wrap an existing cart.
    #[must_use]
    pub fn from_cart(cart: DynCart) -> Self {
        Self {
            cart: Rc::new(RefCell::new(cart)),
        }
    }

    /// The shared cart, for callers that hold the provider directly.
    #[must_use]
    pub fn cart(&self) -> SharedCart {
        Rc::clone(&self.cart)
    }

    /// Make this provider's cart the active one on the current thread.
    ///
    /// The first mount hydrates the cart. Providers nest: the innermost
    /// mounted provider wins until its guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns the hydration error (strict policy); the provider is not
    /// mounted in that case.
    pub fn mount(&self) -> Result<ProviderGuard> {
        {
            let mut cart = self.cart.borrow_mut();
            if cart.phase() == crate::CartPhase::Uninitialized {
                cart.hydrate()?;
            }
        }

        let id = NEXT_MOUNT.with(|next| {
            let id = next.get();
            next.set(id.wrapping_add(1));
            id
        });
        let depth = ACTIVE.with(|active| {
            let mut active = active.borrow_mut();
            active.push(Mount {
                id,
                cart: Rc::clone(&self.cart),
            });
            active.len() - 1
        });
        debug!(id, depth, "Cart provider mounted");

        Ok(ProviderGuard {
            id,
            _not_send: PhantomData,
        })
    }
}

/// Keeps a provider mounted; unmounts it (and anything mounted after it) on drop.
///
/// Dropping a guard whose mount is already gone does nothing, so a guard
/// dropped out of order never unmounts a provider mounted later in its place.
#[must_use = "the provider is unmounted when the guard is dropped"]
pub struct ProviderGuard {
    id: u64,
    _not_send: PhantomData<Rc<()>>,
}

impl Drop for ProviderGuard {
    fn drop(&mut self) {
        // Carts are dropped after the stack borrow ends
        let unmounted = ACTIVE.with(|active| {
            let mut active = active.borrow_mut();
            let depth = active.iter().position(|mount| mount.id == self.id)?;
            Some(active.split_off(depth))
        });
        debug!(
            id = self.id,
            unmounted = unmounted.as_ref().map_or(0, Vec::len),
            "Cart provider unmounted"
        );
    }
}

fn active_cart() -> Option<SharedCart> {
    ACTIVE.with(|active| active.borrow().last().map(|mount| Rc::clone(&mount.cart)))
}

/// Run `f` against the active cart.
///
/// # Panics
///
/// Panics if no [`CartProvider`] is mounted on the current thread, or if
/// called re-entrantly from inside another `use_cart` closure.
pub fn use_cart<R>(f: impl FnOnce(&mut DynCart) -> R) -> R {
    let cart = active_cart()
        .unwrap_or_else(|| panic!("use_cart must be called within a CartProvider scope"));
    let mut cart = cart.borrow_mut();
    f(&mut cart)
}

/// Run `f` against the active cart, if a provider is mounted.
///
/// # Errors
///
/// Returns [`CartError::OutsideProvider`] if no provider is mounted, or
/// [`CartError::CartBusy`] if called from inside another `use_cart` or
/// `try_use_cart` closure.
pub fn try_use_cart<R>(f: impl FnOnce(&mut DynCart) -> R) -> Result<R> {
    let cart = active_cart().ok_or(CartError::OutsideProvider)?;
    let mut cart = cart.try_borrow_mut().map_err(|_| CartError::CartBusy)?;
    Ok(f(&mut cart))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use loomwise_core::{Price, Product};

    use super::*;
    use crate::cart::CartPhase;
    use crate::config::HydrationPolicy;
    use crate::storage::MemoryStorage;

    fn catalog() -> Vec<Product> {
        vec![Product::new("p1", "Shirt", Price::from_cents(1500).unwrap(), "", "shirts")]
    }

    #[test]
    #[should_panic(expected = "use_cart must be called within a CartProvider scope")]
    fn test_use_cart_outside_provider_panics() {
        use_cart(|cart| cart.cart_items_count());
    }

    #[test]
    fn test_try_use_cart_outside_provider() {
        let result = try_use_cart(|cart| cart.cart_items_count());
        assert!(matches!(result, Err(CartError::OutsideProvider)));
    }

    #[test]
    fn test_mount_hydrates_once() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item("shopping-cart", r#"[{"product":{"_id":"p1","name":"Shirt","price":15,"description":"","category":{"_type":"reference","_ref":"shirts"}},"quantity":2}]"#)
            .unwrap();
        let provider = CartProvider::new(storage, CartConfig::default());

        {
            let _guard = provider.mount().unwrap();
            assert_eq!(use_cart(|cart| cart.cart_items_count()), 2);
        }

        // Remounting does not hydrate again
        let _guard = provider.mount().unwrap();
        assert_eq!(provider.cart().borrow().phase(), CartPhase::Ready);
    }

    #[test]
    fn test_mutations_visible_through_provider() {
        let provider = CartProvider::new(MemoryStorage::new(), CartConfig::default());
        let _guard = provider.mount().unwrap();

        use_cart(|cart| cart.add_to_cart("p1", &catalog())).unwrap();
        use_cart(|cart| cart.add_to_cart("p1", &catalog())).unwrap();

        assert_eq!(provider.cart().borrow().quantity_of("p1"), Some(2));
        assert_eq!(
            use_cart(|cart| cart.cart_total()),
            Price::from_cents(3000).unwrap()
        );
    }

    #[test]
    fn test_guard_drop_unmounts() {
        let provider = CartProvider::new(MemoryStorage::new(), CartConfig::default());
        {
            let _guard = provider.mount().unwrap();
            assert!(try_use_cart(|_| ()).is_ok());
        }
        assert!(try_use_cart(|_| ()).is_err());
    }

    #[test]
    fn test_nested_providers() {
        let outer = CartProvider::new(MemoryStorage::new(), CartConfig::default());
        let inner = CartProvider::new(MemoryStorage::new(), CartConfig::default());
        let _outer_guard = outer.mount().unwrap();

        {
            let _inner_guard = inner.mount().unwrap();
            use_cart(|cart| cart.add_to_cart("p1", &catalog())).unwrap();
        }

        assert_eq!(inner.cart().borrow().cart_items_count(), 1);
        assert_eq!(use_cart(|cart| cart.cart_items_count()), 0);
    }

    #[test]
    fn test_out_of_order_guard_drop_keeps_newer_providers() {
        let provider = || CartProvider::new(MemoryStorage::new(), CartConfig::default());
        let (a, b, c, d) = (provider(), provider(), provider(), provider());

        let guard_a = a.mount().unwrap();
        let guard_b = b.mount().unwrap();
        drop(guard_a);
        let _guard_c = c.mount().unwrap();
        let _guard_d = d.mount().unwrap();
        drop(guard_b);

        use_cart(|cart| cart.add_to_cart("p1", &catalog())).unwrap();
        assert_eq!(d.cart().borrow().cart_items_count(), 1);
        assert_eq!(c.cart().borrow().cart_items_count(), 0);
    }

    #[test]
    fn test_reentrant_try_use_cart_is_an_error() {
        let provider = CartProvider::new(MemoryStorage::new(), CartConfig::default());
        let _guard = provider.mount().unwrap();

        let inner = use_cart(|_| try_use_cart(|cart| cart.cart_items_count()));

        assert!(matches!(inner, Err(CartError::CartBusy)));
        assert!(try_use_cart(|cart| cart.cart_items_count()).is_ok());
    }

    #[test]
    fn test_strict_mount_failure_does_not_mount() {
        let mut storage = MemoryStorage::new();
        storage.set_item("shopping-cart", "garbage").unwrap();
        let config = CartConfig::default().with_hydration(HydrationPolicy::Strict);
        let provider = CartProvider::new(storage, config);

        assert!(matches!(
            provider.mount(),
            Err(CartError::MalformedSnapshot { .. })
        ));
        assert!(try_use_cart(|_| ()).is_err());
    }
}
