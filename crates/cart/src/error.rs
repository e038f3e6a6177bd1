//! Cart error type.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by cart operations.
///
/// Unknown product IDs are not errors; see [`crate::Cart::add_to_cart`].
#[derive(Debug, Error)]
pub enum CartError {
    /// Reading or writing the persistent store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The persisted snapshot could not be parsed (strict hydration only).
    #[error("Malformed cart snapshot under key {key}: {source}")]
    MalformedSnapshot {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The snapshot could not be serialized.
    #[error("Failed to serialize cart snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    /// `hydrate` was called on a cart that is already `Ready`.
    #[error("Cart has already been hydrated")]
    AlreadyHydrated,

    /// No `CartProvider` is mounted on the current thread.
    #[error("Cart accessed outside of a CartProvider scope")]
    OutsideProvider,

    /// The active cart is already borrowed by an enclosing accessor closure.
    #[error("Cart is already in use by an enclosing use_cart call")]
    CartBusy,
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
