//! Loomwise Core - Shared types library.
//!
//! This crate provides the types shared across all Loomwise components:
//! - `cart` - Client-side shopping cart state container
//! - `cli` - Command-line driver for the cart and schema
//!
//! # Architecture
//!
//! The core crate contains only types and declarations - no I/O, no storage
//! access, no logging. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and slugs
//! - [`product`] - The `Product` record as published by the CMS
//! - [`schema`] - Declarative CMS schema for the `product` document type

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod product;
pub mod schema;
pub mod types;

pub use product::{CategoryRef, Color, ColorImage, ImageAsset, ImageRef, Product};
pub use types::*;
