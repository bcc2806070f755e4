//! Pocketshop Core - Shared domain types.
//!
//! This crate provides the records the on-device client-state store works with:
//! - products and variants coming from the catalog
//! - the identities used to deduplicate them across favorites and cart
//! - order records used to enrich the scan history
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage,
//! no async runtime. Catalog and order payloads are opaque to the store: only
//! the identity, price and order summary fields are typed, everything else is
//! carried through untouched so it survives a persist/load cycle.
//!
//! # Modules
//!
//! - [`types`] - Identities, products, variants and order records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
