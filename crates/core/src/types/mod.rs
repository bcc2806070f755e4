//! Core types for Pocketshop.
//!
//! This module provides type-safe wrappers for the catalog and order records
//! the client-state store reads.

pub mod identity;
pub mod order;
pub mod product;

pub use identity::{IdentityError, LineKey, ProductIdentity, VariantIdentity, resolve_identity};
pub use order::{OrderAddress, OrderCustomer, OrderData};
pub use product::{Product, Variant, unit_price};
