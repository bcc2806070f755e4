//! Integration tests for Pocketshop client state.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pocketshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart` - Cart merging, variants and totals
//! - `favorites_counts` - Favorites and badge count publishing
//! - `scan_history` - Bounded history, re-scans and enrichment
//! - `checkout_draft` - Sparse, note-free drafts
//! - `persistence` - File-backed state across reopen, degraded storage
//!
//! This library only holds shared fixtures.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use pocketshop_client_state::clock::ManualClock;
use pocketshop_client_state::{ClientState, ClientStateConfig, KeyValueStore, MemoryStore};
use pocketshop_core::{Product, Variant};
use rust_decimal::Decimal;

/// Client state over an in-memory store and a deterministic clock.
#[must_use]
pub fn memory_state() -> ClientState {
    state_over(Arc::new(MemoryStore::new()))
}

/// Client state over the given store and a deterministic clock.
#[must_use]
pub fn state_over(kv: Arc<dyn KeyValueStore>) -> ClientState {
    ClientState::with_clock(
        kv,
        Arc::new(ManualClock::new()),
        &ClientStateConfig::default(),
    )
}

/// A product with a primary ID and a price in cents.
#[must_use]
pub fn product(id: &str, cents: i64) -> Product {
    Product::new(id, Decimal::new(cents, 2)).with_name(format!("Product {id}"))
}

/// A variant with a primary ID.
#[must_use]
pub fn variant(id: &str) -> Variant {
    Variant::new(id)
}
