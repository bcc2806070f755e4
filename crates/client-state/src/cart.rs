//! Shopping cart.
//!
//! Lines are unique by (product identity, variant identity). Totals are always
//! re-derived from the full line list after a mutation, never patched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pocketshop_core::{LineKey, Product, ProductIdentity, Variant, unit_price};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::clock::Clock;
use crate::document::Document;
use crate::error::{Result, StoreError};
use crate::keys;
use crate::kv::{KeyValueStore, StorageResult};

/// A product in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
}

impl CartLine {
    /// Uniqueness key of the line, if the product has an identity.
    #[must_use]
    pub fn key(&self) -> Option<LineKey> {
        let product = self.product.identity()?;
        let variant = self.variant.as_ref().and_then(Variant::identity);
        Some(LineKey::new(product, variant))
    }

    /// Price of one unit, honoring the variant price.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        unit_price(&self.product, self.variant.as_ref())
    }

    /// Unit price times quantity, or `None` if the product overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price().checked_mul(Decimal::from(self.quantity))
    }
}

/// The persisted cart with its derived totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartLine>,
    /// Sum of line quantities.
    #[serde(default)]
    pub total_items: u64,
    /// Sum of line totals.
    #[serde(default)]
    pub total_amount: Decimal,
    /// Time of the last successful write; `None` for a cart never written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Cart {
    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity of a product across all of its variants.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductIdentity) -> u64 {
        self.items
            .iter()
            .filter(|line| line.product.has_identity(product_id))
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// Re-derive `total_items` and `total_amount` from the lines.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AmountOverflow` and leaves the totals untouched if
    /// the amount does not fit in a `Decimal`.
    pub fn recompute_totals(&mut self) -> Result<()> {
        let (items, amount) = totals(&self.items).ok_or(StoreError::AmountOverflow)?;
        self.total_items = items;
        self.total_amount = amount;
        Ok(())
    }
}

/// Total quantity and total amount of a list of lines.
///
/// Returns `None` if either sum overflows.
#[must_use]
pub fn totals(lines: &[CartLine]) -> Option<(u64, Decimal)> {
    lines
        .iter()
        .try_fold((0_u64, Decimal::ZERO), |(items, amount), line| {
            Some((
                items.checked_add(u64::from(line.quantity))?,
                amount.checked_add(line.line_total()?)?,
            ))
        })
}

/// Store for the cart.
#[derive(Clone)]
pub struct CartStore {
    doc: Document<Cart>,
    clock: Arc<dyn Clock>,
}

impl CartStore {
    /// Create a store over the given persistence port.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            doc: Document::new(kv, keys::CART),
            clock,
        }
    }

    /// Read the cart, surfacing port failures.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the persistence port cannot be read.
    pub async fn load(&self) -> StorageResult<Cart> {
        self.doc.load().await
    }

    /// Read the cart. Never fails; unreadable state yields an empty cart.
    pub async fn get(&self) -> Cart {
        self.doc.load_or_default().await
    }

    /// Add `quantity` units of a product (and optional variant).
    ///
    /// An existing line with the same product and variant is incremented;
    /// otherwise a new line is appended. If the cart cannot be read, nothing
    /// is written and an empty cart is returned.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidQuantity` for a zero quantity,
    /// `StoreError::MissingIdentity` if the product has no usable ID and
    /// `StoreError::AmountOverflow` if the new total does not fit. Nothing is
    /// written in any of these cases.
    #[instrument(skip(self, product, variant), fields(product_id, variant_id))]
    pub async fn add(
        &self,
        product: Product,
        quantity: u32,
        variant: Option<Variant>,
    ) -> Result<Cart> {
        if quantity == 0 {
            return Err(StoreError::InvalidQuantity(quantity));
        }
        let product_id = product.identity().ok_or(StoreError::MissingIdentity)?;
        let key = LineKey::new(product_id, variant.as_ref().and_then(Variant::identity));

        let span = tracing::Span::current();
        span.record("product_id", key.product.as_str());
        if let Some(variant_id) = &key.variant {
            span.record("variant_id", variant_id.as_str());
        }

        let Some(mut cart) = self.doc.load_for_update().await else {
            return Ok(Cart::default());
        };
        if let Some(line) = cart
            .items
            .iter_mut()
            .find(|line| line.key().as_ref() == Some(&key))
        {
            line.quantity = line.quantity.saturating_add(quantity);
            debug!(quantity = line.quantity, "Incremented cart line");
        } else {
            cart.items.push(CartLine {
                product,
                quantity,
                added_at: self.clock.now(),
                variant,
            });
            debug!(quantity, "Added cart line");
        }

        self.commit(cart).await
    }

    /// Set the quantity of the first line for a product.
    ///
    /// The variant is not considered. A quantity of zero or less removes the
    /// line. Unknown products are a no-op, as is a quantity whose total
    /// would overflow.
    #[instrument(skip(self))]
    pub async fn update_quantity(&self, product_id: &ProductIdentity, quantity: i64) -> Cart {
        let Some(original) = self.doc.load_for_update().await else {
            return Cart::default();
        };
        let mut cart = original.clone();
        let Some(index) = cart
            .items
            .iter()
            .position(|line| line.product.has_identity(product_id))
        else {
            debug!("No cart line for product");
            return cart;
        };

        if quantity <= 0 {
            cart.items.remove(index);
        } else if let Some(line) = cart.items.get_mut(index) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }

        self.commit_or_keep(original, cart).await
    }

    /// Remove every line for a product. Unknown products are a no-op.
    #[instrument(skip(self))]
    pub async fn remove(&self, product_id: &ProductIdentity) -> Cart {
        let Some(original) = self.doc.load_for_update().await else {
            return Cart::default();
        };
        let mut cart = original.clone();
        cart.items
            .retain(|line| !line.product.has_identity(product_id));

        if cart.items.len() == original.items.len() {
            return original;
        }
        self.commit_or_keep(original, cart).await
    }

    /// Remove the line at `index`. Out-of-range indexes are a no-op.
    #[instrument(skip(self))]
    pub async fn remove_by_index(&self, index: usize) -> Cart {
        let Some(original) = self.doc.load_for_update().await else {
            return Cart::default();
        };
        if index >= original.items.len() {
            debug!(lines = original.items.len(), "Cart index out of range");
            return original;
        }
        let mut cart = original.clone();
        cart.items.remove(index);
        self.commit_or_keep(original, cart).await
    }

    /// Remove the backing key.
    #[instrument(skip(self))]
    pub async fn clear(&self) {
        self.doc.clear().await;
    }

    /// Recompute totals, stamp and persist.
    ///
    /// `updated_at` only moves when the write succeeds. An overflowing total
    /// is returned as an error before anything is written.
    async fn commit(&self, mut cart: Cart) -> Result<Cart> {
        cart.recompute_totals()?;

        let previous = cart.updated_at;
        cart.updated_at = Some(self.clock.now());
        if let Err(e) = self.doc.save(&cart).await {
            error!(key = keys::CART, error = %e, "Failed to persist cart");
            cart.updated_at = previous;
        }
        Ok(cart)
    }

    /// Commit `cart`, falling back to the unchanged `original` on overflow.
    async fn commit_or_keep(&self, original: Cart, cart: Cart) -> Cart {
        match self.commit(cart).await {
            Ok(cart) => cart,
            Err(e) => {
                error!(key = keys::CART, error = %e, "Rejected cart update");
                original
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::kv::{FailingStore, MemoryStore};

    fn store_with(kv: Arc<dyn KeyValueStore>) -> CartStore {
        CartStore::new(kv, Arc::new(ManualClock::new()))
    }

    fn store() -> CartStore {
        store_with(Arc::new(MemoryStore::new()))
    }

    fn product(id: &str, cents: i64) -> Product {
        Product::new(id, Decimal::new(cents, 2))
    }

    fn id(s: &str) -> ProductIdentity {
        ProductIdentity::parse(s).unwrap()
    }

    fn assert_totals_consistent(cart: &Cart) {
        let quantity: u64 = cart.items.iter().map(|l| u64::from(l.quantity)).sum();
        let amount: Decimal = cart
            .items
            .iter()
            .map(|l| l.unit_price() * Decimal::from(l.quantity))
            .sum();
        assert_eq!(cart.total_items, quantity);
        assert_eq!(cart.total_amount, amount);
        assert!(cart.items.iter().all(|l| l.quantity >= 1));
    }

    #[tokio::test]
    async fn test_get_empty() {
        let cart = store().get().await;
        assert!(cart.is_empty());
        assert_eq!(cart.total_items, 0);
        assert_eq!(cart.total_amount, Decimal::ZERO);
        assert_eq!(cart.updated_at, None);
    }

    #[tokio::test]
    async fn test_add_same_product_merges() {
        let store = store();
        store.add(product("a", 250), 2, None).await.unwrap();
        let cart = store.add(product("a", 250), 3, None).await.unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.total_items, 5);
        assert_eq!(cart.total_amount, Decimal::new(1250, 2));
        assert_totals_consistent(&cart);
    }

    #[tokio::test]
    async fn test_variant_makes_distinct_line() {
        let store = store();
        store.add(product("a", 100), 2, None).await.unwrap();
        store.add(product("a", 100), 3, None).await.unwrap();
        let cart = store
            .add(product("a", 100), 1, Some(Variant::new("x")))
            .await
            .unwrap();

        assert_eq!(cart.line_count(), 2);
        assert!(cart.items[0].variant.is_none());
        assert_eq!(
            cart.items[1].variant.as_ref().and_then(Variant::identity).unwrap().as_str(),
            "x"
        );
        assert_eq!(cart.total_items, 6);
        assert_eq!(cart.quantity_of(&id("a")), 6);
        assert_totals_consistent(&cart);
    }

    #[tokio::test]
    async fn test_variant_price_used_in_totals() {
        let store = store();
        let variant = Variant::new("large").with_price(Decimal::new(1500, 2));
        let cart = store
            .add(product("a", 1000), 2, Some(variant))
            .await
            .unwrap();
        assert_eq!(cart.total_amount, Decimal::new(3000, 2));
    }

    #[tokio::test]
    async fn test_add_zero_quantity_rejected() {
        let store = store();
        let err = store.add(product("a", 100), 0, None).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuantity(0)));
        assert!(store.get().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_without_identity_rejected() {
        let err = store()
            .add(Product::default(), 1, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingIdentity));
    }

    #[tokio::test]
    async fn test_update_quantity_replaces() {
        let store = store();
        store.add(product("a", 100), 2, None).await.unwrap();
        let cart = store.update_quantity(&id("a"), 7).await;
        assert_eq!(cart.items[0].quantity, 7);
        assert_totals_consistent(&cart);
    }

    #[tokio::test]
    async fn test_update_quantity_zero_removes_line() {
        let store = store();
        store.add(product("a", 100), 2, None).await.unwrap();
        store.add(product("b", 300), 1, None).await.unwrap();

        let cart = store.update_quantity(&id("a"), 0).await;
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_items, 1);
        assert_eq!(cart.total_amount, Decimal::new(300, 2));

        let cart = store.update_quantity(&id("b"), -4).await;
        assert!(cart.is_empty());
        assert_totals_consistent(&cart);
    }

    #[tokio::test]
    async fn test_update_quantity_unknown_is_noop() {
        let store = store();
        let before = store.add(product("a", 100), 1, None).await.unwrap();
        let after = store.update_quantity(&id("zzz"), 3).await;
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_remove_by_identity_drops_all_variants() {
        let store = store();
        store.add(product("a", 100), 1, None).await.unwrap();
        store
            .add(product("a", 100), 1, Some(Variant::new("x")))
            .await
            .unwrap();
        store.add(product("b", 100), 1, None).await.unwrap();

        let cart = store.remove(&id("a")).await;
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_items, 1);
    }

    #[tokio::test]
    async fn test_remove_by_index() {
        let store = store();
        store.add(product("a", 100), 1, None).await.unwrap();
        store.add(product("b", 200), 2, None).await.unwrap();

        let cart = store.remove_by_index(5).await;
        assert_eq!(cart.line_count(), 2);

        let cart = store.remove_by_index(0).await;
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items[0].product.identity().unwrap(), id("b"));
        assert_eq!(cart.total_amount, Decimal::new(400, 2));
    }

    #[tokio::test]
    async fn test_updated_at_advances() {
        let store = store();
        let first = store.add(product("a", 100), 1, None).await.unwrap();
        let second = store.add(product("a", 100), 1, None).await.unwrap();
        assert!(second.updated_at.unwrap() > first.updated_at.unwrap());
    }

    #[tokio::test]
    async fn test_clear() {
        let kv = Arc::new(MemoryStore::new());
        let store = store_with(kv.clone());
        store.add(product("a", 100), 1, None).await.unwrap();
        store.clear().await;
        assert_eq!(kv.get(keys::CART).await.unwrap(), None);
        assert!(store.get().await.is_empty());
    }

    #[tokio::test]
    async fn test_persisted_shape() {
        let kv = Arc::new(MemoryStore::new());
        let store = store_with(kv.clone());
        store.add(product("a", 199), 2, None).await.unwrap();

        let raw = kv.get(keys::CART).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["totalItems"], 2);
        assert_eq!(value["totalAmount"], "3.98");
        assert_eq!(value["items"][0]["quantity"], 2);
        assert!(value["items"][0].get("variant").is_none());
        assert!(value["updatedAt"].is_string());
    }

    #[tokio::test]
    async fn test_write_failure_keeps_previous_state() {
        let kv = Arc::new(FailingStore::new());
        let store = store_with(kv.clone());
        store.add(product("a", 100), 1, None).await.unwrap();

        kv.fail_writes(true);
        let cart = store.add(product("a", 100), 4, None).await.unwrap();
        assert_eq!(cart.total_items, 5);

        kv.fail_writes(false);
        assert_eq!(store.get().await.total_items, 1);
    }

    #[tokio::test]
    async fn test_read_failure_leaves_cart_untouched() {
        let kv = Arc::new(FailingStore::new());
        let store = store_with(kv.clone());
        store.add(product("a", 100), 5, None).await.unwrap();
        store.add(product("b", 200), 2, None).await.unwrap();
        let before = kv.get(keys::CART).await.unwrap();

        kv.fail_reads(true);
        assert!(store.add(product("c", 300), 1, None).await.unwrap().is_empty());
        assert!(store.update_quantity(&id("a"), 1).await.is_empty());
        assert!(store.remove(&id("b")).await.is_empty());
        assert!(store.remove_by_index(0).await.is_empty());

        kv.fail_reads(false);
        assert_eq!(kv.get(keys::CART).await.unwrap(), before);
        let cart = store.get().await;
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.total_items, 7);
    }

    #[tokio::test]
    async fn test_overflowing_amount_keeps_previous_cart() {
        let kv = Arc::new(MemoryStore::new());
        let store = store_with(kv.clone());
        let huge = Product::new("a", Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0));
        store.add(huge.clone(), 1, None).await.unwrap();
        let before = kv.get(keys::CART).await.unwrap();

        let cart = store.update_quantity(&id("a"), 10_000_000_000).await;
        assert_eq!(cart.items[0].quantity, 1);
        assert_eq!(kv.get(keys::CART).await.unwrap(), before);

        let err = store.add(huge, u32::MAX, None).await.unwrap_err();
        assert!(matches!(err, StoreError::AmountOverflow));
        assert_eq!(kv.get(keys::CART).await.unwrap(), before);
        assert_totals_consistent(&store.get().await);
    }

    #[test]
    fn test_totals_overflow_is_none() {
        let line = CartLine {
            product: Product::new("a", Decimal::MAX),
            quantity: 2,
            added_at: Utc::now(),
            variant: None,
        };
        assert_eq!(line.line_total(), None);
        assert_eq!(totals(&[line]), None);
    }
}
