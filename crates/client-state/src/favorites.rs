//! Favorites (liked products).
//!
//! Most recent first, at most one entry per product identity.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pocketshop_core::{Product, ProductIdentity};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::clock::Clock;
use crate::document::Document;
use crate::error::{Result, StoreError};
use crate::keys;
use crate::kv::{KeyValueStore, StorageResult};

/// A liked product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteItem {
    pub product: Product,
    pub added_at: DateTime<Utc>,
}

impl FavoriteItem {
    /// Identity of the liked product.
    #[must_use]
    pub fn identity(&self) -> Option<ProductIdentity> {
        self.product.identity()
    }
}

/// Store for the favorites list.
#[derive(Clone)]
pub struct FavoritesStore {
    doc: Document<Vec<FavoriteItem>>,
    clock: Arc<dyn Clock>,
}

impl FavoritesStore {
    /// Create a store over the given persistence port.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            doc: Document::new(kv, keys::FAVORITES),
            clock,
        }
    }

    /// Read the favorites, surfacing port failures.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the persistence port cannot be read.
    pub async fn load(&self) -> StorageResult<Vec<FavoriteItem>> {
        self.doc.load().await
    }

    /// Read the favorites. Never fails; unreadable state yields an empty list.
    pub async fn list(&self) -> Vec<FavoriteItem> {
        self.doc.load_or_default().await
    }

    /// Whether a product is in the favorites.
    pub async fn contains(&self, product_id: &ProductIdentity) -> bool {
        self.list()
            .await
            .iter()
            .any(|item| item.product.has_identity(product_id))
    }

    /// Add a product at the head of the list.
    ///
    /// Adding a product that is already a favorite returns the list unchanged.
    /// If the list cannot be read, nothing is written and an empty list is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MissingIdentity` if the product has no usable ID.
    #[instrument(skip(self, product), fields(product_id))]
    pub async fn add(&self, product: Product) -> Result<Vec<FavoriteItem>> {
        let identity = product.identity().ok_or(StoreError::MissingIdentity)?;
        tracing::Span::current().record("product_id", identity.as_str());

        let Some(mut items) = self.doc.load_for_update().await else {
            return Ok(Vec::new());
        };
        if items.iter().any(|item| item.product.has_identity(&identity)) {
            debug!("Product already in favorites");
            return Ok(items);
        }

        self.insert_head(&mut items, product).await;
        Ok(items)
    }

    /// Remove every entry for a product. Unknown IDs are a no-op, and so is
    /// an unreadable list.
    #[instrument(skip(self))]
    pub async fn remove(&self, product_id: &ProductIdentity) -> Vec<FavoriteItem> {
        let Some(mut items) = self.doc.load_for_update().await else {
            return Vec::new();
        };
        let before = items.len();
        items.retain(|item| !item.product.has_identity(product_id));

        if items.len() != before {
            self.doc.persist(&items).await;
        }
        items
    }

    /// Add the product if absent, remove it if present.
    ///
    /// Returns whether the product is a favorite afterwards. An unreadable
    /// list is left alone and reported as `false`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MissingIdentity` if the product has no usable ID.
    #[instrument(skip(self, product))]
    pub async fn toggle(&self, product: Product) -> Result<bool> {
        let identity = product.identity().ok_or(StoreError::MissingIdentity)?;
        let Some(mut items) = self.doc.load_for_update().await else {
            return Ok(false);
        };

        if items.iter().any(|item| item.product.has_identity(&identity)) {
            items.retain(|item| !item.product.has_identity(&identity));
            self.doc.persist(&items).await;
            Ok(false)
        } else {
            self.insert_head(&mut items, product).await;
            Ok(true)
        }
    }

    async fn insert_head(&self, items: &mut Vec<FavoriteItem>, product: Product) {
        items.insert(
            0,
            FavoriteItem {
                product,
                added_at: self.clock.now(),
            },
        );
        self.doc.persist(items).await;
    }

    /// Remove the backing key.
    #[instrument(skip(self))]
    pub async fn clear(&self) {
        self.doc.clear().await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::clock::ManualClock;
    use crate::kv::{FailingStore, MemoryStore};

    fn store_with(kv: Arc<dyn KeyValueStore>) -> FavoritesStore {
        FavoritesStore::new(kv, Arc::new(ManualClock::new()))
    }

    fn product(id: &str) -> Product {
        Product::new(id, Decimal::new(500, 2))
    }

    fn id(s: &str) -> ProductIdentity {
        ProductIdentity::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_list_empty() {
        let store = store_with(Arc::new(MemoryStore::new()));
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_prepends() {
        let store = store_with(Arc::new(MemoryStore::new()));
        store.add(product("a")).await.unwrap();
        let items = store.add(product("b")).await.unwrap();

        let ids: Vec<_> = items.iter().map(|i| i.identity().unwrap()).collect();
        assert_eq!(ids, vec![id("b"), id("a")]);
        assert!(items[0].added_at > items[1].added_at);
        assert_eq!(store.list().await, items);
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let store = store_with(Arc::new(MemoryStore::new()));
        let first = store.add(product("a")).await.unwrap();
        let second = store.add(product("a")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(second.len(), 1);
    }

    #[tokio::test]
    async fn test_dedup_uses_resolved_identity() {
        let store = store_with(Arc::new(MemoryStore::new()));
        let by_slug: Product = serde_json::from_str(r#"{"slug": "hat"}"#).unwrap();
        let by_slug_again: Product =
            serde_json::from_str(r#"{"id": "", "slug": "hat", "name": "Hat"}"#).unwrap();

        store.add(by_slug).await.unwrap();
        let items = store.add(by_slug_again).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_add_without_identity() {
        let store = store_with(Arc::new(MemoryStore::new()));
        let err = store.add(Product::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingIdentity));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = store_with(Arc::new(MemoryStore::new()));
        store.add(product("a")).await.unwrap();
        store.add(product("b")).await.unwrap();

        let items = store.remove(&id("a")).await;
        assert_eq!(items.len(), 1);
        assert!(!store.contains(&id("a")).await);
        assert!(store.contains(&id("b")).await);

        let unchanged = store.remove(&id("missing")).await;
        assert_eq!(unchanged, items);
    }

    #[tokio::test]
    async fn test_toggle() {
        let store = store_with(Arc::new(MemoryStore::new()));
        assert!(store.toggle(product("a")).await.unwrap());
        assert!(!store.toggle(product("a")).await.unwrap());
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_removes_key() {
        let kv = Arc::new(MemoryStore::new());
        let store = store_with(kv.clone());
        store.add(product("a")).await.unwrap();
        store.clear().await;
        assert_eq!(kv.get(keys::FAVORITES).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_state_reads_empty() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(keys::FAVORITES, "[{\"broken\"".to_string())
            .await
            .unwrap();
        let store = store_with(kv);
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_returns_in_memory_result() {
        let kv = Arc::new(FailingStore::new());
        let store = store_with(kv.clone());
        store.add(product("a")).await.unwrap();

        kv.fail_writes(true);
        let items = store.add(product("b")).await.unwrap();
        assert_eq!(items.len(), 2);

        kv.fail_writes(false);
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_read_failure_leaves_favorites_untouched() {
        let kv = Arc::new(FailingStore::new());
        let store = store_with(kv.clone());
        store.add(product("a")).await.unwrap();
        store.add(product("b")).await.unwrap();
        let before = kv.get(keys::FAVORITES).await.unwrap();

        kv.fail_reads(true);
        assert!(store.remove(&id("zzz")).await.is_empty());
        assert!(store.add(product("c")).await.unwrap().is_empty());
        assert!(!store.toggle(product("a")).await.unwrap());

        kv.fail_reads(false);
        assert_eq!(kv.get(keys::FAVORITES).await.unwrap(), before);
        let ids: Vec<_> = store
            .list()
            .await
            .iter()
            .map(|i| i.identity().unwrap())
            .collect();
        assert_eq!(ids, vec![id("b"), id("a")]);
    }
}
