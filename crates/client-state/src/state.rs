//! Client state shared across screens.

use std::sync::Arc;

use pocketshop_core::{Product, ProductIdentity, Variant};

use crate::cart::{Cart, CartStore};
use crate::checkout::CheckoutDraftStore;
use crate::clock::{Clock, SystemClock};
use crate::config::ClientStateConfig;
use crate::counts::CountNotifier;
use crate::error::Result;
use crate::favorites::{FavoriteItem, FavoritesStore};
use crate::kv::{FileStore, KeyValueStore, StorageResult};
use crate::scan_history::ScanHistoryStore;

/// Handle to every on-device store plus the badge count notifier.
///
/// This struct is cheaply cloneable via `Arc`; pass it to whichever UI root
/// needs the stores. The cart and favorites helpers on this type publish fresh
/// badge counts after the mutation.
#[derive(Clone)]
pub struct ClientState {
    inner: Arc<ClientStateInner>,
}

struct ClientStateInner {
    favorites: FavoritesStore,
    cart: CartStore,
    checkout: CheckoutDraftStore,
    scans: ScanHistoryStore,
    counts: CountNotifier,
}

impl ClientState {
    /// Create client state over a persistence port using the wall clock.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, config: &ClientStateConfig) -> Self {
        Self::with_clock(kv, Arc::new(SystemClock), config)
    }

    /// Create client state with an explicit time source.
    #[must_use]
    pub fn with_clock(
        kv: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: &ClientStateConfig,
    ) -> Self {
        let favorites = FavoritesStore::new(Arc::clone(&kv), Arc::clone(&clock));
        let cart = CartStore::new(Arc::clone(&kv), Arc::clone(&clock));
        let checkout = CheckoutDraftStore::new(Arc::clone(&kv));
        let scans = ScanHistoryStore::with_limit(kv, clock, config.scan_history_limit);
        let counts = CountNotifier::new(favorites.clone(), cart.clone());

        Self {
            inner: Arc::new(ClientStateInner {
                favorites,
                cart,
                checkout,
                scans,
                counts,
            }),
        }
    }

    /// Open client state backed by files under `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the data directory cannot be created.
    pub async fn open(config: &ClientStateConfig) -> StorageResult<Self> {
        let kv = FileStore::open(&config.data_dir).await?;
        tracing::debug!(data_dir = %config.data_dir.display(), "Opened client state");
        Ok(Self::new(Arc::new(kv), config))
    }

    /// Get the favorites store.
    #[must_use]
    pub fn favorites(&self) -> &FavoritesStore {
        &self.inner.favorites
    }

    /// Get the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get the checkout draft store.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutDraftStore {
        &self.inner.checkout
    }

    /// Get the scan history store.
    #[must_use]
    pub fn scans(&self) -> &ScanHistoryStore {
        &self.inner.scans
    }

    /// Get the badge count notifier.
    #[must_use]
    pub fn counts(&self) -> &CountNotifier {
        &self.inner.counts
    }

    // =========================================================================
    // Mutations that refresh badge counts
    // =========================================================================

    /// Add to cart, then publish counts.
    ///
    /// # Errors
    ///
    /// See [`CartStore::add`].
    pub async fn add_to_cart(
        &self,
        product: Product,
        quantity: u32,
        variant: Option<Variant>,
    ) -> Result<Cart> {
        let cart = self.cart().add(product, quantity, variant).await?;
        self.counts().publish().await;
        Ok(cart)
    }

    /// Set a cart line quantity, then publish counts.
    pub async fn update_cart_quantity(&self, product_id: &ProductIdentity, quantity: i64) -> Cart {
        let cart = self.cart().update_quantity(product_id, quantity).await;
        self.counts().publish().await;
        cart
    }

    /// Remove a product from the cart, then publish counts.
    pub async fn remove_from_cart(&self, product_id: &ProductIdentity) -> Cart {
        let cart = self.cart().remove(product_id).await;
        self.counts().publish().await;
        cart
    }

    /// Empty the cart, then publish counts.
    pub async fn clear_cart(&self) {
        self.cart().clear().await;
        self.counts().publish().await;
    }

    /// Add a favorite, then publish counts.
    ///
    /// # Errors
    ///
    /// See [`FavoritesStore::add`].
    pub async fn add_favorite(&self, product: Product) -> Result<Vec<FavoriteItem>> {
        let items = self.favorites().add(product).await?;
        self.counts().publish().await;
        Ok(items)
    }

    /// Remove a favorite, then publish counts.
    pub async fn remove_favorite(&self, product_id: &ProductIdentity) -> Vec<FavoriteItem> {
        let items = self.favorites().remove(product_id).await;
        self.counts().publish().await;
        items
    }

    /// Toggle a favorite, then publish counts.
    ///
    /// # Errors
    ///
    /// See [`FavoritesStore::toggle`].
    pub async fn toggle_favorite(&self, product: Product) -> Result<bool> {
        let liked = self.favorites().toggle(product).await?;
        self.counts().publish().await;
        Ok(liked)
    }

    /// Remove all favorites, then publish counts.
    pub async fn clear_favorites(&self) {
        self.favorites().clear().await;
        self.counts().publish().await;
    }
}
