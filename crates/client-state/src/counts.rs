//! Badge count notifications.
//!
//! [`CountNotifier`] recomputes the favorites count and the cart quantity on
//! demand and pushes them to every registered listener. It holds no persisted
//! state of its own: counts are always read back from the two stores.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::{debug, error, instrument};

use crate::cart::CartStore;
use crate::error::StoreError;
use crate::favorites::FavoritesStore;

/// Aggregates shown on UI badges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counts {
    /// Number of favorites.
    pub favorites: usize,
    /// Sum of cart line quantities.
    pub cart_quantity: u64,
}

/// Callback invoked with fresh counts.
///
/// Listeners are identified by their `Arc`: keep the handle to unsubscribe.
pub type CountListener = Arc<dyn Fn(Counts) + Send + Sync>;

/// Publish/subscribe hub for badge counts.
pub struct CountNotifier {
    favorites: FavoritesStore,
    cart: CartStore,
    listeners: Mutex<Vec<CountListener>>,
}

impl CountNotifier {
    /// Create a notifier reading from the given stores.
    #[must_use]
    pub const fn new(favorites: FavoritesStore, cart: CartStore) -> Self {
        Self {
            favorites,
            cart,
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Register a listener. Registering the same listener twice is a no-op.
    ///
    /// Returns whether the listener was newly added.
    pub fn subscribe(&self, listener: &CountListener) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        if listeners.iter().any(|l| Arc::ptr_eq(l, listener)) {
            return false;
        }
        listeners.push(Arc::clone(listener));
        true
    }

    /// Unregister a listener. Unknown listeners are a no-op.
    ///
    /// Returns whether the listener was registered.
    pub fn unsubscribe(&self, listener: &CountListener) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Read both stores concurrently and derive the counts.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if either store cannot be read.
    pub async fn counts(&self) -> Result<Counts, StoreError> {
        let (favorites, cart) = tokio::join!(self.favorites.load(), self.cart.load());
        let favorites = favorites?;
        let cart = cart?;

        Ok(Counts {
            favorites: favorites.len(),
            cart_quantity: cart.items.iter().map(|line| u64::from(line.quantity)).sum(),
        })
    }

    /// Recompute the counts and call every listener, in registration order.
    ///
    /// If either store cannot be read, no listener is called and `None` is
    /// returned.
    #[instrument(skip(self))]
    pub async fn publish(&self) -> Option<Counts> {
        let counts = match self.counts().await {
            Ok(counts) => counts,
            Err(e) => {
                error!(error = %e, "Failed to compute badge counts");
                return None;
            }
        };

        // Snapshot so listeners may (un)subscribe from inside the callback
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        debug!(
            listeners = listeners.len(),
            favorites = counts.favorites,
            cart_quantity = counts.cart_quantity,
            "Publishing badge counts"
        );
        for listener in &listeners {
            listener(counts);
        }
        Some(counts)
    }
}
