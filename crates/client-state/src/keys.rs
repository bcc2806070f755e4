//! Reserved storage keys.
//!
//! One key per entity. These values are persisted on user devices and must not
//! change between releases.

/// Key for the favorites list.
pub const FAVORITES: &str = "pocketshop.favorites";

/// Key for the cart.
pub const CART: &str = "pocketshop.cart";

/// Key for the last checkout form draft.
pub const CHECKOUT_DRAFT: &str = "pocketshop.checkout_draft";

/// Key for the tracking scan history.
pub const SCAN_HISTORY: &str = "pocketshop.scan_history";

/// All reserved keys.
pub const ALL: [&str; 4] = [FAVORITES, CART, CHECKOUT_DRAFT, SCAN_HISTORY];
