//! Pocketshop Client State - on-device persisted shopping state.
//!
//! Keeps the shopping cart, the favorites list, the last checkout form draft
//! and a bounded tracking scan history on the device, behind an opaque async
//! key-value store, and pushes derived badge counts to UI listeners.
//!
//! # Architecture
//!
//! - [`kv`] - The persistence port ([`KeyValueStore`]) with memory and file backends
//! - [`favorites`], [`cart`], [`checkout`], [`scan_history`] - One store per entity,
//!   each owning a single reserved key (see [`keys`])
//! - [`counts`] - Badge count publish/subscribe hub
//! - [`state`] - [`ClientState`], the handle bundling all of the above
//!
//! Every store operation is a read-modify-write against the port. Reads never
//! fail on bad data and writes never fail the caller: storage problems are
//! logged and the operation returns its in-memory result.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod clock;
pub mod config;
pub mod counts;
mod document;
pub mod error;
pub mod favorites;
pub mod keys;
pub mod kv;
pub mod scan_history;
pub mod state;

pub use cart::{Cart, CartLine, CartStore};
pub use checkout::{CheckoutDraft, CheckoutDraftStore, CheckoutForm};
pub use clock::{Clock, SystemClock};
pub use config::{ClientStateConfig, ConfigError};
pub use counts::{CountListener, CountNotifier, Counts};
pub use error::{Result, StoreError};
pub use favorites::{FavoriteItem, FavoritesStore};
pub use kv::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageResult};
pub use scan_history::{DEFAULT_SCAN_HISTORY_LIMIT, NewScan, ScanHistoryItem, ScanHistoryStore};
pub use state::ClientState;
