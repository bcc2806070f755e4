//! Key-value persistence port.
//!
//! The stores treat persistence as an opaque async string map. There are no
//! transactions across keys and no compare-and-swap: every store operation is a
//! plain read-modify-write, so two concurrent writers on the same key can lose
//! an update. Callers that need ordering must await each call in turn.

mod file;
mod memory;

#[cfg(any(test, feature = "test-util"))]
mod failing;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

#[cfg(any(test, feature = "test-util"))]
pub use failing::FailingStore;

/// Persistence port errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type for persistence port operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Async key-value storage primitive.
///
/// Values are opaque text; encoding is the caller's responsibility.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if the key is absent.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> StorageResult<()>;

    /// Delete `key`. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> StorageResult<()>;
}
