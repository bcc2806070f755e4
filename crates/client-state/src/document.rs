//! Typed JSON document stored under a single key.
//!
//! Every store owns one document. Reads never fail on bad data: a missing or
//! unparsable value is replaced by the type's default and logged.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::error::Result;
use crate::kv::{KeyValueStore, StorageResult};

/// A typed value persisted as JSON under `key`.
pub(crate) struct Document<T> {
    kv: Arc<dyn KeyValueStore>,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Document<T> {
    fn clone(&self) -> Self {
        Self {
            kv: Arc::clone(&self.kv),
            key: self.key,
            _marker: PhantomData,
        }
    }
}

impl<T> Document<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub(crate) fn new(kv: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            kv,
            key,
            _marker: PhantomData,
        }
    }

    /// Read and decode the value.
    ///
    /// Absent and undecodable values yield `T::default()`; only port failures
    /// are returned as errors.
    pub(crate) async fn load(&self) -> StorageResult<T> {
        let Some(raw) = self.kv.get(self.key).await? else {
            return Ok(T::default());
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(key = self.key, error = %e, "Discarding unreadable persisted value");
                Ok(T::default())
            }
        }
    }

    /// Like [`Self::load`], but a port failure also yields the default.
    pub(crate) async fn load_or_default(&self) -> T {
        match self.load().await {
            Ok(value) => value,
            Err(e) => {
                error!(key = self.key, error = %e, "Failed to read persisted value");
                T::default()
            }
        }
    }

    /// Read the value ahead of a read-modify-write.
    ///
    /// Returns `None` on a port failure so the caller skips its write and the
    /// persisted value stays as it was.
    pub(crate) async fn load_for_update(&self) -> Option<T> {
        match self.load().await {
            Ok(value) => Some(value),
            Err(e) => {
                error!(key = self.key, error = %e, "Failed to read persisted value, skipping update");
                None
            }
        }
    }

    /// Encode and write the value.
    pub(crate) async fn save(&self, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        self.kv.set(self.key, encoded).await?;
        debug!(key = self.key, "Persisted value");
        Ok(())
    }

    /// Write the value, logging instead of returning a failure.
    pub(crate) async fn persist(&self, value: &T) {
        if let Err(e) = self.save(value).await {
            error!(key = self.key, error = %e, "Failed to persist value");
        }
    }

    /// Remove the backing key, logging a failure.
    pub(crate) async fn clear(&self) {
        match self.kv.remove(self.key).await {
            Ok(()) => debug!(key = self.key, "Cleared value"),
            Err(e) => error!(key = self.key, error = %e, "Failed to clear value"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::kv::{FailingStore, MemoryStore};

    #[tokio::test]
    async fn test_absent_key_yields_default() {
        let doc: Document<Vec<u32>> = Document::new(Arc::new(MemoryStore::new()), "k");
        assert!(doc.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_value_yields_default() {
        let kv = Arc::new(MemoryStore::new());
        kv.set("k", "{not json".to_string()).await.unwrap();
        let doc: Document<Vec<u32>> = Document::new(kv, "k");
        assert!(doc.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let doc: Document<Vec<u32>> = Document::new(Arc::new(MemoryStore::new()), "k");
        doc.save(&vec![1, 2, 3]).await.unwrap();
        assert_eq!(doc.load().await.unwrap(), vec![1, 2, 3]);
        doc.clear().await;
        assert!(doc.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_failure() {
        let kv = Arc::new(FailingStore::new());
        kv.set("k", "[7]".to_string()).await.unwrap();
        kv.fail_reads(true);

        let doc: Document<Vec<u32>> = Document::new(kv.clone(), "k");
        assert!(doc.load().await.is_err());
        assert!(doc.load_or_default().await.is_empty());
        assert_eq!(doc.load_for_update().await, None);

        kv.fail_reads(false);
        assert_eq!(doc.load_for_update().await, Some(vec![7]));
    }

    #[tokio::test]
    async fn test_persist_swallows_write_failure() {
        let kv = Arc::new(FailingStore::new());
        kv.fail_writes(true);

        let doc: Document<Vec<u32>> = Document::new(kv.clone(), "k");
        assert!(doc.save(&vec![1]).await.is_err());
        doc.persist(&vec![1]).await;
        assert_eq!(kv.get("k").await.unwrap(), None);
    }
}
