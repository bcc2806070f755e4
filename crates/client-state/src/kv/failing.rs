//! Storage backend that can be told to fail, for exercising degraded paths.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::{KeyValueStore, MemoryStore, StorageError, StorageResult};

/// A [`MemoryStore`] wrapper whose reads and writes can be switched to fail.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FailingStore {
    /// Create a store that succeeds until told otherwise.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `get` fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `set` and `remove` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool, op: &str, key: &str) -> StorageResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StorageError::Backend(format!("injected {op} failure for {key}")));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Self::check(&self.fail_reads, "get", key)?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> StorageResult<()> {
        Self::check(&self.fail_writes, "set", key)?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        Self::check(&self.fail_writes, "remove", key)?;
        self.inner.remove(key).await
    }
}
