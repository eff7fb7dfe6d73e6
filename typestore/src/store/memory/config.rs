use crate::common::DEFAULT_AUTO_ID_LENGTH;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Configuration for an [InMemoryStore](crate::store::InMemoryStore).
///
/// Cloning is cheap and clones share settings. The store reads the
/// settings when it is created.
///
/// ```text
/// let config = InMemoryStoreConfig::new();
/// config.set_auto_id_length(12)?;
/// let store = InMemoryStore::new(config);
/// ```
#[derive(Clone)]
pub struct InMemoryStoreConfig {
    inner: Arc<InMemoryStoreConfigInner>,
}

impl InMemoryStoreConfig {
    pub fn new() -> InMemoryStoreConfig {
        InMemoryStoreConfig {
            inner: Arc::new(InMemoryStoreConfigInner::new()),
        }
    }

    /// Length of the ids the store assigns on an id-less create. Defaults to 20.
    pub fn auto_id_length(&self) -> usize {
        self.inner.auto_id_length.load(Ordering::Relaxed)
    }

    /// Sets the length of assigned ids. Fails with `InvalidOperation` for 0.
    pub fn set_auto_id_length(&self, length: usize) -> StoreResult<()> {
        if length == 0 {
            log::error!("Auto id length must be greater than 0");
            return Err(StoreError::new(
                "Auto id length must be greater than 0",
                ErrorKind::InvalidOperation,
            ));
        }
        self.inner.auto_id_length.store(length, Ordering::Relaxed);
        Ok(())
    }
}

impl Default for InMemoryStoreConfig {
    fn default() -> Self {
        InMemoryStoreConfig::new()
    }
}

struct InMemoryStoreConfigInner {
    auto_id_length: AtomicUsize,
}

impl InMemoryStoreConfigInner {
    fn new() -> InMemoryStoreConfigInner {
        InMemoryStoreConfigInner {
            auto_id_length: AtomicUsize::new(DEFAULT_AUTO_ID_LENGTH),
        }
    }
}
