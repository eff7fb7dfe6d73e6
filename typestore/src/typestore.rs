use crate::collection::operation::{ReadOperations, WriteOperations};
use crate::collection::{Collection, CollectionHandle};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::store::RemoteStore;
use crate::typestore_builder::TypestoreBuilder;
use crate::typestore_config::TypestoreConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Client handle of a typed document store.
///
/// `Typestore` binds a [RemoteStore] to the codec settings of a
/// [TypestoreConfig]. It is the first argument of every document operation
/// and is cheap to clone: all clones share the same connection and the same
/// open/closed state.
///
/// The lifecycle is `open -> use -> shutdown`. After [Typestore::shutdown]
/// every operation fails with `StoreClosed`.
///
/// # Examples
///
/// ```rust,ignore
/// use typestore::{add, collection, InMemoryStore, Typestore};
///
/// let db = Typestore::builder().remote(InMemoryStore::default()).open().await?;
/// let notes = collection::<Note>("notes")?;
/// let note = add(&db, &notes, &Note { text: "Hello".into() }).await?;
/// db.shutdown().await?;
/// ```
#[derive(Clone)]
pub struct Typestore {
    inner: Arc<TypestoreInner>,
}

impl Typestore {
    /// Creates a new [TypestoreBuilder].
    pub fn builder() -> TypestoreBuilder {
        TypestoreBuilder::new()
    }

    pub(crate) fn new(config: TypestoreConfig, remote: Arc<dyn RemoteStore>) -> Self {
        let codec = config.codec();
        Typestore {
            inner: Arc::new(TypestoreInner {
                writer: WriteOperations::new(remote.clone(), codec),
                reader: ReadOperations::new(remote.clone(), codec),
                config,
                remote,
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Binds `collection` to this client.
    pub fn collection<T>(&self, collection: &Collection<T>) -> CollectionHandle<T> {
        CollectionHandle::new(self.clone(), collection.clone())
    }

    pub fn config(&self) -> &TypestoreConfig {
        &self.inner.config
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Closes the remote store. Calling it again is a no-op.
    pub async fn shutdown(&self) -> StoreResult<()> {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            log::warn!("Typestore is already shut down");
            return Ok(());
        }

        self.inner.remote.close().await?;
        log::info!("Typestore shut down");
        Ok(())
    }

    pub(crate) fn writer(&self) -> StoreResult<&WriteOperations> {
        self.ensure_open()?;
        Ok(&self.inner.writer)
    }

    pub(crate) fn reader(&self) -> StoreResult<&ReadOperations> {
        self.ensure_open()?;
        Ok(&self.inner.reader)
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.is_closed() {
            log::error!("Typestore is shut down");
            return Err(StoreError::new("Typestore is shut down", ErrorKind::StoreClosed));
        }
        Ok(())
    }
}

struct TypestoreInner {
    config: TypestoreConfig,
    remote: Arc<dyn RemoteStore>,
    closed: AtomicBool,
    writer: WriteOperations,
    reader: ReadOperations,
}
