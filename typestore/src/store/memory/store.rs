use super::resolver::{merge_into, resolve_document};
use super::{AutoIdGenerator, InMemoryStoreConfig};
use crate::collection::{validate_id, CollectionPath, Document, DocumentKey};
use crate::common::current_timestamp;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::store::{RemoteStore, WriteAck, WriteMode};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// In-memory implementation of the [RemoteStore] contract.
///
/// # Purpose
/// `InMemoryStore` honours the full remote-store contract without a
/// network: it assigns ids, stamps commit times and resolves server values.
/// It backs the test suites and the demo, and serves as the reference for
/// real store adapters.
///
/// # Characteristics
/// - **Atomic per document**: a write holds the document's map entry while
///   it resolves server values against the stored state, so concurrent
///   increments and array unions/removals commute
/// - **Snapshots**: reads return a structurally shared copy, unaffected by
///   later writes
/// - **No persistence**: all data is lost when the store is dropped
///
/// # Usage
/// ```text
/// let store = InMemoryStore::new(InMemoryStoreConfig::new());
/// let db = Typestore::builder().remote(store).open().await?;
/// ```
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<InMemoryStoreInner>,
}

impl InMemoryStore {
    /// Creates a new in-memory store with the specified configuration.
    pub fn new(store_config: InMemoryStoreConfig) -> InMemoryStore {
        InMemoryStore {
            inner: Arc::new(InMemoryStoreInner::new(store_config)),
        }
    }

    /// Number of stored documents across all collections.
    pub fn document_count(&self) -> usize {
        self.inner.documents.len()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Relaxed)
    }

    /// Simulates losing the connection: while offline every write fails
    /// with `WriteError` and every read with `ReadError`.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::Relaxed);
    }

    /// Stores a raw document as is, bypassing server value resolution.
    ///
    /// Meant for seeding fixtures, including malformed ones.
    pub fn insert_raw(&self, collection: &CollectionPath, id: &str, doc: Document) -> StoreResult<()> {
        validate_id(id)?;
        self.inner
            .documents
            .insert(DocumentKey::new(collection.clone(), id), doc);
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        InMemoryStore::new(InMemoryStoreConfig::new())
    }
}

#[async_trait]
impl RemoteStore for InMemoryStore {
    async fn open(&self) -> StoreResult<()> {
        self.inner.open()
    }

    async fn write(
        &self,
        collection: &CollectionPath,
        id: Option<&str>,
        payload: Document,
        mode: WriteMode,
    ) -> StoreResult<WriteAck> {
        self.inner.write(collection, id, payload, mode)
    }

    async fn read(&self, collection: &CollectionPath, id: &str) -> StoreResult<Option<Document>> {
        self.inner.read(collection, id)
    }

    async fn close(&self) -> StoreResult<()> {
        self.inner.close()
    }
}

struct InMemoryStoreInner {
    closed: AtomicBool,
    offline: AtomicBool,
    id_generator: AutoIdGenerator,
    documents: DashMap<DocumentKey, Document>,
}

impl InMemoryStoreInner {
    fn new(store_config: InMemoryStoreConfig) -> InMemoryStoreInner {
        InMemoryStoreInner {
            closed: AtomicBool::from(false),
            offline: AtomicBool::from(false),
            id_generator: AutoIdGenerator::new(store_config.auto_id_length()),
            documents: DashMap::new(),
        }
    }

    fn open(&self) -> StoreResult<()> {
        self.closed.store(false, Ordering::Relaxed);
        log::info!("In-memory store opened");
        Ok(())
    }

    fn close(&self) -> StoreResult<()> {
        if self.closed.swap(true, Ordering::Relaxed) {
            return Ok(());
        }
        log::info!("In-memory store closed with {} document(s)", self.documents.len());
        Ok(())
    }

    fn check_available(&self, kind: ErrorKind) -> StoreResult<()> {
        let cause = if self.closed.load(Ordering::Relaxed) {
            StoreError::new("In-memory store is closed", ErrorKind::StoreClosed)
        } else if self.offline.load(Ordering::Relaxed) {
            StoreError::new("In-memory store is offline", ErrorKind::InternalError)
        } else {
            return Ok(());
        };

        log::error!("Store unavailable: {}", cause);
        Err(StoreError::new_with_cause("Store unavailable", kind, cause))
    }

    fn write(
        &self,
        collection: &CollectionPath,
        id: Option<&str>,
        payload: Document,
        mode: WriteMode,
    ) -> StoreResult<WriteAck> {
        self.check_available(ErrorKind::WriteError)?;
        let commit_time = current_timestamp();

        match mode {
            WriteMode::Create => {
                let id = match id {
                    Some(id) => id.to_string(),
                    None => self.vacant_id(collection),
                };
                let key = DocumentKey::new(collection.clone(), &id);
                match self.documents.entry(key) {
                    Entry::Occupied(_) => {
                        log::error!("Document {}/{} already exists", collection, id);
                        Err(StoreError::new(
                            &format!("Document {}/{} already exists", collection, id),
                            ErrorKind::WriteError,
                        ))
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(resolve_document(&payload, None, commit_time)?);
                        Ok(WriteAck::new(&id, commit_time))
                    }
                }
            }
            WriteMode::Overwrite => {
                let id = require_id(id, &mode)?;
                let resolved = resolve_document(&payload, None, commit_time)?;
                self.documents
                    .insert(DocumentKey::new(collection.clone(), id), resolved);
                Ok(WriteAck::new(id, commit_time))
            }
            WriteMode::Merge(ref mask) => {
                let id = require_id(id, &mode)?;
                match self.documents.entry(DocumentKey::new(collection.clone(), id)) {
                    Entry::Occupied(mut entry) => {
                        let mut updated = entry.get().clone();
                        merge_into(&mut updated, &payload, mask, commit_time)?;
                        entry.insert(updated);
                        Ok(WriteAck::new(id, commit_time))
                    }
                    Entry::Vacant(_) => {
                        log::error!("Document {}/{} does not exist", collection, id);
                        Err(StoreError::new(
                            &format!("Document {}/{} does not exist", collection, id),
                            ErrorKind::NotFound,
                        ))
                    }
                }
            }
        }
    }

    fn read(&self, collection: &CollectionPath, id: &str) -> StoreResult<Option<Document>> {
        self.check_available(ErrorKind::ReadError)?;
        let key = DocumentKey::new(collection.clone(), id);
        Ok(self.documents.get(&key).map(|doc| doc.value().clone()))
    }

    fn vacant_id(&self, collection: &CollectionPath) -> String {
        loop {
            let id = self.id_generator.next_id();
            if !self
                .documents
                .contains_key(&DocumentKey::new(collection.clone(), &id))
            {
                return id;
            }
            log::warn!("Generated id {} collides in {}, retrying", id, collection);
        }
    }
}

fn require_id<'a>(id: Option<&'a str>, mode: &WriteMode) -> StoreResult<&'a str> {
    id.ok_or_else(|| {
        log::error!("Write mode {} requires a document id", mode);
        StoreError::new(
            &format!("Write mode {} requires a document id", mode),
            ErrorKind::WriteError,
        )
    })
}
