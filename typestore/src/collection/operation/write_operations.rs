use crate::codec::{EncodedUpdate, RecordCodec};
use crate::collection::{Collection, Doc, FieldUpdate, Patch, Ref};
use crate::errors::StoreResult;
use crate::schema::Record;
use crate::store::{RemoteStore, WriteMode};
use std::sync::Arc;

/// Encodes typed writes and sends them to the remote store.
#[derive(Clone)]
pub(crate) struct WriteOperations {
    inner: Arc<WriteOperationsInner>,
}

impl WriteOperations {
    pub fn new(remote: Arc<dyn RemoteStore>, codec: RecordCodec) -> Self {
        WriteOperations {
            inner: Arc::new(WriteOperationsInner { remote, codec }),
        }
    }

    /// Creates a document with a store-assigned id.
    pub async fn add<T: Record + Clone>(&self, collection: &Collection<T>, data: &T) -> StoreResult<Doc<T>> {
        self.inner.add(collection, data).await
    }

    /// Creates or fully replaces the document `id`.
    pub async fn set<T: Record + Clone>(
        &self,
        collection: &Collection<T>,
        id: &str,
        data: &T,
    ) -> StoreResult<Doc<T>> {
        self.inner.set(collection, id, data).await
    }

    /// Shallow-merges the fields of `patch` into an existing document.
    pub async fn update<T: Record>(&self, reference: &Ref<T>, patch: Patch<T>) -> StoreResult<()> {
        let encoded = self.inner.codec.encode_patch(patch)?;
        self.inner.merge(reference, encoded).await
    }

    /// Writes each value at its field path in an existing document.
    pub async fn update_fields<T: Record>(
        &self,
        reference: &Ref<T>,
        updates: Vec<FieldUpdate>,
    ) -> StoreResult<()> {
        let encoded = self.inner.codec.encode_field_updates::<T>(updates)?;
        self.inner.merge(reference, encoded).await
    }
}

struct WriteOperationsInner {
    remote: Arc<dyn RemoteStore>,
    codec: RecordCodec,
}

impl WriteOperationsInner {
    async fn add<T: Record + Clone>(&self, collection: &Collection<T>, data: &T) -> StoreResult<Doc<T>> {
        let payload = self.codec.encode(data)?;
        log::debug!("Adding document to {}", collection);

        let ack = self
            .remote
            .write(collection.path(), None, payload, WriteMode::Create)
            .await?;
        let reference = collection.doc(ack.id())?;
        log::debug!("Added {} at {}", reference, ack.commit_time());
        Ok(Doc::new(reference, data.clone()))
    }

    async fn set<T: Record + Clone>(
        &self,
        collection: &Collection<T>,
        id: &str,
        data: &T,
    ) -> StoreResult<Doc<T>> {
        let reference = collection.doc(id)?;
        let payload = self.codec.encode(data)?;
        log::debug!("Setting {}", reference);

        let ack = self
            .remote
            .write(collection.path(), Some(id), payload, WriteMode::Overwrite)
            .await?;
        log::debug!("Set {} at {}", reference, ack.commit_time());
        Ok(Doc::new(reference, data.clone()))
    }

    async fn merge<T>(&self, reference: &Ref<T>, encoded: EncodedUpdate) -> StoreResult<()> {
        let EncodedUpdate { payload, mask } = encoded;
        log::debug!("Updating {} field(s) of {}", mask.len(), reference);

        let ack = self
            .remote
            .write(
                reference.collection().path(),
                Some(reference.id()),
                payload,
                WriteMode::Merge(mask),
            )
            .await?;
        log::debug!("Updated {} at {}", reference, ack.commit_time());
        Ok(())
    }
}
