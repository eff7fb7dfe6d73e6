use crate::codec::RecordCodec;
use crate::collection::{Doc, Ref};
use crate::errors::StoreResult;
use crate::schema::Record;
use crate::store::RemoteStore;
use std::sync::Arc;

/// Reads documents from the remote store and decodes them.
#[derive(Clone)]
pub(crate) struct ReadOperations {
    remote: Arc<dyn RemoteStore>,
    codec: RecordCodec,
}

impl ReadOperations {
    pub fn new(remote: Arc<dyn RemoteStore>, codec: RecordCodec) -> Self {
        ReadOperations { remote, codec }
    }

    /// Fetches a snapshot of the referenced document, `None` if it does not exist.
    pub async fn get<T: Record>(&self, reference: &Ref<T>) -> StoreResult<Option<Doc<T>>> {
        log::debug!("Reading {}", reference);
        let raw = self
            .remote
            .read(reference.collection().path(), reference.id())
            .await?;

        match raw {
            None => {
                log::debug!("Document {} not found", reference);
                Ok(None)
            }
            Some(doc) => {
                let data = self.codec.decode::<T>(&doc)?;
                Ok(Some(Doc::new(reference.clone(), data)))
            }
        }
    }
}
