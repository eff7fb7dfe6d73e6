use crate::collection::operation;
use crate::collection::{Collection, Doc, FieldUpdate, Patch, Ref, Update};
use crate::errors::StoreResult;
use crate::schema::Record;
use crate::typestore::Typestore;
use std::fmt::{Debug, Formatter};

/// A collection bound to a client.
///
/// Obtained with [Typestore::collection]. It holds nothing beyond the
/// binding and forwards to the free document operations.
///
/// # Examples
///
/// ```rust,ignore
/// let notes = db.collection(&collection::<Note>("notes")?);
/// let doc = notes.add(&Note { text: "Hello".into() }).await?;
/// let same = notes.get(doc.id()).await?;
/// ```
pub struct CollectionHandle<T> {
    db: Typestore,
    collection: Collection<T>,
}

impl<T> CollectionHandle<T> {
    pub(crate) fn new(db: Typestore, collection: Collection<T>) -> Self {
        CollectionHandle { db, collection }
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    /// Reference to the document `id` of the bound collection.
    pub fn doc(&self, id: &str) -> StoreResult<Ref<T>> {
        self.collection.doc(id)
    }
}

impl<T: Record> CollectionHandle<T> {
    pub async fn add(&self, data: &T) -> StoreResult<Doc<T>>
    where
        T: Clone,
    {
        operation::add(&self.db, &self.collection, data).await
    }

    pub async fn set(&self, id: &str, data: &T) -> StoreResult<Doc<T>>
    where
        T: Clone,
    {
        operation::set(&self.db, &self.collection, id, data).await
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<Doc<T>>> {
        operation::get_by_id(&self.db, &self.collection, id).await
    }

    pub async fn update(&self, id: &str, patch: Patch<T>) -> StoreResult<()> {
        operation::update_by_id(&self.db, &self.collection, id, patch).await
    }

    pub async fn update_fields(&self, id: &str, updates: Vec<FieldUpdate>) -> StoreResult<()> {
        operation::update_by_id(&self.db, &self.collection, id, Update::Fields(updates)).await
    }
}

impl<T> Clone for CollectionHandle<T> {
    fn clone(&self) -> Self {
        CollectionHandle {
            db: self.db.clone(),
            collection: self.collection.clone(),
        }
    }
}

impl<T> Debug for CollectionHandle<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "CollectionHandle({})", self.collection.path())
    }
}
