//! Typed document operations.
//!
//! Every operation is a single async request against the client's remote
//! store. Nothing is retried and nothing is cached. Errors raised by the
//! remote store are returned unchanged.

use crate::collection::{Collection, Doc, FieldUpdate, Patch, Ref, Update};
use crate::errors::StoreResult;
use crate::schema::Record;
use crate::typestore::Typestore;

/// Adds `data` to `collection` under a store-assigned id.
///
/// The returned [Doc] carries the caller's data as given. Server values in
/// it are left unevaluated; read the document back to see resolved values.
pub async fn add<T: Record + Clone>(db: &Typestore, collection: &Collection<T>, data: &T) -> StoreResult<Doc<T>> {
    db.writer()?.add(collection, data).await
}

/// Creates or fully replaces the document `id` of `collection`.
///
/// Fields absent from `data` do not survive the overwrite.
pub async fn set<T: Record + Clone>(
    db: &Typestore,
    collection: &Collection<T>,
    id: &str,
    data: &T,
) -> StoreResult<Doc<T>> {
    db.writer()?.set(collection, id, data).await
}

/// Merges the fields set in `patch` into the referenced document.
///
/// Each top-level field in the patch replaces the stored field; other
/// fields are kept. Fails with `NotFound` if the document does not exist.
pub async fn update<T: Record>(db: &Typestore, reference: &Ref<T>, patch: Patch<T>) -> StoreResult<()> {
    db.writer()?.update(reference, patch).await
}

/// Writes each value at its field path in the referenced document.
///
/// Sibling fields are untouched and missing intermediate maps are created.
/// Two updates to the same or overlapping paths are rejected.
pub async fn update_fields<T: Record>(
    db: &Typestore,
    reference: &Ref<T>,
    updates: Vec<FieldUpdate>,
) -> StoreResult<()> {
    db.writer()?.update_fields(reference, updates).await
}

/// Updates the document `id` of `collection` with either update shape.
pub async fn update_by_id<T: Record, U: Into<Update<T>>>(
    db: &Typestore,
    collection: &Collection<T>,
    id: &str,
    update: U,
) -> StoreResult<()> {
    let reference = collection.doc(id)?;
    let writer = db.writer()?;
    match update.into() {
        Update::Patch(patch) => writer.update(&reference, patch).await,
        Update::Fields(updates) => writer.update_fields(&reference, updates).await,
    }
}

/// Reads the referenced document. `Ok(None)` means it does not exist.
pub async fn get<T: Record>(db: &Typestore, reference: &Ref<T>) -> StoreResult<Option<Doc<T>>> {
    db.reader()?.get(reference).await
}

/// Reads the document `id` of `collection`.
pub async fn get_by_id<T: Record>(
    db: &Typestore,
    collection: &Collection<T>,
    id: &str,
) -> StoreResult<Option<Doc<T>>> {
    let reference = collection.doc(id)?;
    db.reader()?.get(&reference).await
}
