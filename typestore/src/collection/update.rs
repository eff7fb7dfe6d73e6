use crate::collection::Document;
use crate::common::{Convertible, FieldPath, Value};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// A shallow partial record of shape `T`.
///
/// Each field set on the patch replaces the whole stored field of the same
/// name; fields not set are left untouched. Values may be
/// [ServerValue](crate::common::ServerValue) sentinels. Field names are
/// checked against the schema of `T` when the update is sent.
///
/// Like the client builder, a `Patch` remembers the first conversion error
/// and reports it when the update is executed.
///
/// # Examples
///
/// ```rust,ignore
/// let patch = Patch::<Share>::new()
///     .set("comment", "Hi, check this out!")
///     .set("tags", array_union(vec!["docs", "documentation"]));
/// update(&db, share.reference(), patch).await?;
/// ```
pub struct Patch<T> {
    fields: Document,
    error: Option<StoreError>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Patch<T> {
    pub fn new() -> Patch<T> {
        Patch {
            fields: Document::new(),
            error: None,
            _marker: PhantomData,
        }
    }

    /// Sets the top-level field `name`. An absent value (`None`) is skipped.
    pub fn set<V: Convertible>(mut self, name: &str, value: V) -> Self {
        if self.error.is_some() || value.is_absent() {
            return self;
        }

        let result = value
            .to_value()
            .and_then(|value| self.fields.put(name, value));
        if let Err(err) = result {
            self.error = Some(err);
        }
        self
    }

    /// Names of the fields set so far.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consumes the patch, returning its fields or the first captured error.
    pub fn into_document(self) -> StoreResult<Document> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.fields),
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::new()
    }
}

impl<T> Clone for Patch<T> {
    fn clone(&self) -> Self {
        Patch {
            fields: self.fields.clone(),
            error: self.error.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> Debug for Patch<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Patch")
            .field("fields", &self.fields)
            .field("error", &self.error.as_ref().map(|e| e.message().to_string()))
            .finish()
    }
}

/// One targeted write: the value to store at a (possibly nested) field path.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldUpdate {
    path: FieldPath,
    value: Value,
}

impl FieldUpdate {
    pub fn new<V: Into<Value>>(path: FieldPath, value: V) -> FieldUpdate {
        FieldUpdate {
            path,
            value: value.into(),
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_parts(self) -> (FieldPath, Value) {
        (self.path, self.value)
    }
}

impl FieldPath {
    /// Pairs this path with the value to write there.
    ///
    /// ```rust,ignore
    /// let views = field(&["meta", "views"])?.set(increment(100500));
    /// ```
    pub fn set<V: Into<Value>>(&self, value: V) -> FieldUpdate {
        FieldUpdate::new(self.clone(), value)
    }
}

/// Builds a [FieldUpdate] from path segments and a value.
pub fn field_update<S: AsRef<str>, V: Into<Value>>(segments: &[S], value: V) -> StoreResult<FieldUpdate> {
    Ok(FieldUpdate::new(FieldPath::new(segments)?, value))
}

/// Either shape of update accepted by `update_by_id`.
#[derive(Debug, Clone)]
pub enum Update<T> {
    /// Shallow merge of top-level fields.
    Patch(Patch<T>),
    /// Surgical writes at field paths.
    Fields(Vec<FieldUpdate>),
}

impl<T> From<Patch<T>> for Update<T> {
    fn from(value: Patch<T>) -> Self {
        Update::Patch(value)
    }
}

impl<T> From<Vec<FieldUpdate>> for Update<T> {
    fn from(value: Vec<FieldUpdate>) -> Self {
        Update::Fields(value)
    }
}

impl<T> From<FieldUpdate> for Update<T> {
    fn from(value: FieldUpdate) -> Self {
        Update::Fields(vec![value])
    }
}

/// Rejects an empty update and updates writing overlapping field paths.
///
/// Two paths overlap when they are equal or one is nested under the other.
/// The outcome of such a pair depends on application order, so a single
/// update may not carry both.
pub(crate) fn check_field_updates(updates: &[FieldUpdate]) -> StoreResult<()> {
    if updates.is_empty() {
        log::error!("Update must contain at least one field");
        return Err(StoreError::new(
            "Update must contain at least one field",
            ErrorKind::InvalidOperation,
        ));
    }

    for (index, current) in updates.iter().enumerate() {
        if let Some(other) = updates[index + 1..]
            .iter()
            .find(|other| current.path.overlaps(&other.path))
        {
            log::error!(
                "Field paths {} and {} overlap in one update",
                current.path,
                other.path
            );
            return Err(StoreError::new(
                &format!(
                    "Field paths {} and {} overlap in one update",
                    current.path, other.path
                ),
                ErrorKind::InvalidOperation,
            ));
        }
    }
    Ok(())
}
