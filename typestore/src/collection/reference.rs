use crate::collection::{is_reserved, Collection, CollectionPath};
use crate::common::{Convertible, Value, PATH_SEPARATOR};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

/// Validates a caller-supplied document id.
///
/// An id must be non-empty, must not contain `/`, must not be `.` or `..`
/// and must not use the reserved `__name__` form.
pub fn validate_id(id: &str) -> StoreResult<()> {
    if id.is_empty() {
        log::error!("Document id cannot be empty");
        return Err(StoreError::new(
            "Document id cannot be empty",
            ErrorKind::InvalidId,
        ));
    }

    if id.contains(PATH_SEPARATOR) {
        log::error!("Document id {} contains a path separator", id);
        return Err(StoreError::new(
            &format!("Document id {} contains a path separator", id),
            ErrorKind::InvalidId,
        ));
    }

    if id == "." || id == ".." || is_reserved(id) {
        log::error!("Document id {} is reserved", id);
        return Err(StoreError::new(
            &format!("Document id {} is reserved", id),
            ErrorKind::InvalidId,
        ));
    }
    Ok(())
}

/// The untyped address of a document: collection path plus id.
///
/// This is what a reference field holds inside a [Value] tree.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey {
    collection: CollectionPath,
    id: String,
}

impl DocumentKey {
    pub fn new(collection: CollectionPath, id: &str) -> DocumentKey {
        DocumentKey {
            collection,
            id: id.to_string(),
        }
    }

    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Display for DocumentKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.collection, PATH_SEPARATOR, self.id)
    }
}

impl Debug for DocumentKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentKey({})", self)
    }
}

/// A typed reference to one document of a [Collection].
///
/// A `Ref` is a lazy address: building or decoding one never touches the
/// store. Two refs are equal iff their collection paths and ids match.
///
/// # Examples
///
/// ```rust,ignore
/// let notes = collection::<Note>("notes")?;
/// let note = notes.doc("test")?;
/// assert_eq!(note.to_string(), "notes/test");
///
/// let comments = note.sub_collection::<Comment>("comments")?;
/// assert_eq!(comments.path().to_string(), "notes/test/comments");
/// ```
pub struct Ref<T> {
    collection: Collection<T>,
    id: String,
}

impl<T> Ref<T> {
    /// Builds a reference. Fails with `InvalidId` for a malformed id.
    pub fn new(collection: Collection<T>, id: &str) -> StoreResult<Ref<T>> {
        validate_id(id)?;
        Ok(Ref {
            collection,
            id: id.to_string(),
        })
    }

    /// Rebuilds a typed reference from its untyped key.
    pub fn from_key(key: &DocumentKey) -> StoreResult<Ref<T>> {
        Ref::new(Collection::from_path(key.collection.clone()), &key.id)
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn key(&self) -> DocumentKey {
        DocumentKey::new(self.collection.path().clone(), &self.id)
    }

    /// The collection `name` nested under this document.
    pub fn sub_collection<U>(&self, name: &str) -> StoreResult<Collection<U>> {
        let path = self.collection.path().child(&self.id, name)?;
        Ok(Collection::from_path(path))
    }
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Ref {
            collection: self.collection.clone(),
            id: self.id.clone(),
        }
    }
}

impl<T> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        self.collection == other.collection && self.id == other.id
    }
}

impl<T> Eq for Ref<T> {}

impl<T> Hash for Ref<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.collection.hash(state);
        self.id.hash(state);
    }
}

impl<T> Display for Ref<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.collection, PATH_SEPARATOR, self.id)
    }
}

impl<T> Debug for Ref<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ref({})", self)
    }
}

impl<T> From<Ref<T>> for Value {
    fn from(value: Ref<T>) -> Self {
        Value::Reference(value.key())
    }
}

impl<T> From<&Ref<T>> for Value {
    fn from(value: &Ref<T>) -> Self {
        Value::Reference(value.key())
    }
}

impl<T> Convertible for Ref<T> {
    type Output = Ref<T>;

    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::Reference(self.key()))
    }

    fn from_value(value: &Value) -> StoreResult<Self::Output> {
        match value {
            Value::Reference(key) => Ref::from_key(key),
            _ => {
                log::error!("Value {} is not a reference", value);
                Err(StoreError::new(
                    &format!("Value {} is not a reference", value),
                    ErrorKind::ObjectMappingError,
                ))
            }
        }
    }
}

/// Builds a reference to the document `id` of `collection`.
pub fn reference<T>(collection: &Collection<T>, id: &str) -> StoreResult<Ref<T>> {
    collection.doc(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::collection;
    use crate::common::from_value;

    struct Note;
    struct Comment;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("test").is_ok());
        assert!(validate_id("a-b_c.d").is_ok());
        for id in ["", "a/b", ".", "..", "__id__"] {
            let err = validate_id(id).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidId, "id {:?}", id);
        }
    }

    #[test]
    fn test_ref_equality() {
        let notes = collection::<Note>("notes").unwrap();
        let a = reference(&notes, "x").unwrap();
        let b = notes.doc("x").unwrap();
        let c = notes.doc("y").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let other = collection::<Note>("archive").unwrap().doc("x").unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn test_ref_display() {
        let note = collection::<Note>("notes").unwrap().doc("test").unwrap();
        assert_eq!(note.to_string(), "notes/test");
        assert_eq!(format!("{:?}", note), "Ref(notes/test)");
        assert_eq!(note.key().to_string(), "notes/test");
    }

    #[test]
    fn test_sub_collection() {
        let note = collection::<Note>("notes").unwrap().doc("test").unwrap();
        let comments = note.sub_collection::<Comment>("comments").unwrap();
        assert_eq!(comments.path().to_string(), "notes/test/comments");

        let nested = comments.doc("c1").unwrap();
        assert_eq!(nested.to_string(), "notes/test/comments/c1");
        assert!(note.sub_collection::<Comment>("__x__").is_err());
    }

    #[test]
    fn test_reference_identity_through_value() {
        let note = collection::<Note>("users/u1/notes").unwrap().doc("n1").unwrap();
        let value = note.to_value().unwrap();
        let decoded = from_value::<Ref<Note>>(&value).unwrap();
        assert_eq!(decoded.collection().path(), note.collection().path());
        assert_eq!(decoded.id(), note.id());
    }

    #[test]
    fn test_reference_decode_rejects_other_values() {
        let err = from_value::<Ref<Note>>(&Value::from("notes/x")).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);
    }

    #[test]
    fn test_reference_decode_validates_id() {
        let key = DocumentKey::new(CollectionPath::parse("notes").unwrap(), "");
        let err = from_value::<Ref<Note>>(&Value::Reference(key)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidId);
    }
}
