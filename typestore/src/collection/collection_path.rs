use crate::collection::{validate_id, Ref};
use crate::common::PATH_SEPARATOR;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

static RESERVED_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^__.*__$").expect("reserved segment pattern is valid"));

/// Checks if a path segment or document id uses the reserved `__name__` form.
pub(crate) fn is_reserved(segment: &str) -> bool {
    RESERVED_SEGMENT.is_match(segment)
}

/// The structured, immutable path of a collection in the store.
///
/// A collection path has an odd number of segments: `notes` is a root
/// collection, `users/u1/notes` is the `notes` collection nested under the
/// document `u1` of `users`. An even number of segments addresses a
/// document, not a collection, and is rejected.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath {
    segments: SmallVec<[String; 3]>,
}

impl CollectionPath {
    /// Parses a `/`-separated collection path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if the path is empty, has an empty segment
    /// (leading, trailing or doubled `/`), has a `.`, `..` or reserved
    /// `__name__` segment, or has an even number of segments.
    pub fn parse(path: &str) -> StoreResult<CollectionPath> {
        if path.is_empty() {
            log::error!("Collection path cannot be empty");
            return Err(StoreError::new(
                "Collection path cannot be empty",
                ErrorKind::InvalidPath,
            ));
        }

        let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        CollectionPath::from_segments(&segments)
    }

    /// Creates a collection path from already split segments.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> StoreResult<CollectionPath> {
        let mut collected = SmallVec::<[String; 3]>::new();
        for segment in segments {
            let segment = segment.as_ref();
            validate_segment(segment)?;
            collected.push(segment.to_string());
        }

        if collected.is_empty() {
            log::error!("Collection path cannot be empty");
            return Err(StoreError::new(
                "Collection path cannot be empty",
                ErrorKind::InvalidPath,
            ));
        }

        if collected.len() % 2 == 0 {
            let joined = collected.join(PATH_SEPARATOR);
            log::error!("Path {} addresses a document, not a collection", joined);
            return Err(StoreError::new(
                &format!("Path {} addresses a document, not a collection", joined),
                ErrorKind::InvalidPath,
            ));
        }

        Ok(CollectionPath { segments: collected })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment, i.e. the collection's own name.
    pub fn name(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// The document this collection is nested under, as `(parent path, id)`.
    pub fn parent(&self) -> Option<(CollectionPath, String)> {
        let len = self.segments.len();
        if len < 3 {
            return None;
        }
        let parent = CollectionPath {
            segments: self.segments[..len - 2].iter().cloned().collect(),
        };
        Some((parent, self.segments[len - 2].clone()))
    }

    /// Path of the collection `name` nested under the document `id`.
    pub fn child(&self, id: &str, name: &str) -> StoreResult<CollectionPath> {
        validate_id(id)?;
        validate_segment(name)?;
        let mut segments = self.segments.clone();
        segments.push(id.to_string());
        segments.push(name.to_string());
        Ok(CollectionPath { segments })
    }
}

fn validate_segment(segment: &str) -> StoreResult<()> {
    if segment.is_empty() {
        log::error!("Collection path cannot contain an empty segment");
        return Err(StoreError::new(
            "Collection path cannot contain an empty segment",
            ErrorKind::InvalidPath,
        ));
    }

    if segment == "." || segment == ".." || is_reserved(segment) {
        log::error!("Collection path segment {} is reserved", segment);
        return Err(StoreError::new(
            &format!("Collection path segment {} is reserved", segment),
            ErrorKind::InvalidPath,
        ));
    }
    Ok(())
}

impl Display for CollectionPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join(PATH_SEPARATOR))
    }
}

impl Debug for CollectionPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "CollectionPath({})", self)
    }
}

/// A typed collection: a [CollectionPath] bound to the record shape `T`.
///
/// The type parameter is a compile-time marker only; two collections with the
/// same path address the same documents.
pub struct Collection<T> {
    path: CollectionPath,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Collection<T> {
    /// Creates a typed collection by parsing `path`.
    pub fn new(path: &str) -> StoreResult<Collection<T>> {
        Ok(Collection::from_path(CollectionPath::parse(path)?))
    }

    pub fn from_path(path: CollectionPath) -> Collection<T> {
        Collection {
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &CollectionPath {
        &self.path
    }

    /// Builds a reference to the document `id` of this collection. No I/O.
    pub fn doc(&self, id: &str) -> StoreResult<Ref<T>> {
        Ref::new(self.clone(), id)
    }

    /// Reinterprets this collection with another record shape.
    pub fn cast<U>(&self) -> Collection<U> {
        Collection::from_path(self.path.clone())
    }
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Collection::from_path(self.path.clone())
    }
}

impl<T> PartialEq for Collection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl<T> Eq for Collection<T> {}

impl<T> Hash for Collection<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl<T> Debug for Collection<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Collection({})", self.path)
    }
}

impl<T> Display for Collection<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Creates a typed collection handle for `path`.
///
/// # Examples
///
/// ```rust,ignore
/// let notes = collection::<Note>("notes")?;
/// let user_notes = collection::<Note>("users/u1/notes")?;
/// ```
pub fn collection<T>(path: &str) -> StoreResult<Collection<T>> {
    Collection::new(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Note;

    #[test]
    fn test_parse_root_collection() {
        let path = CollectionPath::parse("notes").unwrap();
        assert_eq!(path.segments(), &["notes".to_string()]);
        assert_eq!(path.name(), "notes");
        assert_eq!(path.to_string(), "notes");
        assert!(path.parent().is_none());
    }

    #[test]
    fn test_parse_nested_collection() {
        let path = CollectionPath::parse("users/u1/notes").unwrap();
        assert_eq!(path.name(), "notes");
        let (parent, id) = path.parent().unwrap();
        assert_eq!(parent.to_string(), "users");
        assert_eq!(id, "u1");
    }

    #[test]
    fn test_invalid_paths() {
        for path in ["", "/notes", "notes/", "users//notes", "users/u1", ".", "a/../b", "__meta__"] {
            let err = CollectionPath::parse(path).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidPath, "path {:?}", path);
        }
    }

    #[test]
    fn test_child_path() {
        let users = CollectionPath::parse("users").unwrap();
        let notes = users.child("u1", "notes").unwrap();
        assert_eq!(notes, CollectionPath::parse("users/u1/notes").unwrap());
        assert_eq!(users.child("", "notes").unwrap_err().kind(), &ErrorKind::InvalidId);
        assert_eq!(users.child("u1", "").unwrap_err().kind(), &ErrorKind::InvalidPath);
    }

    #[test]
    fn test_collection_equality_by_path() {
        let a = collection::<Note>("notes").unwrap();
        let b = collection::<Note>("notes").unwrap();
        let c = collection::<Note>("shares").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(format!("{:?}", a), "Collection(notes)");
    }

    #[test]
    fn test_collection_doc() {
        let notes = collection::<Note>("notes").unwrap();
        let note = notes.doc("test").unwrap();
        assert_eq!(note.id(), "test");
        assert_eq!(note.collection(), &notes);
        assert_eq!(notes.doc("").unwrap_err().kind(), &ErrorKind::InvalidId);
    }

    #[test]
    fn test_reserved_detection() {
        assert!(is_reserved("__name__"));
        assert!(!is_reserved("_name_"));
        assert!(!is_reserved("name"));
    }
}
