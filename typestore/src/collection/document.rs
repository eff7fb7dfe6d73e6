use im::OrdMap;

use crate::collection::is_reserved;
use crate::common::{FieldPath, Value};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use std::fmt::Debug;

/// The untyped, schemaless payload of a stored document.
///
/// A document is an ordered map of string keys to [Value]s. Nested maps are
/// themselves documents, addressed with a [FieldPath] through
/// [`get_path`](Document::get_path) and [`put_path`](Document::put_path).
/// Keys are plain strings: a `.` inside a key is not a separator.
///
/// ## Persistent map
///
/// The entries live in an `im::OrdMap`, so cloning is O(1) and every mutation
/// shares structure with the previous version. Snapshots handed out by the
/// store are never affected by later writes.
#[derive(Clone, PartialEq, Default)]
pub struct Document {
    data: OrdMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: OrdMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of top-level entries.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates `value` with the top-level `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFieldPath` if the key is empty or uses the reserved
    /// `__name__` form, which the wire form keeps for its type markers.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut doc = Document::new();
    /// doc.put("text", "Hello, cruel world!")?;
    /// assert_eq!(doc.get("text"), Value::from("Hello, cruel world!"));
    /// ```
    pub fn put<T: Into<Value>>(&mut self, key: &str, value: T) -> StoreResult<()> {
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(StoreError::new(
                "Document does not support empty key",
                ErrorKind::InvalidFieldPath,
            ));
        }
        if is_reserved(key) {
            log::error!("Document key {} is reserved", key);
            return Err(StoreError::new(
                &format!("Document key {} is reserved", key),
                ErrorKind::InvalidFieldPath,
            ));
        }
        self.data.insert(key.to_string(), value.into());
        Ok(())
    }

    /// Returns the value of the top-level `key`, or [Value::Null] if absent.
    pub fn get(&self, key: &str) -> Value {
        self.data.get(key).cloned().unwrap_or(Value::Null)
    }

    /// Borrows the value of the top-level `key`, `None` if absent.
    pub fn get_ref(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Removes the top-level `key`, returning its value if present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Top-level keys in order.
    pub fn keys(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    /// Returns the value at a nested path, or `None` if any segment is missing
    /// or an intermediate value is not a map.
    pub fn get_path(&self, path: &FieldPath) -> Option<&Value> {
        let segments = path.segments();
        let mut current = self;
        for (index, segment) in segments.iter().enumerate() {
            let value = current.data.get(segment)?;
            if index == segments.len() - 1 {
                return Some(value);
            }
            current = value.as_document()?;
        }
        None
    }

    /// Writes `value` at a nested path.
    ///
    /// Missing intermediate maps are created. An intermediate value that is
    /// not a map is replaced by one; siblings of the target are left intact.
    pub fn put_path(&mut self, path: &FieldPath, value: Value) -> StoreResult<()> {
        self.deep_put(path.segments(), value)
    }

    /// Removes the value at a nested path, returning it if present.
    pub fn remove_path(&mut self, path: &FieldPath) -> Option<Value> {
        self.deep_remove(path.segments())
    }

    /// Checks if any value, at any depth, is a pending server operation.
    pub fn contains_server_op(&self) -> bool {
        self.data.values().any(|v| v.contains_server_op())
    }

    /// Paths of every pending server operation, in key order.
    pub fn server_op_paths(&self) -> Vec<FieldPath> {
        let mut paths = Vec::new();
        self.collect_server_op_paths(&mut Vec::new(), &mut paths);
        paths
    }

    fn collect_server_op_paths(&self, prefix: &mut Vec<String>, paths: &mut Vec<FieldPath>) {
        for (key, value) in self.data.iter() {
            prefix.push(key.clone());
            match value {
                Value::ServerOp(_) => {
                    if let Ok(path) = FieldPath::new(prefix) {
                        paths.push(path);
                    }
                }
                Value::Document(doc) => doc.collect_server_op_paths(prefix, paths),
                _ => {}
            }
            prefix.pop();
        }
    }

    fn deep_put(&mut self, segments: &[String], value: Value) -> StoreResult<()> {
        match segments {
            [] => {
                log::error!("Empty embedded key");
                Err(StoreError::new("Empty embedded key", ErrorKind::InvalidFieldPath))
            }
            [key] => self.put(key, value),
            [key, rest @ ..] => {
                let mut nested = match self.data.get(key) {
                    Some(Value::Document(doc)) => doc.clone(),
                    _ => Document::new(),
                };
                nested.deep_put(rest, value)?;
                self.put(key, Value::Document(nested))
            }
        }
    }

    fn deep_remove(&mut self, segments: &[String]) -> Option<Value> {
        match segments {
            [] => None,
            [key] => self.data.remove(key),
            [key, rest @ ..] => {
                let mut nested = match self.data.get(key) {
                    Some(Value::Document(doc)) => doc.clone(),
                    _ => return None,
                };
                let removed = nested.deep_remove(rest);
                self.data.insert(key.clone(), Value::Document(nested));
                removed
            }
        }
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.data.iter()).finish()
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::codec::document_to_json(self))
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Document {
            data: iter.into_iter().collect(),
        }
    }
}

#[doc(hidden)]
pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a [Document] with JSON-like syntax.
///
/// # Examples
///
/// ```rust
/// use typestore::doc;
///
/// let share = doc!{
///     "tags": ["test", "demo"],
///     "meta": {
///         "views": 0,
///         "likes": 0,
///     },
/// };
/// assert_eq!(share.size(), 2);
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::collection::Document::new()
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::collection::Document::new();
            $(
                doc.put(&$crate::collection::normalize(stringify!($key)), $crate::doc_value!($value))
                .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Helper macro converting values for the [doc!] macro.
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{field, increment};

    fn set_up() -> Document {
        doc! {
            "text": "hello",
            "meta": {
                "views": 1,
                "likes": 2,
            },
            "tags": ["a", "b"],
        }
    }

    #[test]
    fn test_put_and_get() {
        let mut doc = Document::new();
        doc.put("text", "hello").unwrap();
        assert_eq!(doc.get("text"), Value::from("hello"));
        assert_eq!(doc.get("missing"), Value::Null);
        assert_eq!(doc.size(), 1);
    }

    #[test]
    fn test_put_empty_key_fails() {
        let mut doc = Document::new();
        let err = doc.put("", 1).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidFieldPath);
    }

    #[test]
    fn test_put_reserved_key_fails() {
        let mut doc = Document::new();
        let err = doc.put("__type__", "timestamp").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidFieldPath);

        let path = field(&["labels", "__type__"]).unwrap();
        let err = doc.put_path(&path, Value::from("timestamp")).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidFieldPath);
        assert!(doc.is_empty());

        doc.put("_type_", 1).unwrap();
        doc.put("__type", 2).unwrap();
        assert_eq!(doc.size(), 2);
    }

    #[test]
    fn test_key_with_dot_is_top_level() {
        let mut doc = Document::new();
        doc.put("a.b", 1).unwrap();
        assert!(doc.contains_key("a.b"));
        assert!(!doc.contains_key("a"));
    }

    #[test]
    fn test_get_path() {
        let doc = set_up();
        let views = field(&["meta", "views"]).unwrap();
        assert_eq!(doc.get_path(&views), Some(&Value::I64(1)));
        assert_eq!(doc.get_path(&field(&["meta", "shares"]).unwrap()), None);
        assert_eq!(doc.get_path(&field(&["text", "inner"]).unwrap()), None);
    }

    #[test]
    fn test_put_path_keeps_siblings() {
        let mut doc = set_up();
        doc.put_path(&field(&["meta", "views"]).unwrap(), Value::from(10))
            .unwrap();
        assert_eq!(doc.get_path(&field(&["meta", "views"]).unwrap()), Some(&Value::I64(10)));
        assert_eq!(doc.get_path(&field(&["meta", "likes"]).unwrap()), Some(&Value::I64(2)));
    }

    #[test]
    fn test_put_path_creates_intermediate_maps() {
        let mut doc = Document::new();
        doc.put_path(&field(&["a", "b", "c"]).unwrap(), Value::from(true))
            .unwrap();
        assert_eq!(doc.get_path(&field(&["a", "b", "c"]).unwrap()), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_put_path_replaces_non_map_intermediate() {
        let mut doc = set_up();
        doc.put_path(&field(&["text", "inner"]).unwrap(), Value::from(1))
            .unwrap();
        assert!(doc.get("text").is_document());
    }

    #[test]
    fn test_remove_path() {
        let mut doc = set_up();
        let removed = doc.remove_path(&field(&["meta", "likes"]).unwrap());
        assert_eq!(removed, Some(Value::I64(2)));
        assert_eq!(doc.get_path(&field(&["meta", "views"]).unwrap()), Some(&Value::I64(1)));
        assert_eq!(doc.remove_path(&field(&["nope", "x"]).unwrap()), None);
    }

    #[test]
    fn test_clone_is_independent_snapshot() {
        let original = set_up();
        let mut copy = original.clone();
        copy.put("text", "changed").unwrap();
        assert_eq!(original.get("text"), Value::from("hello"));
    }

    #[test]
    fn test_server_op_detection() {
        let mut doc = set_up();
        assert!(!doc.contains_server_op());
        doc.put_path(&field(&["meta", "views"]).unwrap(), Value::from(increment(1)))
            .unwrap();
        assert!(doc.contains_server_op());
        assert_eq!(doc.server_op_paths(), vec![field(&["meta", "views"]).unwrap()]);
    }

    #[test]
    fn test_doc_macro_nested() {
        let doc = set_up();
        assert_eq!(doc.keys(), vec!["meta", "tags", "text"]);
        assert_eq!(doc.get("tags"), Value::from(vec!["a", "b"]));
    }

    #[test]
    fn test_from_iterator() {
        let doc: Document = vec![("k".to_string(), Value::from(1))].into_iter().collect();
        assert_eq!(doc.get("k"), Value::I64(1));
    }
}
