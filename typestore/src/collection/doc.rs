use crate::codec::value_to_json;
use crate::collection::Ref;
use crate::common::{Convertible, Value, KEY_DATA, KEY_REF, TAG_DOC, TYPE_TAG};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use serde_json::json;

/// An immutable snapshot of one document: its [Ref] and its typed data.
///
/// A `Doc` is produced by `add`, `set` and `get`. It is never updated in
/// place; reading the document again yields a new snapshot. A `Doc` returned
/// by a write carries the caller's data as written, so any
/// [`FieldValue::Server`](crate::common::FieldValue::Server) sentinel is
/// still pending in it.
#[derive(Clone, Debug, PartialEq)]
pub struct Doc<T> {
    reference: Ref<T>,
    data: T,
}

impl<T> Doc<T> {
    pub fn new(reference: Ref<T>, data: T) -> Doc<T> {
        Doc { reference, data }
    }

    /// The address of this document.
    pub fn reference(&self) -> &Ref<T> {
        &self.reference
    }

    pub fn id(&self) -> &str {
        self.reference.id()
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn into_parts(self) -> (Ref<T>, T) {
        (self.reference, self.data)
    }
}

impl<T: Convertible> Doc<T> {
    /// Renders the snapshot in the JSON wire form.
    ///
    /// ```text
    /// {
    ///   "__type__": "doc",
    ///   "ref": {
    ///     "__type__": "ref",
    ///     "collection": { "__type__": "collection", "path": "notes" },
    ///     "id": "R9L38yZ0BYWNYjvJ9odK"
    ///   },
    ///   "data": { "text": "Hello, cruel world!" }
    /// }
    /// ```
    pub fn to_json(&self) -> StoreResult<serde_json::Value> {
        let data = self.data.to_value()?;
        if !data.is_document() {
            log::error!("Document data must be a map, found {}", data.type_name());
            return Err(StoreError::new(
                &format!("Document data must be a map, found {}", data.type_name()),
                ErrorKind::ObjectMappingError,
            ));
        }

        Ok(json!({
            TYPE_TAG: TAG_DOC,
            KEY_REF: value_to_json(&Value::Reference(self.reference.key())),
            KEY_DATA: value_to_json(&data),
        }))
    }

    /// Pretty-printed JSON wire form.
    pub fn to_json_string(&self) -> StoreResult<String> {
        let json = self.to_json()?;
        Ok(serde_json::to_string_pretty(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{collection, Document};
    use crate::doc;

    #[test]
    fn test_accessors() {
        let notes = collection::<Document>("notes").unwrap();
        let snapshot = Doc::new(notes.doc("test").unwrap(), doc! { "text": "Test note" });
        assert_eq!(snapshot.id(), "test");
        assert_eq!(snapshot.reference().collection(), &notes);
        assert_eq!(snapshot.data().get("text"), Value::from("Test note"));

        let (reference, data) = snapshot.into_parts();
        assert_eq!(reference.id(), "test");
        assert_eq!(data.size(), 1);
    }

    #[test]
    fn test_to_json_shape() {
        let notes = collection::<Document>("notes").unwrap();
        let snapshot = Doc::new(notes.doc("R9L38yZ0BYWNYjvJ9odK").unwrap(), doc! { "text": "Hello, cruel world!" });
        let json = snapshot.to_json().unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "__type__": "doc",
                "ref": {
                    "__type__": "ref",
                    "collection": {"__type__": "collection", "path": "notes"},
                    "id": "R9L38yZ0BYWNYjvJ9odK"
                },
                "data": {"text": "Hello, cruel world!"}
            })
        );
    }

    #[test]
    fn test_to_json_rejects_non_map_data() {
        let numbers = collection::<i64>("numbers").unwrap();
        let snapshot = Doc::new(numbers.doc("n").unwrap(), 5i64);
        let err = snapshot.to_json().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);
    }
}
