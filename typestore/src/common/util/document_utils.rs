use crate::collection::Document;
use crate::common::{FieldPath, Value};
use crate::errors::StoreResult;

/// Builds a document holding each value at its field path.
///
/// Intermediate maps are created as needed; later paths win on conflict.
pub fn document_from_paths(entries: &[(FieldPath, Value)]) -> StoreResult<Document> {
    let mut doc = Document::new();
    for (path, value) in entries {
        doc.put_path(path, value.clone())?;
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::field;

    #[test]
    fn test_document_from_paths_nests_values() {
        let doc = document_from_paths(&[
            (field(&["meta", "views"]).unwrap(), Value::from(1)),
            (field(&["meta", "likes"]).unwrap(), Value::from(2)),
        ])
        .unwrap();
        let meta = doc.get("meta");
        let meta = meta.as_document().unwrap();
        assert_eq!(meta.get("views"), Value::I64(1));
        assert_eq!(meta.get("likes"), Value::I64(2));
    }
}
