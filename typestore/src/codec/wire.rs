use crate::collection::{validate_id, CollectionPath, Document, DocumentKey};
use crate::common::{
    format_timestamp, parse_timestamp, ServerValue, Value, KEY_ARGS, KEY_COLLECTION, KEY_ID,
    KEY_OP, KEY_PATH, KEY_VALUE, OP_ARRAY_REMOVE, OP_ARRAY_UNION, OP_INCREMENT, OP_SERVER_DATE,
    TAG_COLLECTION, TAG_DOC, TAG_REF, TAG_TIMESTAMP, TAG_VALUE, TYPE_TAG,
};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use serde_json::{json, Map, Number};

/// Renders a [Value] in the JSON wire form.
///
/// Timestamps, references and pending server operations become objects
/// tagged with `__type__`. Non-finite floats have no JSON form and render
/// as `null`.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::I64(i) => serde_json::Value::Number(Number::from(*i)),
        Value::F64(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Timestamp(ts) => json!({
            TYPE_TAG: TAG_TIMESTAMP,
            KEY_VALUE: format_timestamp(ts),
        }),
        Value::Reference(key) => key_to_json(key),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
        Value::Document(doc) => document_to_json(doc),
        Value::ServerOp(op) => json!({
            TYPE_TAG: TAG_VALUE,
            KEY_OP: op.op_name(),
            KEY_ARGS: op.args().iter().map(value_to_json).collect::<Vec<_>>(),
        }),
    }
}

/// Renders a [Document] as a JSON object.
pub fn document_to_json(doc: &Document) -> serde_json::Value {
    let mut map = Map::new();
    for (key, value) in doc.iter() {
        map.insert(key.clone(), value_to_json(value));
    }
    serde_json::Value::Object(map)
}

fn key_to_json(key: &DocumentKey) -> serde_json::Value {
    json!({
        TYPE_TAG: TAG_REF,
        KEY_COLLECTION: {
            TYPE_TAG: TAG_COLLECTION,
            KEY_PATH: key.collection().to_string(),
        },
        KEY_ID: key.id(),
    })
}

/// Parses a [Value] from the JSON wire form.
pub fn value_from_json(json: &serde_json::Value) -> StoreResult<Value> {
    match json {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(Value::I64(i)),
            None => n
                .as_f64()
                .map(Value::F64)
                .ok_or_else(|| encoding_error(&format!("Unsupported number {}", n))),
        },
        serde_json::Value::String(s) => Ok(Value::String(s.clone())),
        serde_json::Value::Array(items) => {
            let values = items
                .iter()
                .map(value_from_json)
                .collect::<StoreResult<Vec<Value>>>()?;
            Ok(Value::Array(values))
        }
        serde_json::Value::Object(map) => match map.get(TYPE_TAG) {
            None => Ok(Value::Document(object_to_document(map)?)),
            Some(serde_json::Value::String(tag)) => tagged_from_json(tag, map),
            Some(other) => Err(encoding_error(&format!("Invalid type tag {}", other))),
        },
    }
}

/// Parses a [Document] from a JSON object.
pub fn document_from_json(json: &serde_json::Value) -> StoreResult<Document> {
    match value_from_json(json)? {
        Value::Document(doc) => Ok(doc),
        other => Err(encoding_error(&format!(
            "Expected a JSON object, found {}",
            other.type_name()
        ))),
    }
}

fn object_to_document(map: &Map<String, serde_json::Value>) -> StoreResult<Document> {
    let mut doc = Document::new();
    for (key, value) in map {
        doc.put(key, value_from_json(value)?)?;
    }
    Ok(doc)
}

fn tagged_from_json(tag: &str, map: &Map<String, serde_json::Value>) -> StoreResult<Value> {
    match tag {
        TAG_TIMESTAMP => {
            let text = string_entry(map, KEY_VALUE)?;
            Ok(Value::Timestamp(parse_timestamp(text)?))
        }
        TAG_REF => {
            let collection = map
                .get(KEY_COLLECTION)
                .and_then(|c| c.as_object())
                .ok_or_else(|| encoding_error("Reference is missing its collection"))?;
            let path = CollectionPath::parse(string_entry(collection, KEY_PATH)?)?;
            let id = string_entry(map, KEY_ID)?;
            validate_id(id)?;
            Ok(Value::Reference(DocumentKey::new(path, id)))
        }
        TAG_VALUE => {
            let op = string_entry(map, KEY_OP)?;
            let args = match map.get(KEY_ARGS) {
                Some(serde_json::Value::Array(items)) => items
                    .iter()
                    .map(value_from_json)
                    .collect::<StoreResult<Vec<Value>>>()?,
                None => vec![],
                Some(_) => return Err(encoding_error("Server value arguments must be an array")),
            };
            Ok(Value::ServerOp(server_value_from_parts(op, args)?))
        }
        TAG_DOC => Err(encoding_error("A document snapshot is not a value")),
        other => Err(encoding_error(&format!("Unknown type tag {}", other))),
    }
}

fn server_value_from_parts(op: &str, mut args: Vec<Value>) -> StoreResult<ServerValue> {
    match op {
        OP_SERVER_DATE if args.is_empty() => Ok(ServerValue::ServerDate),
        OP_INCREMENT if args.len() == 1 && args[0].is_number() => {
            Ok(ServerValue::Increment(Box::new(args.remove(0))))
        }
        OP_ARRAY_UNION => Ok(ServerValue::ArrayUnion(args)),
        OP_ARRAY_REMOVE => Ok(ServerValue::ArrayRemove(args)),
        _ => Err(encoding_error(&format!(
            "Invalid server value {} with {} argument(s)",
            op,
            args.len()
        ))),
    }
}

fn string_entry<'a>(map: &'a Map<String, serde_json::Value>, key: &str) -> StoreResult<&'a str> {
    map.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| encoding_error(&format!("Missing string entry {}", key)))
}

fn encoding_error(message: &str) -> StoreError {
    log::error!("{}", message);
    StoreError::new(message, ErrorKind::EncodingError)
}

impl Document {
    /// Renders this document as a JSON object in the wire form.
    pub fn to_json(&self) -> serde_json::Value {
        document_to_json(self)
    }

    /// Parses a document from a JSON object in the wire form.
    pub fn from_json(json: &serde_json::Value) -> StoreResult<Document> {
        document_from_json(json)
    }

    pub fn to_json_string(&self) -> StoreResult<String> {
        Ok(serde_json::to_string(&self.to_json())?)
    }

    pub fn from_json_str(text: &str) -> StoreResult<Document> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        document_from_json(&json)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Document {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            document_to_json(self).serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Document {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let json = serde_json::Value::deserialize(deserializer)?;
            document_from_json(&json).map_err(|e| D::Error::custom(e.message()))
        }
    }

    impl Serialize for Value {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            value_to_json(self).serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Value {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let json = serde_json::Value::deserialize(deserializer)?;
            value_from_json(&json).map_err(|e| D::Error::custom(e.message()))
        }
    }
}
