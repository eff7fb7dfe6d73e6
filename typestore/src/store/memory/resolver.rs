use crate::collection::Document;
use crate::common::{FieldPath, ServerValue, Value};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use chrono::{DateTime, Utc};

/// Resolves every pending server value of `payload`.
///
/// `base` is the stored state each sentinel is evaluated against: the
/// existing document for a merge, nothing for a create or an overwrite.
pub(crate) fn resolve_document(
    payload: &Document,
    base: Option<&Document>,
    commit_time: DateTime<Utc>,
) -> StoreResult<Document> {
    if !payload.contains_server_op() {
        return Ok(payload.clone());
    }

    let mut resolved = Document::new();
    for (key, value) in payload.iter() {
        let current = base.and_then(|doc| doc.get_ref(key));
        resolved.put(key, resolve_value(value, current, commit_time)?)?;
    }
    Ok(resolved)
}

/// Copies each masked path of `payload` into `target`, resolving sentinels
/// against the value currently stored there. A masked path missing from the
/// payload removes the stored field.
pub(crate) fn merge_into(
    target: &mut Document,
    payload: &Document,
    mask: &[FieldPath],
    commit_time: DateTime<Utc>,
) -> StoreResult<()> {
    for path in mask {
        match payload.get_path(path) {
            Some(value) => {
                let resolved = resolve_value(value, target.get_path(path), commit_time)?;
                target.put_path(path, resolved)?;
            }
            None => {
                target.remove_path(path);
            }
        }
    }
    Ok(())
}

fn resolve_value(value: &Value, base: Option<&Value>, commit_time: DateTime<Utc>) -> StoreResult<Value> {
    match value {
        Value::ServerOp(op) => Ok(apply(op, base, commit_time)),
        Value::Document(doc) if doc.contains_server_op() => {
            let base_doc = base.and_then(|b| b.as_document());
            Ok(Value::Document(resolve_document(doc, base_doc, commit_time)?))
        }
        Value::Array(items) if items.iter().any(|v| v.contains_server_op()) => {
            log::error!("Server values cannot be placed inside arrays");
            Err(StoreError::new(
                "Server values cannot be placed inside arrays",
                ErrorKind::WriteError,
            ))
        }
        _ => Ok(value.clone()),
    }
}

/// Evaluates one sentinel against the stored value.
pub(crate) fn apply(op: &ServerValue, base: Option<&Value>, commit_time: DateTime<Utc>) -> Value {
    match op {
        ServerValue::ServerDate => Value::Timestamp(commit_time),
        ServerValue::Increment(delta) => increment(base, delta),
        ServerValue::ArrayUnion(items) => {
            let mut current = current_array(base);
            for item in items {
                if !current.contains(item) {
                    current.push(item.clone());
                }
            }
            Value::Array(current)
        }
        ServerValue::ArrayRemove(items) => {
            let mut current = current_array(base);
            current.retain(|element| !items.contains(element));
            Value::Array(current)
        }
    }
}

fn increment(base: Option<&Value>, delta: &Value) -> Value {
    let zero = Value::I64(0);
    let base = match base {
        Some(value) if value.is_number() => value,
        _ => &zero,
    };

    match (base, delta) {
        (Value::I64(a), Value::I64(b)) => match a.checked_add(*b) {
            Some(sum) => Value::I64(sum),
            None => Value::F64(*a as f64 + *b as f64),
        },
        _ => {
            let sum = base.as_f64().unwrap_or(0.0) + delta.as_f64().unwrap_or(0.0);
            Value::F64(sum)
        }
    }
}

fn current_array(base: Option<&Value>) -> Vec<Value> {
    base.and_then(|v| v.as_array()).cloned().unwrap_or_default()
}
