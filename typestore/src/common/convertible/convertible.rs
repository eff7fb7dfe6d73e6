use crate::collection::Document;
use crate::common::{FieldValue, ServerValue, Value};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

/// Bidirectional mapping between a Rust type and the [Value] tree.
///
/// Records usually get this through `#[derive(Convertible)]`, which writes each
/// field under its name and skips fields whose [`is_absent`](Convertible::is_absent)
/// returns true, so a `None` never reaches the wire as `null`.
pub trait Convertible {
    type Output;

    fn to_value(&self) -> StoreResult<Value>;
    fn from_value(value: &Value) -> StoreResult<Self::Output>;

    /// Whether this value should be left out of an encoded record entirely.
    fn is_absent(&self) -> bool {
        false
    }
}

fn mapping_error(value: &Value, expected: &str) -> StoreError {
    log::error!("Value {:?} is not {}", value, expected);
    StoreError::new(
        &format!("Value is not {}", expected),
        ErrorKind::ObjectMappingError,
    )
}

macro_rules! impl_convertible_for_integers {
    ($($t:ty => $name:literal),* $(,)?) => {
        $(
            impl Convertible for $t {
                type Output = $t;

                fn to_value(&self) -> StoreResult<Value> {
                    match i64::try_from(*self) {
                        Ok(v) => Ok(Value::I64(v)),
                        Err(_) => {
                            log::error!("Value {} does not fit in a stored integer", self);
                            Err(StoreError::new(
                                "Value does not fit in a stored integer",
                                ErrorKind::ObjectMappingError,
                            ))
                        }
                    }
                }

                fn from_value(value: &Value) -> StoreResult<Self::Output> {
                    match value {
                        Value::I64(i) => <$t>::try_from(*i).map_err(|_| {
                            log::error!("Value {} is out of range for {}", i, $name);
                            StoreError::new(
                                concat!("Value is out of range for ", $name),
                                ErrorKind::ObjectMappingError,
                            )
                        }),
                        _ => Err(mapping_error(value, concat!("an ", $name))),
                    }
                }
            }
        )*
    };
}

impl_convertible_for_integers! {
    i32 => "i32",
    i64 => "i64",
    u32 => "u32",
    u64 => "u64",
    usize => "usize",
}

impl Convertible for f64 {
    type Output = f64;

    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::F64(*self))
    }

    fn from_value(value: &Value) -> StoreResult<Self::Output> {
        match value.as_f64() {
            Some(v) => Ok(v),
            None => Err(mapping_error(value, "a number")),
        }
    }
}

impl Convertible for f32 {
    type Output = f32;

    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::F64(*self as f64))
    }

    fn from_value(value: &Value) -> StoreResult<Self::Output> {
        match value.as_f64() {
            Some(v) => Ok(v as f32),
            None => Err(mapping_error(value, "a number")),
        }
    }
}

impl Convertible for bool {
    type Output = bool;

    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::Bool(*self))
    }

    fn from_value(value: &Value) -> StoreResult<Self::Output> {
        match value {
            Value::Bool(b) => Ok(*b),
            _ => Err(mapping_error(value, "a bool")),
        }
    }
}

impl Convertible for String {
    type Output = String;

    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::String(self.clone()))
    }

    fn from_value(value: &Value) -> StoreResult<Self::Output> {
        match value {
            Value::String(s) => Ok(s.clone()),
            _ => Err(mapping_error(value, "a string")),
        }
    }
}

impl Convertible for &str {
    type Output = String;

    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::String(self.to_string()))
    }

    fn from_value(value: &Value) -> StoreResult<Self::Output> {
        String::from_value(value)
    }
}

impl Convertible for DateTime<Utc> {
    type Output = DateTime<Utc>;

    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::Timestamp(*self))
    }

    fn from_value(value: &Value) -> StoreResult<Self::Output> {
        match value {
            Value::Timestamp(ts) => Ok(*ts),
            _ => Err(mapping_error(value, "a timestamp")),
        }
    }
}

impl Convertible for Document {
    type Output = Document;

    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::Document(self.clone()))
    }

    fn from_value(value: &Value) -> StoreResult<Self::Output> {
        match value {
            Value::Document(doc) => Ok(doc.clone()),
            _ => Err(mapping_error(value, "a map")),
        }
    }
}

impl Convertible for Value {
    type Output = Value;

    fn to_value(&self) -> StoreResult<Value> {
        Ok(self.clone())
    }

    fn from_value(value: &Value) -> StoreResult<Self::Output> {
        Ok(value.clone())
    }
}

impl Convertible for ServerValue {
    type Output = ServerValue;

    fn to_value(&self) -> StoreResult<Value> {
        Ok(Value::ServerOp(self.clone()))
    }

    fn from_value(value: &Value) -> StoreResult<Self::Output> {
        match value {
            Value::ServerOp(op) => Ok(op.clone()),
            _ => Err(mapping_error(value, "a server value")),
        }
    }
}

impl<T> Convertible for Option<T>
where
    T: Convertible,
{
    type Output = Option<T::Output>;

    fn to_value(&self) -> StoreResult<Value> {
        match self {
            Some(v) => v.to_value(),
            None => Ok(Value::Null),
        }
    }

    fn from_value(value: &Value) -> StoreResult<Self::Output> {
        match value {
            Value::Null => Ok(None),
            _ => Ok(Some(T::from_value(value)?)),
        }
    }

    fn is_absent(&self) -> bool {
        self.is_none()
    }
}

impl<T> Convertible for FieldValue<T>
where
    T: Convertible<Output = T>,
{
    type Output = FieldValue<T>;

    fn to_value(&self) -> StoreResult<Value> {
        match self {
            FieldValue::Literal(v) => v.to_value(),
            FieldValue::Server(op) => Ok(Value::ServerOp(op.clone())),
        }
    }

    fn from_value(value: &Value) -> StoreResult<Self::Output> {
        match value {
            Value::ServerOp(op) => {
                log::error!("Unresolved server value {} found while decoding", op);
                Err(StoreError::new(
                    "Unresolved server value found while decoding",
                    ErrorKind::CorruptData,
                ))
            }
            _ => Ok(FieldValue::Literal(T::from_value(value)?)),
        }
    }

    fn is_absent(&self) -> bool {
        match self {
            FieldValue::Literal(v) => v.is_absent(),
            FieldValue::Server(_) => false,
        }
    }
}

impl<T> Convertible for Vec<T>
where
    T: Convertible,
{
    type Output = Vec<T::Output>;

    fn to_value(&self) -> StoreResult<Value> {
        let mut arr = Vec::with_capacity(self.len());
        for item in self {
            arr.push(item.to_value()?);
        }
        Ok(Value::Array(arr))
    }

    fn from_value(value: &Value) -> StoreResult<Self::Output> {
        match value {
            Value::Array(arr) => {
                let mut vec = Vec::with_capacity(arr.len());
                for item in arr {
                    vec.push(T::from_value(item)?);
                }
                Ok(vec)
            }
            _ => Err(mapping_error(value, "an array")),
        }
    }
}

impl<V> Convertible for BTreeMap<String, V>
where
    V: Convertible,
{
    type Output = BTreeMap<String, V::Output>;

    fn to_value(&self) -> StoreResult<Value> {
        let mut doc = Document::new();
        for (k, v) in self {
            doc.put(k, v.to_value()?)?;
        }
        Ok(Value::Document(doc))
    }

    fn from_value(value: &Value) -> StoreResult<Self::Output> {
        match value {
            Value::Document(doc) => {
                let mut map = BTreeMap::new();
                for (k, v) in doc.iter() {
                    map.insert(k.clone(), V::from_value(v)?);
                }
                Ok(map)
            }
            _ => Err(mapping_error(value, "a map")),
        }
    }
}

impl<V> Convertible for HashMap<String, V>
where
    V: Convertible,
{
    type Output = HashMap<String, V::Output>;

    fn to_value(&self) -> StoreResult<Value> {
        let mut doc = Document::new();
        for (k, v) in self {
            doc.put(k, v.to_value()?)?;
        }
        Ok(Value::Document(doc))
    }

    fn from_value(value: &Value) -> StoreResult<Self::Output> {
        match value {
            Value::Document(doc) => {
                let mut map = HashMap::with_capacity(doc.size());
                for (k, v) in doc.iter() {
                    map.insert(k.clone(), V::from_value(v)?);
                }
                Ok(map)
            }
            _ => Err(mapping_error(value, "a map")),
        }
    }
}

pub fn from_value<T>(value: &Value) -> StoreResult<T::Output>
where
    T: Convertible,
{
    T::from_value(value)
}

pub fn to_value<T>(data: &T) -> StoreResult<Value>
where
    T: Convertible + ?Sized,
{
    data.to_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{array_union, increment, server_date};
    use chrono::TimeZone;

    fn test_convertible<T>(value: T, expected: Value)
    where
        T: Convertible<Output = T> + PartialEq + std::fmt::Debug,
    {
        let to_value = value.to_value().unwrap();
        assert_eq!(to_value, expected);

        let from_value = T::from_value(&expected).unwrap();
        assert_eq!(from_value, value);
    }

    fn test_convertible_error<T>(value: &Value, expected_error: &str)
    where
        T: Convertible,
        <T as Convertible>::Output: std::fmt::Debug,
    {
        let error = T::from_value(value).unwrap_err();
        assert_eq!(error.to_string(), expected_error);
        assert_eq!(error.kind(), &ErrorKind::ObjectMappingError);
    }

    #[test]
    fn test_integers() {
        test_convertible(42_i32, Value::I64(42));
        test_convertible(-7_i64, Value::I64(-7));
        test_convertible(7_u32, Value::I64(7));
        test_convertible_error::<i32>(&Value::from("42"), "Value is not an i32");
    }

    #[test]
    fn test_integer_out_of_range() {
        test_convertible_error::<u32>(&Value::I64(-1), "Value is out of range for u32");
        assert!(u64::MAX.to_value().is_err());
    }

    #[test]
    fn test_floats_accept_integers() {
        test_convertible(1.5_f64, Value::F64(1.5));
        assert_eq!(f64::from_value(&Value::I64(3)).unwrap(), 3.0);
        test_convertible_error::<f64>(&Value::Bool(true), "Value is not a number");
    }

    #[test]
    fn test_string_and_bool() {
        test_convertible("text".to_string(), Value::from("text"));
        test_convertible(true, Value::Bool(true));
        test_convertible_error::<String>(&Value::I64(1), "Value is not a string");
    }

    #[test]
    fn test_timestamp() {
        let ts = Utc.with_ymd_and_hms(2019, 8, 15, 12, 30, 25).unwrap();
        test_convertible(ts, Value::Timestamp(ts));
    }

    #[test]
    fn test_option_is_absent_when_none() {
        let none: Option<String> = None;
        assert!(none.is_absent());
        assert!(!Some("x".to_string()).is_absent());
        assert_eq!(Option::<String>::from_value(&Value::Null).unwrap(), None);
        assert_eq!(
            Option::<String>::from_value(&Value::from("x")).unwrap(),
            Some("x".to_string())
        );
    }

    #[test]
    fn test_vec() {
        test_convertible(
            vec!["a".to_string(), "b".to_string()],
            Value::from(vec!["a", "b"]),
        );
    }

    #[test]
    fn test_btree_map() {
        let mut map = BTreeMap::new();
        map.insert("views".to_string(), 1_i64);
        let value = map.to_value().unwrap();
        assert_eq!(value.as_document().unwrap().get("views"), Value::I64(1));
        assert_eq!(BTreeMap::<String, i64>::from_value(&value).unwrap(), map);
    }

    #[test]
    fn test_hash_map() {
        let mut map = HashMap::new();
        map.insert("likes".to_string(), true);
        let value = map.to_value().unwrap();
        assert_eq!(HashMap::<String, bool>::from_value(&value).unwrap(), map);
    }

    #[test]
    fn test_field_value_literal_round_trip() {
        test_convertible(FieldValue::Literal(5_i64), Value::I64(5));
    }

    #[test]
    fn test_field_value_server_passes_through() {
        let value: FieldValue<DateTime<Utc>> = FieldValue::Server(server_date());
        assert_eq!(value.to_value().unwrap(), Value::ServerOp(server_date()));
        assert!(!value.is_absent());
    }

    #[test]
    fn test_field_value_rejects_server_op_on_decode() {
        let err = FieldValue::<i64>::from_value(&Value::ServerOp(increment(1))).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::CorruptData);
    }

    #[test]
    fn test_server_value_convertible() {
        let op = array_union(vec!["docs"]);
        assert_eq!(op.to_value().unwrap(), Value::ServerOp(op.clone()));
        assert_eq!(ServerValue::from_value(&Value::ServerOp(op.clone())).unwrap(), op);
    }

    #[test]
    fn test_free_functions() {
        assert_eq!(to_value(&10_i32).unwrap(), Value::I64(10));
        assert_eq!(from_value::<i32>(&Value::I64(10)).unwrap(), 10);
    }
}
