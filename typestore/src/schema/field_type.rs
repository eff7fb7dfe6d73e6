use crate::collection::{Document, Ref};
use crate::common::{FieldValue, ServerValue, Value};
use crate::schema::Schema;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};

/// The semantic type tag of a record field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldType {
    /// Accepts any value.
    Any,
    Bool,
    /// Whole numbers only.
    Integer,
    /// Integers and floats.
    Number,
    String,
    Timestamp,
    Reference,
    /// An array whose elements all have the given type.
    Array(Box<FieldType>),
    /// A map with string keys whose values all have the given type.
    Map(Box<FieldType>),
    /// A nested record with its own schema.
    Record(Schema),
}

impl FieldType {
    /// Checks if a literal (non server-op) value has this type.
    ///
    /// Containers are checked shallowly; element and nested-record checks
    /// are done by the validator so it can report the failing path.
    pub fn matches_shallow(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldType::Any, _) => true,
            (FieldType::Bool, Value::Bool(_)) => true,
            (FieldType::Integer, Value::I64(_)) => true,
            (FieldType::Number, Value::I64(_) | Value::F64(_)) => true,
            (FieldType::String, Value::String(_)) => true,
            (FieldType::Timestamp, Value::Timestamp(_)) => true,
            (FieldType::Reference, Value::Reference(_)) => true,
            (FieldType::Array(_), Value::Array(_)) => true,
            (FieldType::Map(_), Value::Document(_)) => true,
            (FieldType::Record(_), Value::Document(_)) => true,
            _ => false,
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Any => write!(f, "any"),
            FieldType::Bool => write!(f, "bool"),
            FieldType::Integer => write!(f, "integer"),
            FieldType::Number => write!(f, "number"),
            FieldType::String => write!(f, "string"),
            FieldType::Timestamp => write!(f, "timestamp"),
            FieldType::Reference => write!(f, "reference"),
            FieldType::Array(element) => write!(f, "array<{}>", element),
            FieldType::Map(value) => write!(f, "map<{}>", value),
            FieldType::Record(schema) => write!(f, "{}", schema.name()),
        }
    }
}

/// Maps a Rust type to the [FieldType] of a record field holding it.
///
/// `#[derive(Record)]` calls this for every field to build the record's
/// [Schema]. Implement it for custom field types that also implement
/// [Convertible](crate::common::Convertible).
pub trait SchemaType {
    fn field_type() -> FieldType;

    /// Whether a record must always carry this field.
    fn required() -> bool {
        true
    }
}

macro_rules! impl_schema_type {
    ($field_type:expr => $($t:ty),* $(,)?) => {
        $(
            impl SchemaType for $t {
                fn field_type() -> FieldType {
                    $field_type
                }
            }
        )*
    };
}

impl_schema_type!(FieldType::Bool => bool);
impl_schema_type!(FieldType::Integer => i32, i64, u32, u64, usize);
impl_schema_type!(FieldType::Number => f32, f64);
impl_schema_type!(FieldType::String => String, &str);
impl_schema_type!(FieldType::Timestamp => DateTime<Utc>);
impl_schema_type!(FieldType::Any => Value, ServerValue);

impl SchemaType for Document {
    fn field_type() -> FieldType {
        FieldType::Map(Box::new(FieldType::Any))
    }
}

impl<T> SchemaType for Ref<T> {
    fn field_type() -> FieldType {
        FieldType::Reference
    }
}

impl<T: SchemaType> SchemaType for Option<T> {
    fn field_type() -> FieldType {
        T::field_type()
    }

    fn required() -> bool {
        false
    }
}

impl<T: SchemaType> SchemaType for FieldValue<T> {
    fn field_type() -> FieldType {
        T::field_type()
    }

    fn required() -> bool {
        T::required()
    }
}

impl<T: SchemaType> SchemaType for Vec<T> {
    fn field_type() -> FieldType {
        FieldType::Array(Box::new(T::field_type()))
    }
}

impl<V: SchemaType> SchemaType for BTreeMap<String, V> {
    fn field_type() -> FieldType {
        FieldType::Map(Box::new(V::field_type()))
    }
}

impl<V: SchemaType> SchemaType for HashMap<String, V> {
    fn field_type() -> FieldType {
        FieldType::Map(Box::new(V::field_type()))
    }
}
