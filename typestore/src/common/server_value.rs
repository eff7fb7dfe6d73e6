use crate::common::Value;
use crate::common::{OP_ARRAY_REMOVE, OP_ARRAY_UNION, OP_INCREMENT, OP_SERVER_DATE};
use std::fmt::Display;

/// A sentinel standing in for a value the store computes at commit time.
///
/// The access layer never evaluates a `ServerValue`; it travels through the
/// codec as [`Value::ServerOp`] and the [`RemoteStore`](crate::store::RemoteStore)
/// resolves it atomically against the stored document. A `ServerValue` is only
/// meaningful inside a write payload. Finding one in read data means the store
/// broke its contract, and decoding fails with `CorruptData`.
///
/// # Examples
///
/// ```rust,ignore
/// use typestore::common::{server_date, increment, array_union};
///
/// let shared_at = server_date();
/// let views = increment(100500);
/// let tags = array_union(vec!["docs", "documentation"]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum ServerValue {
    /// Resolves to the commit timestamp of the write.
    ServerDate,
    /// Adds the number to the stored field; a missing field counts as 0.
    Increment(Box<Value>),
    /// Appends each item not already present in the stored array.
    ArrayUnion(Vec<Value>),
    /// Removes every element equal to one of the items.
    ArrayRemove(Vec<Value>),
}

impl ServerValue {
    /// The wire name of the operation.
    pub fn op_name(&self) -> &'static str {
        match self {
            ServerValue::ServerDate => OP_SERVER_DATE,
            ServerValue::Increment(_) => OP_INCREMENT,
            ServerValue::ArrayUnion(_) => OP_ARRAY_UNION,
            ServerValue::ArrayRemove(_) => OP_ARRAY_REMOVE,
        }
    }

    /// The operation arguments in wire order.
    pub fn args(&self) -> Vec<Value> {
        match self {
            ServerValue::ServerDate => vec![],
            ServerValue::Increment(n) => vec![n.as_ref().clone()],
            ServerValue::ArrayUnion(items) | ServerValue::ArrayRemove(items) => items.clone(),
        }
    }
}

impl Display for ServerValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.op_name())
    }
}

/// Numeric types accepted by [`increment`].
pub trait Numeric: Into<Value> + Copy {}

impl Numeric for i32 {}
impl Numeric for u32 {}
impl Numeric for i64 {}
impl Numeric for f32 {}
impl Numeric for f64 {}

/// Sentinel resolving to the store's commit timestamp.
pub fn server_date() -> ServerValue {
    ServerValue::ServerDate
}

/// Sentinel atomically adding `n` to a numeric field.
pub fn increment<N: Numeric>(n: N) -> ServerValue {
    ServerValue::Increment(Box::new(n.into()))
}

/// Sentinel adding each item to an array field unless already present.
pub fn array_union<T: Into<Value>>(items: Vec<T>) -> ServerValue {
    ServerValue::ArrayUnion(items.into_iter().map(Into::into).collect())
}

/// Sentinel removing each matching item from an array field.
pub fn array_remove<T: Into<Value>>(items: Vec<T>) -> ServerValue {
    ServerValue::ArrayRemove(items.into_iter().map(Into::into).collect())
}

/// A record field that holds either a concrete value or a server sentinel.
///
/// Use it for fields the store fills in, such as a `shared_at` timestamp set
/// to [`server_date`] on creation. Decoding always produces
/// [`FieldValue::Literal`].
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue<T> {
    Literal(T),
    Server(ServerValue),
}

impl<T> FieldValue<T> {
    pub fn literal(value: T) -> Self {
        FieldValue::Literal(value)
    }

    pub fn server(value: ServerValue) -> Self {
        FieldValue::Server(value)
    }

    /// Returns the concrete value, or `None` while a sentinel is pending.
    pub fn as_literal(&self) -> Option<&T> {
        match self {
            FieldValue::Literal(v) => Some(v),
            FieldValue::Server(_) => None,
        }
    }

    pub fn is_server(&self) -> bool {
        matches!(self, FieldValue::Server(_))
    }
}

impl<T: Default> Default for FieldValue<T> {
    fn default() -> Self {
        FieldValue::Literal(T::default())
    }
}

impl<T> From<ServerValue> for FieldValue<T> {
    fn from(value: ServerValue) -> Self {
        FieldValue::Server(value)
    }
}
