//! Explicit record schemas and their validation.
//!
//! Every record type carries a [Schema] (generated by `#[derive(Record)]`)
//! mapping field names to [FieldType] tags. The codec validates documents
//! against it when writing and reading.

mod field_type;
#[allow(clippy::module_inception)]
mod schema;
mod validator;

pub use field_type::*;
pub use schema::*;
pub use validator::*;
