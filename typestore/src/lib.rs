#![allow(clippy::module_inception)]
//! # Typestore - typed access to schemaless document stores
//!
//! Typestore lets application code read and write records of its own types
//! in a remote, schemaless document database. Each record type carries an
//! explicit schema, so documents are validated on the way in and on the way
//! out.
//!
//! ## Key Features
//!
//! - **Typed paths**: `Collection<T>` and `Ref<T>` name where records of `T` live
//! - **Two update modes**: shallow patches and surgical field-path updates
//! - **Server values**: timestamps, increments and array union/remove,
//!   resolved atomically by the store at commit time
//! - **Schema validation**: wrong types, unknown fields and missing fields
//!   are rejected before anything reaches the store
//! - **Pluggable stores**: anything implementing [`RemoteStore`], with an
//!   in-memory store included
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use typestore::{add, collection, get, update_fields, increment, field, InMemoryStore, Typestore};
//! use typestore_derive::{Convertible, Record};
//!
//! #[derive(Clone, Convertible, Record)]
//! struct Note {
//!     text: String,
//! }
//!
//! let db = Typestore::builder().remote(InMemoryStore::default()).open().await?;
//! let notes = collection::<Note>("notes")?;
//!
//! let note = add(&db, &notes, &Note { text: "Hello".into() }).await?;
//! let snapshot = get(&db, note.reference()).await?;
//!
//! db.shutdown().await?;
//! ```
//!
//! ## Design Pattern
//!
//! Client, configuration and stores follow the **PIMPL** pattern: the public
//! struct wraps an `Arc` to its implementation, so handles are cheap to clone
//! and every clone shares the same state.
//!
//! ## Module Organization
//!
//! - [`codec`] - Record encoding/decoding and the JSON wire form
//! - [`collection`] - Collections, references, documents and updates
//! - [`common`] - Values, field paths, server values and mapping traits
//! - [`errors`] - Error types and result definitions
//! - [`schema`] - Record schemas and their validation
//! - [`store`] - The remote store boundary and the in-memory store
//! - [`typestore`] - The client handle

pub mod codec;
pub mod collection;
pub mod common;
pub mod errors;
pub mod schema;
pub mod store;
pub mod typestore;
pub mod typestore_builder;
pub mod typestore_config;

pub use crate::codec::{RecordCodec, value_from_json, value_to_json};
pub use crate::collection::operation::{add, get, get_by_id, set, update, update_by_id, update_fields};
pub use crate::collection::{
    collection, field_update, reference, Collection, CollectionHandle, CollectionPath, Doc, Document, FieldUpdate,
    Patch, Ref, Update,
};
pub use crate::common::{
    array_remove, array_union, field, increment, server_date, Convertible, FieldPath, FieldValue, ServerValue,
    Value,
};
pub use crate::errors::{ErrorKind, StoreError, StoreResult};
pub use crate::schema::{FieldSpec, FieldType, Record, Schema, SchemaType};
pub use crate::store::{InMemoryStore, InMemoryStoreConfig, RemoteStore, WriteAck, WriteMode};
pub use crate::typestore::Typestore;
pub use crate::typestore_builder::TypestoreBuilder;
pub use crate::typestore_config::TypestoreConfig;
