//! Typed collections, references, documents and updates.
//!
//! A [Collection] is a typed handle on a collection path. Its [Ref]s name
//! single documents, and a [Doc] pairs a reference with decoded data.
//!
//! ```rust,ignore
//! use typestore::collection::{collection, Patch};
//! use typestore::{get, update};
//!
//! let notes = collection::<Note>("notes")?;
//! let note = notes.doc("test")?;
//!
//! update(&db, &note, Patch::new().set("text", "Edited")).await?;
//! let snapshot = get(&db, &note).await?;
//! ```
//!
//! # Paths
//!
//! Collection paths alternate collection names and document ids and always
//! have an odd number of segments, e.g. `notes` or `users/alice/notes`.
//! Segments may not be empty, `.`, `..` or of the reserved form `__name__`.
//!
//! # Documents
//!
//! [Document] is the untyped map exchanged with the remote store.

mod collection_path;
mod doc;
mod document;
mod handle;
pub(crate) mod operation;
mod reference;
mod update;

pub use collection_path::*;
pub use doc::*;
pub use document::*;
pub use handle::*;
pub use reference::*;
pub use update::*;
