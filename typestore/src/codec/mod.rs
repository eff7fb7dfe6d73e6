//! The value codec: typed records to untyped documents, and documents to the
//! JSON wire form.

mod record_codec;
mod wire;

pub use record_codec::*;
pub use wire::*;
