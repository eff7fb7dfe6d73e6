mod document_operations;
mod read_operations;
mod write_operations;

pub use document_operations::*;
pub(crate) use read_operations::*;
pub(crate) use write_operations::*;
