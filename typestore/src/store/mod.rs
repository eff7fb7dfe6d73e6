//! The remote store boundary and its in-memory implementation.

mod memory;
mod remote_store;

pub use memory::*;
pub use remote_store::*;
