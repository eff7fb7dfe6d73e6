mod auto_id;
mod config;
mod resolver;
mod store;

pub use auto_id::*;
pub use config::*;
pub use store::*;
