//! Shared building blocks: the [Value] tree, the [Convertible] mapping trait,
//! field paths, server sentinels and wire constants.

mod constants;
mod convertible;
mod fields;
mod server_value;
pub(crate) mod util;
mod value;

pub use constants::*;
pub use convertible::*;
pub use fields::*;
pub use server_value::*;
pub use util::*;
pub use value::*;
