#![recursion_limit = "128"]
//! # Typestore Derive Macros
//!
//! Procedural macros deriving the typestore mapping traits.
//!
//! ## Macros
//!
//! ### `Convertible`
//!
//! Derives `Convertible` for structs with named fields and for unit-only enums.
//!
//! - Struct fields are stored under their names. Fields whose value is absent
//!   (a `None`) are left out of the document.
//! - Unit enums are stored as the variant name and also get a `SchemaType`
//!   of `string`.
//! - **Container attribute**: `#[converter(ignored = "a, b")]` skips fields,
//!   which are rebuilt with `Default::default()` on decode
//! - **Field attribute**: `#[field(rename = "storedName")]`
//!
//! ### `Record`
//!
//! Derives `Record` and `SchemaType` for structs with named fields, building
//! the schema from the field types. Used together with `Convertible`.
//!
//! - **Container attribute**: `#[record(name = "...")]` sets the schema name
//!
//! # Examples
//!
//! ```rust,ignore
//! use typestore::common::FieldValue;
//! use typestore::Ref;
//! use typestore_derive::{Convertible, Record};
//!
//! #[derive(Clone, Convertible, Record)]
//! pub struct Share {
//!     pub note: Ref<Note>,
//!     pub tags: Vec<String>,
//!     #[field(rename = "sharedAt")]
//!     pub shared_at: FieldValue<DateTime<Utc>>,
//!     pub comment: Option<String>,
//! }
//! ```

extern crate proc_macro;
mod attrs;
mod convertible;
mod record;

use crate::convertible::{generate_convertible_for_enum, generate_convertible_for_struct};
use crate::record::generate_record_for_struct;
use proc_macro::TokenStream;
use syn::{Data, DeriveInput};

/// Derives the `Convertible` trait for mapping a type to and from a `Value`.
///
/// # Errors
///
/// Returns a compile error if:
/// - The struct has unnamed fields
/// - An enum variant carries data
/// - The type is a union
#[proc_macro_derive(Convertible, attributes(converter, field))]
pub fn derive_convert(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    let result = match ast.data {
        Data::Struct(ref data) => generate_convertible_for_struct(&ast, data),
        Data::Enum(ref data) => generate_convertible_for_enum(&ast, data),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &ast,
            "Cannot derive Convertible for unions. Unions are not supported by the Convertible derive macro.",
        )),
    };

    match result {
        Ok(token_stream) => token_stream,
        Err(e) => syn::Error::new_spanned(
            &ast,
            format!("Failed to derive Convertible for '{}': {}.", ast.ident, e),
        )
        .to_compile_error()
        .into(),
    }
}

/// Derives the `Record` and `SchemaType` traits from a struct's fields.
///
/// Every field type must implement `SchemaType`. Must be used with
/// `#[derive(Convertible)]`.
///
/// # Examples
///
/// ```rust,ignore
/// #[derive(Convertible, Record)]
/// #[record(name = "Note")]
/// pub struct Note {
///     pub text: String,
/// }
/// ```
#[proc_macro_derive(Record, attributes(record, converter, field))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    match ast.data {
        Data::Struct(ref data) => match generate_record_for_struct(&ast, data) {
            Ok(token_stream) => token_stream,
            Err(e) => syn::Error::new_spanned(
                &ast,
                format!(
                    "Failed to derive Record for struct '{}': {}.\n\
                     Only structs with named fields are supported.",
                    ast.ident, e
                ),
            )
            .to_compile_error()
            .into(),
        },
        Data::Enum(_) => syn::Error::new_spanned(
            &ast,
            "Cannot derive Record for enums. Only structs are supported.",
        )
        .to_compile_error()
        .into(),
        Data::Union(_) => syn::Error::new_spanned(
            &ast,
            "Cannot derive Record for unions. Only structs are supported.",
        )
        .to_compile_error()
        .into(),
    }
}
