use syn::{Attribute, DeriveInput, Field, Ident, LitStr, Result};

/// A named struct field as seen by the derives: its Rust identifier, its
/// stored name and its type.
pub(crate) struct RecordField<'a> {
    pub ident: &'a Ident,
    pub name: String,
    pub ty: &'a syn::Type,
    pub ignored: bool,
}

/// Reads `#[converter(ignored = "a, b")]` from the container.
pub(crate) fn ignored_fields(ast: &DeriveInput) -> Result<Vec<String>> {
    let mut ignored = vec![];
    for attr in &ast.attrs {
        if attr.path().is_ident("converter") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("ignored") {
                    let value = meta.value()?;
                    let s: LitStr = value.parse()?;
                    ignored.extend(s.value().split(',').map(|f| f.trim().to_string()));
                    Ok(())
                } else {
                    Err(meta.error("Unknown converter attribute"))
                }
            })?;
        }
    }
    Ok(ignored)
}

/// Reads `#[field(rename = "...")]` from a field.
fn renamed(attrs: &[Attribute]) -> Result<Option<String>> {
    let mut rename = None;
    for attr in attrs {
        if attr.path().is_ident("field") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value = meta.value()?;
                    let s: LitStr = value.parse()?;
                    rename = Some(s.value());
                    Ok(())
                } else {
                    Err(meta.error("Unknown field attribute"))
                }
            })?;
        }
    }
    Ok(rename)
}

pub(crate) fn record_fields<'a>(
    ast: &'a DeriveInput,
    fields: &'a syn::Fields,
) -> Result<Vec<RecordField<'a>>> {
    let named: Vec<&Field> = match fields {
        syn::Fields::Named(fields) => fields.named.iter().collect(),
        _ => {
            return Err(syn::Error::new_spanned(
                &ast.ident,
                "only structs with named fields are supported",
            ))
        }
    };

    let ignored = ignored_fields(ast)?;
    let mut result = Vec::with_capacity(named.len());
    for field in named {
        let ident = match field.ident.as_ref() {
            Some(ident) => ident,
            None => continue,
        };
        let name = renamed(&field.attrs)?.unwrap_or_else(|| ident.to_string());
        result.push(RecordField {
            ignored: ignored.contains(&ident.to_string()),
            ident,
            name,
            ty: &field.ty,
        });
    }
    Ok(result)
}
