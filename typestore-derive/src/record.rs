use crate::attrs::record_fields;
use proc_macro::TokenStream;
use quote::quote;
use syn::{DataStruct, DeriveInput, LitStr, Result};

pub(crate) fn generate_record_for_struct(ast: &DeriveInput, data: &DataStruct) -> Result<TokenStream> {
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let mut record_name = name.to_string();
    for attr in &ast.attrs {
        if attr.path().is_ident("record") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value = meta.value()?;
                    let s: LitStr = value.parse()?;
                    record_name = s.value();
                    Ok(())
                } else {
                    Err(meta.error("Unknown record attribute"))
                }
            })?;
        }
    }

    let fields = record_fields(ast, &data.fields)?;
    let specs: Vec<proc_macro2::TokenStream> = fields
        .iter()
        .filter(|f| !f.ignored)
        .map(|f| {
            let field_name = &f.name;
            let ty = f.ty;
            quote! { .field(#field_name, typestore::schema::FieldSpec::of::<#ty>()) }
        })
        .collect();

    let gen = quote! {
        impl #impl_generics typestore::schema::Record for #name #ty_generics #where_clause {
            fn schema() -> typestore::schema::Schema {
                typestore::schema::Schema::new(#record_name)
                    #(#specs)*
            }
        }

        impl #impl_generics typestore::schema::SchemaType for #name #ty_generics #where_clause {
            fn field_type() -> typestore::schema::FieldType {
                typestore::schema::FieldType::Record(<Self as typestore::schema::Record>::schema())
            }
        }
    };

    Ok(TokenStream::from(gen))
}
