use crate::attrs::record_fields;
use proc_macro::TokenStream;
use quote::quote;
use syn::{DataEnum, DataStruct, DeriveInput, Result};

pub(crate) fn generate_convertible_for_struct(ast: &DeriveInput, data: &DataStruct) -> Result<TokenStream> {
    let fields = record_fields(ast, &data.fields)?;

    let stored: Vec<_> = fields.iter().filter(|f| !f.ignored).collect();
    let stored_idents: Vec<_> = stored.iter().map(|f| f.ident).collect();
    let stored_names: Vec<_> = stored.iter().map(|f| f.name.as_str()).collect();

    let initializers: Vec<proc_macro2::TokenStream> = fields
        .iter()
        .map(|f| {
            let ident = f.ident;
            let name = &f.name;
            let ty = f.ty;
            if f.ignored {
                quote! { #ident: Default::default() }
            } else {
                quote! { #ident: typestore::common::from_value::<#ty>(&doc.get(#name))? }
            }
        })
        .collect();

    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let gen = quote! {
        impl #impl_generics typestore::common::Convertible for #name #ty_generics #where_clause {
            type Output = Self;

            fn to_value(&self) -> typestore::errors::StoreResult<typestore::common::Value> {
                let mut doc = typestore::collection::Document::new();
                #(
                    if !typestore::common::Convertible::is_absent(&self.#stored_idents) {
                        doc.put(#stored_names, typestore::common::Convertible::to_value(&self.#stored_idents)?)?;
                    }
                )*
                Ok(typestore::common::Value::Document(doc))
            }

            fn from_value(value: &typestore::common::Value) -> typestore::errors::StoreResult<Self::Output> {
                match value {
                    typestore::common::Value::Document(doc) => {
                        Ok(#name {
                            #(#initializers,)*
                        })
                    },
                    _ => Err(typestore::errors::StoreError::new(
                        concat!("Value is not a ", stringify!(#name), " document"),
                        typestore::errors::ErrorKind::ObjectMappingError,
                    )),
                }
            }
        }
    };

    Ok(TokenStream::from(gen))
}

/// Unit-only enums are stored as the variant name.
pub(crate) fn generate_convertible_for_enum(ast: &DeriveInput, data: &DataEnum) -> Result<TokenStream> {
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let mut variant_idents = Vec::with_capacity(data.variants.len());
    let mut variant_names = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, syn::Fields::Unit) {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                "only unit variants are supported",
            ));
        }
        variant_idents.push(&variant.ident);
        variant_names.push(variant.ident.to_string());
    }

    let gen = quote! {
        impl #impl_generics typestore::common::Convertible for #name #ty_generics #where_clause {
            type Output = Self;

            fn to_value(&self) -> typestore::errors::StoreResult<typestore::common::Value> {
                let variant = match self {
                    #(#name::#variant_idents => #variant_names,)*
                };
                Ok(typestore::common::Value::String(variant.to_string()))
            }

            fn from_value(value: &typestore::common::Value) -> typestore::errors::StoreResult<Self::Output> {
                match value {
                    typestore::common::Value::String(variant) => match variant.as_str() {
                        #(#variant_names => Ok(#name::#variant_idents),)*
                        _ => Err(typestore::errors::StoreError::new(
                            concat!("Value is not a valid ", stringify!(#name), " variant"),
                            typestore::errors::ErrorKind::ObjectMappingError,
                        )),
                    },
                    _ => Err(typestore::errors::StoreError::new(
                        concat!("Value is not a ", stringify!(#name), " variant name"),
                        typestore::errors::ErrorKind::ObjectMappingError,
                    )),
                }
            }
        }

        impl #impl_generics typestore::schema::SchemaType for #name #ty_generics #where_clause {
            fn field_type() -> typestore::schema::FieldType {
                typestore::schema::FieldType::String
            }
        }
    };

    Ok(TokenStream::from(gen))
}
