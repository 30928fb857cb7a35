//! Implementation of the `#[derive(Record)]` macro.
//!
//! This macro generates implementations of `Record`, `FieldValue` and
//! `FieldKind`, plus field name constants for building predicates in code.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    ext::IdentExt, parse_quote, spanned::Spanned, Data, DeriveInput, Error, Fields, Generics,
    Result,
};

use super::attrs::parse_query_attrs;

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let generics = with_field_bounds(input.generics.clone());
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut descriptors: Vec<TokenStream> = Vec::new();
    let mut zero_checks: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let member = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;
        let attrs = parse_query_attrs(&field.attrs)?;

        if attrs.skip {
            continue;
        }

        let name = member.unraw().to_string();
        let ty = &field.ty;

        let const_name = format_ident!("{}", to_screaming_snake_case(&name));
        field_constants.push(quote! {
            /// Field path constant for building predicates.
            pub const #const_name: &'static str = #name;
        });

        field_matches.push(quote! {
            #name => ::core::option::Option::Some(::sift::FieldValue::to_value(&self.#member)),
        });

        zero_checks.push(quote! {
            ::sift::FieldValue::to_value(&self.#member).is_zero()
        });

        if attrs.is_registered() {
            let mut descriptor = quote! {
                ::sift::FieldDescriptor::new(#name, <#ty as ::sift::FieldKind>::kind())
            };
            if attrs.filterable {
                descriptor = quote! { #descriptor.filterable() };
            }
            if attrs.sortable {
                descriptor = quote! { #descriptor.sortable() };
            }
            if let Some(column) = &attrs.column {
                descriptor = quote! { #descriptor.column(#column) };
            }
            descriptors.push(descriptor);
        }
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::sift::Record for #struct_name #ty_generics #where_clause {
            fn field(&self, name: &str) -> ::core::option::Option<::sift::Value<'_>> {
                match name {
                    #(#field_matches)*
                    _ => ::core::option::Option::None,
                }
            }

            fn descriptors() -> ::std::vec::Vec<::sift::FieldDescriptor> {
                ::std::vec![#(#descriptors),*]
            }

            fn is_zero(&self) -> bool {
                true #(&& #zero_checks)*
            }
        }

        impl #impl_generics ::sift::FieldValue for #struct_name #ty_generics #where_clause {
            fn to_value(&self) -> ::sift::Value<'_> {
                ::sift::Value::Record(self)
            }
        }

        impl #impl_generics ::sift::FieldKind for #struct_name #ty_generics #where_clause {
            fn kind() -> ::sift::Kind {
                ::sift::Kind::Record
            }
        }
    };

    Ok(expanded)
}

/// Requires every type parameter to be usable as a field value.
fn with_field_bounds(mut generics: Generics) -> Generics {
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::sift::FieldValue));
        param.bounds.push(parse_quote!(::sift::FieldKind));
    }
    generics
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}
