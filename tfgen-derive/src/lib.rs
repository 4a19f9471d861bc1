//! # tfgen Derive
//!
//! Derive macro for structs annotated with `terraform` field tags.
//!
//! The generator reads tags from source, so the derive does not produce any
//! conversion code. It registers the `terraform` attribute, rejects malformed
//! tags at compile time and exposes the wire names of the tagged fields.

use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, parse_macro_input};
use tfgen_types::{TAG_ATTRIBUTE, Tag};

/// Validates the `terraform` tags of a struct.
///
/// Adds an associated `TERRAFORM_FIELDS` constant listing the wire names of
/// the tagged fields in declaration order. Promoted fields are not listed.
///
/// # Example
/// ```ignore
/// #[derive(Terraform)]
/// pub struct Coffee {
///     #[terraform("id,computed")]
///     pub id: i64,
///     #[terraform("name,required")]
///     pub name: String,
/// }
///
/// assert_eq!(Coffee::TERRAFORM_FIELDS, &["id", "name"]);
/// ```
#[proc_macro_derive(Terraform, attributes(terraform))]
pub fn derive_terraform(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new(
            input.ident.span(),
            "Terraform can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new(
            data.fields.span(),
            "Terraform requires named fields",
        ));
    };

    let mut names = Vec::new();
    for field in &fields.named {
        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident(TAG_ATTRIBUTE)) {
            let value: syn::LitStr = attr.parse_args()?;
            let tag = Tag::parse(&value.value())
                .map_err(|e| syn::Error::new(value.span(), e.to_string()))?;
            if !tag.promoted {
                names.push(tag.name);
            }
        }
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics #ident #ty_generics #where_clause {
            /// Wire names of the tagged fields.
            pub const TERRAFORM_FIELDS: &'static [&'static str] = &[#(#names),*];
        }
    })
}
