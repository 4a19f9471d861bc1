//! Encode procedure generation.

use crate::context::{Access, Context, accessor, ident};
use crate::error::CodegenError;
use crate::names::TypeNames;
use crate::walker::FieldList;
use proc_macro2::TokenStream;
use quote::quote;
use tfgen_types::TypeId;

/// Generator for encode procedures.
pub struct EncoderGenerator<'c, 'a> {
    ctx: &'c mut Context<'a>,
}

impl<'c, 'a> EncoderGenerator<'c, 'a> {
    /// Creates a new encoder generator.
    #[must_use]
    pub fn new(ctx: &'c mut Context<'a>) -> Self {
        Self { ctx }
    }

    /// Generates the encode procedure of `ty`.
    ///
    /// Root encoders are public and come with an `rt::Model` implementation
    /// for the native type, which is what `rt::decode` and `rt::set` dispatch
    /// on.
    ///
    /// # Errors
    /// Returns an error if a field type has no converter or a converter
    /// fails.
    pub fn generate(
        &mut self,
        ty: TypeId,
        names: &TypeNames,
        fields: &FieldList,
    ) -> Result<TokenStream, CodegenError> {
        let rt = self.ctx.runtime();
        let native = self.ctx.native_type(ty)?;
        let model = names.model();
        let encode = names.encode();

        let mut statements = Vec::with_capacity(fields.fields.len());
        for info in &fields.fields {
            let field = ident(&info.ident);
            let name = &info.name;
            let access = Access::new(
                accessor(&quote!(value), &info.accessor),
                quote!(data.#field),
                quote!(path.at_name(#name)),
            );
            statements.push(self.ctx.encode(info.field_type, &access)?);
        }

        let visibility = if names.is_root {
            quote!(pub)
        } else {
            TokenStream::new()
        };
        let mut tokens = quote! {
            #[allow(unused_mut, unused_variables, clippy::all)]
            #visibility fn #encode(
                path: &#rt::Path,
                value: ::core::option::Option<&#native>,
            ) -> (::core::option::Option<#model>, #rt::Diagnostics) {
                let mut diags = #rt::Diagnostics::new();
                let ::core::option::Option::Some(value) = value else {
                    return (::core::option::Option::None, diags);
                };
                let mut data = <#model as ::core::default::Default>::default();
                #(#statements)*
                (::core::option::Option::Some(data), diags)
            }
        };

        if names.is_root {
            let entry = names.entry();
            tokens.extend(quote! {
                impl #rt::Model for #native {
                    fn read<G: #rt::Getter>(
                        getter: &G,
                        target: &mut ::core::option::Option<Self>,
                    ) -> #rt::Diagnostics {
                        #entry(getter, target)
                    }

                    fn write<S: #rt::Setter>(&self, setter: &mut S) -> #rt::Diagnostics {
                        let (data, mut diags) = #encode(&#rt::Path::root(), ::core::option::Option::Some(self));
                        if diags.has_error() {
                            return diags;
                        }
                        diags.append(setter.set(&data));
                        diags
                    }
                }
            });
        }
        Ok(tokens)
    }
}
