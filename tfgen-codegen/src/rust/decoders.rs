//! Decode procedure generation.
//!
//! A decode procedure reads a wire model into a native value. A missing
//! model leaves the target untouched. The target is allocated with
//! `Default::default()` only when it is `None`; otherwise decoding updates
//! the existing value field by field.

use crate::context::{Access, Context, accessor, ident};
use crate::error::CodegenError;
use crate::names::TypeNames;
use crate::walker::FieldList;
use proc_macro2::TokenStream;
use quote::quote;
use tfgen_types::TypeId;

/// Generator for decode procedures.
pub struct DecoderGenerator<'c, 'a> {
    ctx: &'c mut Context<'a>,
}

impl<'c, 'a> DecoderGenerator<'c, 'a> {
    /// Creates a new decoder generator.
    #[must_use]
    pub fn new(ctx: &'c mut Context<'a>) -> Self {
        Self { ctx }
    }

    /// Generates the decode procedure of `ty`, plus the public `get_*` entry
    /// point when `ty` is a root.
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
        let decode = names.decode();

        let mut statements = Vec::with_capacity(fields.fields.len());
        for info in &fields.fields {
            let field = ident(&info.ident);
            let name = &info.name;
            let access = Access::new(
                quote!(data.#field),
                accessor(&quote!(target), &info.accessor),
                quote!(path.at_name(#name)),
            );
            statements.push(self.ctx.decode(info.field_type, &access)?);
        }

        let mut tokens = quote! {
            #[allow(unused_mut, unused_variables, clippy::all)]
            fn #decode(
                path: &#rt::Path,
                data: ::core::option::Option<&#model>,
                out: &mut ::core::option::Option<#native>,
            ) -> #rt::Diagnostics {
                let mut diags = #rt::Diagnostics::new();
                let ::core::option::Option::Some(data) = data else {
                    return diags;
                };
                let target = out.get_or_insert_with(::core::default::Default::default);
                #(#statements)*
                diags
            }
        };

        if names.is_root {
            let entry = names.entry();
            let doc = format!(" Reads a `{}` from `getter` into `out`.", names.name);
            tokens.extend(quote! {
                #[doc = #doc]
                pub fn #entry<G: #rt::Getter>(
                    getter: &G,
                    out: &mut ::core::option::Option<#native>,
                ) -> #rt::Diagnostics {
                    let mut data: ::core::option::Option<#model> = ::core::option::Option::None;
                    let mut diags = getter.get(&mut data);
                    if diags.has_error() {
                        return diags;
                    }
                    diags.append(#decode(&#rt::Path::root(), data.as_ref(), out));
                    diags
                }
            });
        }
        Ok(tokens)
    }
}
