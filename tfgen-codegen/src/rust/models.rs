//! Wire model code generation.

use crate::context::{Context, ident};
use crate::error::CodegenError;
use crate::names::TypeNames;
use crate::walker::FieldList;
use proc_macro2::TokenStream;
use quote::quote;
use tfgen_types::TypeId;

/// Generator for wire model structs.
pub struct ModelGenerator<'c, 'a> {
    ctx: &'c mut Context<'a>,
}

impl<'c, 'a> ModelGenerator<'c, 'a> {
    /// Creates a new model generator.
    #[must_use]
    pub fn new(ctx: &'c mut Context<'a>) -> Self {
        Self { ctx }
    }

    /// Generates the wire model of `ty`.
    ///
    /// The model has one serde renamed field per walked field, typed with the
    /// wire type chosen by the field's converter.
    ///
    /// # Errors
    /// Returns an error if a field type has no converter.
    pub fn generate(
        &mut self,
        ty: TypeId,
        names: &TypeNames,
        fields: &FieldList,
    ) -> Result<TokenStream, CodegenError> {
        let rt = self.ctx.runtime();
        let serde_crate = format!("{}::serde", rt.to_string().replace(' ', ""));
        let model = names.model();
        let doc = format!(
            " Wire model of `{}`.",
            self.ctx.graph().describe(ty)
        );

        let mut members = Vec::with_capacity(fields.fields.len());
        for info in &fields.fields {
            let field = ident(&info.ident);
            let wire = self.ctx.wire_type(info.field_type)?;
            let name = &info.name;
            members.push(quote! {
                #[serde(rename = #name)]
                pub #field: #wire
            });
        }

        Ok(quote! {
            #[doc = #doc]
            #[derive(
                Debug,
                Clone,
                Default,
                PartialEq,
                #rt::serde::Serialize,
                #rt::serde::Deserialize,
            )]
            #[serde(crate = #serde_crate, default)]
            pub struct #model {
                #(#members,)*
            }
        })
    }
}
