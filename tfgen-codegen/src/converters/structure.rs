//! Nested struct converter.
//!
//! Delegates to the generated procedures of the nested type. Errors reported
//! by a nested procedure stop the enclosing one.

use super::{Access, AttributeConverter, nested};
use crate::context::{Context, SchemaEntry};
use crate::error::CodegenError;
use proc_macro2::TokenStream;
use quote::quote;
use tfgen_types::{FieldInformation, TypeGraph, TypeId};

/// Converts structs to `Option<Box<Model>>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructConverter;

impl StructConverter {
    fn object(graph: &TypeGraph, ty: TypeId) -> Result<(TypeId, bool), CodegenError> {
        let (inner, optional) = graph.strip_option(ty);
        if graph.as_struct(inner).is_some() {
            Ok((inner, optional))
        } else {
            Err(CodegenError::not_a_struct(graph.describe(ty)))
        }
    }
}

impl AttributeConverter for StructConverter {
    fn name(&self) -> &'static str {
        "struct"
    }

    fn check(&self, graph: &TypeGraph, ty: TypeId) -> bool {
        Self::object(graph, ty).is_ok()
    }

    fn wire_type(&self, ctx: &mut Context<'_>, ty: TypeId) -> Result<TokenStream, CodegenError> {
        let (object, _) = Self::object(ctx.graph(), ty)?;
        let model = ctx.names_for(object)?.model();
        Ok(quote!(::core::option::Option<::std::boxed::Box<#model>>))
    }

    fn decode(
        &self,
        ctx: &mut Context<'_>,
        ty: TypeId,
        access: &Access,
    ) -> Result<TokenStream, CodegenError> {
        let (object, optional) = Self::object(ctx.graph(), ty)?;
        let decode = ctx.names_for(object)?.decode();
        let Access { src, target, path } = access;

        if optional {
            return Ok(quote! {
                {
                    let nested = #decode(&(#path), #src.as_deref(), &mut #target);
                    let failed = nested.has_error();
                    diags.append(nested);
                    if failed {
                        return diags;
                    }
                }
            });
        }
        Ok(quote! {
            {
                let mut slot = ::core::option::Option::Some(::core::mem::take(&mut #target));
                let nested = #decode(&(#path), #src.as_deref(), &mut slot);
                let failed = nested.has_error();
                diags.append(nested);
                if let ::core::option::Option::Some(v) = slot {
                    #target = v;
                }
                if failed {
                    return diags;
                }
            }
        })
    }

    fn encode(
        &self,
        ctx: &mut Context<'_>,
        ty: TypeId,
        access: &Access,
    ) -> Result<TokenStream, CodegenError> {
        let (object, optional) = Self::object(ctx.graph(), ty)?;
        let encode = ctx.names_for(object)?.encode();
        let Access { src, target, path } = access;
        let value = if optional {
            quote!(#src.as_ref())
        } else {
            quote!(::core::option::Option::Some(&#src))
        };
        Ok(quote! {
            {
                let (model, nested) = #encode(&#path, #value);
                let failed = nested.has_error();
                diags.append(nested);
                if failed {
                    return (::core::option::Option::None, diags);
                }
                #target = model.map(::std::boxed::Box::new);
            }
        })
    }

    fn schema(
        &self,
        ctx: &mut Context<'_>,
        ty: TypeId,
        info: &FieldInformation,
    ) -> Result<SchemaEntry, CodegenError> {
        let (object, _) = Self::object(ctx.graph(), ty)?;
        nested(ctx, info, object, "SingleNested", Some("SingleNested"))
    }
}
