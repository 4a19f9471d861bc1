//! Boolean converter.

use super::{Access, AttributeConverter, assign, primitive};
use crate::context::{Context, SchemaEntry};
use crate::error::CodegenError;
use proc_macro2::TokenStream;
use quote::quote;
use tfgen_types::{FieldInformation, TypeGraph, TypeId, TypeKind};

/// Converts `bool` and `Option<bool>` to `BoolValue`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolConverter;

impl AttributeConverter for BoolConverter {
    fn name(&self) -> &'static str {
        "bool"
    }

    fn check(&self, graph: &TypeGraph, ty: TypeId) -> bool {
        let (inner, _) = graph.strip_option(ty);
        matches!(graph.kind(inner), TypeKind::Bool)
    }

    fn wire_type(&self, ctx: &mut Context<'_>, _ty: TypeId) -> Result<TokenStream, CodegenError> {
        let rt = ctx.runtime();
        Ok(quote!(#rt::BoolValue))
    }

    fn decode(
        &self,
        ctx: &mut Context<'_>,
        ty: TypeId,
        access: &Access,
    ) -> Result<TokenStream, CodegenError> {
        let (_, optional) = ctx.graph().strip_option(ty);
        let Access { src, target, .. } = access;
        let store = assign(target, quote!(*v), optional);
        Ok(quote! {
            if let ::core::option::Option::Some(v) = #src.as_option() {
                #store
            }
        })
    }

    fn encode(
        &self,
        ctx: &mut Context<'_>,
        ty: TypeId,
        access: &Access,
    ) -> Result<TokenStream, CodegenError> {
        let rt = ctx.runtime();
        let (_, optional) = ctx.graph().strip_option(ty);
        let Access { src, target, .. } = access;
        // Both sides are already `bool`: use the direct constructor.
        let value = if optional {
            quote!(#rt::BoolValue::from_option(#src))
        } else {
            quote!(#rt::BoolValue::new(#src))
        };
        Ok(quote!(#target = #value;))
    }

    fn schema(
        &self,
        ctx: &mut Context<'_>,
        _ty: TypeId,
        info: &FieldInformation,
    ) -> Result<SchemaEntry, CodegenError> {
        Ok(SchemaEntry::Attribute(primitive(ctx, "Bool", info)))
    }

    fn element_type(
        &self,
        ctx: &mut Context<'_>,
        _ty: TypeId,
    ) -> Result<Option<TokenStream>, CodegenError> {
        let rt = ctx.runtime();
        Ok(Some(quote!(#rt::ElementType::Bool)))
    }
}
