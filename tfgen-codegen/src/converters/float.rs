//! Float converter.

use super::{Access, AttributeConverter, assign, primitive};
use crate::context::{Context, SchemaEntry};
use crate::error::CodegenError;
use proc_macro2::TokenStream;
use quote::quote;
use tfgen_types::{FieldInformation, FloatKind, TypeGraph, TypeId, TypeKind};

/// Converts `f32` and `f64` to `Float64Value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatConverter;

impl FloatConverter {
    fn kind(graph: &TypeGraph, ty: TypeId) -> Result<(FloatKind, bool), CodegenError> {
        let (inner, optional) = graph.strip_option(ty);
        match graph.kind(inner) {
            TypeKind::Float(kind) => Ok((*kind, optional)),
            _ => Err(CodegenError::generation(format!(
                "float converter called for {}",
                graph.describe(ty)
            ))),
        }
    }
}

impl AttributeConverter for FloatConverter {
    fn name(&self) -> &'static str {
        "float"
    }

    fn check(&self, graph: &TypeGraph, ty: TypeId) -> bool {
        Self::kind(graph, ty).is_ok()
    }

    fn wire_type(&self, ctx: &mut Context<'_>, _ty: TypeId) -> Result<TokenStream, CodegenError> {
        let rt = ctx.runtime();
        Ok(quote!(#rt::Float64Value))
    }

    fn decode(
        &self,
        ctx: &mut Context<'_>,
        ty: TypeId,
        access: &Access,
    ) -> Result<TokenStream, CodegenError> {
        let (kind, optional) = Self::kind(ctx.graph(), ty)?;
        let Access { src, target, .. } = access;
        let value = match kind {
            FloatKind::F64 => quote!(*v),
            FloatKind::F32 => quote!((*v as f32)),
        };
        let store = assign(target, value, optional);
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
        let (kind, optional) = Self::kind(ctx.graph(), ty)?;
        let Access { src, target, path } = access;
        let value = match (kind, optional) {
            (FloatKind::F64, false) => quote!(#rt::Float64Value::new(#src)),
            (FloatKind::F64, true) => quote!(#rt::Float64Value::from_option(#src)),
            (FloatKind::F32, false) => quote!(#rt::Float64Value::new(f64::from(#src))),
            (FloatKind::F32, true) => quote!(#rt::Float64Value::from_option(#src.map(f64::from))),
        };
        // State documents have no representation for NaN or infinities.
        Ok(quote! {
            #target = #value;
            if #target.as_option().is_some_and(|v| !v.is_finite()) {
                diags.add_attribute_error(#path, "value is not finite", "NaN and infinite floats cannot be stored");
            }
        })
    }

    fn schema(
        &self,
        ctx: &mut Context<'_>,
        _ty: TypeId,
        info: &FieldInformation,
    ) -> Result<SchemaEntry, CodegenError> {
        Ok(SchemaEntry::Attribute(primitive(ctx, "Float64", info)))
    }

    fn element_type(
        &self,
        ctx: &mut Context<'_>,
        _ty: TypeId,
    ) -> Result<Option<TokenStream>, CodegenError> {
        let rt = ctx.runtime();
        Ok(Some(quote!(#rt::ElementType::Float64)))
    }
}
