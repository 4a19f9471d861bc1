//! Loosely typed map converter.
//!
//! `serde_json::Value` and maps of it travel as a JSON document inside a
//! `StringValue`.

use super::{Access, AttributeConverter, assign, primitive};
use crate::context::{Context, SchemaEntry};
use crate::error::CodegenError;
use proc_macro2::TokenStream;
use quote::quote;
use tfgen_types::{FieldInformation, TypeGraph, TypeId, TypeKind};

/// Converts `serde_json::Value` and string keyed maps of it to a JSON
/// `StringValue`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapInterfaceConverter;

impl MapInterfaceConverter {
    fn loose(graph: &TypeGraph, ty: TypeId) -> Result<(TypeId, bool), CodegenError> {
        let (inner, optional) = graph.strip_option(ty);
        let accepted = match graph.kind(inner) {
            TypeKind::Dynamic => true,
            TypeKind::Map { key, value, .. } => {
                matches!(graph.kind(*key), TypeKind::String)
                    && matches!(graph.kind(*value), TypeKind::Dynamic)
            }
            _ => false,
        };
        if accepted {
            Ok((inner, optional))
        } else {
            Err(CodegenError::generation(format!(
                "map_interface converter called for {}",
                graph.describe(ty)
            )))
        }
    }
}

impl AttributeConverter for MapInterfaceConverter {
    fn name(&self) -> &'static str {
        "map_interface"
    }

    fn check(&self, graph: &TypeGraph, ty: TypeId) -> bool {
        Self::loose(graph, ty).is_ok()
    }

    fn wire_type(&self, ctx: &mut Context<'_>, _ty: TypeId) -> Result<TokenStream, CodegenError> {
        let rt = ctx.runtime();
        Ok(quote!(#rt::StringValue))
    }

    fn decode(
        &self,
        ctx: &mut Context<'_>,
        ty: TypeId,
        access: &Access,
    ) -> Result<TokenStream, CodegenError> {
        let rt = ctx.runtime();
        let (inner, optional) = Self::loose(ctx.graph(), ty)?;
        let native = ctx.native_type(inner)?;
        let Access { src, target, path } = access;
        let store = assign(target, quote!(v), optional);
        Ok(quote! {
            if let ::core::option::Option::Some(v) = #src.as_option() {
                match #rt::serde_json::from_str::<#native>(v) {
                    ::core::result::Result::Ok(v) => {
                        #store
                    }
                    ::core::result::Result::Err(e) => {
                        diags.add_attribute_error(#path, "failed to unmarshal json", e.to_string());
                    }
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
        let rt = ctx.runtime();
        let (_, optional) = Self::loose(ctx.graph(), ty)?;
        let Access { src, target, path } = access;
        let (converted, constructor) = if optional {
            (
                quote!(#src.as_ref().map(#rt::serde_json::to_string).transpose()),
                quote!(#rt::StringValue::from_option(v)),
            )
        } else {
            (
                quote!(#rt::serde_json::to_string(&#src)),
                quote!(#rt::StringValue::new(v)),
            )
        };
        // A value that cannot be serialized aborts the whole encode.
        Ok(quote! {
            match #converted {
                ::core::result::Result::Ok(v) => {
                    #target = #constructor;
                }
                ::core::result::Result::Err(e) => {
                    diags.add_attribute_error(#path, "failed to marshal json", e.to_string());
                    return (::core::option::Option::None, diags);
                }
            }
        })
    }

    fn schema(
        &self,
        ctx: &mut Context<'_>,
        _ty: TypeId,
        info: &FieldInformation,
    ) -> Result<SchemaEntry, CodegenError> {
        Ok(SchemaEntry::Attribute(primitive(ctx, "String", info)))
    }

    fn element_type(
        &self,
        ctx: &mut Context<'_>,
        _ty: TypeId,
    ) -> Result<Option<TokenStream>, CodegenError> {
        let rt = ctx.runtime();
        Ok(Some(quote!(#rt::ElementType::String)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::testing::{access, assert_statements, with_context};

    #[test]
    fn test_accepts_value_and_value_maps() {
        let mut graph = TypeGraph::new();
        let value = graph.dynamic();
        let string = graph.string();
        let values = graph.map(string, value);
        let strings = graph.map(string, string);
        let optional = graph.option(values);

        assert!(MapInterfaceConverter.check(&graph, value));
        assert!(MapInterfaceConverter.check(&graph, values));
        assert!(MapInterfaceConverter.check(&graph, optional));
        assert!(!MapInterfaceConverter.check(&graph, strings));
    }

    #[test]
    fn test_json_statements() {
        let mut graph = TypeGraph::new();
        let value = graph.dynamic();
        let string = graph.string();
        let values = graph.btree_map(string, value);
        let optional = graph.option(values);

        with_context(&graph, |ctx| {
            for ty in [values, optional] {
                let decode = MapInterfaceConverter
                    .decode(ctx, ty, &access())
                    .expect("Failed to decode");
                assert_statements(&decode);
                assert!(decode.to_string().contains("failed to unmarshal json"));

                let encode = MapInterfaceConverter
                    .encode(ctx, ty, &access())
                    .expect("Failed to encode");
                assert_statements(&encode);
                assert!(encode.to_string().contains("serde_json :: to_string"));
            }
        });
    }
}
