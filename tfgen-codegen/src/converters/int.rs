//! Integer converter.
//!
//! Every integer width maps to `Int64Value`. Decoding narrows with
//! `TryFrom` and reports out of range values as field diagnostics. Encoding
//! widens with `From`, except for `isize`, `u64` and `usize` which may not
//! fit and go through `TryFrom` as well.

use super::{Access, AttributeConverter, assign, primitive};
use crate::context::{Context, SchemaEntry, ident};
use crate::error::CodegenError;
use proc_macro2::TokenStream;
use quote::quote;
use tfgen_types::{FieldInformation, IntKind, TypeGraph, TypeId, TypeKind};

/// Converts every integer width to `Int64Value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntConverter;

impl IntConverter {
    fn kind(graph: &TypeGraph, ty: TypeId) -> Result<(IntKind, bool), CodegenError> {
        let (inner, optional) = graph.strip_option(ty);
        match graph.kind(inner) {
            TypeKind::Int(kind) => Ok((*kind, optional)),
            _ => Err(CodegenError::generation(format!(
                "int converter called for {}",
                graph.describe(ty)
            ))),
        }
    }
}

impl AttributeConverter for IntConverter {
    fn name(&self) -> &'static str {
        "int"
    }

    fn check(&self, graph: &TypeGraph, ty: TypeId) -> bool {
        Self::kind(graph, ty).is_ok()
    }

    fn wire_type(&self, ctx: &mut Context<'_>, _ty: TypeId) -> Result<TokenStream, CodegenError> {
        let rt = ctx.runtime();
        Ok(quote!(#rt::Int64Value))
    }

    fn decode(
        &self,
        ctx: &mut Context<'_>,
        ty: TypeId,
        access: &Access,
    ) -> Result<TokenStream, CodegenError> {
        let (kind, optional) = Self::kind(ctx.graph(), ty)?;
        let Access { src, target, path } = access;

        let body = if kind.is_i64() {
            assign(target, quote!(*v), optional)
        } else {
            let native = ident(kind.rust_name());
            let store = assign(target, quote!(v), optional);
            quote! {
                match <#native as ::core::convert::TryFrom<i64>>::try_from(*v) {
                    ::core::result::Result::Ok(v) => {
                        #store
                    }
                    ::core::result::Result::Err(e) => {
                        diags.add_attribute_error(#path, "value out of range", e.to_string());
                    }
                }
            }
        };
        Ok(quote! {
            if let ::core::option::Option::Some(v) = #src.as_option() {
                #body
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

        if kind.is_i64() {
            let value = if optional {
                quote!(#rt::Int64Value::from_option(#src))
            } else {
                quote!(#rt::Int64Value::new(#src))
            };
            return Ok(quote!(#target = #value;));
        }

        if kind.widens_to_i64() {
            let value = if optional {
                quote!(#rt::Int64Value::from_option(#src.map(i64::from)))
            } else {
                quote!(#rt::Int64Value::new(i64::from(#src)))
            };
            return Ok(quote!(#target = #value;));
        }

        let (converted, constructor) = if optional {
            (
                quote!(#src.map(i64::try_from).transpose()),
                quote!(#rt::Int64Value::from_option(v)),
            )
        } else {
            (quote!(i64::try_from(#src)), quote!(#rt::Int64Value::new(v)))
        };
        Ok(quote! {
            match #converted {
                ::core::result::Result::Ok(v) => {
                    #target = #constructor;
                }
                ::core::result::Result::Err(e) => {
                    diags.add_attribute_error(#path, "value out of range", e.to_string());
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
        Ok(SchemaEntry::Attribute(primitive(ctx, "Int64", info)))
    }

    fn element_type(
        &self,
        ctx: &mut Context<'_>,
        _ty: TypeId,
    ) -> Result<Option<TokenStream>, CodegenError> {
        let rt = ctx.runtime();
        Ok(Some(quote!(#rt::ElementType::Int64)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::testing::{access, assert_statements, with_context};

    #[test]
    fn test_i64_is_direct() {
        let mut graph = TypeGraph::new();
        let ty = graph.int(IntKind::I64);

        with_context(&graph, |ctx| {
            let decode = IntConverter
                .decode(ctx, ty, &access())
                .expect("Failed to decode");
            assert_statements(&decode);
            assert!(!decode.to_string().contains("try_from"));

            let encode = IntConverter
                .encode(ctx, ty, &access())
                .expect("Failed to encode");
            assert_eq!(
                encode.to_string(),
                quote!(target.field = ::rt::Int64Value::new(data.field);).to_string()
            );
        });
    }

    #[test]
    fn test_narrow_widths_use_try_from() {
        let mut graph = TypeGraph::new();
        let ty = graph.int(IntKind::I32);
        let optional = graph.option(ty);

        with_context(&graph, |ctx| {
            let decode = IntConverter
                .decode(ctx, optional, &access())
                .expect("Failed to decode");
            assert_statements(&decode);
            let text = decode.to_string();
            assert!(text.contains("< i32 as :: core :: convert :: TryFrom < i64 >"));
            assert!(text.contains("value out of range"));

            let encode = IntConverter
                .encode(ctx, optional, &access())
                .expect("Failed to encode");
            assert_statements(&encode);
            assert!(encode.to_string().contains("map (i64 :: from)"));
        });
    }

    #[test]
    fn test_wide_unsigned_encode_is_checked() {
        let mut graph = TypeGraph::new();
        let ty = graph.int(IntKind::U64);
        let optional = graph.option(ty);

        with_context(&graph, |ctx| {
            let plain = IntConverter
                .encode(ctx, ty, &access())
                .expect("Failed to encode");
            assert_statements(&plain);
            assert!(plain.to_string().contains("i64 :: try_from (data . field)"));

            let wrapped = IntConverter
                .encode(ctx, optional, &access())
                .expect("Failed to encode");
            assert_statements(&wrapped);
            assert!(wrapped.to_string().contains("transpose"));
        });
    }

    #[test]
    fn test_rejects_other_kinds() {
        let mut graph = TypeGraph::new();
        let ty = graph.string();
        assert!(!IntConverter.check(&graph, ty));
    }
}
