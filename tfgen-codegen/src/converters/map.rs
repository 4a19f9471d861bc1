//! String keyed map converter.

use super::{Access, AttributeConverter, assign, nested};
use crate::context::{Context, SchemaEntry};
use crate::error::CodegenError;
use proc_macro2::TokenStream;
use quote::quote;
use tfgen_types::{FieldInformation, TypeGraph, TypeId, TypeKind};

/// Converts `HashMap<String, T>` and `BTreeMap<String, T>` to
/// `Option<BTreeMap<String, W>>`, entry by entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapConverter;

impl MapConverter {
    fn value(graph: &TypeGraph, ty: TypeId) -> Result<(TypeId, TypeId, bool), CodegenError> {
        let (inner, optional) = graph.strip_option(ty);
        match graph.kind(inner) {
            TypeKind::Map { key, value, .. } if matches!(graph.kind(*key), TypeKind::String) => {
                Ok((inner, *value, optional))
            }
            _ => Err(CodegenError::generation(format!(
                "map converter called for {}",
                graph.describe(ty)
            ))),
        }
    }
}

impl AttributeConverter for MapConverter {
    fn name(&self) -> &'static str {
        "map"
    }

    fn check(&self, graph: &TypeGraph, ty: TypeId) -> bool {
        Self::value(graph, ty).is_ok()
    }

    fn wire_type(&self, ctx: &mut Context<'_>, ty: TypeId) -> Result<TokenStream, CodegenError> {
        let (_, value, _) = Self::value(ctx.graph(), ty)?;
        let value = ctx.wire_type(value)?;
        Ok(quote! {
            ::core::option::Option<::std::collections::BTreeMap<::std::string::String, #value>>
        })
    }

    fn decode(
        &self,
        ctx: &mut Context<'_>,
        ty: TypeId,
        access: &Access,
    ) -> Result<TokenStream, CodegenError> {
        let (map_type, value, optional) = Self::value(ctx.graph(), ty)?;
        let Access { src, target, path } = access;
        let native_map = ctx.native_type(map_type)?;
        let native = ctx.native_type(value)?;
        let items = ctx.fresh("items");
        let key = ctx.fresh("key");
        let item = ctx.fresh("item");
        let elem = ctx.fresh("elem");
        let map = ctx.fresh("map");

        let inner = Access::new(
            quote!((*#item)),
            quote!(#elem),
            quote!(#path.at_map_key(#key.as_str())),
        );
        let statement = ctx.decode(value, &inner)?;
        let store = assign(target, quote!(#map), optional);
        Ok(quote! {
            if let ::core::option::Option::Some(#items) = #src.as_ref() {
                let mut #map: #native_map = ::core::default::Default::default();
                for (#key, #item) in #items.iter() {
                    let mut #elem: #native = ::core::default::Default::default();
                    #statement
                    #map.insert(#key.clone(), #elem);
                }
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
        let (_, value, optional) = Self::value(ctx.graph(), ty)?;
        let Access { src, target, path } = access;
        let wire = ctx.wire_type(value)?;
        let items = ctx.fresh("items");
        let key = ctx.fresh("key");
        let item = ctx.fresh("item");
        let elem = ctx.fresh("elem");
        let map = ctx.fresh("map");

        let inner = Access::new(
            quote!((*#item)),
            quote!(#elem),
            quote!(#path.at_map_key(#key.as_str())),
        );
        let statement = ctx.encode(value, &inner)?;
        let body = quote! {
            let mut #map: ::std::collections::BTreeMap<::std::string::String, #wire> =
                ::std::collections::BTreeMap::new();
            for (#key, #item) in #items.iter() {
                let mut #elem: #wire = ::core::default::Default::default();
                #statement
                #map.insert(#key.clone(), #elem);
            }
            #target = ::core::option::Option::Some(#map);
        };
        if optional {
            Ok(quote! {
                if let ::core::option::Option::Some(#items) = #src.as_ref() {
                    #body
                }
            })
        } else {
            Ok(quote! {
                {
                    let #items = &#src;
                    #body
                }
            })
        }
    }

    fn schema(
        &self,
        ctx: &mut Context<'_>,
        ty: TypeId,
        info: &FieldInformation,
    ) -> Result<SchemaEntry, CodegenError> {
        let (_, value, _) = Self::value(ctx.graph(), ty)?;
        let (object, _) = ctx.graph().strip_option(value);
        if ctx.graph().as_struct(object).is_some() {
            return nested(ctx, info, object, "MapNested", None);
        }

        let rt = ctx.runtime();
        let element_type = ctx.element_type(value)?.ok_or_else(|| {
            CodegenError::generation(format!(
                "'{}': unsupported map value {}",
                info.path,
                ctx.graph().describe(value)
            ))
        })?;
        let flags = super::flags(&rt, info);
        Ok(SchemaEntry::Attribute(quote! {
            #rt::schema::Attribute::Map(#rt::schema::CollectionAttribute {
                flags: #flags,
                element_type: #element_type,
            })
        }))
    }

    fn element_type(
        &self,
        ctx: &mut Context<'_>,
        ty: TypeId,
    ) -> Result<Option<TokenStream>, CodegenError> {
        let rt = ctx.runtime();
        let (_, value, _) = Self::value(ctx.graph(), ty)?;
        Ok(ctx
            .element_type(value)?
            .map(|element| quote!(#rt::ElementType::map(#element))))
    }
}
