//! Sequence converter.

use super::{Access, AttributeConverter, assign, nested};
use crate::context::{Context, SchemaEntry};
use crate::error::CodegenError;
use proc_macro2::TokenStream;
use quote::quote;
use tfgen_types::{FieldInformation, IntKind, TypeGraph, TypeId, TypeKind};

/// Converts `Vec<T>` to `Option<Vec<W>>`, element by element.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListConverter;

impl ListConverter {
    fn element(graph: &TypeGraph, ty: TypeId) -> Result<(TypeId, bool), CodegenError> {
        let (inner, optional) = graph.strip_option(ty);
        match graph.kind(inner) {
            TypeKind::Vec(element)
                if !matches!(graph.kind(*element), TypeKind::Int(IntKind::U8)) =>
            {
                Ok((*element, optional))
            }
            _ => Err(CodegenError::generation(format!(
                "list converter called for {}",
                graph.describe(ty)
            ))),
        }
    }
}

impl AttributeConverter for ListConverter {
    fn name(&self) -> &'static str {
        "list"
    }

    fn check(&self, graph: &TypeGraph, ty: TypeId) -> bool {
        Self::element(graph, ty).is_ok()
    }

    fn wire_type(&self, ctx: &mut Context<'_>, ty: TypeId) -> Result<TokenStream, CodegenError> {
        let (element, _) = Self::element(ctx.graph(), ty)?;
        let element = ctx.wire_type(element)?;
        Ok(quote!(::core::option::Option<::std::vec::Vec<#element>>))
    }

    fn decode(
        &self,
        ctx: &mut Context<'_>,
        ty: TypeId,
        access: &Access,
    ) -> Result<TokenStream, CodegenError> {
        let (element, optional) = Self::element(ctx.graph(), ty)?;
        let Access { src, target, path } = access;
        let native = ctx.native_type(element)?;
        let items = ctx.fresh("items");
        let index = ctx.fresh("index");
        let item = ctx.fresh("item");
        let elem = ctx.fresh("elem");
        let list = ctx.fresh("list");

        let inner = Access::new(
            quote!((*#item)),
            quote!(#elem),
            quote!(#path.at_list_index(#index)),
        );
        let statement = ctx.decode(element, &inner)?;
        let store = assign(target, quote!(#list), optional);
        Ok(quote! {
            if let ::core::option::Option::Some(#items) = #src.as_ref() {
                let mut #list: ::std::vec::Vec<#native> = ::std::vec::Vec::with_capacity(#items.len());
                for (#index, #item) in #items.iter().enumerate() {
                    let mut #elem: #native = ::core::default::Default::default();
                    #statement
                    #list.push(#elem);
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
        let (element, optional) = Self::element(ctx.graph(), ty)?;
        let Access { src, target, path } = access;
        let wire = ctx.wire_type(element)?;
        let items = ctx.fresh("items");
        let index = ctx.fresh("index");
        let item = ctx.fresh("item");
        let elem = ctx.fresh("elem");
        let list = ctx.fresh("list");

        let inner = Access::new(
            quote!((*#item)),
            quote!(#elem),
            quote!(#path.at_list_index(#index)),
        );
        let statement = ctx.encode(element, &inner)?;
        let body = quote! {
            let mut #list: ::std::vec::Vec<#wire> = ::std::vec::Vec::with_capacity(#items.len());
            for (#index, #item) in #items.iter().enumerate() {
                let mut #elem: #wire = ::core::default::Default::default();
                #statement
                #list.push(#elem);
            }
            #target = ::core::option::Option::Some(#list);
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
        let (element, _) = Self::element(ctx.graph(), ty)?;
        let (object, _) = ctx.graph().strip_option(element);
        if ctx.graph().as_struct(object).is_some() {
            return nested(ctx, info, object, "ListNested", Some("ListNested"));
        }

        let rt = ctx.runtime();
        let element_type = ctx.element_type(element)?.ok_or_else(|| {
            CodegenError::generation(format!(
                "'{}': unsupported list element {}",
                info.path,
                ctx.graph().describe(element)
            ))
        })?;
        let flags = super::flags(&rt, info);
        Ok(SchemaEntry::Attribute(quote! {
            #rt::schema::Attribute::List(#rt::schema::CollectionAttribute {
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
        let (element, _) = Self::element(ctx.graph(), ty)?;
        Ok(ctx
            .element_type(element)?
            .map(|element| quote!(#rt::ElementType::list(#element))))
    }
}
