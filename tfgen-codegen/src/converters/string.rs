//! String family converter.
//!
//! Strings, string newtypes, byte vectors, durations and timestamps all
//! travel as `StringValue`. The converter switches on the concrete kind:
//! durations use the `humantime` format and timestamps RFC 3339 with as many
//! sub-second digits as needed. Malformed text becomes a field diagnostic.

use super::{Access, AttributeConverter, assign, primitive};
use crate::context::{Context, SchemaEntry};
use crate::error::CodegenError;
use proc_macro2::TokenStream;
use quote::quote;
use tfgen_types::{FieldInformation, IntKind, TypeGraph, TypeId, TypeKind};

/// Concrete kind handled by [`StringConverter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Plain,
    Alias(TypeId),
    Bytes,
    Duration,
    Timestamp,
}

impl Flavor {
    fn of(graph: &TypeGraph, ty: TypeId) -> Option<Self> {
        match graph.kind(ty) {
            TypeKind::String => Some(Self::Plain),
            TypeKind::Duration => Some(Self::Duration),
            TypeKind::Timestamp => Some(Self::Timestamp),
            TypeKind::Newtype { inner, .. } => {
                matches!(graph.kind(*inner), TypeKind::String).then_some(Self::Alias(ty))
            }
            TypeKind::Vec(inner) => {
                matches!(graph.kind(*inner), TypeKind::Int(IntKind::U8)).then_some(Self::Bytes)
            }
            _ => None,
        }
    }
}

/// Converts strings, string newtypes, `Vec<u8>`, `Duration` and
/// `DateTime<Utc>` to `StringValue`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl StringConverter {
    fn flavor(graph: &TypeGraph, ty: TypeId) -> Result<(Flavor, bool), CodegenError> {
        let (inner, optional) = graph.strip_option(ty);
        Flavor::of(graph, inner)
            .map(|flavor| (flavor, optional))
            .ok_or_else(|| {
                CodegenError::generation(format!(
                    "string converter called for {}",
                    graph.describe(ty)
                ))
            })
    }
}

impl AttributeConverter for StringConverter {
    fn name(&self) -> &'static str {
        "string"
    }

    fn check(&self, graph: &TypeGraph, ty: TypeId) -> bool {
        Self::flavor(graph, ty).is_ok()
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
        let (flavor, optional) = Self::flavor(ctx.graph(), ty)?;
        let Access { src, target, path } = access;

        let body = match flavor {
            Flavor::Plain => assign(target, quote!(v.clone()), optional),
            Flavor::Alias(alias) => {
                let alias = ctx.native_type(alias)?;
                assign(target, quote!(#alias(v.clone())), optional)
            }
            Flavor::Bytes => assign(target, quote!(v.clone().into_bytes()), optional),
            Flavor::Duration => {
                let store = assign(target, quote!(v), optional);
                quote! {
                    match #rt::humantime::parse_duration(v) {
                        ::core::result::Result::Ok(v) => {
                            #store
                        }
                        ::core::result::Result::Err(e) => {
                            diags.add_attribute_error(#path, "failed to parse duration", e.to_string());
                        }
                    }
                }
            }
            Flavor::Timestamp => {
                let store = assign(target, quote!(v.with_timezone(&#rt::chrono::Utc)), optional);
                quote! {
                    match #rt::chrono::DateTime::parse_from_rfc3339(v) {
                        ::core::result::Result::Ok(v) => {
                            #store
                        }
                        ::core::result::Result::Err(e) => {
                            diags.add_attribute_error(#path, "failed to parse timestamp", e.to_string());
                        }
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
        let (flavor, optional) = Self::flavor(ctx.graph(), ty)?;
        let Access { src, target, path } = access;
        let format_timestamp =
            quote!(to_rfc3339_opts(#rt::chrono::SecondsFormat::AutoSi, true));

        let value = match (flavor, optional) {
            (Flavor::Plain, false) => quote!(#rt::StringValue::new(#src.clone())),
            (Flavor::Plain, true) => quote!(#rt::StringValue::from_option(#src.clone())),
            (Flavor::Alias(_), false) => quote!(#rt::StringValue::new(#src.0.clone())),
            (Flavor::Alias(_), true) => {
                quote!(#rt::StringValue::from_option(#src.as_ref().map(|v| v.0.clone())))
            }
            (Flavor::Duration, false) => {
                quote!(#rt::StringValue::new(#rt::humantime::format_duration(#src).to_string()))
            }
            (Flavor::Duration, true) => quote! {
                #rt::StringValue::from_option(
                    #src.map(|v| #rt::humantime::format_duration(v).to_string()),
                )
            },
            (Flavor::Timestamp, false) => quote!(#rt::StringValue::new(#src.#format_timestamp)),
            (Flavor::Timestamp, true) => {
                quote!(#rt::StringValue::from_option(#src.map(|v| v.#format_timestamp)))
            }
            (Flavor::Bytes, _) => {
                let (converted, constructor) = if optional {
                    (
                        quote!(#src.clone().map(::std::string::String::from_utf8).transpose()),
                        quote!(#rt::StringValue::from_option(v)),
                    )
                } else {
                    (
                        quote!(::std::string::String::from_utf8(#src.clone())),
                        quote!(#rt::StringValue::new(v)),
                    )
                };
                return Ok(quote! {
                    match #converted {
                        ::core::result::Result::Ok(v) => {
                            #target = #constructor;
                        }
                        ::core::result::Result::Err(e) => {
                            diags.add_attribute_error(#path, "bytes are not valid utf-8", e.to_string());
                        }
                    }
                });
            }
        };
        Ok(quote!(#target = #value;))
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
    fn test_flavors() {
        let mut graph = TypeGraph::new();
        let string = graph.string();
        let bytes = graph.bytes();
        let duration = graph.duration();
        let timestamp = graph.timestamp();
        let alias = graph
            .declare_newtype("crate", "Hostname", string)
            .expect("Failed to declare");
        let int = graph.int(IntKind::I32);
        let counter = graph
            .declare_newtype("crate", "Counter", int)
            .expect("Failed to declare");

        assert_eq!(Flavor::of(&graph, string), Some(Flavor::Plain));
        assert_eq!(Flavor::of(&graph, bytes), Some(Flavor::Bytes));
        assert_eq!(Flavor::of(&graph, duration), Some(Flavor::Duration));
        assert_eq!(Flavor::of(&graph, timestamp), Some(Flavor::Timestamp));
        assert_eq!(Flavor::of(&graph, alias), Some(Flavor::Alias(alias)));
        assert_eq!(Flavor::of(&graph, counter), None);
        assert!(!StringConverter.check(&graph, counter));
    }

    #[test]
    fn test_every_flavor_generates_valid_statements() {
        let mut graph = TypeGraph::new();
        let string = graph.string();
        let mut types = vec![
            string,
            graph.bytes(),
            graph.duration(),
            graph.timestamp(),
            graph
                .declare_newtype("crate", "Hostname", string)
                .expect("Failed to declare"),
        ];
        let optional: Vec<_> = types.iter().map(|ty| graph.option(*ty)).collect();
        types.extend(optional);

        with_context(&graph, |ctx| {
            for ty in types {
                let decode = StringConverter
                    .decode(ctx, ty, &access())
                    .expect("Failed to decode");
                assert_statements(&decode);
                let encode = StringConverter
                    .encode(ctx, ty, &access())
                    .expect("Failed to encode");
                assert_statements(&encode);
            }
        });
    }

    #[test]
    fn test_parse_failures_are_diagnostics() {
        let mut graph = TypeGraph::new();
        let timestamp = graph.timestamp();
        let duration = graph.duration();

        with_context(&graph, |ctx| {
            let decode = StringConverter
                .decode(ctx, timestamp, &access())
                .expect("Failed to decode")
                .to_string();
            assert!(decode.contains("parse_from_rfc3339"));
            assert!(decode.contains("failed to parse timestamp"));

            let decode = StringConverter
                .decode(ctx, duration, &access())
                .expect("Failed to decode")
                .to_string();
            assert!(decode.contains("parse_duration"));
            assert!(decode.contains("add_attribute_error (path . at_name (\"field\")"));
        });
    }
}
