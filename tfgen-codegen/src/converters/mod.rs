//! Per-kind conversion strategies.
//!
//! A [`Registry`] is an ordered list of converters; the first converter whose
//! [`AttributeConverter::check`] accepts a type handles it. The order is part
//! of the contract: byte sequences must be claimed before generic sequences
//! and maps of `serde_json::Value` before generic maps.

mod boolean;
mod float;
mod int;
mod list;
mod map;
mod map_interface;
mod string;
mod structure;

pub use self::boolean::BoolConverter;
pub use self::float::FloatConverter;
pub use self::int::IntConverter;
pub use self::list::ListConverter;
pub use self::map::MapConverter;
pub use self::map_interface::MapInterfaceConverter;
pub use self::string::StringConverter;
pub use self::structure::StructConverter;

use crate::context::{Context, SchemaEntry, ident};
use crate::error::CodegenError;
use proc_macro2::TokenStream;
use quote::quote;
use std::fmt;
use std::sync::{Arc, LazyLock};
use tfgen_types::{FieldInformation, TypeGraph, TypeId};

pub use crate::context::Access;

/// Conversion strategy for one kind of native type.
///
/// Converters are stateless. Every operation receives the native type, which
/// may be wrapped in one `Option`; the converter strips it when its check
/// accepts optional values.
pub trait AttributeConverter: Send + Sync + fmt::Debug {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Returns true if this converter handles `ty`.
    fn check(&self, graph: &TypeGraph, ty: TypeId) -> bool;

    /// Returns the wire type of `ty`.
    ///
    /// # Errors
    /// Returns an error if a nested type cannot be converted.
    fn wire_type(&self, ctx: &mut Context<'_>, ty: TypeId) -> Result<TokenStream, CodegenError>;

    /// Returns a statement decoding the wire value at `access.src` into the
    /// native place `access.target`.
    ///
    /// # Errors
    /// Returns an error if a nested type cannot be converted.
    fn decode(
        &self,
        ctx: &mut Context<'_>,
        ty: TypeId,
        access: &Access,
    ) -> Result<TokenStream, CodegenError>;

    /// Returns a statement encoding the native value at `access.src` into the
    /// wire place `access.target`.
    ///
    /// # Errors
    /// Returns an error if a nested type cannot be converted.
    fn encode(
        &self,
        ctx: &mut Context<'_>,
        ty: TypeId,
        access: &Access,
    ) -> Result<TokenStream, CodegenError>;

    /// Returns the schema descriptor of a field of type `ty`.
    ///
    /// # Errors
    /// Returns an error if the field cannot be described.
    fn schema(
        &self,
        ctx: &mut Context<'_>,
        ty: TypeId,
        info: &FieldInformation,
    ) -> Result<SchemaEntry, CodegenError>;

    /// Returns the primitive collection element type of `ty`, if any.
    ///
    /// # Errors
    /// Returns an error if a nested type cannot be converted.
    fn element_type(
        &self,
        _ctx: &mut Context<'_>,
        _ty: TypeId,
    ) -> Result<Option<TokenStream>, CodegenError> {
        Ok(None)
    }
}

static DEFAULT_CONVERTERS: LazyLock<Vec<Arc<dyn AttributeConverter>>> = LazyLock::new(|| {
    vec![
        Arc::new(MapInterfaceConverter),
        Arc::new(BoolConverter),
        Arc::new(StringConverter),
        Arc::new(IntConverter),
        Arc::new(FloatConverter),
        Arc::new(ListConverter),
        Arc::new(MapConverter),
        Arc::new(StructConverter),
    ]
});

/// Ordered list of converters.
#[derive(Debug, Clone)]
pub struct Registry {
    converters: Vec<Arc<dyn AttributeConverter>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            converters: DEFAULT_CONVERTERS.clone(),
        }
    }
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            converters: Vec::new(),
        }
    }

    /// Appends a converter. It is tried after every converter already
    /// registered.
    pub fn push(&mut self, converter: Arc<dyn AttributeConverter>) {
        self.converters.push(converter);
    }

    /// Inserts a converter before every converter already registered.
    pub fn prepend(&mut self, converter: Arc<dyn AttributeConverter>) {
        self.converters.insert(0, converter);
    }

    /// Returns the registry with `converter` tried first.
    #[must_use]
    pub fn with(mut self, converter: Arc<dyn AttributeConverter>) -> Self {
        self.prepend(converter);
        self
    }

    /// Returns the names of the registered converters in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.converters.iter().map(|c| c.name()).collect()
    }

    /// Selects the first converter accepting `ty`.
    ///
    /// # Errors
    /// Returns `CodegenError::NoConverterFound` if none does.
    pub fn select(
        &self,
        graph: &TypeGraph,
        ty: TypeId,
    ) -> Result<&dyn AttributeConverter, CodegenError> {
        self.converters
            .iter()
            .find(|converter| converter.check(graph, ty))
            .map(|converter| converter.as_ref())
            .ok_or_else(|| CodegenError::no_converter(graph.describe(ty)))
    }
}

/// Builds the `AttributeFlags` expression of a field.
pub(crate) fn flags(rt: &TokenStream, info: &FieldInformation) -> TokenStream {
    let mut fields = Vec::new();
    if info.optional {
        fields.push(quote!(optional: true));
    }
    if info.required {
        fields.push(quote!(required: true));
    }
    if info.computed {
        fields.push(quote!(computed: true));
    }
    if info.sensitive {
        fields.push(quote!(sensitive: true));
    }
    if !info.description.is_empty() {
        let description = &info.description;
        fields.push(quote!(description: ::std::string::String::from(#description)));
    }
    quote! {
        #rt::schema::AttributeFlags {
            #(#fields,)*
            ..::core::default::Default::default()
        }
    }
}

/// Builds `target = value;`, wrapping in `Some` for optional targets.
pub(crate) fn assign(target: &TokenStream, value: TokenStream, optional: bool) -> TokenStream {
    if optional {
        quote!(#target = ::core::option::Option::Some(#value);)
    } else {
        quote!(#target = #value;)
    }
}

/// Builds the attribute and block map expressions of a nested struct, and
/// whether any block was produced.
///
/// # Errors
/// Returns an error if a field cannot be described or the struct reaches
/// itself.
pub(crate) fn render_object(
    ctx: &mut Context<'_>,
    path: &str,
    ty: TypeId,
) -> Result<(TokenStream, TokenStream, bool), CodegenError> {
    let (inner, _) = ctx.graph().strip_option(ty);
    ctx.enter_schema(inner, path)?;
    let list = ctx.fields(path, inner)?;

    let mut attributes = Vec::new();
    let mut blocks = Vec::new();
    for info in &list.fields {
        let name = &info.name;
        match ctx.schema(info)? {
            SchemaEntry::Attribute(tokens) => {
                attributes.push(quote!((::std::string::String::from(#name), #tokens)));
            }
            SchemaEntry::Block(tokens) => {
                blocks.push(quote!((::std::string::String::from(#name), #tokens)));
            }
        }
    }
    ctx.leave_schema();

    let has_blocks = !blocks.is_empty();
    Ok((map_expr(&attributes), map_expr(&blocks), has_blocks))
}

/// Builds the schema entry of a field holding nested objects.
///
/// `attribute` names the `Attribute` variant used for plain fields and
/// `block` the `Block` variant used for fields tagged as blocks; `None`
/// means the shape cannot be a block.
///
/// # Errors
/// Returns `CodegenError::BlockOnAttribute` if a plain field would hold
/// blocks and `CodegenError::Generation` if a block is requested for a shape
/// that has none.
pub(crate) fn nested(
    ctx: &mut Context<'_>,
    info: &FieldInformation,
    ty: TypeId,
    attribute: &str,
    block: Option<&str>,
) -> Result<SchemaEntry, CodegenError> {
    let rt = ctx.runtime();
    if info.block && block.is_none() {
        return Err(CodegenError::generation(format!(
            "'{}': a map cannot be a block",
            info.path
        )));
    }
    let (attributes, blocks, has_blocks) = render_object(ctx, &info.path, ty)?;

    if let Some(variant) = block.filter(|_| info.block) {
        let variant = ident(variant);
        let description = &info.description;
        return Ok(SchemaEntry::Block(quote! {
            #rt::schema::Block::#variant(#rt::schema::NestedBlock {
                description: ::std::string::String::from(#description),
                attributes: #attributes,
                blocks: #blocks,
            })
        }));
    }
    if has_blocks {
        return Err(CodegenError::BlockOnAttribute {
            path: info.path.clone(),
        });
    }

    let variant = ident(attribute);
    let flags = flags(&rt, info);
    Ok(SchemaEntry::Attribute(quote! {
        #rt::schema::Attribute::#variant(#rt::schema::NestedAttribute {
            flags: #flags,
            attributes: #attributes,
        })
    }))
}

fn map_expr(entries: &[TokenStream]) -> TokenStream {
    if entries.is_empty() {
        quote!(::std::collections::BTreeMap::new())
    } else {
        quote!(::std::collections::BTreeMap::from([#(#entries),*]))
    }
}

/// Builds a leaf attribute expression such as `Attribute::Int64(..)`.
pub(crate) fn primitive(
    ctx: &Context<'_>,
    variant: &str,
    info: &FieldInformation,
) -> TokenStream {
    let rt = ctx.runtime();
    let variant = ident(variant);
    let flags = flags(&rt, info);
    let default = info.default.as_ref().map(|default| {
        quote!(default: ::core::option::Option::Some(#rt::schema::DefaultValue::from(#default)),)
    });
    let validators = info
        .validators
        .as_ref()
        .map(|validators| quote!(validators: #validators,));
    quote! {
        #rt::schema::Attribute::#variant(#rt::schema::PrimitiveAttribute {
            flags: #flags,
            #default
            #validators
            ..::core::default::Default::default()
        })
    }
}
