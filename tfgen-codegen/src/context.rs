//! Per-run synthesis state.
//!
//! A [`Context`] is created once per generation run. It owns the name table,
//! hands out fresh local identifiers and dispatches every per-type operation
//! to the converter selected from the registry.

use crate::converters::{AttributeConverter, Registry};
use crate::error::CodegenError;
use crate::names::{NameTable, TypeNames};
use crate::walker::{self, FieldList};
use proc_macro2::{Ident, Span, TokenStream};
use quote::{ToTokens, format_ident, quote};
use tfgen_types::{FieldInformation, FieldInformationProvider, TypeGraph, TypeId, TypeKind};

/// Places a conversion statement reads from and writes to.
///
/// `src` and `target` are place expressions. `path` is an expression
/// producing the owned `Path` of the value, evaluated only when a
/// diagnostic is recorded.
#[derive(Debug, Clone)]
pub struct Access {
    /// Place the value is read from.
    pub src: TokenStream,
    /// Place the value is written to.
    pub target: TokenStream,
    /// Attribute path expression.
    pub path: TokenStream,
}

impl Access {
    /// Creates a new access triple.
    #[must_use]
    pub fn new(src: TokenStream, target: TokenStream, path: TokenStream) -> Self {
        Self { src, target, path }
    }
}

/// Schema descriptor produced for one field.
#[derive(Debug, Clone)]
pub enum SchemaEntry {
    /// Expression of type `schema::Attribute`.
    Attribute(TokenStream),
    /// Expression of type `schema::Block`.
    Block(TokenStream),
}

impl SchemaEntry {
    /// Returns the descriptor expression.
    #[must_use]
    pub fn tokens(&self) -> &TokenStream {
        match self {
            Self::Attribute(tokens) | Self::Block(tokens) => tokens,
        }
    }
}

/// Synthesis state shared by every converter during one run.
pub struct Context<'a> {
    graph: &'a TypeGraph,
    registry: &'a Registry,
    provider: &'a dyn FieldInformationProvider,
    names: NameTable,
    runtime: TokenStream,
    counter: usize,
    schema_stack: Vec<TypeId>,
}

impl<'a> Context<'a> {
    /// Creates a context for one run.
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidRuntimePath` if `runtime_path` is not a
    /// Rust path.
    pub fn new(
        graph: &'a TypeGraph,
        registry: &'a Registry,
        provider: &'a dyn FieldInformationProvider,
        runtime_path: &str,
    ) -> Result<Self, CodegenError> {
        let runtime = syn::parse_str::<syn::Path>(runtime_path)
            .map_err(|source| CodegenError::InvalidRuntimePath {
                path: runtime_path.to_string(),
                source,
            })?
            .to_token_stream();
        Ok(Self {
            graph,
            registry,
            provider,
            names: NameTable::new(),
            runtime,
            counter: 0,
            schema_stack: Vec::new(),
        })
    }

    /// Returns the type graph.
    #[must_use]
    pub fn graph(&self) -> &'a TypeGraph {
        self.graph
    }

    /// Returns the runtime crate path.
    #[must_use]
    pub fn runtime(&self) -> TokenStream {
        self.runtime.clone()
    }

    /// Returns the name table.
    pub fn names(&mut self) -> &mut NameTable {
        &mut self.names
    }

    /// Returns the names of a struct, assigning them on first use.
    ///
    /// # Errors
    /// See [`NameTable::resolve`].
    pub fn names_for(&mut self, ty: TypeId) -> Result<TypeNames, CodegenError> {
        self.names.resolve(self.graph, ty)
    }

    /// Walks the fields of a struct.
    ///
    /// # Errors
    /// See [`walker::walk`].
    pub fn fields(&self, path: &str, ty: TypeId) -> Result<FieldList, CodegenError> {
        walker::walk(self.graph, self.provider, path, ty)
    }

    /// Returns a local identifier not used before in this run.
    pub fn fresh(&mut self, base: &str) -> Ident {
        self.counter += 1;
        format_ident!("{}_{}", base, self.counter)
    }

    /// Selects the converter for `ty`.
    ///
    /// # Errors
    /// Returns `CodegenError::NoConverterFound` if no converter accepts `ty`.
    pub fn converter(&self, ty: TypeId) -> Result<&'a dyn AttributeConverter, CodegenError> {
        let registry = self.registry;
        let converter = registry.select(self.graph, ty)?;
        tracing::trace!(
            "Selected {} for {}",
            converter.name(),
            self.graph.describe(ty)
        );
        Ok(converter)
    }

    /// Returns the wire type of `ty`.
    ///
    /// # Errors
    /// Returns an error if no converter accepts `ty` or the converter fails.
    pub fn wire_type(&mut self, ty: TypeId) -> Result<TokenStream, CodegenError> {
        let converter = self.converter(ty)?;
        let tokens = converter.wire_type(self, ty)?;
        self.non_empty(converter, ty, "wire_type", tokens)
    }

    /// Returns the statement decoding `access.src` into `access.target`.
    ///
    /// # Errors
    /// Returns an error if no converter accepts `ty` or the converter fails.
    pub fn decode(&mut self, ty: TypeId, access: &Access) -> Result<TokenStream, CodegenError> {
        let converter = self.converter(ty)?;
        let tokens = converter.decode(self, ty, access)?;
        self.non_empty(converter, ty, "decode", tokens)
    }

    /// Returns the statement encoding `access.src` into `access.target`.
    ///
    /// # Errors
    /// Returns an error if no converter accepts `ty` or the converter fails.
    pub fn encode(&mut self, ty: TypeId, access: &Access) -> Result<TokenStream, CodegenError> {
        let converter = self.converter(ty)?;
        let tokens = converter.encode(self, ty, access)?;
        self.non_empty(converter, ty, "encode", tokens)
    }

    /// Returns the schema descriptor of a field.
    ///
    /// # Errors
    /// Returns an error if no converter accepts the field type or the
    /// converter fails.
    pub fn schema(&mut self, info: &FieldInformation) -> Result<SchemaEntry, CodegenError> {
        let ty = info.field_type;
        let converter = self.converter(ty)?;
        let entry = converter.schema(self, ty, info)?;
        if entry.tokens().is_empty() {
            return Err(self.empty(converter, ty, "schema"));
        }
        Ok(entry)
    }

    /// Returns the collection element type of `ty`, if it has a primitive one.
    ///
    /// # Errors
    /// Returns an error if no converter accepts `ty`.
    pub fn element_type(&mut self, ty: TypeId) -> Result<Option<TokenStream>, CodegenError> {
        let converter = self.converter(ty)?;
        converter.element_type(self, ty)
    }

    /// Marks the start of a nested schema for `ty`.
    ///
    /// # Errors
    /// Returns `CodegenError::RecursiveSchema` if `ty` is already being
    /// synthesised.
    pub fn enter_schema(&mut self, ty: TypeId, path: &str) -> Result<(), CodegenError> {
        if self.schema_stack.contains(&ty) {
            return Err(CodegenError::RecursiveSchema {
                path: path.to_string(),
            });
        }
        self.schema_stack.push(ty);
        Ok(())
    }

    /// Marks the end of the innermost nested schema.
    pub fn leave_schema(&mut self) {
        self.schema_stack.pop();
    }

    /// Returns the native Rust type of `ty`.
    ///
    /// # Errors
    /// Returns `CodegenError::Generation` if a named or opaque type does not
    /// parse back as Rust.
    pub fn native_type(&self, ty: TypeId) -> Result<TokenStream, CodegenError> {
        let rt = &self.runtime;
        let tokens = match self.graph.kind(ty) {
            TypeKind::Bool => quote!(bool),
            TypeKind::Int(kind) => ident(kind.rust_name()).to_token_stream(),
            TypeKind::Float(kind) => ident(kind.rust_name()).to_token_stream(),
            TypeKind::String => quote!(::std::string::String),
            TypeKind::Duration => quote!(::std::time::Duration),
            TypeKind::Timestamp => quote!(#rt::chrono::DateTime<#rt::chrono::Utc>),
            TypeKind::Dynamic => quote!(#rt::serde_json::Value),
            TypeKind::Option(inner) => {
                let inner = self.native_type(*inner)?;
                quote!(::core::option::Option<#inner>)
            }
            TypeKind::Vec(inner) => {
                let inner = self.native_type(*inner)?;
                quote!(::std::vec::Vec<#inner>)
            }
            TypeKind::Map {
                key,
                value,
                ordered,
            } => {
                let key = self.native_type(*key)?;
                let value = self.native_type(*value)?;
                if *ordered {
                    quote!(::std::collections::BTreeMap<#key, #value>)
                } else {
                    quote!(::std::collections::HashMap<#key, #value>)
                }
            }
            TypeKind::Newtype { .. } | TypeKind::Struct(_) => {
                let path = self.graph.qualified_path(ty).unwrap_or_default();
                syn::parse_str::<syn::Path>(&path)
                    .map_err(|e| CodegenError::generation(format!("bad type path '{path}': {e}")))?
                    .to_token_stream()
            }
            TypeKind::Opaque(display) => syn::parse_str::<syn::Type>(display)
                .map_err(|e| CodegenError::generation(format!("bad type '{display}': {e}")))?
                .to_token_stream(),
        };
        Ok(tokens)
    }

    fn non_empty(
        &self,
        converter: &dyn AttributeConverter,
        ty: TypeId,
        operation: &str,
        tokens: TokenStream,
    ) -> Result<TokenStream, CodegenError> {
        if tokens.is_empty() {
            return Err(self.empty(converter, ty, operation));
        }
        Ok(tokens)
    }

    fn empty(&self, converter: &dyn AttributeConverter, ty: TypeId, operation: &str) -> CodegenError {
        CodegenError::EmptyArtifact {
            converter: converter.name().to_string(),
            type_name: self.graph.describe(ty),
            operation: operation.to_string(),
        }
    }
}

/// Builds an identifier, accepting the `r#` raw prefix.
#[must_use]
pub fn ident(name: &str) -> Ident {
    match name.strip_prefix("r#") {
        Some(raw) => Ident::new_raw(raw, Span::call_site()),
        None => Ident::new(name, Span::call_site()),
    }
}

/// Builds `base.a.b` from an accessor chain.
#[must_use]
pub fn accessor(base: &TokenStream, chain: &[String]) -> TokenStream {
    let idents = chain.iter().map(|segment| ident(segment));
    quote!(#base #(.#idents)*)
}
