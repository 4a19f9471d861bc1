//! # tfgen Codegen
//!
//! Type directed synthesis of Terraform provider glue code.
//!
//! This crate provides:
//! - Wire model generation for native Rust structs
//! - Decode and encode procedure generation with diagnostics
//! - Schema builder generation for providers, resources and data sources
//! - A pluggable converter registry and field metadata provider
//! - Build script integration

pub mod context;
pub mod converters;
pub mod error;
pub mod generator;
pub mod names;
pub mod rust;
pub mod walker;

pub use context::{Access, Context, SchemaEntry};
pub use converters::{AttributeConverter, Registry};
pub use error::CodegenError;
pub use generator::{DEFAULT_RUNTIME_PATH, GeneratedModels, Generator, GeneratorOptions};
pub use names::{NameTable, TypeNames};
pub use tfgen_runtime::schema::SchemaKind;
pub use walker::FieldList;

use tfgen_types::SourceSet;

/// Generates models and conversion procedures from Rust source.
///
/// # Arguments
/// * `namespace` - Module path the source is reachable at from the generated code
/// * `source` - Rust source declaring the native types
/// * `roots` - `(name, type)` pairs, the type given as a short name or a path
///
/// # Returns
/// Generated Rust code as a string.
///
/// # Errors
/// Returns `CodegenError` if parsing, type lookup or generation fails.
pub fn generate_from_source(
    namespace: &str,
    source: &str,
    roots: &[(&str, &str)],
) -> Result<String, CodegenError> {
    let mut set = SourceSet::new();
    set.add_source(namespace, source)?;
    let graph = set.build()?;

    let mut generator = Generator::new(&graph);
    for (name, ty) in roots {
        generator = generator.root(*name, graph.find(ty)?);
    }
    Ok(generator.generate_models()?.to_string())
}

/// Generates models and conversion procedures from a Rust source file.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing or generation fails.
pub fn generate_from_file(
    namespace: &str,
    path: &std::path::Path,
    roots: &[(&str, &str)],
) -> Result<String, CodegenError> {
    let source = std::fs::read_to_string(path)?;
    generate_from_source(namespace, &source, roots)
}
