//! # tfgen Types
//!
//! Native type model and field metadata for the tfgen code generator.
//!
//! This crate provides:
//! - The [`TypeGraph`] arena describing every native type a run can see
//! - The `terraform` tag grammar and the field metadata provider seam
//! - A `syn` based loader building a type graph from Rust source
//! - Identifier case helpers shared with the generator

pub mod case;
pub mod error;
pub mod graph;
pub mod source;
pub mod tags;

pub use case::{to_pascal_case, to_snake_case};
pub use error::{FieldError, SourceError};
pub use graph::{
    FloatKind, IntKind, StructDef, StructField, TypeGraph, TypeId, TypeKind, qualify,
};
pub use source::SourceSet;
pub use tags::{FieldInformation, FieldInformationProvider, TAG_ATTRIBUTE, Tag, TagProvider};
