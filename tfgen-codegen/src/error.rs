//! Error types for code generation.

use thiserror::Error;
use tfgen_types::{FieldError, SourceError};

/// Error type for code generation operations.
///
/// Every variant is fatal to the generation run.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// No registered converter accepts a type.
    #[error("no converter found for {type_name}")]
    NoConverterFound {
        /// Rendered type.
        type_name: String,
    },

    /// Two distinct types reduce to the same name after qualification.
    #[error("naming conflict: '{name}' is already used by another type")]
    NamingConflict {
        /// Conflicting name.
        name: String,
    },

    /// A promoted field was found inside a promoted field.
    #[error("multiple attribute levels have been promoted at '{path}'")]
    MultiplePromotion {
        /// Path of the offending field.
        path: String,
    },

    /// A type expected to be a struct is not one.
    #[error("expected a struct, got {type_name}")]
    NotAStruct {
        /// Rendered type.
        type_name: String,
    },

    /// A nested type holds blocks but the field is not a block.
    #[error("'{path}': got blocks but this is an attribute")]
    BlockOnAttribute {
        /// Field path.
        path: String,
    },

    /// The same root name was supplied twice.
    #[error("root '{name}' has been given multiple time")]
    DuplicateRootName {
        /// Root name.
        name: String,
    },

    /// A converter produced no code.
    #[error("no code received from {converter} for {type_name} in {operation}")]
    EmptyArtifact {
        /// Converter name.
        converter: String,
        /// Rendered type.
        type_name: String,
        /// Operation that was requested.
        operation: String,
    },

    /// A type reaches itself while building a nested schema.
    #[error("recursive schema at '{path}'")]
    RecursiveSchema {
        /// Field path.
        path: String,
    },

    /// The field metadata provider failed.
    #[error("field '{path}': {source}")]
    Field {
        /// Field path.
        path: String,
        /// Provider error.
        #[source]
        source: FieldError,
    },

    /// Source loading error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// The configured runtime path is not a Rust path.
    #[error("invalid runtime path '{path}': {source}")]
    InvalidRuntimePath {
        /// Configured path.
        path: String,
        /// Parser error.
        #[source]
        source: syn::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Creates a no converter error.
    pub fn no_converter(type_name: impl Into<String>) -> Self {
        Self::NoConverterFound {
            type_name: type_name.into(),
        }
    }

    /// Creates a not a struct error.
    pub fn not_a_struct(type_name: impl Into<String>) -> Self {
        Self::NotAStruct {
            type_name: type_name.into(),
        }
    }
}
