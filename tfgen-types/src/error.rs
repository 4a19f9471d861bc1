//! Error types for source loading and field tag parsing.

use thiserror::Error;

/// Error type for building a type graph from Rust source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Rust syntax error.
    #[error("syntax error in '{namespace}': {source}")]
    Syntax {
        /// Module path the source was registered under.
        namespace: String,
        /// Underlying parser error.
        #[source]
        source: syn::Error,
    },

    /// Duplicate definition.
    #[error("duplicate type definition: '{path}'")]
    DuplicateDefinition {
        /// Qualified path of the duplicate.
        path: String,
    },

    /// Malformed field attribute.
    #[error("invalid attribute on field '{field}': {message}")]
    InvalidAttribute {
        /// Qualified field path.
        field: String,
        /// Error message.
        message: String,
    },

    /// Type lookup by name failed.
    #[error("unknown type '{name}'")]
    UnknownType {
        /// Name or path that was looked up.
        name: String,
    },

    /// Type lookup by short name matched several types.
    #[error("ambiguous type name '{name}': {candidates}")]
    AmbiguousType {
        /// Short name that was looked up.
        name: String,
        /// Comma separated qualified candidates.
        candidates: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type for field metadata extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A modifier appeared more than once in the same tag.
    #[error("{modifier} modifier given multiple time")]
    DuplicateModifier {
        /// Modifier name.
        modifier: String,
    },

    /// A promoted field did not use `-` as its name.
    #[error("the name must be \"-\" when a field is promoted, got '{name}'")]
    PromotedName {
        /// Name token found in the tag.
        name: String,
    },

    /// Unknown modifier.
    #[error("unknown modifier '{modifier}'")]
    UnknownModifier {
        /// Modifier name.
        modifier: String,
    },

    /// Error raised by a caller supplied provider.
    #[error("{message}")]
    Custom {
        /// Error message.
        message: String,
    },
}

impl SourceError {
    /// Creates a duplicate definition error.
    pub fn duplicate(path: impl Into<String>) -> Self {
        Self::DuplicateDefinition { path: path.into() }
    }

    /// Creates an unknown type error.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }
}

impl FieldError {
    /// Creates a duplicate modifier error.
    pub fn duplicate(modifier: impl Into<String>) -> Self {
        Self::DuplicateModifier {
            modifier: modifier.into(),
        }
    }

    /// Creates a custom provider error.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }
}
