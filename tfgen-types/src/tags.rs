//! Field metadata and the `terraform` tag grammar.
//!
//! A tag is a comma separated list whose first token is the wire name of the
//! field (or `-` for a promoted field) followed by modifiers:
//!
//! ```text
//! #[terraform("name,required,sensitive")]
//! #[terraform("-,promoted")]
//! ```
//!
//! Each modifier may appear at most once. When neither `required` nor
//! `computed` is given the field is optional.

use crate::error::FieldError;
use crate::graph::{StructField, TypeId};
use proc_macro2::TokenStream;

/// Name of the attribute carrying a field tag.
pub const TAG_ATTRIBUTE: &str = "terraform";

/// Parsed tag string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    /// Wire name, empty for promoted fields.
    pub name: String,
    /// `sensitive` modifier.
    pub sensitive: bool,
    /// `promoted` modifier.
    pub promoted: bool,
    /// `optional` modifier, or implied.
    pub optional: bool,
    /// `required` modifier.
    pub required: bool,
    /// `computed` modifier.
    pub computed: bool,
    /// `block` modifier.
    pub block: bool,
}

impl Tag {
    /// Parses a tag string.
    ///
    /// # Errors
    /// Returns a `FieldError` for repeated or unknown modifiers and for a
    /// promoted field whose name is not `-`.
    pub fn parse(tag: &str) -> Result<Self, FieldError> {
        let mut tokens = tag.split(',');
        let mut result = Self {
            name: tokens.next().unwrap_or_default().to_string(),
            ..Self::default()
        };

        for modifier in tokens {
            let slot = match modifier {
                "sensitive" => &mut result.sensitive,
                "promoted" => &mut result.promoted,
                "optional" => &mut result.optional,
                "required" => &mut result.required,
                "computed" => &mut result.computed,
                "block" => &mut result.block,
                other => {
                    return Err(FieldError::UnknownModifier {
                        modifier: other.to_string(),
                    });
                }
            };
            if *slot {
                return Err(FieldError::duplicate(modifier));
            }
            *slot = true;

            if modifier == "promoted" {
                if result.name != "-" {
                    return Err(FieldError::PromotedName { name: result.name });
                }
                result.name.clear();
            }
        }

        if !result.required && !result.computed {
            result.optional = true;
        }

        Ok(result)
    }
}

/// Everything the generator knows about one field.
#[derive(Debug, Clone)]
pub struct FieldInformation {
    /// Wire name.
    pub name: String,
    /// Dotted path from the root, set by the walker.
    pub path: String,
    /// Optional constraint.
    pub optional: bool,
    /// Required constraint.
    pub required: bool,
    /// Computed constraint.
    pub computed: bool,
    /// Sensitive flag.
    pub sensitive: bool,
    /// Human readable description.
    pub description: String,
    /// Whether nested structures are emitted as blocks.
    pub block: bool,
    /// Default value expression inserted in the schema.
    pub default: Option<TokenStream>,
    /// Validator list expression inserted in the schema.
    pub validators: Option<TokenStream>,
    /// Whether the field's members are flattened into its parent.
    pub promoted: bool,
    /// Index of the enclosing promoted field in the walk.
    pub parent: Option<usize>,
    /// Rust identifier of the field.
    pub ident: String,
    /// Field chain leading to this field from the walked type.
    pub accessor: Vec<String>,
    /// Native type of the field.
    pub field_type: TypeId,
}

impl FieldInformation {
    /// Builds field information from a parsed tag.
    #[must_use]
    pub fn from_tag(tag: Tag, field: &StructField) -> Self {
        Self {
            name: tag.name,
            path: String::new(),
            optional: tag.optional,
            required: tag.required,
            computed: tag.computed,
            sensitive: tag.sensitive,
            description: field.docs.clone().unwrap_or_default(),
            block: tag.block,
            default: None,
            validators: None,
            promoted: tag.promoted,
            parent: None,
            ident: field.ident.clone(),
            accessor: vec![field.ident.clone()],
            field_type: field.ty,
        }
    }

    /// Attaches a default value expression.
    #[must_use]
    pub fn with_default(mut self, default: TokenStream) -> Self {
        self.default = Some(default);
        self
    }

    /// Attaches a validator list expression.
    #[must_use]
    pub fn with_validators(mut self, validators: TokenStream) -> Self {
        self.validators = Some(validators);
        self
    }
}

/// Source of field metadata.
///
/// Returning `Ok(None)` skips the field.
pub trait FieldInformationProvider {
    /// Describes one field found at `path`.
    ///
    /// # Errors
    /// Returns a `FieldError` if the field metadata is malformed.
    fn provide(
        &self,
        path: &str,
        field: &StructField,
    ) -> Result<Option<FieldInformation>, FieldError>;
}

impl<F> FieldInformationProvider for F
where
    F: Fn(&str, &StructField) -> Result<Option<FieldInformation>, FieldError>,
{
    fn provide(
        &self,
        path: &str,
        field: &StructField,
    ) -> Result<Option<FieldInformation>, FieldError> {
        self(path, field)
    }
}

/// Default provider reading the `terraform` tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagProvider;

impl FieldInformationProvider for TagProvider {
    fn provide(
        &self,
        _path: &str,
        field: &StructField,
    ) -> Result<Option<FieldInformation>, FieldError> {
        let Some(tag) = field.tag.as_deref() else {
            return Ok(None);
        };
        let tag = Tag::parse(tag)?;
        Ok(Some(FieldInformation::from_tag(tag, field)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TypeGraph;
    use pretty_assertions::assert_eq;
    use quote::quote;

    #[test]
    fn test_parse_name_only_is_optional() {
        let tag = Tag::parse("teaser").expect("Failed to parse");
        assert_eq!(
            tag,
            Tag {
                name: "teaser".to_string(),
                optional: true,
                ..Tag::default()
            }
        );
    }

    #[test]
    fn test_parse_modifiers() {
        let tag = Tag::parse("password,required,sensitive").expect("Failed to parse");
        assert!(tag.required);
        assert!(tag.sensitive);
        assert!(!tag.optional);

        let tag = Tag::parse("id,computed").expect("Failed to parse");
        assert!(tag.computed);
        assert!(!tag.optional);

        let tag = Tag::parse("id,optional,computed").expect("Failed to parse");
        assert!(tag.optional);
        assert!(tag.computed);
    }

    #[test]
    fn test_parse_promoted() {
        let tag = Tag::parse("-,promoted").expect("Failed to parse");
        assert!(tag.promoted);
        assert!(tag.name.is_empty());

        let err = Tag::parse("inner,promoted").unwrap_err();
        assert_eq!(
            err,
            FieldError::PromotedName {
                name: "inner".to_string()
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        let err = Tag::parse("name,block,block").unwrap_err();
        assert_eq!(err.to_string(), "block modifier given multiple time");

        let err = Tag::parse("name,secret").unwrap_err();
        assert_eq!(
            err,
            FieldError::UnknownModifier {
                modifier: "secret".to_string()
            }
        );
    }

    #[test]
    fn test_tag_provider() {
        let mut graph = TypeGraph::new();
        let ty = graph.string();

        let untagged = StructField::new("internal", ty);
        assert!(
            TagProvider
                .provide("coffee", &untagged)
                .expect("Failed to provide")
                .is_none()
        );

        let tagged = StructField::new("name", ty)
            .with_tag("name,required")
            .with_docs("Name of the coffee.");
        let info = TagProvider
            .provide("coffee", &tagged)
            .expect("Failed to provide")
            .expect("Field should not be skipped");
        assert_eq!(info.name, "name");
        assert_eq!(info.ident, "name");
        assert_eq!(info.accessor, vec!["name".to_string()]);
        assert_eq!(info.description, "Name of the coffee.");
        assert!(info.required);
        assert_eq!(info.field_type, ty);
    }

    #[test]
    fn test_closure_provider_wraps_default() {
        let mut graph = TypeGraph::new();
        let ty = graph.int(crate::graph::IntKind::I64);
        let field = StructField::new("port", ty).with_tag("port");

        let provider = |path: &str,
                        field: &StructField|
         -> Result<Option<FieldInformation>, FieldError> {
            Ok(TagProvider
                .provide(path, field)?
                .map(|info| info.with_default(quote!(8080))))
        };
        let info = provider
            .provide("server", &field)
            .expect("Failed to provide")
            .expect("Field should not be skipped");
        assert_eq!(
            info.default.map(|d| d.to_string()),
            Some("8080".to_string())
        );
    }
}
