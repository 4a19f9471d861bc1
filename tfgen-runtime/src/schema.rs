//! Schema descriptors.
//!
//! A [`Schema`] maps attribute names to [`Attribute`] descriptors and block
//! names to [`Block`] descriptors. A name appears in at most one of the two
//! maps.

use crate::types::ElementType;
use std::collections::BTreeMap;

/// What a schema describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SchemaKind {
    /// Provider configuration.
    Provider,
    /// Data source.
    DataSource,
    /// Managed resource.
    #[default]
    Resource,
    /// Provider metadata.
    ProviderMeta,
}

/// Top level schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    /// What the schema describes.
    pub kind: SchemaKind,
    /// Description.
    pub description: String,
    /// Attributes by name.
    pub attributes: BTreeMap<String, Attribute>,
    /// Blocks by name.
    pub blocks: BTreeMap<String, Block>,
}

impl Schema {
    /// Returns an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Returns a block by name.
    #[must_use]
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.get(name)
    }
}

/// Constraint flags shared by every attribute.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeFlags {
    /// The practitioner may set the attribute.
    pub optional: bool,
    /// The practitioner must set the attribute.
    pub required: bool,
    /// The provider may set the attribute.
    pub computed: bool,
    /// The value is hidden from output.
    pub sensitive: bool,
    /// Description.
    pub description: String,
}

/// Default value of a primitive attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Boolean default.
    Bool(bool),
    /// Integer default.
    Int64(i64),
    /// Float default.
    Float64(f64),
    /// String default.
    String(String),
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Value validator attached to a primitive attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    /// String length within bounds.
    LengthBetween {
        /// Minimum length.
        min: usize,
        /// Maximum length.
        max: usize,
    },
    /// Value is one of the listed strings.
    OneOf(Vec<String>),
    /// Number is at least the bound.
    AtLeast(f64),
    /// Number is at most the bound.
    AtMost(f64),
}

/// Primitive attribute.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrimitiveAttribute {
    /// Constraint flags.
    pub flags: AttributeFlags,
    /// Default value.
    pub default: Option<DefaultValue>,
    /// Validators.
    pub validators: Vec<Validator>,
}

/// List or map of primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionAttribute {
    /// Constraint flags.
    pub flags: AttributeFlags,
    /// Element type.
    pub element_type: ElementType,
}

/// Attribute holding nested attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NestedAttribute {
    /// Constraint flags.
    pub flags: AttributeFlags,
    /// Nested attributes by name.
    pub attributes: BTreeMap<String, Attribute>,
}

/// Attribute descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// Boolean.
    Bool(PrimitiveAttribute),
    /// 64-bit integer.
    Int64(PrimitiveAttribute),
    /// 64-bit float.
    Float64(PrimitiveAttribute),
    /// String.
    String(PrimitiveAttribute),
    /// List of primitives.
    List(CollectionAttribute),
    /// Map of primitives.
    Map(CollectionAttribute),
    /// List of nested objects.
    ListNested(NestedAttribute),
    /// Map of nested objects.
    MapNested(NestedAttribute),
    /// Single nested object.
    SingleNested(NestedAttribute),
}

impl Attribute {
    /// Returns the constraint flags.
    #[must_use]
    pub fn flags(&self) -> &AttributeFlags {
        match self {
            Self::Bool(a) | Self::Int64(a) | Self::Float64(a) | Self::String(a) => &a.flags,
            Self::List(a) | Self::Map(a) => &a.flags,
            Self::ListNested(a) | Self::MapNested(a) | Self::SingleNested(a) => &a.flags,
        }
    }

    /// Returns the nested attributes of a nested attribute.
    #[must_use]
    pub fn nested(&self) -> Option<&BTreeMap<String, Attribute>> {
        match self {
            Self::ListNested(a) | Self::MapNested(a) | Self::SingleNested(a) => {
                Some(&a.attributes)
            }
            _ => None,
        }
    }

    /// Returns true if the attribute is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.flags().required
    }
}

/// Block holding nested attributes and blocks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NestedBlock {
    /// Description.
    pub description: String,
    /// Nested attributes by name.
    pub attributes: BTreeMap<String, Attribute>,
    /// Nested blocks by name.
    pub blocks: BTreeMap<String, Block>,
}

/// Block descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Repeated block.
    ListNested(NestedBlock),
    /// Single block.
    SingleNested(NestedBlock),
}

impl Block {
    /// Returns the block body.
    #[must_use]
    pub fn body(&self) -> &NestedBlock {
        match self {
            Self::ListNested(block) | Self::SingleNested(block) => block,
        }
    }
}
