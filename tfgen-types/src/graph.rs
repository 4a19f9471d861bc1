//! Native type graph.
//!
//! Every type a generation run can see lives in a [`TypeGraph`] arena and is
//! referred to by a copyable [`TypeId`]. Anonymous kinds (`Vec<i64>`,
//! `Option<String>`, ...) are interned structurally so that the same shape
//! always has the same identity; named kinds (structs and newtypes) are keyed
//! by their qualified path.

use crate::error::SourceError;
use std::collections::HashMap;
use std::fmt;

/// Stable identity of a type inside a [`TypeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    /// Returns the arena index of this type.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Integer widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// Pointer sized signed integer.
    Isize,
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 16-bit integer.
    U16,
    /// Unsigned 32-bit integer.
    U32,
    /// Unsigned 64-bit integer.
    U64,
    /// Pointer sized unsigned integer.
    Usize,
}

impl IntKind {
    /// Returns the Rust primitive name.
    #[must_use]
    pub const fn rust_name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
        }
    }

    /// Parses a Rust primitive name.
    #[must_use]
    pub fn from_rust_name(name: &str) -> Option<Self> {
        match name {
            "i8" => Some(Self::I8),
            "i16" => Some(Self::I16),
            "i32" => Some(Self::I32),
            "i64" => Some(Self::I64),
            "isize" => Some(Self::Isize),
            "u8" => Some(Self::U8),
            "u16" => Some(Self::U16),
            "u32" => Some(Self::U32),
            "u64" => Some(Self::U64),
            "usize" => Some(Self::Usize),
            _ => None,
        }
    }

    /// Returns true if this is already the 64-bit wire width.
    #[must_use]
    pub const fn is_i64(self) -> bool {
        matches!(self, Self::I64)
    }

    /// Returns true when `i64::from` accepts this width.
    #[must_use]
    pub const fn widens_to_i64(self) -> bool {
        !matches!(self, Self::Isize | Self::U64 | Self::Usize)
    }
}

/// Float widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
}

impl FloatKind {
    /// Returns the Rust primitive name.
    #[must_use]
    pub const fn rust_name(self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Parses a Rust primitive name.
    #[must_use]
    pub fn from_rust_name(name: &str) -> Option<Self> {
        match name {
            "f32" => Some(Self::F32),
            "f64" => Some(Self::F64),
            _ => None,
        }
    }
}

/// A named field of a struct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructField {
    /// Rust identifier of the field.
    pub ident: String,
    /// Field type.
    pub ty: TypeId,
    /// Raw tag string, if the field carries one.
    pub tag: Option<String>,
    /// Doc comment text.
    pub docs: Option<String>,
}

impl StructField {
    /// Creates an untagged field.
    #[must_use]
    pub fn new(ident: impl Into<String>, ty: TypeId) -> Self {
        Self {
            ident: ident.into(),
            ty,
            tag: None,
            docs: None,
        }
    }

    /// Sets the tag string.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Sets the doc comment.
    #[must_use]
    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }
}

/// Struct definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructDef {
    /// Declared name.
    pub name: String,
    /// Module path the struct lives in.
    pub namespace: String,
    /// Fields in declaration order.
    pub fields: Vec<StructField>,
}

/// Kind of a type in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `bool`.
    Bool,
    /// Integer of the given width.
    Int(IntKind),
    /// Float of the given width.
    Float(FloatKind),
    /// `String`.
    String,
    /// `std::time::Duration`.
    Duration,
    /// `chrono::DateTime<Utc>`.
    Timestamp,
    /// `serde_json::Value`.
    Dynamic,
    /// `Option<T>`.
    Option(TypeId),
    /// `Vec<T>`.
    Vec(TypeId),
    /// `HashMap<K, V>` or, when `ordered`, `BTreeMap<K, V>`.
    Map {
        /// Key type.
        key: TypeId,
        /// Value type.
        value: TypeId,
        /// Whether the map is a `BTreeMap`.
        ordered: bool,
    },
    /// Single field tuple struct.
    Newtype {
        /// Declared name.
        name: String,
        /// Module path.
        namespace: String,
        /// Wrapped type.
        inner: TypeId,
    },
    /// Struct with named fields.
    Struct(StructDef),
    /// Any other type, kept by its textual form.
    Opaque(String),
}

/// Arena of native types.
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    kinds: Vec<TypeKind>,
    interned: HashMap<TypeKind, TypeId>,
    named: HashMap<String, TypeId>,
}

impl TypeGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of types in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns true if the graph holds no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    fn push(&mut self, kind: TypeKind) -> TypeId {
        let id = TypeId(self.kinds.len() as u32);
        self.kinds.push(kind);
        id
    }

    fn intern(&mut self, kind: TypeKind) -> TypeId {
        if let Some(&id) = self.interned.get(&kind) {
            return id;
        }
        let id = self.push(kind.clone());
        self.interned.insert(kind, id);
        id
    }

    /// Returns the `bool` type.
    pub fn bool(&mut self) -> TypeId {
        self.intern(TypeKind::Bool)
    }

    /// Returns an integer type.
    pub fn int(&mut self, kind: IntKind) -> TypeId {
        self.intern(TypeKind::Int(kind))
    }

    /// Returns a float type.
    pub fn float(&mut self, kind: FloatKind) -> TypeId {
        self.intern(TypeKind::Float(kind))
    }

    /// Returns the `String` type.
    pub fn string(&mut self) -> TypeId {
        self.intern(TypeKind::String)
    }

    /// Returns the `Duration` type.
    pub fn duration(&mut self) -> TypeId {
        self.intern(TypeKind::Duration)
    }

    /// Returns the `DateTime<Utc>` type.
    pub fn timestamp(&mut self) -> TypeId {
        self.intern(TypeKind::Timestamp)
    }

    /// Returns the `serde_json::Value` type.
    pub fn dynamic(&mut self) -> TypeId {
        self.intern(TypeKind::Dynamic)
    }

    /// Returns `Option<inner>`.
    pub fn option(&mut self, inner: TypeId) -> TypeId {
        self.intern(TypeKind::Option(inner))
    }

    /// Returns `Vec<inner>`.
    pub fn vec(&mut self, inner: TypeId) -> TypeId {
        self.intern(TypeKind::Vec(inner))
    }

    /// Returns `Vec<u8>`.
    pub fn bytes(&mut self) -> TypeId {
        let byte = self.int(IntKind::U8);
        self.vec(byte)
    }

    /// Returns `HashMap<key, value>`.
    pub fn map(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(TypeKind::Map {
            key,
            value,
            ordered: false,
        })
    }

    /// Returns `BTreeMap<key, value>`.
    pub fn btree_map(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(TypeKind::Map {
            key,
            value,
            ordered: true,
        })
    }

    /// Returns an opaque type identified by its textual form.
    pub fn opaque(&mut self, display: impl Into<String>) -> TypeId {
        self.intern(TypeKind::Opaque(display.into()))
    }

    /// Declares a struct without fields.
    ///
    /// # Errors
    /// Returns `SourceError::DuplicateDefinition` if the qualified path is
    /// already declared.
    pub fn declare_struct(
        &mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<TypeId, SourceError> {
        let def = StructDef {
            name: name.into(),
            namespace: namespace.into(),
            fields: Vec::new(),
        };
        let path = qualify(&def.namespace, &def.name);
        self.declare_named(path, TypeKind::Struct(def))
    }

    /// Declares a single field tuple struct around `inner`.
    ///
    /// # Errors
    /// Returns `SourceError::DuplicateDefinition` if the qualified path is
    /// already declared.
    pub fn declare_newtype(
        &mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        inner: TypeId,
    ) -> Result<TypeId, SourceError> {
        let namespace = namespace.into();
        let name = name.into();
        let path = qualify(&namespace, &name);
        self.declare_named(
            path,
            TypeKind::Newtype {
                name,
                namespace,
                inner,
            },
        )
    }

    fn declare_named(&mut self, path: String, kind: TypeKind) -> Result<TypeId, SourceError> {
        if self.named.contains_key(&path) {
            return Err(SourceError::duplicate(path));
        }
        let id = self.push(kind);
        self.named.insert(path, id);
        Ok(id)
    }

    /// Replaces the fields of a declared struct.
    ///
    /// # Errors
    /// Returns `SourceError::UnknownType` if `id` is not a struct.
    pub fn define_fields(
        &mut self,
        id: TypeId,
        fields: Vec<StructField>,
    ) -> Result<(), SourceError> {
        match self.kinds.get_mut(id.index()) {
            Some(TypeKind::Struct(def)) => {
                def.fields = fields;
                Ok(())
            }
            _ => Err(SourceError::unknown(id.to_string())),
        }
    }

    /// Returns the kind of a type.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this graph.
    #[must_use]
    pub fn kind(&self, id: TypeId) -> &TypeKind {
        &self.kinds[id.index()]
    }

    /// Returns the struct definition if `id` is a struct.
    #[must_use]
    pub fn as_struct(&self, id: TypeId) -> Option<&StructDef> {
        match self.kind(id) {
            TypeKind::Struct(def) => Some(def),
            _ => None,
        }
    }

    /// Returns the declared short name of a named type.
    #[must_use]
    pub fn short_name(&self, id: TypeId) -> Option<&str> {
        match self.kind(id) {
            TypeKind::Struct(def) => Some(&def.name),
            TypeKind::Newtype { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns the module path of a named type.
    #[must_use]
    pub fn namespace(&self, id: TypeId) -> Option<&str> {
        match self.kind(id) {
            TypeKind::Struct(def) => Some(&def.namespace),
            TypeKind::Newtype { namespace, .. } => Some(namespace),
            _ => None,
        }
    }

    /// Returns the qualified path of a named type.
    #[must_use]
    pub fn qualified_path(&self, id: TypeId) -> Option<String> {
        Some(qualify(self.namespace(id)?, self.short_name(id)?))
    }

    /// Looks up a named type by qualified path.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<TypeId> {
        self.named.get(path).copied()
    }

    /// Finds a named type by qualified path or by unique short name.
    ///
    /// # Errors
    /// Returns `SourceError::UnknownType` when nothing matches and
    /// `SourceError::AmbiguousType` when a short name matches several types.
    pub fn find(&self, name: &str) -> Result<TypeId, SourceError> {
        if name.contains("::") {
            return self.lookup(name).ok_or_else(|| SourceError::unknown(name));
        }
        let mut candidates: Vec<(&String, TypeId)> = self
            .named
            .iter()
            .filter(|&(_, &id)| self.short_name(id) == Some(name))
            .map(|(path, &id)| (path, id))
            .collect();
        candidates.sort();
        match candidates.as_slice() {
            [] => Err(SourceError::unknown(name)),
            [(_, id)] => Ok(*id),
            many => Err(SourceError::AmbiguousType {
                name: name.to_string(),
                candidates: many
                    .iter()
                    .map(|(path, _)| path.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    /// Strips one `Option` layer. The flag tells whether one was stripped.
    #[must_use]
    pub fn strip_option(&self, id: TypeId) -> (TypeId, bool) {
        match self.kind(id) {
            TypeKind::Option(inner) => (*inner, true),
            _ => (id, false),
        }
    }

    /// Strips every `Option`, `Vec` and map layer.
    #[must_use]
    pub fn innermost(&self, mut id: TypeId) -> TypeId {
        loop {
            match self.kind(id) {
                TypeKind::Option(inner) | TypeKind::Vec(inner) => id = *inner,
                TypeKind::Map { value, .. } => id = *value,
                _ => return id,
            }
        }
    }

    /// Iterates over every struct in declaration order.
    pub fn structs(&self) -> impl Iterator<Item = (TypeId, &StructDef)> {
        self.kinds
            .iter()
            .enumerate()
            .filter_map(|(index, kind)| match kind {
                TypeKind::Struct(def) => Some((TypeId(index as u32), def)),
                _ => None,
            })
    }

    /// Renders a type the way it is spelled in Rust source.
    #[must_use]
    pub fn describe(&self, id: TypeId) -> String {
        match self.kind(id) {
            TypeKind::Bool => "bool".to_string(),
            TypeKind::Int(kind) => kind.rust_name().to_string(),
            TypeKind::Float(kind) => kind.rust_name().to_string(),
            TypeKind::String => "String".to_string(),
            TypeKind::Duration => "Duration".to_string(),
            TypeKind::Timestamp => "DateTime<Utc>".to_string(),
            TypeKind::Dynamic => "serde_json::Value".to_string(),
            TypeKind::Option(inner) => format!("Option<{}>", self.describe(*inner)),
            TypeKind::Vec(inner) => format!("Vec<{}>", self.describe(*inner)),
            TypeKind::Map {
                key,
                value,
                ordered,
            } => format!(
                "{}<{}, {}>",
                if *ordered { "BTreeMap" } else { "HashMap" },
                self.describe(*key),
                self.describe(*value)
            ),
            TypeKind::Newtype {
                name, namespace, ..
            } => qualify(namespace, name),
            TypeKind::Struct(def) => qualify(&def.namespace, &def.name),
            TypeKind::Opaque(display) => display.clone(),
        }
    }
}

/// Joins a module path and a name.
#[must_use]
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}::{name}")
    }
}
