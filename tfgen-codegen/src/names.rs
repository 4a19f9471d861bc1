//! Name resolution for generated items.
//!
//! Each struct reached by a generation run gets one canonical name. Roots use
//! the name the caller registered them under; other types default to their
//! declared name. A name already taken by another type is qualified once with
//! the last segment of the owning module (`Customer` in `crate::billing`
//! becomes `BillingCustomer`); a second collision is fatal. Two names that
//! map to the same snake case identifier (`HTTPServer` and `HttpServer`)
//! collide as well.

use crate::error::CodegenError;
use proc_macro2::{Ident, Span};
use std::collections::{HashMap, HashSet};
use tfgen_types::{TypeGraph, TypeId, to_pascal_case, to_snake_case};

/// Canonical names of one type and its generated items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNames {
    /// Canonical name.
    pub name: String,
    /// Snake case identifier.
    pub ident: String,
    /// Whether the caller registered this type as a root.
    pub is_root: bool,
}

impl TypeNames {
    /// Wire model struct name.
    #[must_use]
    pub fn model(&self) -> Ident {
        Ident::new(&format!("{}Model", self.name), Span::call_site())
    }

    /// Decode procedure name.
    #[must_use]
    pub fn decode(&self) -> Ident {
        Ident::new(&format!("decode_{}", self.ident), Span::call_site())
    }

    /// Encode procedure name.
    #[must_use]
    pub fn encode(&self) -> Ident {
        Ident::new(&format!("encode_{}", self.ident), Span::call_site())
    }

    /// Public decode entry point name.
    #[must_use]
    pub fn entry(&self) -> Ident {
        Ident::new(&format!("get_{}", self.ident), Span::call_site())
    }

    /// Schema procedure name.
    #[must_use]
    pub fn schema(&self) -> Ident {
        Ident::new(&format!("{}_schema", self.ident), Span::call_site())
    }
}

/// Names assigned during one generation run.
#[derive(Debug, Default)]
pub struct NameTable {
    names: HashMap<TypeId, String>,
    roots: HashSet<TypeId>,
}

impl NameTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a caller supplied root.
    ///
    /// # Errors
    /// Returns `CodegenError::DuplicateRootName` if `name` is already
    /// registered, `CodegenError::NamingConflict` if another root already
    /// owns its snake case identifier and `CodegenError::Generation` if `ty`
    /// already has another root name.
    pub fn add_root(&mut self, ty: TypeId, name: &str) -> Result<(), CodegenError> {
        if self.names.values().any(|existing| existing == name) {
            return Err(CodegenError::DuplicateRootName {
                name: name.to_string(),
            });
        }
        if self.taken(ty, name) {
            return Err(CodegenError::NamingConflict {
                name: name.to_string(),
            });
        }
        if let Some(existing) = self.names.get(&ty) {
            return Err(CodegenError::generation(format!(
                "type registered as both '{existing}' and '{name}'"
            )));
        }
        validate_name(name)?;
        self.names.insert(ty, name.to_string());
        self.roots.insert(ty);
        Ok(())
    }

    /// Returns true if `ty` was registered as a root.
    #[must_use]
    pub fn is_root(&self, ty: TypeId) -> bool {
        self.roots.contains(&ty)
    }

    /// Returns the names of `ty`, assigning them on first use.
    ///
    /// # Errors
    /// Returns `CodegenError::NotAStruct` for anonymous types and
    /// `CodegenError::NamingConflict` if qualification does not help.
    pub fn resolve(&mut self, graph: &TypeGraph, ty: TypeId) -> Result<TypeNames, CodegenError> {
        let mut name = match self.names.get(&ty) {
            Some(name) => name.clone(),
            None => graph
                .short_name(ty)
                .ok_or_else(|| CodegenError::not_a_struct(graph.describe(ty)))?
                .to_string(),
        };

        if self.taken(ty, &name) {
            let module = graph
                .namespace(ty)
                .and_then(|namespace| namespace.rsplit("::").next())
                .unwrap_or_default();
            name = format!("{}{}", to_pascal_case(module), name);
            if self.taken(ty, &name) {
                return Err(CodegenError::NamingConflict { name });
            }
        }

        self.names.insert(ty, name.clone());
        Ok(TypeNames {
            ident: to_snake_case(&name),
            is_root: self.is_root(ty),
            name,
        })
    }

    fn taken(&self, ty: TypeId, name: &str) -> bool {
        let ident = to_snake_case(name);
        self.names.iter().any(|(other, existing)| {
            *other != ty && (existing == name || to_snake_case(existing) == ident)
        })
    }
}

fn validate_name(name: &str) -> Result<(), CodegenError> {
    let valid = name.chars().next().is_some_and(char::is_alphabetic)
        && name.chars().all(|c| c.is_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(CodegenError::generation(format!(
            "'{name}' is not a valid type name"
        )))
    }
}
