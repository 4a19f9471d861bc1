//! Rust source loader.
//!
//! Builds a [`TypeGraph`] from Rust source files parsed with `syn`. Each file
//! is registered under the module path it is compiled at, so that field types
//! can be resolved the way the compiler resolves them for the common cases:
//! same module, `use` imports, and `crate::`/`self::`/`super::` paths.

use crate::error::SourceError;
use crate::graph::{FloatKind, IntKind, StructField, TypeGraph, TypeId, qualify};
use crate::tags::TAG_ATTRIBUTE;
use quote::ToTokens;
use std::collections::HashMap;
use std::path::Path;

/// Set of Rust sources to load.
#[derive(Debug, Default)]
pub struct SourceSet {
    files: Vec<(String, syn::File)>,
}

/// Imports visible in one module.
#[derive(Debug, Default)]
struct Imports {
    aliases: HashMap<String, String>,
    globs: Vec<String>,
}

#[derive(Debug)]
struct PendingStruct<'a> {
    namespace: String,
    item: &'a syn::ItemStruct,
}

#[derive(Debug, Default)]
struct Collected<'a> {
    structs: Vec<PendingStruct<'a>>,
    newtypes: Vec<PendingStruct<'a>>,
    imports: HashMap<String, Imports>,
}

impl SourceSet {
    /// Creates an empty source set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and adds Rust source compiled at module path `namespace`.
    ///
    /// # Errors
    /// Returns `SourceError::Syntax` if the source does not parse.
    pub fn add_source(&mut self, namespace: &str, source: &str) -> Result<&mut Self, SourceError> {
        let file = syn::parse_file(source).map_err(|source| SourceError::Syntax {
            namespace: namespace.to_string(),
            source,
        })?;
        self.files.push((namespace.to_string(), file));
        Ok(self)
    }

    /// Reads, parses and adds a Rust source file.
    ///
    /// # Errors
    /// Returns `SourceError::Io` if the file cannot be read and
    /// `SourceError::Syntax` if it does not parse.
    pub fn add_file(
        &mut self,
        namespace: &str,
        path: impl AsRef<Path>,
    ) -> Result<&mut Self, SourceError> {
        let source = std::fs::read_to_string(path)?;
        self.add_source(namespace, &source)
    }

    /// Builds the type graph of every struct in the set.
    ///
    /// # Errors
    /// Returns `SourceError::DuplicateDefinition` if two structs share a
    /// qualified path and `SourceError::InvalidAttribute` for a malformed
    /// `terraform` attribute.
    pub fn build(&self) -> Result<TypeGraph, SourceError> {
        let mut collected = Collected::default();
        for (namespace, file) in &self.files {
            collect_items(namespace, &file.items, &mut collected);
        }

        let mut graph = TypeGraph::new();
        let mut declared = Vec::with_capacity(collected.structs.len());
        for pending in &collected.structs {
            let id = graph.declare_struct(&pending.namespace, pending.item.ident.to_string())?;
            declared.push(id);
        }

        for pending in &collected.newtypes {
            let syn::Fields::Unnamed(fields) = &pending.item.fields else {
                continue;
            };
            let Some(field) = fields.unnamed.first() else {
                continue;
            };
            let inner = resolve(&mut graph, &collected.imports, &pending.namespace, &field.ty);
            graph.declare_newtype(&pending.namespace, pending.item.ident.to_string(), inner)?;
        }

        for (pending, id) in collected.structs.iter().zip(declared) {
            let syn::Fields::Named(named) = &pending.item.fields else {
                continue;
            };
            let owner = qualify(&pending.namespace, &pending.item.ident.to_string());
            let mut fields = Vec::with_capacity(named.named.len());
            for field in &named.named {
                let Some(ident) = &field.ident else {
                    continue;
                };
                let ident = ident.to_string();
                let ty = resolve(&mut graph, &collected.imports, &pending.namespace, &field.ty);
                let mut result = StructField::new(ident.clone(), ty);
                if let Some(tag) = field_tag(&owner, &ident, &field.attrs)? {
                    result = result.with_tag(tag);
                }
                if let Some(docs) = doc_comment(&field.attrs) {
                    result = result.with_docs(docs);
                }
                fields.push(result);
            }
            graph.define_fields(id, fields)?;
        }

        Ok(graph)
    }
}

fn collect_items<'a>(namespace: &str, items: &'a [syn::Item], collected: &mut Collected<'a>) {
    for item in items {
        match item {
            syn::Item::Struct(item) if item.generics.params.is_empty() => match &item.fields {
                syn::Fields::Named(_) => collected.structs.push(PendingStruct {
                    namespace: namespace.to_string(),
                    item,
                }),
                syn::Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                    collected.newtypes.push(PendingStruct {
                        namespace: namespace.to_string(),
                        item,
                    });
                }
                _ => {}
            },
            syn::Item::Mod(module) => {
                if let Some((_, items)) = &module.content {
                    let inner = qualify(namespace, &module.ident.to_string());
                    collect_items(&inner, items, collected);
                }
            }
            syn::Item::Use(item) => {
                let imports = collected.imports.entry(namespace.to_string()).or_default();
                collect_use(namespace, &mut Vec::new(), &item.tree, imports);
            }
            _ => {}
        }
    }
}

fn collect_use(namespace: &str, prefix: &mut Vec<String>, tree: &syn::UseTree, imports: &mut Imports) {
    match tree {
        syn::UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            collect_use(namespace, prefix, &path.tree, imports);
            prefix.pop();
        }
        syn::UseTree::Name(name) => {
            let ident = name.ident.to_string();
            if ident == "self" {
                if let Some(last) = prefix.last() {
                    let alias = last.clone();
                    imports.aliases.insert(alias, expand(namespace, prefix, None));
                }
                return;
            }
            prefix.push(ident.clone());
            imports.aliases.insert(ident, expand(namespace, prefix, None));
            prefix.pop();
        }
        syn::UseTree::Rename(rename) => {
            prefix.push(rename.ident.to_string());
            imports
                .aliases
                .insert(rename.rename.to_string(), expand(namespace, prefix, None));
            prefix.pop();
        }
        syn::UseTree::Glob(_) => imports.globs.push(expand(namespace, prefix, None)),
        syn::UseTree::Group(group) => {
            for tree in &group.items {
                collect_use(namespace, prefix, tree, imports);
            }
        }
    }
}

/// Expands a path relative to `namespace` into a qualified path.
fn expand(namespace: &str, segments: &[String], imports: Option<&Imports>) -> String {
    let Some((first, rest)) = segments.split_first() else {
        return namespace.to_string();
    };
    let mut result = match first.as_str() {
        "crate" => "crate".to_string(),
        "self" => namespace.to_string(),
        "super" => parent(namespace),
        other => match imports.and_then(|imports| imports.aliases.get(other)) {
            Some(path) => path.clone(),
            None if rest.is_empty() => qualify(namespace, other),
            None => other.to_string(),
        },
    };
    for segment in rest {
        if segment == "super" {
            result = parent(&result);
        } else {
            result = qualify(&result, segment);
        }
    }
    result
}

fn parent(namespace: &str) -> String {
    namespace
        .rsplit_once("::")
        .map(|(parent, _)| parent.to_string())
        .unwrap_or_default()
}

fn resolve(
    graph: &mut TypeGraph,
    imports: &HashMap<String, Imports>,
    namespace: &str,
    ty: &syn::Type,
) -> TypeId {
    let syn::Type::Path(type_path) = ty else {
        return graph.opaque(ty.to_token_stream().to_string());
    };
    let Some(last) = type_path.path.segments.last() else {
        return graph.opaque(ty.to_token_stream().to_string());
    };
    if type_path.qself.is_some() {
        return graph.opaque(ty.to_token_stream().to_string());
    }

    let segments: Vec<String> = type_path
        .path
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect();
    let local = imports.get(namespace);
    let full = expand(namespace, &segments, local);
    if let Some(id) = graph.lookup(&full) {
        return id;
    }
    if segments.len() == 1 {
        let glob = local
            .into_iter()
            .flat_map(|imports| imports.globs.iter())
            .find_map(|glob| graph.lookup(&qualify(glob, &segments[0])));
        if let Some(id) = glob {
            return id;
        }
    }

    builtin(graph, imports, namespace, last, &full)
        .unwrap_or_else(|| graph.opaque(ty.to_token_stream().to_string()))
}

fn builtin(
    graph: &mut TypeGraph,
    imports: &HashMap<String, Imports>,
    namespace: &str,
    segment: &syn::PathSegment,
    full: &str,
) -> Option<TypeId> {
    let name = segment.ident.to_string();
    let args: Vec<&syn::Type> = match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                syn::GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    let id = match (name.as_str(), args.as_slice()) {
        ("bool", []) => graph.bool(),
        ("String", []) => graph.string(),
        ("Duration", []) => graph.duration(),
        ("Value", []) if full.contains("serde_json") => graph.dynamic(),
        ("DateTime", [tz]) if last_ident(tz).as_deref() == Some("Utc") => graph.timestamp(),
        ("Option", [inner]) => {
            let inner = resolve(graph, imports, namespace, inner);
            graph.option(inner)
        }
        ("Vec", [inner]) => {
            let inner = resolve(graph, imports, namespace, inner);
            graph.vec(inner)
        }
        ("HashMap" | "BTreeMap", [key, value]) => {
            let key = resolve(graph, imports, namespace, key);
            let value = resolve(graph, imports, namespace, value);
            if name == "BTreeMap" {
                graph.btree_map(key, value)
            } else {
                graph.map(key, value)
            }
        }
        (other, []) => {
            if let Some(kind) = IntKind::from_rust_name(other) {
                graph.int(kind)
            } else if let Some(kind) = FloatKind::from_rust_name(other) {
                graph.float(kind)
            } else {
                return None;
            }
        }
        _ => return None,
    };
    Some(id)
}

fn last_ident(ty: &syn::Type) -> Option<String> {
    match ty {
        syn::Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

fn field_tag(owner: &str, ident: &str, attrs: &[syn::Attribute]) -> Result<Option<String>, SourceError> {
    let mut tag = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident(TAG_ATTRIBUTE)) {
        let invalid = |message: String| SourceError::InvalidAttribute {
            field: format!("{owner}.{ident}"),
            message,
        };
        if tag.is_some() {
            return Err(invalid(format!("{TAG_ATTRIBUTE} attribute given multiple time")));
        }
        let value: syn::LitStr = attr.parse_args().map_err(|e| invalid(e.to_string()))?;
        tag = Some(value.value());
    }
    Ok(tag)
}

fn doc_comment(attrs: &[syn::Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            syn::Meta::NameValue(syn::MetaNameValue {
                value:
                    syn::Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(text),
                        ..
                    }),
                ..
            }) => Some(text.value().trim().to_string()),
            _ => None,
        })
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TypeKind;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const COFFEE: &str = r#"
        use std::collections::HashMap;

        #[derive(Default)]
        pub struct Coffee {
            /// Coffee identifier.
            #[terraform("id")]
            pub id: i32,
            #[terraform("name,required")]
            pub name: String,
            #[terraform("ingredients")]
            pub ingredients: Vec<Ingredient>,
            #[terraform("customer")]
            pub customer: Option<Customer>,
            #[terraform("labels")]
            pub labels: HashMap<String, String>,
            pub internal: u64,
        }

        #[derive(Default)]
        pub struct Ingredient {
            #[terraform("id,required")]
            pub id: i32,
        }

        pub struct Customer {
            #[terraform("id")]
            pub id: i64,
        }
    "#;

    fn field<'a>(graph: &'a TypeGraph, ty: TypeId, ident: &str) -> &'a StructField {
        graph
            .as_struct(ty)
            .expect("Type should be a struct")
            .fields
            .iter()
            .find(|field| field.ident == ident)
            .expect("Field should exist")
    }

    #[test]
    fn test_build_coffee() {
        let mut set = SourceSet::new();
        set.add_source("crate::structs", COFFEE)
            .expect("Failed to parse");
        let graph = set.build().expect("Failed to build");

        let coffee = graph.find("Coffee").expect("Coffee not found");
        let ingredient = graph
            .lookup("crate::structs::Ingredient")
            .expect("Ingredient not found");
        let customer = graph.find("Customer").expect("Customer not found");

        let def = graph.as_struct(coffee).expect("Coffee should be a struct");
        assert_eq!(def.fields.len(), 6);
        assert_eq!(graph.describe(field(&graph, coffee, "id").ty), "i32");

        let id = field(&graph, coffee, "id");
        assert_eq!(id.tag.as_deref(), Some("id"));
        assert_eq!(id.docs.as_deref(), Some("Coffee identifier."));

        assert_eq!(
            graph.kind(field(&graph, coffee, "ingredients").ty),
            &TypeKind::Vec(ingredient)
        );
        assert_eq!(
            graph.kind(field(&graph, coffee, "customer").ty),
            &TypeKind::Option(customer)
        );
        assert_eq!(
            graph.describe(field(&graph, coffee, "labels").ty),
            "HashMap<String, String>"
        );
        assert!(field(&graph, coffee, "internal").tag.is_none());
    }

    #[test]
    fn test_modules_and_paths() {
        let source = r#"
            pub mod billing {
                pub struct Customer {
                    #[terraform("id")]
                    pub id: i64,
                }
            }

            pub mod orders {
                use super::billing::Customer as Buyer;
                use chrono::{DateTime, Utc};

                pub struct Customer {
                    #[terraform("name")]
                    pub name: String,
                }

                pub struct Order {
                    #[terraform("buyer")]
                    pub buyer: Buyer,
                    #[terraform("owner")]
                    pub owner: Customer,
                    #[terraform("billing")]
                    pub billing: crate::billing::Customer,
                    #[terraform("created_at")]
                    pub created_at: DateTime<Utc>,
                    #[terraform("ttl")]
                    pub ttl: std::time::Duration,
                    #[terraform("extra")]
                    pub extra: serde_json::Value,
                    #[terraform("other")]
                    pub other: Box<Customer>,
                }
            }
        "#;
        let mut set = SourceSet::new();
        set.add_source("crate", source).expect("Failed to parse");
        let graph = set.build().expect("Failed to build");

        let order = graph.find("Order").expect("Order not found");
        let billing = graph
            .lookup("crate::billing::Customer")
            .expect("billing customer not found");
        let orders = graph
            .lookup("crate::orders::Customer")
            .expect("orders customer not found");

        assert_eq!(field(&graph, order, "buyer").ty, billing);
        assert_eq!(field(&graph, order, "owner").ty, orders);
        assert_eq!(field(&graph, order, "billing").ty, billing);
        assert_eq!(
            graph.kind(field(&graph, order, "created_at").ty),
            &TypeKind::Timestamp
        );
        assert_eq!(
            graph.kind(field(&graph, order, "ttl").ty),
            &TypeKind::Duration
        );
        assert_eq!(
            graph.kind(field(&graph, order, "extra").ty),
            &TypeKind::Dynamic
        );
        assert!(matches!(
            graph.kind(field(&graph, order, "other").ty),
            TypeKind::Opaque(_)
        ));
    }

    #[test]
    fn test_newtypes() {
        let source = r#"
            pub struct Hostname(pub String);

            pub struct Server {
                #[terraform("host")]
                pub host: Hostname,
            }
        "#;
        let mut set = SourceSet::new();
        set.add_source("crate", source).expect("Failed to parse");
        let graph = set.build().expect("Failed to build");

        let server = graph.find("Server").expect("Server not found");
        let host = field(&graph, server, "host").ty;
        let hostname = graph.lookup("crate::Hostname").expect("Hostname not found");
        assert_eq!(host, hostname);
        assert!(matches!(
            graph.kind(host),
            TypeKind::Newtype { name, .. } if name == "Hostname"
        ));
    }

    #[test]
    fn test_syntax_error() {
        let mut set = SourceSet::new();
        let err = set.add_source("crate", "pub struct {").unwrap_err();
        assert!(matches!(err, SourceError::Syntax { .. }));
    }

    #[test]
    fn test_invalid_attribute() {
        let source = r#"
            pub struct Broken {
                #[terraform(name)]
                pub name: String,
            }
        "#;
        let mut set = SourceSet::new();
        set.add_source("crate", source).expect("Failed to parse");
        let err = set.build().unwrap_err();
        assert!(err.to_string().contains("crate::Broken.name"));
    }

    #[test]
    fn test_duplicate_definition() {
        let mut set = SourceSet::new();
        set.add_source("crate", "pub struct A { pub x: i32 }")
            .expect("Failed to parse");
        set.add_source("crate", "pub struct A { pub y: i32 }")
            .expect("Failed to parse");
        let err = set.build().unwrap_err();
        assert!(matches!(err, SourceError::DuplicateDefinition { .. }));
    }

    #[test]
    fn test_add_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(COFFEE.as_bytes())
            .expect("Failed to write temp file");

        let mut set = SourceSet::new();
        set.add_file("crate::structs", file.path())
            .expect("Failed to load file");
        let graph = set.build().expect("Failed to build");
        assert_eq!(graph.structs().count(), 3);

        let missing = SourceSet::new().add_file("crate", "/does/not/exist.rs").map(|_| ());
        assert!(matches!(missing, Err(SourceError::Io(_))));
    }
}
