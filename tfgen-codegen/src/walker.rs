//! Struct field enumeration.
//!
//! Walks the direct fields of a struct in declaration order, asking the field
//! metadata provider about each one. Promoted fields are not returned: their
//! own fields take their place, depth first, with a parent link used to
//! compose the accessor chain. Promotion is limited to one level.

use crate::error::CodegenError;
use std::collections::HashSet;
use tfgen_types::{FieldInformation, FieldInformationProvider, StructDef, TypeGraph, TypeId};

/// Result of walking one struct.
#[derive(Debug, Clone, Default)]
pub struct FieldList {
    /// Fields in output order.
    pub fields: Vec<FieldInformation>,
    /// Promoted fields, indexed by `FieldInformation::parent`.
    pub promoted: Vec<FieldInformation>,
    /// Structs reached through the fields, in discovery order.
    pub nested: Vec<TypeId>,
}

/// Walks the fields of `ty`, which may be wrapped in one `Option`.
///
/// # Arguments
/// * `graph` - Type graph owning `ty`
/// * `provider` - Field metadata provider
/// * `path` - Path prefix for the returned fields
/// * `ty` - Struct to walk
///
/// # Errors
/// Returns `CodegenError::NotAStruct` if `ty` or a promoted field is not a
/// struct, `CodegenError::MultiplePromotion` for nested promotion,
/// `CodegenError::Field` if the provider fails and `CodegenError::Generation`
/// if two fields share a wire name or identifier.
pub fn walk(
    graph: &TypeGraph,
    provider: &dyn FieldInformationProvider,
    path: &str,
    ty: TypeId,
) -> Result<FieldList, CodegenError> {
    let (ty, _) = graph.strip_option(ty);
    let def = graph
        .as_struct(ty)
        .ok_or_else(|| CodegenError::not_a_struct(graph.describe(ty)))?;

    let mut list = FieldList::default();
    visit(graph, provider, path, def, None, &mut list)?;
    check_unique(path, &list.fields)?;
    Ok(list)
}

fn visit(
    graph: &TypeGraph,
    provider: &dyn FieldInformationProvider,
    path: &str,
    def: &StructDef,
    parent: Option<usize>,
    list: &mut FieldList,
) -> Result<(), CodegenError> {
    for field in &def.fields {
        let info = provider
            .provide(path, field)
            .map_err(|source| CodegenError::Field {
                path: format!("{path}.{}", field.ident),
                source,
            })?;
        let Some(mut info) = info else {
            continue;
        };

        info.parent = parent;
        if let Some(index) = parent {
            let mut accessor = list.promoted[index].accessor.clone();
            accessor.append(&mut info.accessor);
            info.accessor = accessor;
        }

        if info.promoted {
            if parent.is_some() {
                return Err(CodegenError::MultiplePromotion {
                    path: format!("{path}.{}", field.ident),
                });
            }
            let inner = graph
                .as_struct(info.field_type)
                .ok_or_else(|| CodegenError::not_a_struct(graph.describe(info.field_type)))?;
            let index = list.promoted.len();
            list.promoted.push(info);
            visit(graph, provider, path, inner, Some(index), list)?;
            continue;
        }

        info.path = format!("{path}.{}", info.name);
        let innermost = graph.innermost(info.field_type);
        if graph.as_struct(innermost).is_some() && !list.nested.contains(&innermost) {
            list.nested.push(innermost);
        }
        list.fields.push(info);
    }
    Ok(())
}

fn check_unique(path: &str, fields: &[FieldInformation]) -> Result<(), CodegenError> {
    let mut names = HashSet::with_capacity(fields.len());
    let mut idents = HashSet::with_capacity(fields.len());
    for field in fields {
        if !names.insert(field.name.as_str()) {
            return Err(CodegenError::generation(format!(
                "duplicate attribute name '{}' in {path}",
                field.name
            )));
        }
        if !idents.insert(field.ident.as_str()) {
            return Err(CodegenError::generation(format!(
                "duplicate field '{}' in {path}",
                field.ident
            )));
        }
    }
    Ok(())
}
