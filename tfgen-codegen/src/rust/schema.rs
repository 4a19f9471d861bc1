//! Schema builder generation.

use crate::context::{Context, ident};
use crate::converters::render_object;
use crate::error::CodegenError;
use crate::names::TypeNames;
use proc_macro2::TokenStream;
use quote::quote;
use tfgen_runtime::schema::SchemaKind;
use tfgen_types::TypeId;

/// Generator for root schema builders.
pub struct SchemaGenerator<'c, 'a> {
    ctx: &'c mut Context<'a>,
}

impl<'c, 'a> SchemaGenerator<'c, 'a> {
    /// Creates a new schema generator.
    #[must_use]
    pub fn new(ctx: &'c mut Context<'a>) -> Self {
        Self { ctx }
    }

    /// Generates `pub fn <name>_schema() -> rt::schema::Schema` for a root.
    ///
    /// # Errors
    /// Returns an error if a field cannot be described, a plain field holds
    /// blocks, or a nested type reaches itself.
    pub fn generate(
        &mut self,
        ty: TypeId,
        names: &TypeNames,
        kind: SchemaKind,
    ) -> Result<TokenStream, CodegenError> {
        let rt = self.ctx.runtime();
        let (attributes, blocks, _) = render_object(self.ctx, &names.name, ty)?;
        let schema = names.schema();
        let kind = ident(kind_variant(kind));
        let doc = format!(" Schema of `{}`.", names.name);
        tracing::debug!("Synthesised schema for {}", names.name);

        Ok(quote! {
            #[doc = #doc]
            pub fn #schema() -> #rt::schema::Schema {
                #rt::schema::Schema {
                    kind: #rt::schema::SchemaKind::#kind,
                    description: ::std::string::String::new(),
                    attributes: #attributes,
                    blocks: #blocks,
                }
            }
        })
    }
}

fn kind_variant(kind: SchemaKind) -> &'static str {
    match kind {
        SchemaKind::Provider => "Provider",
        SchemaKind::DataSource => "DataSource",
        SchemaKind::Resource => "Resource",
        SchemaKind::ProviderMeta => "ProviderMeta",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::Registry;
    use tfgen_types::{SourceSet, TagProvider};

    fn render(source: &str, root: &str, kind: SchemaKind) -> Result<String, CodegenError> {
        let mut set = SourceSet::new();
        set.add_source("crate", source).expect("Failed to parse");
        let graph = set.build().expect("Failed to build");
        let ty = graph.find(root).expect("Root not found");

        let registry = Registry::default();
        let mut ctx = Context::new(&graph, &registry, &TagProvider, "::rt")
            .expect("Failed to create context");
        ctx.names().add_root(ty, root).expect("Failed to add root");
        let names = ctx.names_for(ty).expect("Failed to name");
        let tokens = SchemaGenerator::new(&mut ctx).generate(ty, &names, kind)?;
        let item: syn::ItemFn = syn::parse2(tokens).expect("Schema does not parse");
        Ok(quote!(#item).to_string())
    }

    #[test]
    fn test_generate_schema() {
        let text = render(
            r#"
            pub struct Server {
                /// Host name.
                #[terraform("host,required")]
                pub host: String,
                #[terraform("tags")]
                pub tags: Vec<String>,
                #[terraform("disk,block")]
                pub disk: Vec<Disk>,
            }

            pub struct Disk {
                #[terraform("size")]
                pub size: u32,
            }
            "#,
            "Server",
            SchemaKind::Provider,
        )
        .expect("Failed to render");

        assert!(text.contains("pub fn server_schema"));
        assert!(text.contains("SchemaKind :: Provider"));
        assert!(text.contains("Attribute :: String"));
        assert!(text.contains("\"Host name.\""));
        assert!(text.contains("Attribute :: List"));
        assert!(text.contains("Block :: ListNested"));
    }

    #[test]
    fn test_block_on_attribute() {
        let err = render(
            r#"
            pub struct Server {
                #[terraform("network")]
                pub network: Network,
            }

            pub struct Network {
                #[terraform("rule,block")]
                pub rules: Vec<Rule>,
            }

            pub struct Rule {
                #[terraform("port")]
                pub port: u16,
            }
            "#,
            "Server",
            SchemaKind::Resource,
        )
        .unwrap_err();
        assert!(
            matches!(err, CodegenError::BlockOnAttribute { ref path } if path == "Server.network")
        );
    }

    #[test]
    fn test_recursive_schema() {
        let err = render(
            r#"
            pub struct Node {
                #[terraform("children")]
                pub children: Vec<Node>,
            }
            "#,
            "Node",
            SchemaKind::DataSource,
        )
        .unwrap_err();
        assert!(matches!(err, CodegenError::RecursiveSchema { .. }));
    }
}
