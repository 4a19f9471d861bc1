//! Generation driver.
//!
//! Roots are processed in name order. Every struct reached from a root is
//! queued once and gets exactly one wire model, one decode procedure and one
//! encode procedure. Any error aborts the run.

use crate::context::Context;
use crate::converters::Registry;
use crate::error::CodegenError;
use crate::rust::{DecoderGenerator, EncoderGenerator, ModelGenerator, SchemaGenerator};
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use tfgen_runtime::schema::SchemaKind;
use tfgen_types::{FieldInformationProvider, TagProvider, TypeGraph, TypeId};

/// Default path of the runtime crate in generated code.
pub const DEFAULT_RUNTIME_PATH: &str = "::tfgen_runtime";

/// Configuration of a generation run.
pub struct GeneratorOptions {
    converters: Registry,
    provider: Box<dyn FieldInformationProvider>,
    runtime_path: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            converters: Registry::default(),
            provider: Box::new(TagProvider),
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
        }
    }
}

impl fmt::Debug for GeneratorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorOptions")
            .field("converters", &self.converters.names())
            .field("runtime_path", &self.runtime_path)
            .finish_non_exhaustive()
    }
}

impl GeneratorOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the converter registry.
    #[must_use]
    pub fn converters(mut self, converters: Registry) -> Self {
        self.converters = converters;
        self
    }

    /// Sets the field metadata provider.
    #[must_use]
    pub fn provider(mut self, provider: impl FieldInformationProvider + 'static) -> Self {
        self.provider = Box::new(provider);
        self
    }

    /// Sets the path generated code uses to reach the runtime crate.
    #[must_use]
    pub fn runtime_path(mut self, path: impl Into<String>) -> Self {
        self.runtime_path = path.into();
        self
    }
}

/// Output of [`Generator::generate_models`].
#[derive(Debug, Clone, Default)]
pub struct GeneratedModels {
    /// Wire model structs.
    pub models: Vec<TokenStream>,
    /// Decode procedures and root entry points.
    pub decoders: Vec<TokenStream>,
    /// Encode procedures and root `Model` implementations.
    pub encoders: Vec<TokenStream>,
    /// Canonical names of the processed types, in processing order.
    pub types: Vec<String>,
}

impl GeneratedModels {
    /// Joins every artifact into one token stream.
    #[must_use]
    pub fn to_tokens(&self) -> TokenStream {
        let models = &self.models;
        let decoders = &self.decoders;
        let encoders = &self.encoders;
        quote! {
            #(#models)*
            #(#decoders)*
            #(#encoders)*
        }
    }
}

impl fmt::Display for GeneratedModels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_tokens())
    }
}

/// Code generator over a type graph.
#[derive(Debug)]
pub struct Generator<'a> {
    graph: &'a TypeGraph,
    options: GeneratorOptions,
    roots: Vec<(String, TypeId)>,
}

impl<'a> Generator<'a> {
    /// Creates a new generator with default options and no roots.
    #[must_use]
    pub fn new(graph: &'a TypeGraph) -> Self {
        Self {
            graph,
            options: GeneratorOptions::default(),
            roots: Vec::new(),
        }
    }

    /// Replaces the options.
    #[must_use]
    pub fn options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    /// Adds a root type registered under `name`.
    #[must_use]
    pub fn root(mut self, name: impl Into<String>, ty: TypeId) -> Self {
        self.roots.push((name.into(), ty));
        self
    }

    /// Generates the wire models and conversion procedures of every struct
    /// reachable from the roots.
    ///
    /// # Errors
    /// Returns the first error met; nothing is returned for a failed run.
    pub fn generate_models(&self) -> Result<GeneratedModels, CodegenError> {
        let mut ctx = self.context()?;
        let roots = self.register_roots(&mut ctx)?;

        let mut queue: VecDeque<TypeId> = roots.iter().map(|(_, ty)| *ty).collect();
        let mut done = HashSet::new();
        let mut output = GeneratedModels::default();

        while let Some(ty) = queue.pop_front() {
            if !done.insert(ty) {
                continue;
            }
            let names = ctx.names_for(ty)?;
            tracing::debug!("Generating {} for {}", names.name, self.graph.describe(ty));

            let fields = ctx.fields(&names.name, ty)?;
            output
                .models
                .push(ModelGenerator::new(&mut ctx).generate(ty, &names, &fields)?);
            output
                .decoders
                .push(DecoderGenerator::new(&mut ctx).generate(ty, &names, &fields)?);
            output
                .encoders
                .push(EncoderGenerator::new(&mut ctx).generate(ty, &names, &fields)?);
            output.types.push(names.name);

            queue.extend(fields.nested.iter().filter(|nested| !done.contains(*nested)));
        }

        tracing::info!(
            "Generated {} types from {} roots",
            output.types.len(),
            roots.len()
        );
        Ok(output)
    }

    /// Generates one schema builder per root.
    ///
    /// # Errors
    /// Returns the first error met; nothing is returned for a failed run.
    pub fn generate_schema(&self, kind: SchemaKind) -> Result<TokenStream, CodegenError> {
        let mut ctx = self.context()?;
        let roots = self.register_roots(&mut ctx)?;

        let mut tokens = TokenStream::new();
        for (_, ty) in &roots {
            let names = ctx.names_for(*ty)?;
            tokens.extend(SchemaGenerator::new(&mut ctx).generate(*ty, &names, kind)?);
        }

        tracing::info!("Generated {} {:?} schemas", roots.len(), kind);
        Ok(tokens)
    }

    fn context(&self) -> Result<Context<'_>, CodegenError> {
        Context::new(
            self.graph,
            &self.options.converters,
            self.options.provider.as_ref(),
            &self.options.runtime_path,
        )
    }

    fn register_roots(&self, ctx: &mut Context<'_>) -> Result<Vec<(String, TypeId)>, CodegenError> {
        let mut roots = self.roots.clone();
        roots.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, ty) in &roots {
            if self.graph.as_struct(*ty).is_none() {
                return Err(CodegenError::not_a_struct(self.graph.describe(*ty)));
            }
            ctx.names().add_root(*ty, name)?;
        }
        Ok(roots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::{AttributeConverter, BoolConverter};
    use crate::context::{Access, SchemaEntry};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tfgen_types::{FieldError, FieldInformation, SourceSet, StructField};

    const COFFEE: &str = r#"
        pub struct Coffee {
            #[terraform("id")]
            pub id: i32,
            #[terraform("name,required")]
            pub name: String,
            #[terraform("ingredients")]
            pub ingredients: Vec<Ingredient>,
            #[terraform("customer")]
            pub customer: Option<Customer>,
        }

        pub struct Ingredient {
            #[terraform("id,required")]
            pub id: i32,
        }

        pub struct Customer {
            #[terraform("id")]
            pub id: i64,
            #[terraform("name")]
            pub name: String,
        }
    "#;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn graph(source: &str) -> TypeGraph {
        let mut set = SourceSet::new();
        set.add_source("crate::structs", source)
            .expect("Failed to parse");
        set.build().expect("Failed to build")
    }

    #[test]
    fn test_generate_coffee() {
        init_tracing();
        let graph = graph(COFFEE);
        let coffee = graph.find("Coffee").expect("Coffee not found");

        let output = Generator::new(&graph)
            .root("Coffee", coffee)
            .generate_models()
            .expect("Failed to generate");
        assert_eq!(output.types, vec!["Coffee", "Ingredient", "Customer"]);
        assert_eq!(output.models.len(), 3);

        let file: syn::File = syn::parse2(output.to_tokens()).expect("Output does not parse");
        // 3 models, 3 decoders, 1 entry point, 3 encoders, 1 Model impl.
        assert_eq!(file.items.len(), 11);

        let text = output.to_string();
        assert!(text.contains("pub struct CoffeeModel"));
        assert!(text.contains(":: std :: boxed :: Box < IngredientModel >"));
        assert!(text.contains("pub fn encode_coffee"));
        assert!(!text.contains("pub fn encode_customer"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let graph = graph(COFFEE);
        let coffee = graph.find("Coffee").expect("Coffee not found");
        let customer = graph.find("Customer").expect("Customer not found");

        let run = || {
            Generator::new(&graph)
                .root("Order", coffee)
                .root("Buyer", customer)
                .generate_models()
                .expect("Failed to generate")
        };
        let first = run();
        let second = run();
        assert_eq!(first.types, vec!["Buyer", "Order", "Ingredient"]);
        assert_eq!(first.types, second.types);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_schema_for_roots() {
        let graph = graph(COFFEE);
        let coffee = graph.find("Coffee").expect("Coffee not found");

        let tokens = Generator::new(&graph)
            .root("Coffee", coffee)
            .generate_schema(SchemaKind::Resource)
            .expect("Failed to generate");
        let file: syn::File = syn::parse2(tokens.clone()).expect("Schema does not parse");
        assert_eq!(file.items.len(), 1);

        let text = tokens.to_string();
        assert!(text.contains("pub fn coffee_schema"));
        assert!(text.contains("Attribute :: ListNested"));
        assert!(text.contains("Attribute :: SingleNested"));
        assert!(text.contains("required : true"));
    }

    #[test]
    fn test_collisions_across_modules() {
        let mut set = SourceSet::new();
        set.add_source(
            "crate",
            r#"
            pub struct Order {
                #[terraform("shop")]
                pub shop: crate::shop::Customer,
                #[terraform("billing")]
                pub billing: crate::billing::Customer,
            }

            pub mod shop {
                pub struct Customer {
                    #[terraform("id")]
                    pub id: i64,
                }
            }

            pub mod billing {
                pub struct Customer {
                    #[terraform("iban")]
                    pub iban: String,
                }
            }
            "#,
        )
        .expect("Failed to parse");
        let graph = set.build().expect("Failed to build");
        let order = graph.find("Order").expect("Order not found");

        let output = Generator::new(&graph)
            .root("Order", order)
            .generate_models()
            .expect("Failed to generate");
        assert_eq!(output.types, vec!["Order", "Customer", "BillingCustomer"]);
    }

    #[test]
    fn test_names_differing_only_in_case() {
        let graph = graph(
            r#"
            pub struct Root {
                #[terraform("a")]
                pub a: HTTPServer,
                #[terraform("b")]
                pub b: HttpServer,
            }

            pub struct HTTPServer {
                #[terraform("port")]
                pub port: u16,
            }

            pub struct HttpServer {
                #[terraform("host")]
                pub host: String,
            }
            "#,
        );
        let root = graph.find("Root").expect("Root not found");

        let output = Generator::new(&graph)
            .root("Root", root)
            .generate_models()
            .expect("Failed to generate");
        assert_eq!(
            output.types,
            vec!["Root", "HTTPServer", "StructsHttpServer"]
        );

        let decoders: Vec<String> = output
            .decoders
            .iter()
            .map(|tokens| syn::parse2::<syn::File>(tokens.clone()).expect("Decoder does not parse"))
            .flat_map(|file| file.items)
            .filter_map(|item| match item {
                syn::Item::Fn(func) => Some(func.sig.ident.to_string()),
                _ => None,
            })
            .collect();
        let unique: HashSet<&String> = decoders.iter().collect();
        assert_eq!(unique.len(), decoders.len());
        assert!(decoders.contains(&"decode_structs_http_server".to_string()));
    }

    #[test]
    fn test_root_errors() {
        let mut graph = graph(COFFEE);
        let coffee = graph.find("Coffee").expect("Coffee not found");
        let customer = graph.find("Customer").expect("Customer not found");

        let err = Generator::new(&graph)
            .root("Coffee", coffee)
            .root("Coffee", customer)
            .generate_models()
            .unwrap_err();
        assert!(matches!(err, CodegenError::DuplicateRootName { .. }));

        let string = graph.string();
        let err = Generator::new(&graph)
            .root("Text", string)
            .generate_models()
            .unwrap_err();
        assert!(matches!(err, CodegenError::NotAStruct { .. }));
    }

    #[test]
    fn test_no_converter_found() {
        let graph = graph(
            r#"
            pub struct Holder {
                #[terraform("inner")]
                pub inner: Box<Inner>,
            }
            "#,
        );
        let holder = graph.find("Holder").expect("Holder not found");
        let err = Generator::new(&graph)
            .root("Holder", holder)
            .generate_models()
            .unwrap_err();
        assert!(matches!(err, CodegenError::NoConverterFound { .. }));
    }

    #[test]
    fn test_invalid_tag_fails_generation() {
        let graph = graph(
            r#"
            pub struct Broken {
                #[terraform("name,optional,optional")]
                pub name: String,
            }
            "#,
        );
        let broken = graph.find("Broken").expect("Broken not found");
        let err = Generator::new(&graph)
            .root("Broken", broken)
            .generate_models()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "field 'Broken.name': optional modifier given multiple time"
        );
    }

    #[derive(Debug)]
    struct Silent;

    impl AttributeConverter for Silent {
        fn name(&self) -> &'static str {
            "silent"
        }

        fn check(&self, graph: &TypeGraph, ty: TypeId) -> bool {
            BoolConverter.check(graph, ty)
        }

        fn wire_type(&self, ctx: &mut Context<'_>, ty: TypeId) -> Result<TokenStream, CodegenError> {
            BoolConverter.wire_type(ctx, ty)
        }

        fn decode(
            &self,
            _ctx: &mut Context<'_>,
            _ty: TypeId,
            _access: &Access,
        ) -> Result<TokenStream, CodegenError> {
            Ok(TokenStream::new())
        }

        fn encode(
            &self,
            ctx: &mut Context<'_>,
            ty: TypeId,
            access: &Access,
        ) -> Result<TokenStream, CodegenError> {
            BoolConverter.encode(ctx, ty, access)
        }

        fn schema(
            &self,
            ctx: &mut Context<'_>,
            ty: TypeId,
            info: &FieldInformation,
        ) -> Result<SchemaEntry, CodegenError> {
            BoolConverter.schema(ctx, ty, info)
        }
    }

    #[test]
    fn test_empty_artifact() {
        let graph = graph(
            r#"
            pub struct Flags {
                #[terraform("enabled")]
                pub enabled: bool,
            }
            "#,
        );
        let flags = graph.find("Flags").expect("Flags not found");
        let options =
            GeneratorOptions::new().converters(Registry::default().with(Arc::new(Silent)));
        let err = Generator::new(&graph)
            .options(options)
            .root("Flags", flags)
            .generate_models()
            .unwrap_err();
        assert!(matches!(
            err,
            CodegenError::EmptyArtifact { ref converter, ref operation, .. }
                if converter == "silent" && operation == "decode"
        ));
    }

    #[test]
    fn test_custom_provider_and_runtime_path() {
        let graph = graph(COFFEE);
        let customer = graph.find("Customer").expect("Customer not found");

        let provider = |path: &str,
                        field: &StructField|
         -> Result<Option<FieldInformation>, FieldError> {
            let info = TagProvider.provide(path, field)?;
            Ok(info.map(|info| {
                if info.name == "name" {
                    info.with_default(quote!("anonymous"))
                } else {
                    info
                }
            }))
        };
        let options = GeneratorOptions::new()
            .provider(provider)
            .runtime_path("crate::runtime");
        let tokens = Generator::new(&graph)
            .options(options)
            .root("Customer", customer)
            .generate_schema(SchemaKind::DataSource)
            .expect("Failed to generate");

        let text = tokens.to_string();
        assert!(text.contains("crate :: runtime :: schema :: Schema"));
        assert!(text.contains("DefaultValue :: from (\"anonymous\")"));
    }

    #[test]
    fn test_provider_attaches_validators() {
        let graph = graph(COFFEE);
        let coffee = graph.find("Coffee").expect("Coffee not found");

        let provider = |path: &str,
                        field: &StructField|
         -> Result<Option<FieldInformation>, FieldError> {
            let info = TagProvider.provide(path, field)?;
            Ok(info.map(|info| {
                if path == "Coffee" && info.name == "name" {
                    info.with_validators(quote!(vec![rt::schema::Validator::OneOf(vec![
                        "espresso".to_string(),
                        "latte".to_string(),
                    ])]))
                } else {
                    info
                }
            }))
        };
        let tokens = Generator::new(&graph)
            .options(GeneratorOptions::new().provider(provider))
            .root("Coffee", coffee)
            .generate_schema(SchemaKind::Resource)
            .expect("Failed to generate");

        let text = tokens.to_string();
        assert_eq!(text.matches("validators :").count(), 1);
        assert!(text.contains("validators : vec ! [rt :: schema :: Validator :: OneOf"));
        syn::parse2::<syn::File>(tokens).expect("Schema does not parse");
    }
}
