//! Generates models, conversions and schemas for `src/structs.rs`.

use anyhow::Context;
use quote::quote;
use std::env;
use std::fs;
use std::path::PathBuf;
use tfgen_codegen::{Generator, GeneratorOptions, SchemaKind};
use tfgen_types::{
    FieldError, FieldInformation, FieldInformationProvider, SourceSet, StructField, TagProvider,
};

const ROOTS: &[(&str, &str)] = &[
    ("Coffee", "Coffee"),
    ("Server", "Server"),
    ("Everything", "Everything"),
];

/// Reads the `terraform` tags and attaches validators to a few fields.
fn provide(path: &str, field: &StructField) -> Result<Option<FieldInformation>, FieldError> {
    let info = TagProvider.provide(path, field)?;
    Ok(info.map(|info| match format!("{path}.{}", info.name).as_str() {
        "Server.name" => info.with_validators(quote!(vec![
            ::tfgen_runtime::schema::Validator::LengthBetween { min: 1, max: 63 },
        ])),
        "Everything.endpoints.weight" => info.with_validators(quote!(vec![
            ::tfgen_runtime::schema::Validator::AtLeast(0.0),
            ::tfgen_runtime::schema::Validator::AtMost(1.0),
        ])),
        _ => info,
    }))
}

fn main() -> anyhow::Result<()> {
    let manifest = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let structs = manifest.join("src").join("structs.rs");
    println!("cargo:rerun-if-changed={}", structs.display());

    let mut set = SourceSet::new();
    set.add_file("crate::structs", &structs)
        .with_context(|| format!("failed to load {}", structs.display()))?;
    let graph = set.build()?;

    let mut generator = Generator::new(&graph).options(GeneratorOptions::new().provider(provide));
    for (name, ty) in ROOTS {
        generator = generator.root(*name, graph.find(ty)?);
    }
    let models = generator.generate_models()?;
    let schema = generator.generate_schema(SchemaKind::Resource)?;

    let out = PathBuf::from(env::var("OUT_DIR")?);
    fs::write(out.join("generated.rs"), models.to_string())
        .context("failed to write generated.rs")?;
    fs::write(out.join("schema.rs"), schema.to_string()).context("failed to write schema.rs")?;
    Ok(())
}
