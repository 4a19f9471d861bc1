use pretty_assertions::assert_eq;
use tfgen_runtime::ElementType;
use tfgen_runtime::schema::{Attribute, Block, SchemaKind, Validator};
use tfgen_tests::schema::{coffee_schema, everything_schema, server_schema};

#[test]
fn test_coffee_schema() {
    let schema = coffee_schema();
    assert_eq!(schema.kind, SchemaKind::Resource);
    assert!(schema.blocks.is_empty());
    assert_eq!(
        schema.attributes.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["customer", "id", "ingredients", "name", "teaser"]
    );

    let name = schema.attribute("name").expect("Missing name");
    assert!(matches!(name, Attribute::String(_)));
    assert!(name.is_required());
    assert_eq!(name.flags().description, "Display name.");

    let id = schema.attribute("id").expect("Missing id");
    assert!(matches!(id, Attribute::Int64(_)));
    assert!(id.flags().computed);
    assert!(!id.flags().optional);

    assert!(schema.attribute("teaser").expect("Missing teaser").flags().optional);

    let ingredients = schema.attribute("ingredients").expect("Missing ingredients");
    assert!(matches!(ingredients, Attribute::ListNested(_)));
    let nested = ingredients.nested().expect("Not nested");
    assert!(nested["id"].is_required());
    assert!(matches!(nested["quantity"], Attribute::Int64(_)));

    let customer = schema.attribute("customer").expect("Missing customer");
    assert!(matches!(customer, Attribute::SingleNested(_)));
    assert!(matches!(
        customer.nested().expect("Not nested")["vip"],
        Attribute::Bool(_)
    ));
}

#[test]
fn test_server_schema_has_blocks() {
    let schema = server_schema();
    assert_eq!(
        schema.attributes.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["host", "ipv6", "name", "port"]
    );

    let disk = schema.block("disk").expect("Missing disk block");
    assert!(matches!(disk, Block::ListNested(_)));
    assert!(matches!(disk.body().attributes["size"], Attribute::Int64(_)));
    assert!(matches!(disk.body().attributes["ratio"], Attribute::Float64(_)));

    let Some(Attribute::String(name)) = schema.attribute("name") else {
        panic!("name is not a string");
    };
    assert_eq!(
        name.validators,
        vec![Validator::LengthBetween { min: 1, max: 63 }]
    );
    let Some(Attribute::Int64(port)) = schema.attribute("port") else {
        panic!("port is not an integer");
    };
    assert!(port.validators.is_empty());
}

#[test]
fn test_collections_and_flags() {
    let schema = everything_schema();

    let Some(Attribute::Map(labels)) = schema.attribute("labels") else {
        panic!("labels is not a map");
    };
    assert_eq!(labels.element_type, ElementType::String);

    let Some(Attribute::List(matrix)) = schema.attribute("matrix") else {
        panic!("matrix is not a list");
    };
    assert_eq!(matrix.element_type, ElementType::list(ElementType::String));

    let Some(Attribute::List(aliases)) = schema.attribute("aliases") else {
        panic!("aliases is not a list");
    };
    assert_eq!(aliases.element_type, ElementType::String);

    for name in ["created_at", "timeout", "payload", "extra", "annotations"] {
        assert!(
            matches!(schema.attribute(name), Some(Attribute::String(_))),
            "{name} is not a string"
        );
    }
    let endpoints = schema.attribute("endpoints").expect("Missing endpoints");
    assert!(matches!(endpoints, Attribute::MapNested(_)));
    let Attribute::Float64(weight) = &endpoints.nested().expect("Not nested")["weight"] else {
        panic!("weight is not a float");
    };
    assert_eq!(
        weight.validators,
        vec![Validator::AtLeast(0.0), Validator::AtMost(1.0)]
    );
    assert!(
        schema
            .attribute("password")
            .expect("Missing password")
            .flags()
            .sensitive
    );
}
