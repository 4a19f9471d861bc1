//! Rust code generation modules.
//!
//! One generator per artifact: wire models, decode procedures, encode
//! procedures and schema builders.

pub mod decoders;
pub mod encoders;
pub mod models;
pub mod schema;

pub use decoders::DecoderGenerator;
pub use encoders::EncoderGenerator;
pub use models::ModelGenerator;
pub use schema::SchemaGenerator;
