//! # tfgen Tests
//!
//! Fixture types and the code generated for them by `build.rs`.

pub mod structs;

/// Wire models, decode and encode procedures.
pub mod generated {
    include!(concat!(env!("OUT_DIR"), "/generated.rs"));
}

/// Schema builders.
pub mod schema {
    include!(concat!(env!("OUT_DIR"), "/schema.rs"));
}
