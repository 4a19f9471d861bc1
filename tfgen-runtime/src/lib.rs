//! # tfgen Runtime
//!
//! Types and traits the code produced by `tfgen-codegen` links against.
//!
//! This crate provides:
//! - Nullable wire values (`BoolValue`, `Int64Value`, `Float64Value`, `StringValue`)
//! - Attribute paths and accumulated diagnostics
//! - Schema descriptors for providers, resources and data sources
//! - The `Getter`/`Setter`/`Model` capabilities and a JSON backed `State`
//!
//! The crates generated code relies on are re-exported so that a provider
//! only needs to depend on this crate.

pub mod diag;
pub mod error;
pub mod model;
pub mod path;
pub mod schema;
pub mod state;
pub mod types;

pub use diag::{Diagnostic, Diagnostics, Severity};
pub use error::{Error, Result};
pub use model::{Getter, Model, Setter, decode, set};
pub use path::{Path, PathStep};
pub use state::State;
pub use types::{BoolValue, ElementType, Float64Value, Int64Value, Nullable, StringValue};

pub use chrono;
pub use humantime;
pub use serde;
pub use serde_json;
