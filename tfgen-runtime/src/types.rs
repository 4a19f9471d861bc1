//! Wire value types.
//!
//! Every primitive crossing the provider boundary is nullable: a null value
//! is distinct from the zero value of its type, and decoding never replaces
//! a native value with the zero value of a null wire value.

use serde::{Deserialize, Serialize};

/// Nullable wire value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nullable<T> {
    inner: Option<T>,
}

/// Nullable boolean.
pub type BoolValue = Nullable<bool>;
/// Nullable 64-bit integer.
pub type Int64Value = Nullable<i64>;
/// Nullable 64-bit float.
pub type Float64Value = Nullable<f64>;
/// Nullable string.
pub type StringValue = Nullable<String>;

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> Nullable<T> {
    /// Creates a null value.
    #[must_use]
    pub const fn null() -> Self {
        Self { inner: None }
    }

    /// Creates a known value.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self { inner: Some(value) }
    }

    /// Creates a value that is null when `value` is `None`.
    #[must_use]
    pub const fn from_option(value: Option<T>) -> Self {
        Self { inner: value }
    }

    /// Returns true if the value is null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    /// Returns the value as an option reference.
    #[must_use]
    pub const fn as_option(&self) -> Option<&T> {
        self.inner.as_ref()
    }

    /// Consumes the value and returns the inner option.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        self.inner
    }
}

impl<T: Clone + Default> Nullable<T> {
    /// Returns the value, or the zero value when null.
    #[must_use]
    pub fn value(&self) -> T {
        self.inner.clone().unwrap_or_default()
    }
}

impl<T> From<T> for Nullable<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

/// Element type of a primitive collection attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    /// Boolean elements.
    Bool,
    /// 64-bit integer elements.
    Int64,
    /// 64-bit float elements.
    Float64,
    /// String elements.
    String,
    /// List elements.
    List(Box<ElementType>),
    /// Map elements.
    Map(Box<ElementType>),
}

impl ElementType {
    /// Creates a list element type.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::List(Box::new(element))
    }

    /// Creates a map element type.
    #[must_use]
    pub fn map(element: Self) -> Self {
        Self::Map(Box::new(element))
    }
}
