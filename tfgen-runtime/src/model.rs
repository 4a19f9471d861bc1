//! Getter and setter capabilities.
//!
//! Generated code reads a wire model through a [`Getter`] and writes one
//! through a [`Setter`]. Root types implement [`Model`], which lets callers
//! move native values in and out of state with [`decode`] and [`set`]
//! without naming the generated procedures.

use crate::diag::Diagnostics;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Source of wire data.
pub trait Getter {
    /// Reads the stored data into `target`.
    ///
    /// `target` is left untouched when no data is stored.
    fn get<T: DeserializeOwned>(&self, target: &mut Option<T>) -> Diagnostics;
}

/// Sink of wire data.
pub trait Setter {
    /// Stores `value`, replacing any previous data.
    fn set<T: Serialize + ?Sized>(&mut self, value: &T) -> Diagnostics;
}

/// Native type with generated wire conversions.
pub trait Model: Sized {
    /// Decodes a value read from `getter` into `target`.
    fn read<G: Getter>(getter: &G, target: &mut Option<Self>) -> Diagnostics;

    /// Encodes `self` and writes it to `setter`.
    fn write<S: Setter>(&self, setter: &mut S) -> Diagnostics;
}

/// Decodes the data held by `getter` into `target`.
pub fn decode<T: Model, G: Getter>(getter: &G, target: &mut Option<T>) -> Diagnostics {
    T::read(getter, target)
}

/// Encodes `value` into `setter`.
pub fn set<T: Model, S: Setter>(setter: &mut S, value: &T) -> Diagnostics {
    value.write(setter)
}
