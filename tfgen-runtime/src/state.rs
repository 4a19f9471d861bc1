//! In-memory JSON state.

use crate::diag::Diagnostics;
use crate::error::{Error, Result};
use crate::model::{Getter, Setter};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// JSON document implementing both [`Getter`] and [`Setter`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    raw: Value,
}

impl State {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a state document.
    ///
    /// # Errors
    /// Returns an error if `json` is not valid JSON or is neither an object
    /// nor null.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(json)?;
        Self::from_value(raw)
    }

    /// Wraps an existing JSON value.
    ///
    /// # Errors
    /// Returns `Error::InvalidState` if `raw` is neither an object nor null.
    pub fn from_value(raw: Value) -> Result<Self> {
        let found = match &raw {
            Value::Object(_) | Value::Null => return Ok(Self { raw }),
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
        };
        Err(Error::InvalidState {
            found: found.to_string(),
        })
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_null()
    }

    /// Returns the raw document.
    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Serializes the document.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.raw)?)
    }
}

impl Getter for State {
    fn get<T: DeserializeOwned>(&self, target: &mut Option<T>) -> Diagnostics {
        let mut diags = Diagnostics::new();
        if self.raw.is_null() {
            return diags;
        }
        match T::deserialize(&self.raw) {
            Ok(value) => *target = Some(value),
            Err(e) => diags.add_error("failed to read state", e.to_string()),
        }
        diags
    }
}

impl Setter for State {
    fn set<T: Serialize + ?Sized>(&mut self, value: &T) -> Diagnostics {
        let mut diags = Diagnostics::new();
        match serde_json::to_value(value) {
            Ok(raw) => self.raw = raw,
            Err(e) => diags.add_error("failed to write state", e.to_string()),
        }
        diags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Int64Value, StringValue};
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Wire {
        id: Int64Value,
        name: StringValue,
    }

    #[test]
    fn test_state_round_trip() {
        let mut state = State::new();
        assert!(state.is_empty());

        let wire = Wire {
            id: Int64Value::new(3),
            name: StringValue::null(),
        };
        let diags = state.set(&wire);
        assert!(diags.is_empty());
        assert_eq!(
            state.to_json().expect("Failed to serialize"),
            r#"{"id":3,"name":null}"#
        );

        let mut read: Option<Wire> = None;
        let diags = state.get(&mut read);
        assert!(diags.is_empty());
        assert_eq!(read, Some(wire));
    }

    #[test]
    fn test_state_empty_leaves_target() {
        let state = State::new();
        let mut read = Some(Wire::default());
        let diags = state.get(&mut read);
        assert!(diags.is_empty());
        assert_eq!(read, Some(Wire::default()));
    }

    #[test]
    fn test_state_type_mismatch() {
        let state = State::from_json(r#"{"id":"three"}"#).expect("Failed to parse");
        let mut read: Option<Wire> = None;
        let diags = state.get(&mut read);
        assert!(diags.has_error());
        assert!(read.is_none());
    }

    #[test]
    fn test_state_rejects_scalars() {
        assert!(matches!(
            State::from_json("[1, 2]"),
            Err(Error::InvalidState { .. })
        ));
        assert!(matches!(State::from_json("{"), Err(Error::Json(_))));
    }
}
