//! Attribute paths used to locate diagnostics.

use std::fmt;

/// One step of an attribute path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Named attribute.
    AttributeName(String),
    /// Index into a list.
    ListIndex(usize),
    /// Key of a map.
    MapKey(String),
}

/// Path from the root of a schema to one attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// Returns the empty root path.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a child path for a named attribute.
    #[must_use]
    pub fn at_name(&self, name: impl Into<String>) -> Self {
        self.with(PathStep::AttributeName(name.into()))
    }

    /// Returns a child path for a list element.
    #[must_use]
    pub fn at_list_index(&self, index: usize) -> Self {
        self.with(PathStep::ListIndex(index))
    }

    /// Returns a child path for a map value.
    #[must_use]
    pub fn at_map_key(&self, key: impl Into<String>) -> Self {
        self.with(PathStep::MapKey(key.into()))
    }

    /// Returns the steps of the path.
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Returns true for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    fn with(&self, step: PathStep) -> Self {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend_from_slice(&self.steps);
        steps.push(step);
        Self { steps }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::AttributeName(name) if i == 0 => write!(f, "{name}")?,
                PathStep::AttributeName(name) => write!(f, ".{name}")?,
                PathStep::ListIndex(index) => write!(f, "[{index}]")?,
                PathStep::MapKey(key) => write!(f, "[{key:?}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        let path = Path::root()
            .at_name("ingredients")
            .at_list_index(2)
            .at_name("id");
        assert_eq!(path.to_string(), "ingredients[2].id");

        let path = Path::root().at_name("labels").at_map_key("env");
        assert_eq!(path.to_string(), "labels[\"env\"]");
        assert_eq!(Path::root().to_string(), "");
    }

    #[test]
    fn test_path_is_immutable() {
        let parent = Path::root().at_name("customer");
        let child = parent.at_name("name");
        assert_eq!(parent.steps().len(), 1);
        assert_eq!(child.steps().len(), 2);
        assert!(Path::root().is_root());
    }
}
