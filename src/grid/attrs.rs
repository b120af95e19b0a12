//! Variable attributes (units, long name, parameters used).

use std::collections::BTreeMap;

/// Metadata attached to a [`Field`](super::Field).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attrs {
    /// Physical units, e.g. `"s^-1"`.
    pub units: Option<String>,
    /// Human-readable description.
    pub long_name: Option<String>,
    /// Sign convention for vector components.
    pub direction: Option<String>,
    /// Parameters the variable was computed with, by name.
    pub parameters: BTreeMap<String, String>,
}

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the units.
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Set the long name.
    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = Some(long_name.into());
        self
    }

    /// Set the direction convention.
    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    /// Record a parameter used to compute the variable.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.parameters.insert(name.into(), value.to_string());
        self
    }

    /// Units, or an empty string when unset.
    pub fn units_or_empty(&self) -> &str {
        self.units.as_deref().unwrap_or("")
    }
}
