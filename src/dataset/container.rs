//! Named collection of fields sharing dimension sizes.

use std::collections::BTreeMap;

use crate::error::{ComputeError, Result};
use crate::grid::{Dim, Field, format_dims};

/// A set of variables and 1-D coordinates with consistent dimension sizes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    variables: BTreeMap<String, Field>,
    coords: BTreeMap<Dim, Field>,
    sizes: BTreeMap<Dim, usize>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a variable.
    ///
    /// Fails if one of its dims has a different size than already registered.
    pub fn insert(&mut self, name: impl Into<String>, field: Field) -> Result<()> {
        let name = name.into();
        self.check_sizes(&name, &field)?;
        self.register_sizes(&field);
        self.variables.insert(name, field);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, field: Field) -> Result<Self> {
        self.insert(name, field)?;
        Ok(self)
    }

    /// Set the values of a 1-D coordinate (`Z`, `Zl`, `Zp1`, `time`, ...).
    pub fn set_coord(&mut self, dim: Dim, values: Vec<f64>) -> Result<()> {
        let field = Field::from_vec(dim, values);
        self.check_sizes(dim.name(), &field)?;
        self.register_sizes(&field);
        self.coords.insert(dim, field);
        Ok(())
    }

    /// Variable by name.
    pub fn get(&self, name: &str) -> Result<&Field> {
        self.variables
            .get(name)
            .ok_or_else(|| ComputeError::MissingVariable(name.to_string()))
    }

    /// Coordinate values along `dim`.
    pub fn coord(&self, dim: Dim) -> Result<&Field> {
        self.coords
            .get(&dim)
            .ok_or_else(|| ComputeError::MissingCoordinate(dim.name().to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Field> {
        self.variables.remove(name)
    }

    /// Variable names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// `(name, field)` pairs in sorted order.
    pub fn data_vars(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Coordinates in dimension order.
    pub fn coords(&self) -> impl Iterator<Item = (Dim, &Field)> {
        self.coords.iter().map(|(d, f)| (*d, f))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Size of a dimension, if any variable or coordinate uses it.
    pub fn size_of(&self, dim: Dim) -> Option<usize> {
        self.sizes.get(&dim).copied()
    }

    /// All known dimensions with their sizes.
    pub fn sizes(&self) -> &BTreeMap<Dim, usize> {
        &self.sizes
    }

    /// True if any variable or coordinate spans `dim`.
    pub fn has_dim(&self, dim: Dim) -> bool {
        self.sizes.contains_key(&dim)
    }

    /// Merge `other` into `self`; variables with the same name are overwritten.
    pub fn merge(&mut self, other: Dataset) -> Result<()> {
        for (dim, coord) in other.coords {
            if !self.coords.contains_key(&dim) {
                self.check_sizes(dim.name(), &coord)?;
                self.register_sizes(&coord);
                self.coords.insert(dim, coord);
            }
        }
        for (name, field) in other.variables {
            self.insert(name, field)?;
        }
        Ok(())
    }

    fn check_sizes(&self, name: &str, field: &Field) -> Result<()> {
        for (&dim, &n) in field.dims().iter().zip(field.shape()) {
            if let Some(&known) = self.sizes.get(&dim)
                && known != n
            {
                return Err(ComputeError::shape_mismatch(
                    format!("`{dim}` of size {known}"),
                    format!("`{name}` {} with `{dim}` of size {n}", format_dims(field.dims())),
                ));
            }
        }
        Ok(())
    }

    fn register_sizes(&mut self, field: &Field) {
        for (&dim, &n) in field.dims().iter().zip(field.shape()) {
            self.sizes.insert(dim, n);
        }
    }
}
