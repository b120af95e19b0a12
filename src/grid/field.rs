//! Labeled multi-dimensional arrays.
//!
//! A [`Field`] is a contiguous row-major `Vec<f64>` plus the names of its
//! dimensions. Dimensions always appear in the canonical order
//! `(time, vertical, y, x)`, any of which may be absent. Internally every field
//! is addressed through four slots; a missing dimension has extent 1 and stride
//! 0, which gives broadcasting for free when two fields are combined.

use super::{Attrs, Dim};
use crate::error::{ComputeError, Result};

/// Number of canonical slots (time, vertical, y, x).
pub const N_SLOTS: usize = 4;

/// A 4-slot index into a field.
pub type Index4 = [usize; N_SLOTS];

/// Row-major layout of a field expressed in canonical slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Extent per slot (1 when the slot is absent).
    pub shape: [usize; N_SLOTS],
    /// Stride per slot (0 when the slot is absent).
    pub strides: [usize; N_SLOTS],
}

impl Layout {
    #[inline]
    fn offset(&self, idx: Index4) -> usize {
        idx[0] * self.strides[0]
            + idx[1] * self.strides[1]
            + idx[2] * self.strides[2]
            + idx[3] * self.strides[3]
    }
}

/// A named n-dimensional array with attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    dims: Vec<Dim>,
    shape: Vec<usize>,
    data: Vec<f64>,
    layout: Layout,
    /// Variable metadata.
    pub attrs: Attrs,
}

impl Field {
    /// Create a field from its dims, shape and row-major data.
    pub fn new(dims: &[Dim], shape: &[usize], data: Vec<f64>) -> Result<Self> {
        check_canonical(dims)?;
        if dims.len() != shape.len() {
            return Err(ComputeError::shape_mismatch(
                format!("{} extents for dims {}", dims.len(), format_dims(dims)),
                format!("{} extents", shape.len()),
            ));
        }
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(ComputeError::shape_mismatch(
                format!("{expected} values for shape {shape:?}"),
                format!("{} values", data.len()),
            ));
        }
        let layout = build_layout(dims, shape);
        Ok(Self {
            dims: dims.to_vec(),
            shape: shape.to_vec(),
            data,
            layout,
            attrs: Attrs::default(),
        })
    }

    /// Field with every element set to `value`.
    pub fn filled(dims: &[Dim], shape: &[usize], value: f64) -> Result<Self> {
        let n = shape.iter().product();
        Self::new(dims, shape, vec![value; n])
    }

    /// Zero-dimensional field.
    pub fn scalar(value: f64) -> Self {
        Self {
            dims: Vec::new(),
            shape: Vec::new(),
            data: vec![value],
            layout: build_layout(&[], &[]),
            attrs: Attrs::default(),
        }
    }

    /// One-dimensional field.
    pub fn from_vec(dim: Dim, values: Vec<f64>) -> Self {
        let n = values.len();
        Self {
            dims: vec![dim],
            shape: vec![n],
            data: values,
            layout: build_layout(&[dim], &[n]),
            attrs: Attrs::default(),
        }
    }

    /// Build a field by evaluating `f` at every 4-slot index.
    ///
    /// Absent slots are passed as 0.
    pub fn from_fn(
        dims: &[Dim],
        shape: &[usize],
        mut f: impl FnMut(Index4) -> f64,
    ) -> Result<Self> {
        check_canonical(dims)?;
        if dims.len() != shape.len() {
            return Err(ComputeError::shape_mismatch(
                format!("{} extents", dims.len()),
                format!("{} extents", shape.len()),
            ));
        }
        let layout = build_layout(dims, shape);
        let n: usize = shape.iter().product();
        let mut data = Vec::with_capacity(n);
        let [n0, n1, n2, n3] = layout.shape;
        for a in 0..n0 {
            for b in 0..n1 {
                for c in 0..n2 {
                    for d in 0..n3 {
                        data.push(f([a, b, c, d]));
                    }
                }
            }
        }
        Ok(Self {
            dims: dims.to_vec(),
            shape: shape.to_vec(),
            data,
            layout,
            attrs: Attrs::default(),
        })
    }

    /// Attach attributes.
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    #[inline]
    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Extent per canonical slot.
    #[inline]
    pub fn shape4(&self) -> [usize; N_SLOTS] {
        self.layout.shape
    }

    /// Extent of `dim`, if present.
    pub fn size_of(&self, dim: Dim) -> Option<usize> {
        self.dims
            .iter()
            .position(|&d| d == dim)
            .map(|p| self.shape[p])
    }

    pub fn has_dim(&self, dim: Dim) -> bool {
        self.dims.contains(&dim)
    }

    /// The dimension occupying a canonical slot.
    pub fn dim_at_slot(&self, slot: usize) -> Option<Dim> {
        self.dims.iter().copied().find(|d| d.slot() == slot)
    }

    /// Value at a 4-slot index. Indices in absent slots are ignored.
    #[inline]
    pub fn at(&self, idx: Index4) -> f64 {
        self.data[self.layout.offset(idx)]
    }

    /// Value at an index given in the field's own dimension order.
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        if index.len() != self.dims.len() {
            return None;
        }
        let mut idx = [0; N_SLOTS];
        for ((dim, &n), &i) in self.dims.iter().zip(&self.shape).zip(index) {
            if i >= n {
                return None;
            }
            idx[dim.slot()] = i;
        }
        Some(self.at(idx))
    }

    /// Apply `f` elementwise. Attributes are dropped.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Field {
        Field {
            dims: self.dims.clone(),
            shape: self.shape.clone(),
            data: self.data.iter().map(|&v| f(v)).collect(),
            layout: self.layout,
            attrs: Attrs::default(),
        }
    }

    /// Combine two fields elementwise, broadcasting over dims missing from either.
    pub fn zip_with(&self, other: &Field, f: impl Fn(f64, f64) -> f64) -> Result<Field> {
        let (dims, shape) = broadcast(self, other)?;
        Field::from_fn(&dims, &shape, |idx| f(self.at(idx), other.at(idx)))
    }

    pub fn add(&self, other: &Field) -> Result<Field> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Field) -> Result<Field> {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn mul(&self, other: &Field) -> Result<Field> {
        self.zip_with(other, |a, b| a * b)
    }

    pub fn div(&self, other: &Field) -> Result<Field> {
        self.zip_with(other, |a, b| a / b)
    }

    pub fn scale(&self, factor: f64) -> Field {
        self.map(|v| v * factor)
    }

    /// Select a single index along `dim`, removing the dimension.
    pub fn isel(&self, dim: Dim, index: usize) -> Result<Field> {
        let n = self
            .size_of(dim)
            .ok_or_else(|| ComputeError::DimensionMismatch(format!("field has no `{dim}` dim")))?;
        if index >= n {
            return Err(ComputeError::InvalidInput(format!(
                "index {index} out of range for `{dim}` of size {n}"
            )));
        }
        let (dims, shape) = self.without(dim);
        let slot = dim.slot();
        Field::from_fn(&dims, &shape, |mut idx| {
            idx[slot] = index;
            self.at(idx)
        })
    }

    /// Arithmetic mean along `dim`, removing the dimension. NaN propagates.
    pub fn mean_over(&self, dim: Dim) -> Result<Field> {
        let n = self
            .size_of(dim)
            .ok_or_else(|| ComputeError::DimensionMismatch(format!("field has no `{dim}` dim")))?;
        let sum = self.sum_over(dim)?;
        Ok(sum.scale(1.0 / n as f64))
    }

    /// Sum along `dim`, removing the dimension. NaN propagates.
    pub fn sum_over(&self, dim: Dim) -> Result<Field> {
        let n = self
            .size_of(dim)
            .ok_or_else(|| ComputeError::DimensionMismatch(format!("field has no `{dim}` dim")))?;
        let (dims, shape) = self.without(dim);
        let slot = dim.slot();
        Field::from_fn(&dims, &shape, |mut idx| {
            (0..n)
                .map(|m| {
                    idx[slot] = m;
                    self.at(idx)
                })
                .sum()
        })
    }

    fn without(&self, dim: Dim) -> (Vec<Dim>, Vec<usize>) {
        self.dims
            .iter()
            .zip(&self.shape)
            .filter(|(d, _)| **d != dim)
            .map(|(&d, &n)| (d, n))
            .unzip()
    }
}

/// Dims and shape resulting from broadcasting `a` against `b`.
pub fn broadcast(a: &Field, b: &Field) -> Result<(Vec<Dim>, Vec<usize>)> {
    let mut dims = Vec::with_capacity(N_SLOTS);
    let mut shape = Vec::with_capacity(N_SLOTS);
    for slot in 0..N_SLOTS {
        match (a.dim_at_slot(slot), b.dim_at_slot(slot)) {
            (Some(da), Some(db)) => {
                if da != db {
                    return Err(ComputeError::DimensionMismatch(format!(
                        "cannot align `{da}` with `{db}`"
                    )));
                }
                let (na, nb) = (a.layout.shape[slot], b.layout.shape[slot]);
                if na != nb {
                    return Err(ComputeError::shape_mismatch(
                        format!("`{da}` of size {na}"),
                        format!("`{db}` of size {nb}"),
                    ));
                }
                dims.push(da);
                shape.push(na);
            }
            (Some(d), None) => {
                dims.push(d);
                shape.push(a.layout.shape[slot]);
            }
            (None, Some(d)) => {
                dims.push(d);
                shape.push(b.layout.shape[slot]);
            }
            (None, None) => {}
        }
    }
    Ok((dims, shape))
}

pub(crate) fn format_dims(dims: &[Dim]) -> String {
    let names: Vec<&str> = dims.iter().map(|d| d.name()).collect();
    format!("({})", names.join(", "))
}

fn check_canonical(dims: &[Dim]) -> Result<()> {
    let ordered = dims.windows(2).all(|w| w[0].slot() < w[1].slot());
    if ordered {
        Ok(())
    } else {
        Err(ComputeError::DimensionMismatch(format!(
            "dims {} are not in (time, vertical, y, x) order",
            format_dims(dims)
        )))
    }
}

fn build_layout(dims: &[Dim], shape: &[usize]) -> Layout {
    let mut layout = Layout {
        shape: [1; N_SLOTS],
        strides: [0; N_SLOTS],
    };
    let mut stride = 1;
    for (dim, &n) in dims.iter().zip(shape).rev() {
        let slot = dim.slot();
        layout.shape[slot] = n;
        layout.strides[slot] = if n > 1 { stride } else { 0 };
        stride *= n;
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(dims: &[Dim], shape: &[usize]) -> Field {
        let n = shape.iter().product();
        Field::new(dims, shape, (0..n).map(|v| v as f64).collect()).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_shape() {
        assert!(Field::new(&[Dim::Y, Dim::X], &[2, 3], vec![0.0; 5]).is_err());
        assert!(Field::new(&[Dim::Y], &[2, 3], vec![0.0; 6]).is_err());
    }

    #[test]
    fn test_new_rejects_non_canonical_order() {
        let err = Field::new(&[Dim::X, Dim::Y], &[2, 2], vec![0.0; 4]).unwrap_err();
        assert!(matches!(err, ComputeError::DimensionMismatch(_)));
    }

    #[test]
    fn test_get_row_major() {
        let f = ramp(&[Dim::Z, Dim::Y, Dim::X], &[2, 3, 4]);
        assert_eq!(f.get(&[0, 0, 0]), Some(0.0));
        assert_eq!(f.get(&[0, 1, 2]), Some(6.0));
        assert_eq!(f.get(&[1, 2, 3]), Some(23.0));
        assert_eq!(f.get(&[2, 0, 0]), None);
        assert_eq!(f.at([0, 1, 2, 3]), 23.0);
    }

    #[test]
    fn test_broadcast_metric_against_field() {
        let u = ramp(&[Dim::Time, Dim::Z, Dim::Y, Dim::Xp1], &[2, 2, 2, 3]);
        let dy = Field::filled(&[Dim::Y, Dim::Xp1], &[2, 3], 2.0).unwrap();
        let prod = u.mul(&dy).unwrap();
        assert_eq!(prod.dims(), u.dims());
        for (a, b) in prod.data().iter().zip(u.data()) {
            assert_eq!(*a, 2.0 * b);
        }
    }

    #[test]
    fn test_broadcast_rejects_staggered_mismatch() {
        let u = Field::filled(&[Dim::Y, Dim::Xp1], &[2, 3], 1.0).unwrap();
        let t = Field::filled(&[Dim::Y, Dim::X], &[2, 2], 1.0).unwrap();
        assert!(matches!(
            u.add(&t).unwrap_err(),
            ComputeError::DimensionMismatch(_)
        ));
    }

    #[test]
    fn test_broadcast_rejects_size_mismatch() {
        let a = Field::filled(&[Dim::Y, Dim::X], &[2, 3], 1.0).unwrap();
        let b = Field::filled(&[Dim::Y, Dim::X], &[2, 4], 1.0).unwrap();
        assert!(matches!(
            a.add(&b).unwrap_err(),
            ComputeError::ShapeMismatch { .. }
        ));
    }

    #[test]
    fn test_mean_over_time() {
        let f = ramp(&[Dim::Time, Dim::X], &[3, 2]);
        let m = f.mean_over(Dim::Time).unwrap();
        assert_eq!(m.dims(), &[Dim::X]);
        assert_eq!(m.data(), &[2.0, 3.0]);
    }

    #[test]
    fn test_isel_removes_dim() {
        let f = ramp(&[Dim::Time, Dim::Z, Dim::X], &[2, 2, 2]);
        let s = f.isel(Dim::Z, 1).unwrap();
        assert_eq!(s.dims(), &[Dim::Time, Dim::X]);
        assert_eq!(s.data(), &[2.0, 3.0, 6.0, 7.0]);
        assert!(f.isel(Dim::Z, 2).is_err());
        assert!(f.isel(Dim::Y, 0).is_err());
    }

    #[test]
    fn test_singleton_dims_broadcast() {
        let a = Field::filled(&[Dim::Time, Dim::X], &[1, 3], 1.0).unwrap();
        let b = ramp(&[Dim::X], &[3]);
        assert_eq!(a.add(&b).unwrap().data(), &[1.0, 2.0, 3.0]);
    }
}
