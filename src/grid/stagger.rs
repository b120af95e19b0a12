//! Staggered differences and interpolations.
//!
//! Each operator moves a field half a cell along one axis:
//!
//! | from  | to        | `diff` at output n        | missing neighbor |
//! |-------|-----------|---------------------------|------------------|
//! | `X`   | `Xp1`     | `f[n] - f[n-1]`           | n = 0, n = nx    |
//! | `Xp1` | `X`       | `f[n+1] - f[n]`           | none             |
//! | `Z`   | `Zl`      | `f[n-1] - f[n]`           | n = 0            |
//! | `Zl`  | `Z`       | `f[n] - f[n+1]`           | n = nz - 1       |
//! | `Zp1` | `Z`       | `f[n] - f[n+1]`           | none             |
//! | `time`| `time_midp` | `f[n+1] - f[n]`         | none             |
//!
//! `Y`/`Yp1` behave like `X`/`Xp1`. Vertical differences are "above minus
//! below" because the vertical index grows downward, so dividing by the
//! difference of the vertical coordinate gives a derivative with respect to
//! upward z. `interp` returns the mean of the same two neighbors.

use super::{Axis, Dim, Field};
use crate::error::{ComputeError, Result};

/// What to use for a neighbor that falls outside the domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Boundary {
    /// Substitute a constant (NaN leaves the edge undefined).
    Fill(f64),
    /// Repeat the nearest interior value.
    Extend,
}

impl Default for Boundary {
    fn default() -> Self {
        Boundary::Fill(f64::NAN)
    }
}

/// Neighbor pair feeding output index `n`: `(hi, lo)` with diff = f[hi] - f[lo].
#[derive(Clone, Copy, Debug)]
struct Transition {
    target: Dim,
    out_len: usize,
    hi_offset: isize,
    lo_offset: isize,
}

fn transition(source: Dim, len: usize) -> Result<Transition> {
    let t = match source {
        Dim::X | Dim::Y => Transition {
            target: if source == Dim::X { Dim::Xp1 } else { Dim::Yp1 },
            out_len: len + 1,
            hi_offset: 0,
            lo_offset: -1,
        },
        Dim::Xp1 | Dim::Yp1 => Transition {
            target: if source == Dim::Xp1 { Dim::X } else { Dim::Y },
            out_len: len.saturating_sub(1),
            hi_offset: 1,
            lo_offset: 0,
        },
        Dim::Z => Transition {
            target: Dim::Zl,
            out_len: len,
            hi_offset: -1,
            lo_offset: 0,
        },
        Dim::Zl => Transition {
            target: Dim::Z,
            out_len: len,
            hi_offset: 0,
            lo_offset: 1,
        },
        Dim::Zp1 => Transition {
            target: Dim::Z,
            out_len: len.saturating_sub(1),
            hi_offset: 0,
            lo_offset: 1,
        },
        Dim::Time => Transition {
            target: Dim::TimeMidp,
            out_len: len.saturating_sub(1),
            hi_offset: 1,
            lo_offset: 0,
        },
        other => {
            return Err(ComputeError::DimensionMismatch(format!(
                "no staggered counterpart for `{other}`"
            )));
        }
    };
    Ok(t)
}

fn apply(
    field: &Field,
    axis: Axis,
    boundary: Boundary,
    combine: impl Fn(f64, f64) -> f64,
) -> Result<Field> {
    let slot = axis.slot();
    let source = field.dim_at_slot(slot).ok_or_else(|| {
        ComputeError::DimensionMismatch(format!("field has no dimension along axis {axis}"))
    })?;
    let len = field.shape4()[slot];
    if len == 0 {
        return Err(ComputeError::DimensionMismatch(format!(
            "cannot stagger along empty dimension `{source}`"
        )));
    }
    let tr = transition(source, len)?;

    let mut dims = field.dims().to_vec();
    let mut shape = field.shape().to_vec();
    let pos = dims.iter().position(|&d| d == source).unwrap_or_default();
    dims[pos] = tr.target;
    shape[pos] = tr.out_len;

    let value = |mut idx: [usize; 4], offset: isize| -> f64 {
        let n = idx[slot] as isize + offset;
        if n >= 0 && (n as usize) < len {
            idx[slot] = n as usize;
            return field.at(idx);
        }
        match boundary {
            Boundary::Fill(v) => v,
            Boundary::Extend => {
                idx[slot] = if n < 0 { 0 } else { len - 1 };
                field.at(idx)
            }
        }
    };

    Field::from_fn(&dims, &shape, |idx| {
        combine(value(idx, tr.hi_offset), value(idx, tr.lo_offset))
    })
}

/// Staggered difference along `axis`.
pub fn diff(field: &Field, axis: Axis, boundary: Boundary) -> Result<Field> {
    apply(field, axis, boundary, |hi, lo| hi - lo)
}

/// Staggered two-point mean along `axis`.
pub fn interp(field: &Field, axis: Axis, boundary: Boundary) -> Result<Field> {
    apply(field, axis, boundary, |hi, lo| 0.5 * (hi + lo))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(dim: Dim, values: &[f64]) -> Field {
        Field::from_vec(dim, values.to_vec())
    }

    #[test]
    fn test_center_to_face_diff_fills_edges() {
        let f = row(Dim::X, &[1.0, 3.0, 6.0]);
        let d = diff(&f, Axis::X, Boundary::default()).unwrap();
        assert_eq!(d.dims(), &[Dim::Xp1]);
        assert!(d.data()[0].is_nan());
        assert_eq!(&d.data()[1..3], &[2.0, 3.0]);
        assert!(d.data()[3].is_nan());
    }

    #[test]
    fn test_center_to_face_diff_extend() {
        let f = row(Dim::Y, &[1.0, 3.0]);
        let d = diff(&f, Axis::Y, Boundary::Extend).unwrap();
        assert_eq!(d.dims(), &[Dim::Yp1]);
        assert_eq!(d.data(), &[0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_face_to_center_interp() {
        let f = row(Dim::Xp1, &[0.0, 2.0, 4.0]);
        let m = interp(&f, Axis::X, Boundary::default()).unwrap();
        assert_eq!(m.dims(), &[Dim::X]);
        assert_eq!(m.data(), &[1.0, 3.0]);
    }

    #[test]
    fn test_vertical_diff_is_above_minus_below() {
        // Index grows downward
        let f = row(Dim::Z, &[10.0, 7.0, 1.0]);
        let d = diff(&f, Axis::Z, Boundary::default()).unwrap();
        assert_eq!(d.dims(), &[Dim::Zl]);
        assert!(d.data()[0].is_nan());
        assert_eq!(&d.data()[1..], &[3.0, 6.0]);
    }

    #[test]
    fn test_zl_to_center_with_zero_bottom() {
        let w = row(Dim::Zl, &[1.0, 2.0, 4.0]);
        let m = interp(&w, Axis::Z, Boundary::Fill(0.0)).unwrap();
        assert_eq!(m.dims(), &[Dim::Z]);
        assert_eq!(m.data(), &[1.5, 3.0, 2.0]);
    }

    #[test]
    fn test_time_diff_to_midpoints() {
        let f = row(Dim::Time, &[0.0, 1.0, 4.0]);
        let d = diff(&f, Axis::Time, Boundary::default()).unwrap();
        assert_eq!(d.dims(), &[Dim::TimeMidp]);
        assert_eq!(d.data(), &[1.0, 3.0]);
    }

    #[test]
    fn test_empty_dimension_is_error() {
        let empty = row(Dim::X, &[]);
        for boundary in [Boundary::Extend, Boundary::default()] {
            assert!(matches!(
                diff(&empty, Axis::X, boundary),
                Err(ComputeError::DimensionMismatch(_))
            ));
            assert!(interp(&empty, Axis::X, boundary).is_err());
        }
    }

    #[test]
    fn test_missing_axis_is_error() {
        let f = row(Dim::X, &[1.0, 2.0]);
        assert!(diff(&f, Axis::Z, Boundary::default()).is_err());
    }

    #[test]
    fn test_diff_in_4d_acts_on_one_axis() {
        let f = Field::from_fn(&[Dim::Time, Dim::Z, Dim::Y, Dim::X], &[2, 2, 3, 4], |[t, k, j, i]| {
            (t * 1000 + k * 100 + j * 10 + i) as f64
        })
        .unwrap();
        let d = diff(&f, Axis::Y, Boundary::default()).unwrap();
        assert_eq!(d.dims(), &[Dim::Time, Dim::Z, Dim::Yp1, Dim::X]);
        assert_eq!(d.shape(), &[2, 2, 4, 4]);
        assert_eq!(d.at([1, 1, 1, 2]), 10.0);
        assert!(d.at([1, 1, 0, 2]).is_nan());
        assert!(d.at([0, 0, 3, 0]).is_nan());
    }
}
