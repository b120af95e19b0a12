//! Named dimensions of a C-grid dataset.
//!
//! Dimension names follow MITgcm output conventions:
//!
//! ```text
//!        Xp1[i]      Xp1[i+1]
//!   Yp1[j+1] G ─── V ─── G
//!            │           │
//!            U     C     U      C = (Y, X)     tracer point
//!            │           │      U = (Y, Xp1)   west face
//!   Yp1[j]   G ─── V ─── G      V = (Yp1, X)   south face
//!                               G = (Yp1, Xp1) south-west corner
//! ```
//!
//! Vertically, `Z` holds cell centers, `Zl` the upper interface of each cell
//! and `Zp1` every interface (one more than `Z`). The vertical index grows
//! downward, so `Zl[k]` sits above `Z[k]`.

use std::fmt;
use std::str::FromStr;

use crate::error::ComputeError;

/// A named dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dim {
    /// Model snapshots.
    Time,
    /// Midpoints between consecutive snapshots.
    TimeMidp,
    /// Cell centers.
    Z,
    /// Upper cell interfaces.
    Zl,
    /// All cell interfaces.
    Zp1,
    /// Tracer rows.
    Y,
    /// Face/corner rows.
    Yp1,
    /// Tracer columns.
    X,
    /// Face/corner columns.
    Xp1,
    /// Points of a mooring array.
    Mooring,
    /// Cells along a transport section.
    Path,
    /// Stations of a survey.
    Station,
}

impl Dim {
    /// Position of this dimension in the canonical `(time, vertical, y, x)` ordering.
    ///
    /// Section dimensions (`mooring`, `path`, `station`) replace the horizontal
    /// y axis; they never coexist with `Y`/`Yp1`.
    #[inline]
    pub const fn slot(self) -> usize {
        match self {
            Dim::Time | Dim::TimeMidp => 0,
            Dim::Z | Dim::Zl | Dim::Zp1 => 1,
            Dim::Y | Dim::Yp1 | Dim::Mooring | Dim::Path | Dim::Station => 2,
            Dim::X | Dim::Xp1 => 3,
        }
    }

    /// Dimension name as written in datasets.
    pub const fn name(self) -> &'static str {
        match self {
            Dim::Time => "time",
            Dim::TimeMidp => "time_midp",
            Dim::Z => "Z",
            Dim::Zl => "Zl",
            Dim::Zp1 => "Zp1",
            Dim::Y => "Y",
            Dim::Yp1 => "Yp1",
            Dim::X => "X",
            Dim::Xp1 => "Xp1",
            Dim::Mooring => "mooring",
            Dim::Path => "path",
            Dim::Station => "station",
        }
    }

    /// True for the staggered horizontal dimensions (`Xp1`, `Yp1`).
    #[inline]
    pub const fn is_outer(self) -> bool {
        matches!(self, Dim::Xp1 | Dim::Yp1)
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dim {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "time" => Dim::Time,
            "time_midp" => Dim::TimeMidp,
            "Z" => Dim::Z,
            "Zl" => Dim::Zl,
            "Zp1" => Dim::Zp1,
            "Y" => Dim::Y,
            "Yp1" => Dim::Yp1,
            "X" => Dim::X,
            "Xp1" => Dim::Xp1,
            "mooring" => Dim::Mooring,
            "path" => Dim::Path,
            "station" => Dim::Station,
            other => {
                return Err(ComputeError::InvalidInput(format!(
                    "unknown dimension `{other}`"
                )));
            }
        })
    }
}

/// Axis along which a staggered operator acts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    Time,
}

impl Axis {
    /// Slot of the axis in the canonical ordering.
    #[inline]
    pub const fn slot(self) -> usize {
        match self {
            Axis::Time => 0,
            Axis::Z => 1,
            Axis::Y => 2,
            Axis::X => 3,
        }
    }

    /// Name used when building output variable names (`dSigma0_dZ`).
    pub const fn name(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
            Axis::Time => "time",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Axis {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "X" => Ok(Axis::X),
            "Y" => Ok(Axis::Y),
            "Z" => Ok(Axis::Z),
            "time" => Ok(Axis::Time),
            other => Err(ComputeError::InvalidInput(format!("unknown axis `{other}`"))),
        }
    }
}

/// Horizontal location of a field on the C-grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridPoint {
    /// Tracer point (Y, X).
    C,
    /// West face (Y, Xp1).
    U,
    /// South face (Yp1, X).
    V,
    /// South-west corner (Yp1, Xp1).
    G,
}

impl GridPoint {
    /// Horizontal dims `(y, x)` of this point class.
    pub const fn dims(self) -> (Dim, Dim) {
        match self {
            GridPoint::C => (Dim::Y, Dim::X),
            GridPoint::U => (Dim::Y, Dim::Xp1),
            GridPoint::V => (Dim::Yp1, Dim::X),
            GridPoint::G => (Dim::Yp1, Dim::Xp1),
        }
    }

    /// Classify a pair of horizontal dims.
    pub fn from_dims(y: Dim, x: Dim) -> Option<Self> {
        match (y, x) {
            (Dim::Y, Dim::X) => Some(GridPoint::C),
            (Dim::Y, Dim::Xp1) => Some(GridPoint::U),
            (Dim::Yp1, Dim::X) => Some(GridPoint::V),
            (Dim::Yp1, Dim::Xp1) => Some(GridPoint::G),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dim_roundtrip_names() {
        for dim in [
            Dim::Time,
            Dim::TimeMidp,
            Dim::Z,
            Dim::Zl,
            Dim::Zp1,
            Dim::Y,
            Dim::Yp1,
            Dim::X,
            Dim::Xp1,
            Dim::Mooring,
            Dim::Path,
            Dim::Station,
        ] {
            assert_eq!(dim.name().parse::<Dim>().unwrap(), dim);
        }
        assert!("lon".parse::<Dim>().is_err());
    }

    #[test]
    fn test_slots_are_canonical() {
        assert!(Dim::Time.slot() < Dim::Zl.slot());
        assert!(Dim::Zl.slot() < Dim::Yp1.slot());
        assert!(Dim::Yp1.slot() < Dim::Xp1.slot());
        assert_eq!(Dim::Path.slot(), Dim::Y.slot());
    }

    #[test]
    fn test_grid_point_dims() {
        for point in [GridPoint::C, GridPoint::U, GridPoint::V, GridPoint::G] {
            let (y, x) = point.dims();
            assert_eq!(GridPoint::from_dims(y, x), Some(point));
        }
        assert_eq!(GridPoint::from_dims(Dim::X, Dim::Y), None);
    }
}
