//! Labeled arrays on an Arakawa C-grid.
//!
//! This module provides the data layer every diagnostic is built on:
//! - [`Dim`]: named dimensions following MITgcm conventions (`X`, `Xp1`, `Zl`, ...)
//! - [`Field`]: contiguous `Vec<f64>` storage with named dims and [`Attrs`]
//! - [`diff`] / [`interp`]: half-cell staggered operators with explicit [`Boundary`] handling
//!
//! # Example
//!
//! ```
//! use oceandiag_rs::grid::{diff, Axis, Boundary, Dim, Field};
//!
//! // Tracer values on three cells
//! let t = Field::from_vec(Dim::X, vec![1.0, 3.0, 6.0]);
//!
//! // Differences land on the four cell faces, edges undefined
//! let dt = diff(&t, Axis::X, Boundary::default()).unwrap();
//! assert_eq!(dt.dims(), &[Dim::Xp1]);
//! assert_eq!(dt.data()[1], 2.0);
//! ```

mod attrs;
mod dims;
mod field;
mod stagger;

pub use attrs::Attrs;
pub use dims::{Axis, Dim, GridPoint};
pub use field::{Field, Index4, Layout, N_SLOTS, broadcast};
pub use stagger::{Boundary, diff, interp};

pub(crate) use field::format_dims;
