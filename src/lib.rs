//! # oceandiag-rs
//!
//! Diagnostics for ocean-circulation model output on an Arakawa C-grid.
//!
//! This crate provides:
//! - Labeled arrays with MITgcm dimension names and staggered operators ([`grid`])
//! - Dataset containers, physical parameters and a grid builder ([`dataset`])
//! - Seawater equations of state ([`equations`])
//! - Vector calculus and derived quantities: density, stratification,
//!   vorticity, energy, strain, transports and velocity rotations ([`compute`])
//! - Mooring-array and survey-station sections ([`subsample`])
//! - NetCDF reading and writing behind the `netcdf` feature ([`io`])
//!
//! # Example
//!
//! ```
//! use oceandiag_rs::{Dim, Field, GridBuilder, OceanDataset};
//!
//! let mut ds = GridBuilder::spherical(-20.0, 60.0, 0.5, 0.5, 6, 5)
//!     .with_uniform_levels(3, 20.0)
//!     .build()
//!     .unwrap();
//! let u = Field::filled(&[Dim::Time, Dim::Z, Dim::Y, Dim::Xp1], &[1, 3, 5, 7], 0.1).unwrap();
//! let v = Field::filled(&[Dim::Time, Dim::Z, Dim::Yp1, Dim::X], &[1, 3, 6, 6], 0.0).unwrap();
//! ds.insert("U", u).unwrap();
//! ds.insert("V", v).unwrap();
//!
//! let od = OceanDataset::new(ds).compute().kinetic_energy().unwrap();
//! let ke = od.dataset().get("KE").unwrap();
//! assert!((ke.get(&[0, 0, 2, 2]).unwrap() - 0.005).abs() < 1e-12);
//! ```

pub mod compute;
pub mod dataset;
pub mod equations;
pub mod error;
pub mod grid;
pub mod io;
pub mod subsample;

pub use compute::Compute;
pub use dataset::{Dataset, GridBuilder, OceanDataset, Parameters};
pub use equations::{EqState, EquationOfState};
pub use error::{ComputeError, Result};
pub use grid::{Attrs, Axis, Boundary, Dim, Field, GridPoint};
pub use subsample::{MooringPath, Station, Subsample, Subsampling, SurveyLine};
