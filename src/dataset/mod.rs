//! Datasets, physical parameters and grid construction.
//!
//! - [`Dataset`]: named [`Field`](crate::grid::Field)s with consistent dimension sizes
//! - [`OceanDataset`]: a dataset plus [`Parameters`] and subsampling state
//! - [`GridBuilder`]: spherical-polar or Cartesian C-grids with MITgcm metric names

mod builder;
mod container;
mod ocean;
mod parameters;

pub use builder::{EARTH_RADIUS, F_PLANE_F0, GridBuilder, great_circle_distance, meridian_km};
pub use container::Dataset;
pub use ocean::OceanDataset;
pub use parameters::{C_P, G, OMEGA, Parameters, RHO_0};
