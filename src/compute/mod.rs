//! Diagnostics derived from model output.
//!
//! Every operation takes an [`OceanDataset`] and returns a new [`Dataset`]
//! holding only the variables it produced. The [`Compute`] accessor wraps the
//! same operations and merges their output back into the ocean dataset:
//!
//! ```
//! use oceandiag_rs::compute;
//! use oceandiag_rs::dataset::{GridBuilder, OceanDataset};
//! use oceandiag_rs::grid::{Dim, Field};
//!
//! let mut ds = GridBuilder::spherical(0.0, 30.0, 1.0, 1.0, 4, 3)
//!     .with_uniform_levels(2, 10.0)
//!     .build()
//!     .unwrap();
//! let dims = [Dim::Time, Dim::Z, Dim::Y, Dim::X];
//! ds.insert("S", Field::filled(&dims, &[1, 2, 3, 4], 35.0).unwrap()).unwrap();
//! ds.insert("Temp", Field::filled(&dims, &[1, 2, 3, 4], 10.0).unwrap()).unwrap();
//! let od = OceanDataset::new(ds);
//!
//! let sigma = compute::potential_density_anomaly(&od).unwrap();
//! let merged = od.compute().potential_density_anomaly().unwrap();
//! assert_eq!(sigma.get("Sigma0").unwrap(), merged.dataset().get("Sigma0").unwrap());
//! ```

mod alignment;
mod calculus;
mod density;
mod energy;
mod strain;
mod transport;
mod vorticity;

pub use alignment::{geographical_aligned_velocities, survey_aligned_velocities};
pub use calculus::{curl, divergence, gradient, integral, weighted_mean};
pub use density::{brunt_vaisala_frequency, potential_density_anomaly};
pub use energy::{eddy_kinetic_energy, kinetic_energy};
pub use strain::{horizontal_divergence_velocity, normal_strain, shear_strain};
pub use transport::mooring_horizontal_volume_transport;
pub use vorticity::{ertel_potential_vorticity, relative_vorticity, vertical_relative_vorticity};

use crate::dataset::{Dataset, OceanDataset, Parameters};
use crate::error::{ComputeError, Result};
use crate::grid::{Attrs, Axis, Boundary, Dim, Field, GridPoint, diff, format_dims};

/// Horizontal location of a field.
pub(crate) fn grid_point(field: &Field) -> Result<GridPoint> {
    let (y, x) = (field.dim_at_slot(Axis::Y.slot()), field.dim_at_slot(Axis::X.slot()));
    y.zip(x)
        .and_then(|(y, x)| GridPoint::from_dims(y, x))
        .ok_or_else(|| {
            ComputeError::DimensionMismatch(format!(
                "dims {} are not on a horizontal grid point",
                format_dims(field.dims())
            ))
        })
}

/// Fail unless `field` sits on `expected`.
pub(crate) fn require_point(field: &Field, name: &str, expected: GridPoint) -> Result<()> {
    let point = grid_point(field)?;
    if point == expected {
        Ok(())
    } else {
        let (y, x) = expected.dims();
        Err(ComputeError::DimensionMismatch(format!(
            "`{name}` must be located on ({y}, {x}), found {}",
            format_dims(field.dims())
        )))
    }
}

/// Wet area of tracer cells; dry cells are NaN.
pub(crate) fn masked_cell_area(ds: &Dataset) -> Result<Field> {
    Ok(ds
        .get("rA")?
        .mul(ds.get("HFacC")?)?
        .map(|a| if a == 0.0 { f64::NAN } else { a }))
}

/// Distance between consecutive vertical positions of `field`, on the
/// vertical dim its own `diff` lands on.
pub(crate) fn vertical_spacing(ds: &Dataset, field: &Field) -> Result<Field> {
    let dim = field
        .dim_at_slot(Axis::Z.slot())
        .ok_or_else(|| ComputeError::DimensionMismatch("field has no vertical dim".to_string()))?;
    diff(ds.coord(dim)?, Axis::Z, Boundary::default())
}

/// Attributes recording the values of the named parameters.
pub(crate) fn parameter_attrs(params: &Parameters, names: &[&str]) -> Attrs {
    names.iter().fold(Attrs::new(), |attrs, &name| match params.value_of(name) {
        Some(value) => attrs.with_parameter(name, value),
        None => attrs,
    })
}

/// Shortcuts that compute a diagnostic and merge it into the ocean dataset.
///
/// Obtained through [`OceanDataset::compute`].
#[derive(Clone, Copy, Debug)]
pub struct Compute<'a> {
    od: &'a OceanDataset,
}

impl<'a> Compute<'a> {
    pub(crate) fn new(od: &'a OceanDataset) -> Self {
        Self { od }
    }

    fn merge(&self, ds: Dataset) -> Result<OceanDataset> {
        self.od.merge_into_oceandataset(ds)
    }

    pub fn gradient(&self, var_names: &[&str], axes: &[Axis]) -> Result<OceanDataset> {
        self.merge(gradient(self.od, var_names, axes)?)
    }

    pub fn divergence(
        &self,
        i_name: Option<&str>,
        j_name: Option<&str>,
        k_name: Option<&str>,
    ) -> Result<OceanDataset> {
        self.merge(divergence(self.od, i_name, j_name, k_name)?)
    }

    pub fn curl(&self, i_name: &str, j_name: &str, k_name: Option<&str>) -> Result<OceanDataset> {
        self.merge(curl(self.od, i_name, j_name, k_name)?)
    }

    pub fn weighted_mean(&self, var_name: &str) -> Result<OceanDataset> {
        self.merge(weighted_mean(self.od, var_name)?)
    }

    pub fn integral(&self, var_name: &str) -> Result<OceanDataset> {
        self.merge(integral(self.od, var_name)?)
    }

    pub fn potential_density_anomaly(&self) -> Result<OceanDataset> {
        self.merge(potential_density_anomaly(self.od)?)
    }

    pub fn brunt_vaisala_frequency(&self) -> Result<OceanDataset> {
        self.merge(brunt_vaisala_frequency(self.od)?)
    }

    pub fn vertical_relative_vorticity(&self) -> Result<OceanDataset> {
        self.merge(vertical_relative_vorticity(self.od)?)
    }

    pub fn relative_vorticity(&self) -> Result<OceanDataset> {
        self.merge(relative_vorticity(self.od)?)
    }

    pub fn kinetic_energy(&self) -> Result<OceanDataset> {
        self.merge(kinetic_energy(self.od)?)
    }

    pub fn eddy_kinetic_energy(&self) -> Result<OceanDataset> {
        self.merge(eddy_kinetic_energy(self.od)?)
    }

    pub fn horizontal_divergence_velocity(&self) -> Result<OceanDataset> {
        self.merge(horizontal_divergence_velocity(self.od)?)
    }

    pub fn shear_strain(&self) -> Result<OceanDataset> {
        self.merge(shear_strain(self.od)?)
    }

    pub fn normal_strain(&self) -> Result<OceanDataset> {
        self.merge(normal_strain(self.od)?)
    }

    pub fn ertel_potential_vorticity(&self, full: bool) -> Result<OceanDataset> {
        self.merge(ertel_potential_vorticity(self.od, full)?)
    }

    pub fn mooring_horizontal_volume_transport(&self) -> Result<OceanDataset> {
        self.merge(mooring_horizontal_volume_transport(self.od)?)
    }

    pub fn survey_aligned_velocities(&self) -> Result<OceanDataset> {
        self.merge(survey_aligned_velocities(self.od)?)
    }

    pub fn geographical_aligned_velocities(&self) -> Result<OceanDataset> {
        self.merge(geographical_aligned_velocities(self.od)?)
    }
}
