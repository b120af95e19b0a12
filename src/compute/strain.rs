//! Horizontal divergence and strain of the velocity field.

use tracing::debug;

use super::calculus::divergence;
use super::require_point;
use crate::dataset::{Dataset, OceanDataset};
use crate::error::Result;
use crate::grid::{Attrs, Axis, Boundary, GridPoint, diff};

/// Horizontal divergence `hor_div_vel` = ∂U/∂x + ∂V/∂y on tracer points.
pub fn horizontal_divergence_velocity(od: &OceanDataset) -> Result<Dataset> {
    let div = divergence(od, Some("U"), Some("V"), None)?;
    let hor_div = div.get("dU_dX")?.add(div.get("dV_dY")?)?.with_attrs(
        Attrs::new()
            .with_units("s^-1")
            .with_long_name("horizontal divergence of the velocity field"),
    );
    debug!("computed hor_div_vel");
    Dataset::new().with("hor_div_vel", hor_div)
}

/// Shear component of strain `s_strain` = ∂V/∂x + ∂U/∂y on cell corners.
pub fn shear_strain(od: &OceanDataset) -> Result<Dataset> {
    let ds = od.dataset();
    let u = ds.get("U")?;
    let v = ds.get("V")?;
    require_point(u, "U", GridPoint::U)?;
    require_point(v, "V", GridPoint::V)?;

    let dv_dx = diff(v, Axis::X, Boundary::default())?.div(ds.get("dxV")?)?;
    let du_dy = diff(u, Axis::Y, Boundary::default())?.div(ds.get("dyU")?)?;
    let strain = dv_dx.add(&du_dy)?.with_attrs(
        Attrs::new()
            .with_units("s^-1")
            .with_long_name("shear component of strain"),
    );
    debug!("computed s_strain");
    Dataset::new().with("s_strain", strain)
}

/// Normal component of strain `n_strain` = ∂U/∂x − ∂V/∂y on tracer points.
pub fn normal_strain(od: &OceanDataset) -> Result<Dataset> {
    let div = divergence(od, Some("U"), Some("V"), None)?;
    let strain = div.get("dU_dX")?.sub(div.get("dV_dY")?)?.with_attrs(
        Attrs::new()
            .with_units("s^-1")
            .with_long_name("normal component of strain"),
    );
    debug!("computed n_strain");
    Dataset::new().with("n_strain", strain)
}
