//! Kinetic energy of the resolved and eddy flow.

use tracing::debug;

use super::{parameter_attrs, require_point};
use crate::dataset::{Dataset, OceanDataset};
use crate::error::Result;
use crate::grid::{Axis, Boundary, Dim, Field, GridPoint, interp};

/// ½(ū² + v̄² + ε_nh·w̄²) with velocities averaged to tracer points.
///
/// `w` sits on `Zl` interfaces; the bottom interface carries no flow.
fn energy(u: &Field, v: &Field, w: Option<&Field>, eps_nh: f64) -> Result<Field> {
    let u_c = interp(u, Axis::X, Boundary::default())?;
    let v_c = interp(v, Axis::Y, Boundary::default())?;
    let mut ke = u_c.zip_with(&v_c, |a, b| 0.5 * (a * a + b * b))?;
    if let Some(w) = w {
        let w_c = interp(w, Axis::Z, Boundary::Fill(0.0))?;
        ke = ke.zip_with(&w_c, |k, c| k + 0.5 * eps_nh * c * c)?;
    }
    Ok(ke)
}

fn velocities(od: &OceanDataset) -> Result<(&Field, &Field, Option<&Field>)> {
    let ds = od.dataset();
    let u = ds.get("U")?;
    let v = ds.get("V")?;
    require_point(u, "U", GridPoint::U)?;
    require_point(v, "V", GridPoint::V)?;
    let w = if od.parameters().eps_nh != 0.0 {
        Some(ds.get("W")?)
    } else {
        None
    };
    Ok((u, v, w))
}

/// Kinetic energy `KE` per unit mass on tracer points.
///
/// The vertical velocity contributes only when `eps_nh` is 1.
pub fn kinetic_energy(od: &OceanDataset) -> Result<Dataset> {
    let params = od.parameters();
    let (u, v, w) = velocities(od)?;
    let attrs = parameter_attrs(params, &["eps_nh"])
        .with_units("m^2 s^-2")
        .with_long_name("kinetic energy");
    let ke = energy(u, v, w, params.eps_nh)?.with_attrs(attrs);
    debug!(eps_nh = params.eps_nh, "computed KE");
    Dataset::new().with("KE", ke)
}

/// Eddy kinetic energy `EKE`: kinetic energy of the departures from the time mean.
pub fn eddy_kinetic_energy(od: &OceanDataset) -> Result<Dataset> {
    let params = od.parameters();
    let (u, v, w) = velocities(od)?;

    let anomaly = |f: &Field| -> Result<Field> { f.sub(&f.mean_over(Dim::Time)?) };
    let u_eddy = anomaly(u)?;
    let v_eddy = anomaly(v)?;
    let w_eddy = w.map(anomaly).transpose()?;

    let attrs = parameter_attrs(params, &["eps_nh"])
        .with_units("m^2 s^-2")
        .with_long_name("eddy kinetic energy");
    let eke = energy(&u_eddy, &v_eddy, w_eddy.as_ref(), params.eps_nh)?.with_attrs(attrs);
    debug!(eps_nh = params.eps_nh, "computed EKE");
    Dataset::new().with("EKE", eke)
}
