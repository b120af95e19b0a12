//! Relative and potential vorticity.

use tracing::debug;

use super::calculus::{curl, derivative};
use super::density::sigma0;
use super::parameter_attrs;
use crate::dataset::{Dataset, OceanDataset};
use crate::error::{ComputeError, Result};
use crate::grid::{Attrs, Axis, Boundary, Field, interp};

const HORIZONTAL_CURL: &str = "dV_dX-dU_dY";

fn vorticity_attrs(long_name: &str) -> Attrs {
    Attrs::new().with_units("s^-1").with_long_name(long_name)
}

/// Vertical component of relative vorticity `momVort3` on cell corners.
pub fn vertical_relative_vorticity(od: &OceanDataset) -> Result<Dataset> {
    let mut vort = curl(od, "U", "V", None)?;
    let zeta = vort
        .remove(HORIZONTAL_CURL)
        .ok_or_else(|| ComputeError::MissingVariable(HORIZONTAL_CURL.to_string()))?;
    debug!("computed momVort3");
    Dataset::new().with(
        "momVort3",
        zeta.with_attrs(vorticity_attrs("vertical component of relative vorticity")),
    )
}

/// All three components of relative vorticity.
///
/// `momVort1` = ∂W/∂y − ∂V/∂z on (`Zl`, `Yp1`, `X`), `momVort2` = ∂U/∂z − ∂W/∂x
/// on (`Zl`, `Y`, `Xp1`), `momVort3` = ∂V/∂x − ∂U/∂y on corners.
pub fn relative_vorticity(od: &OceanDataset) -> Result<Dataset> {
    let vort = curl(od, "U", "V", Some("W"))?;
    let mut out = Dataset::new();
    let components = ["dW_dY-dV_dZ", "dU_dZ-dW_dX", HORIZONTAL_CURL];
    for (n, component) in components.iter().enumerate() {
        let axis = char::from(b'i' + n as u8);
        let field = vort
            .get(component)?
            .clone()
            .with_attrs(vorticity_attrs(&format!("{axis}-component of relative vorticity")));
        out.insert(format!("momVort{}", n + 1), field)?;
    }
    debug!("computed momVort1, momVort2, momVort3");
    Ok(out)
}

/// Average a corner field to tracer points.
fn corner_to_center(field: &Field) -> Result<Field> {
    let on_v = interp(field, Axis::X, Boundary::default())?;
    interp(&on_v, Axis::Y, Boundary::default())
}

/// Ertel potential vorticity `Ertel_PV` on tracer points.
///
/// With `full == false` only the vertical term (f + ζ)·N²/g is kept. With
/// `full == true` the horizontal terms −(ω₁·∂σ₀/∂x + ω₂·∂σ₀/∂y)/ρ₀ are added.
pub fn ertel_potential_vorticity(od: &OceanDataset, full: bool) -> Result<Dataset> {
    let ds = od.dataset();
    let params = od.parameters();

    let sigma0 = sigma0(od)?;
    let n2 = derivative(ds, &sigma0, Axis::Z)?.scale(-params.g / params.rho0);
    let n2 = interp(&n2, Axis::Z, Boundary::default())?;

    let f = corner_to_center(ds.get("fCoriG")?)?;
    let vort = if full {
        relative_vorticity(od)?
    } else {
        vertical_relative_vorticity(od)?
    };
    let zeta = corner_to_center(vort.get("momVort3")?)?;

    let absolute = zeta.add(&f)?;
    let mut pv = absolute.mul(&n2)?.scale(1.0 / params.g);

    if full {
        // ω₁ on (Zl, Yp1, X), ω₂ on (Zl, Y, Xp1)
        let omega1 = interp(vort.get("momVort1")?, Axis::Z, Boundary::default())?;
        let omega1 = interp(&omega1, Axis::Y, Boundary::default())?;
        let omega2 = interp(vort.get("momVort2")?, Axis::Z, Boundary::default())?;
        let omega2 = interp(&omega2, Axis::X, Boundary::default())?;

        let dsigma_dx = interp(&derivative(ds, &sigma0, Axis::X)?, Axis::X, Boundary::default())?;
        let dsigma_dy = interp(&derivative(ds, &sigma0, Axis::Y)?, Axis::Y, Boundary::default())?;

        let horizontal = omega1
            .mul(&dsigma_dx)?
            .add(&omega2.mul(&dsigma_dy)?)?
            .scale(-1.0 / params.rho0);
        pv = pv.add(&horizontal)?;
    }

    let mut attrs = parameter_attrs(params, &["g", "rho0"])
        .with_units("m^-1 s^-1")
        .with_long_name("Ertel potential vorticity");
    if !ds.contains("Sigma0") {
        attrs = attrs.with_parameter("eq_state", params.eq_state);
    }

    debug!(full, "computed Ertel_PV");
    Dataset::new().with("Ertel_PV", pv.with_attrs(attrs))
}
