//! Vector calculus on the C-grid.
//!
//! Derivatives use the metric of the grid point the difference lands on, so
//! they stay consistent with the finite-volume discretization:
//!
//! ```text
//! ∂/∂x:  C → U (dxC)   U → C (dxF)   V → G (dxV)   G → V (dxG)
//! ∂/∂y:  C → V (dyC)   V → C (dyF)   U → G (dyU)   G → U (dyG)
//! ```
//!
//! Divergence and curl follow the flux form:
//!
//! ```text
//! ∂u/∂x = δx(u·dyG·hW) / (rA·hC)        ζ = (δx(v·dyC) − δy(u·dxC)) / rAz
//! ∂v/∂y = δy(v·dxG·hS) / (rA·hC)
//! ```

use tracing::debug;

use super::{grid_point, masked_cell_area, require_point, vertical_spacing};
use crate::dataset::{Dataset, OceanDataset};
use crate::error::{ComputeError, Result};
use crate::grid::{Attrs, Axis, Boundary, Dim, Field, GridPoint, diff};

fn metric_name(axis: Axis, point: GridPoint) -> &'static str {
    match (axis, point) {
        (Axis::X, GridPoint::C) => "dxC",
        (Axis::X, GridPoint::U) => "dxF",
        (Axis::X, GridPoint::V) => "dxV",
        (Axis::X, GridPoint::G) => "dxG",
        (_, GridPoint::C) => "dyC",
        (_, GridPoint::V) => "dyF",
        (_, GridPoint::U) => "dyU",
        (_, GridPoint::G) => "dyG",
    }
}

/// Derivative of a single field along one axis.
pub(crate) fn derivative(ds: &Dataset, field: &Field, axis: Axis) -> Result<Field> {
    match axis {
        Axis::X | Axis::Y => {
            let point = grid_point(field)?;
            let metric = ds.get(metric_name(axis, point))?;
            diff(field, axis, Boundary::default())?.div(metric)
        }
        Axis::Z => {
            let dz = vertical_spacing(ds, field)?;
            diff(field, Axis::Z, Boundary::default())?.div(&dz)
        }
        Axis::Time => {
            if !field.has_dim(Dim::Time) {
                return Err(ComputeError::DimensionMismatch(
                    "field has no `time` dim".to_string(),
                ));
            }
            let dt = diff(ds.coord(Dim::Time)?, Axis::Time, Boundary::default())?;
            diff(field, Axis::Time, Boundary::default())?.div(&dt)
        }
    }
}

/// Gradient components `d{var}_d{axis}` of each variable along each axis.
///
/// Spatial derivatives are per metre (vertical: per metre upward), time
/// derivatives per second on `time_midp`.
pub fn gradient(od: &OceanDataset, var_names: &[&str], axes: &[Axis]) -> Result<Dataset> {
    if var_names.is_empty() || axes.is_empty() {
        return Err(ComputeError::InvalidInput(
            "gradient needs at least one variable and one axis".to_string(),
        ));
    }
    let ds = od.dataset();
    let mut out = Dataset::new();
    for &name in var_names {
        let field = ds.get(name)?;
        for &axis in axes {
            let per = if axis == Axis::Time { "s" } else { "m" };
            let units = match field.attrs.units.as_deref() {
                Some(u) if !u.is_empty() => format!("{u} {per}^-1"),
                _ => format!("{per}^-1"),
            };
            let attrs = Attrs::new()
                .with_units(units)
                .with_long_name(format!("{axis}-gradient of {name}"));
            let grad = derivative(ds, field, axis)?.with_attrs(attrs);
            let out_name = format!("d{name}_d{axis}");
            debug!(variable = %out_name, "computed gradient");
            out.insert(out_name, grad)?;
        }
    }
    Ok(out)
}

/// Flux-form divergence components.
///
/// `i_name` must sit on U points, `j_name` on V points and `k_name` on `Zl`
/// interfaces (no flux through the bottom). Land cells are NaN.
pub fn divergence(
    od: &OceanDataset,
    i_name: Option<&str>,
    j_name: Option<&str>,
    k_name: Option<&str>,
) -> Result<Dataset> {
    if i_name.is_none() && j_name.is_none() && k_name.is_none() {
        return Err(ComputeError::InvalidInput(
            "divergence needs at least one component".to_string(),
        ));
    }
    let ds = od.dataset();
    let mut out = Dataset::new();

    if let Some(name) = i_name {
        let u = ds.get(name)?;
        require_point(u, name, GridPoint::U)?;
        let flux = u.mul(ds.get("dyG")?)?.mul(ds.get("HFacW")?)?;
        let area = masked_cell_area(ds)?;
        let div = diff(&flux, Axis::X, Boundary::default())?.div(&area)?;
        out.insert(format!("d{name}_dX"), div.with_attrs(divergence_attrs(name, Axis::X)))?;
    }

    if let Some(name) = j_name {
        let v = ds.get(name)?;
        require_point(v, name, GridPoint::V)?;
        let flux = v.mul(ds.get("dxG")?)?.mul(ds.get("HFacS")?)?;
        let area = masked_cell_area(ds)?;
        let div = diff(&flux, Axis::Y, Boundary::default())?.div(&area)?;
        out.insert(format!("d{name}_dY"), div.with_attrs(divergence_attrs(name, Axis::Y)))?;
    }

    if let Some(name) = k_name {
        let w = ds.get(name)?;
        if !w.has_dim(Dim::Zl) {
            return Err(ComputeError::DimensionMismatch(format!(
                "`{name}` must be located on `Zl`"
            )));
        }
        let thickness = ds
            .get("drF")?
            .mul(ds.get("HFacC")?)?
            .map(|h| if h == 0.0 { f64::NAN } else { h });
        let div = diff(w, Axis::Z, Boundary::Fill(0.0))?.div(&thickness)?;
        out.insert(format!("d{name}_dZ"), div.with_attrs(divergence_attrs(name, Axis::Z)))?;
    }

    debug!(components = out.len(), "computed divergence");
    Ok(out)
}

fn divergence_attrs(name: &str, axis: Axis) -> Attrs {
    Attrs::new()
        .with_units("s^-1")
        .with_long_name(format!("{axis}-divergence of {name}"))
}

/// Curl of a velocity field.
///
/// Always returns the vertical component `d{j}_dX-d{i}_dY` on corners; with a
/// vertical component also `d{k}_dY-d{j}_dZ` on (`Zl`, `Yp1`, `X`) and
/// `d{i}_dZ-d{k}_dX` on (`Zl`, `Y`, `Xp1`).
pub fn curl(
    od: &OceanDataset,
    i_name: &str,
    j_name: &str,
    k_name: Option<&str>,
) -> Result<Dataset> {
    let ds = od.dataset();
    let u = ds.get(i_name)?;
    let v = ds.get(j_name)?;
    require_point(u, i_name, GridPoint::U)?;
    require_point(v, j_name, GridPoint::V)?;

    let mut out = Dataset::new();
    let attrs = |long_name: String| Attrs::new().with_units("s^-1").with_long_name(long_name);

    let circulation_x = diff(&v.mul(ds.get("dyC")?)?, Axis::X, Boundary::default())?;
    let circulation_y = diff(&u.mul(ds.get("dxC")?)?, Axis::Y, Boundary::default())?;
    let zeta = circulation_x.sub(&circulation_y)?.div(ds.get("rAz")?)?;
    let name = format!("d{j_name}_dX-d{i_name}_dY");
    out.insert(name.clone(), zeta.with_attrs(attrs(format!("curl component {name}"))))?;

    if let Some(k_name) = k_name {
        let w = ds.get(k_name)?;
        if !w.has_dim(Dim::Zl) {
            return Err(ComputeError::DimensionMismatch(format!(
                "`{k_name}` must be located on `Zl`"
            )));
        }
        let dw_dy = derivative(ds, w, Axis::Y)?;
        let dv_dz = derivative(ds, v, Axis::Z)?;
        let name = format!("d{k_name}_dY-d{j_name}_dZ");
        out.insert(
            name.clone(),
            dw_dy.sub(&dv_dz)?.with_attrs(attrs(format!("curl component {name}"))),
        )?;

        let du_dz = derivative(ds, u, Axis::Z)?;
        let dw_dx = derivative(ds, w, Axis::X)?;
        let name = format!("d{i_name}_dZ-d{k_name}_dX");
        out.insert(
            name.clone(),
            du_dz.sub(&dw_dx)?.with_attrs(attrs(format!("curl component {name}"))),
        )?;
    }

    debug!(components = out.len(), "computed curl");
    Ok(out)
}

/// Volume (or area) weights of a tracer-point variable.
fn cell_weights(ds: &Dataset, field: &Field) -> Result<Field> {
    let point = grid_point(field)?;
    if point != GridPoint::C {
        return Err(ComputeError::DimensionMismatch(
            "weighted averages need a variable on tracer points".to_string(),
        ));
    }
    let area = ds.get("rA")?;
    if field.has_dim(Dim::Z) {
        area.mul(ds.get("drF")?)?.mul(ds.get("HFacC")?)
    } else {
        Ok(area.clone())
    }
}

/// Weighted sums of `field` over X, Y and (if present) Z.
///
/// Returns `(Σ w·v, Σ w)` restricted to finite values of `v`.
fn spatial_sums(ds: &Dataset, field: &Field) -> Result<(Field, Field)> {
    let weights = cell_weights(ds, field)?;
    let mut num = field.zip_with(&weights, |v, w| if v.is_finite() { v * w } else { 0.0 })?;
    let mut den = field.zip_with(&weights, |v, w| if v.is_finite() { w } else { 0.0 })?;
    for dim in [Dim::X, Dim::Y, Dim::Z] {
        if num.has_dim(dim) {
            num = num.sum_over(dim)?;
            den = den.sum_over(dim)?;
        }
    }
    Ok((num, den))
}

/// Volume-weighted mean `w_mean_{var}` over the horizontal and vertical.
///
/// Weights are `rA·drF·HFacC` (or `rA` for 2-D variables); NaNs are skipped.
pub fn weighted_mean(od: &OceanDataset, var_name: &str) -> Result<Dataset> {
    let ds = od.dataset();
    let field = ds.get(var_name)?;
    let (num, den) = spatial_sums(ds, field)?;
    let mean = num.div(&den)?.with_attrs(
        Attrs::new()
            .with_units(field.attrs.units_or_empty())
            .with_long_name(format!("volume-weighted mean of {var_name}")),
    );
    debug!(variable = var_name, "computed weighted mean");
    Dataset::new().with(format!("w_mean_{var_name}"), mean)
}

/// Volume integral `I({var})dXdYdZ` (area integral `I({var})dXdY` for 2-D variables).
pub fn integral(od: &OceanDataset, var_name: &str) -> Result<Dataset> {
    let ds = od.dataset();
    let field = ds.get(var_name)?;
    let (num, _) = spatial_sums(ds, field)?;
    let (suffix, measure) = if field.has_dim(Dim::Z) {
        ("dXdYdZ", "m^3")
    } else {
        ("dXdY", "m^2")
    };
    let units = match field.attrs.units.as_deref() {
        Some(u) if !u.is_empty() => format!("{u} {measure}"),
        _ => measure.to_string(),
    };
    let total = num.with_attrs(
        Attrs::new()
            .with_units(units)
            .with_long_name(format!("integral of {var_name}")),
    );
    debug!(variable = var_name, "computed integral");
    Dataset::new().with(format!("I({var_name}){suffix}"), total)
}
