//! Volume transport through a mooring section.
//!
//! The section is the 4-connected chain of tracer cells built by
//! `subsample.mooring_array`. Each cell is crossed by the half-segments to its
//! neighbors; a half-segment along x is crossed by `V`, one along y by `U`:
//!
//! ```text
//!        ▲ V (+½)                     travelling east:  dir_V += ½
//!   ─ ─ ─●─ ─ ─ ▶ path                travelling north: dir_U -= ½
//! ```
//!
//! so positive transport always points to the left of the path.

use tracing::debug;

use crate::dataset::{Dataset, OceanDataset};
use crate::error::{ComputeError, Result};
use crate::grid::{Attrs, Dim, Field, GridPoint, N_SLOTS};
use crate::subsample::Subsampling;

use super::require_point;

const SVERDRUP: f64 = 1.0e6;

/// Sign weights `(dir_U, dir_V)` of each cell along `cells`.
pub(crate) fn crossing_directions(cells: &[(usize, usize)]) -> (Vec<f64>, Vec<f64>) {
    let mut dir_u = vec![0.0; cells.len()];
    let mut dir_v = vec![0.0; cells.len()];
    for (n, pair) in cells.windows(2).enumerate() {
        let (j0, i0) = pair[0];
        let (j1, i1) = pair[1];
        let di = (i1 as isize - i0 as isize).signum() as f64;
        let dj = (j1 as isize - j0 as isize).signum() as f64;
        // both ends of the segment get half of it
        for cell in [n, n + 1] {
            dir_v[cell] += 0.5 * di;
            dir_u[cell] -= 0.5 * dj;
        }
    }
    (dir_u, dir_v)
}

/// Horizontal volume transport across a mooring section in Sverdrup.
///
/// Produces `transport`, `Utransport` and `Vtransport` on
/// (`time`, `Z`, `path`) and the direction weights `dir_Utransport`,
/// `dir_Vtransport` on `path`.
pub fn mooring_horizontal_volume_transport(od: &OceanDataset) -> Result<Dataset> {
    let Some(Subsampling::Mooring(path)) = od.subsampling() else {
        return Err(ComputeError::NotSubsampled {
            method: "mooring_array",
        });
    };
    let ds = od.dataset();
    let u = ds.get("U")?;
    let v = ds.get("V")?;
    require_point(u, "U", GridPoint::U)?;
    require_point(v, "V", GridPoint::V)?;
    let hfac_w = ds.get("HFacW")?;
    let hfac_s = ds.get("HFacS")?;
    let dy_f = ds.get("dyF")?;
    let dx_f = ds.get("dxF")?;
    let dr_f = ds.get("drF")?;

    let cells = &path.cells;
    let (dir_u, dir_v) = crossing_directions(cells);

    let mut dims = Vec::with_capacity(N_SLOTS - 1);
    let mut shape = Vec::with_capacity(N_SLOTS - 1);
    for dim in [Dim::Time, Dim::Z] {
        if let Some(n) = u.size_of(dim) {
            dims.push(dim);
            shape.push(n);
        }
    }
    if !dims.contains(&Dim::Z) {
        return Err(ComputeError::DimensionMismatch(
            "`U` must have a `Z` dim".to_string(),
        ));
    }
    dims.push(Dim::Path);
    shape.push(cells.len());

    let face_mean = |vel: &Field, hfac: &Field, [t, k, j, i]: [usize; 4], dj: usize, di: usize| {
        let near = vel.at([t, k, j, i]) * hfac.at([0, k, j, i]);
        let far = vel.at([t, k, j + dj, i + di]) * hfac.at([0, k, j + dj, i + di]);
        0.5 * (near + far)
    };

    let u_transport = Field::from_fn(&dims, &shape, |[t, k, n, _]| {
        let (j, i) = cells[n];
        if dir_u[n] == 0.0 {
            return 0.0;
        }
        let u_c = face_mean(u, hfac_w, [t, k, j, i], 0, 1);
        dir_u[n] * u_c * dy_f.at([0, 0, j, i]) * dr_f.at([0, k, 0, 0]) / SVERDRUP
    })?;
    let v_transport = Field::from_fn(&dims, &shape, |[t, k, n, _]| {
        let (j, i) = cells[n];
        if dir_v[n] == 0.0 {
            return 0.0;
        }
        let v_c = face_mean(v, hfac_s, [t, k, j, i], 1, 0);
        dir_v[n] * v_c * dx_f.at([0, 0, j, i]) * dr_f.at([0, k, 0, 0]) / SVERDRUP
    })?;
    let total = u_transport.add(&v_transport)?;

    let sv = |long_name: &str| Attrs::new().with_units("Sv").with_long_name(long_name);
    let direction = |long_name: &str| {
        Attrs::new()
            .with_long_name(long_name)
            .with_direction("positive: to the left of the path")
    };

    debug!(cells = cells.len(), "computed mooring transport");
    Dataset::new()
        .with("transport", total.with_attrs(sv("horizontal volume transport")))?
        .with(
            "Utransport",
            u_transport.with_attrs(sv("zonal component of horizontal volume transport")),
        )?
        .with(
            "Vtransport",
            v_transport.with_attrs(sv("meridional component of horizontal volume transport")),
        )?
        .with(
            "dir_Utransport",
            Field::from_vec(Dim::Path, dir_u).with_attrs(direction("direction of zonal transport")),
        )?
        .with(
            "dir_Vtransport",
            Field::from_vec(Dim::Path, dir_v)
                .with_attrs(direction("direction of meridional transport")),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eastward_path_crosses_v_only() {
        let (dir_u, dir_v) = crossing_directions(&[(2, 0), (2, 1), (2, 2)]);
        assert_eq!(dir_u, vec![0.0, 0.0, 0.0]);
        assert_eq!(dir_v, vec![0.5, 1.0, 0.5]);
    }

    #[test]
    fn test_corner_splits_between_components() {
        // east, then north
        let (dir_u, dir_v) = crossing_directions(&[(0, 0), (0, 1), (1, 1)]);
        assert_eq!(dir_v, vec![0.5, 0.5, 0.0]);
        assert_eq!(dir_u, vec![0.0, -0.5, -0.5]);
        for (du, dv) in dir_u.iter().zip(&dir_v) {
            let weight = du.abs() + dv.abs();
            assert!((0.0..=2.0).contains(&weight));
        }
    }

    #[test]
    fn test_single_cell_has_no_crossing() {
        let (dir_u, dir_v) = crossing_directions(&[(3, 3)]);
        assert_eq!(dir_u, vec![0.0]);
        assert_eq!(dir_v, vec![0.0]);
    }
}
