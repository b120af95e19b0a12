//! Rotation of horizontal velocities to geographic and survey-aligned frames.

use tracing::{debug, warn};

use crate::dataset::{Dataset, OceanDataset};
use crate::error::{ComputeError, Result};
use crate::grid::{Attrs, Axis, Boundary, Dim, Field, interp};
use crate::subsample::{Station, Subsampling};

/// `U` and `V` on tracer points, averaging face velocities when needed.
fn centered_velocities(ds: &Dataset) -> Result<(Field, Field)> {
    let mut u = ds.get("U")?.clone();
    let mut v = ds.get("V")?.clone();
    if u.has_dim(Dim::Xp1) || v.has_dim(Dim::Yp1) {
        warn!("velocities have been interpolated to cell centers");
    }
    if u.has_dim(Dim::Xp1) {
        u = interp(&u, Axis::X, Boundary::default())?;
    }
    if v.has_dim(Dim::Yp1) {
        v = interp(&v, Axis::Y, Boundary::default())?;
    }
    Ok((u, v))
}

/// Rotate grid-relative components to east/north.
fn rotate_to_geographic(u: &Field, v: &Field, cs: &Field, sn: &Field) -> Result<(Field, Field)> {
    let zonal = u.mul(cs)?.sub(&v.mul(sn)?)?;
    let meridional = u.mul(sn)?.add(&v.mul(cs)?)?;
    Ok((zonal, meridional))
}

/// Zonal and meridional velocities `U_zonal`, `V_merid` on tracer points.
///
/// Uses the grid rotation `AngleCS`/`AngleSN`.
pub fn geographical_aligned_velocities(od: &OceanDataset) -> Result<Dataset> {
    let ds = od.dataset();
    let (u, v) = centered_velocities(ds)?;
    let (zonal, meridional) = rotate_to_geographic(&u, &v, ds.get("AngleCS")?, ds.get("AngleSN")?)?;

    debug!("computed U_zonal, V_merid");
    Dataset::new()
        .with(
            "U_zonal",
            zonal.with_attrs(
                Attrs::new()
                    .with_units("m/s")
                    .with_long_name("zonal velocity")
                    .with_direction("positive: eastwards"),
            ),
        )?
        .with(
            "V_merid",
            meridional.with_attrs(
                Attrs::new()
                    .with_units("m/s")
                    .with_long_name("meridional velocity")
                    .with_direction("positive: northwards"),
            ),
        )
}

/// Direction of the survey at each station in degrees counter-clockwise from east.
///
/// Each station uses the segment to the next one; the last station reuses the
/// final segment.
pub(crate) fn survey_angles(stations: &[Station]) -> Vec<f64> {
    let n = stations.len();
    (0..n)
        .map(|s| {
            if n < 2 {
                return 0.0;
            }
            let (a, b) = if s + 1 < n {
                (&stations[s], &stations[s + 1])
            } else {
                (&stations[s - 1], &stations[s])
            };
            let mut dlon = b.lon - a.lon;
            if dlon > 180.0 {
                dlon -= 360.0;
            } else if dlon < -180.0 {
                dlon += 360.0;
            }
            let mean_lat = (0.5 * (a.lat + b.lat)).to_radians();
            let dlat = b.lat - a.lat;
            dlat.atan2(dlon * mean_lat.cos()).to_degrees()
        })
        .collect()
}

/// Velocities along (`tan_Vel`) and across (`ort_Vel`) a survey, plus the
/// rotation angle `rot_ang_Vel` used at each station.
///
/// The dataset must come from `subsample.survey_stations` with `U` and `V`
/// sampled.
pub fn survey_aligned_velocities(od: &OceanDataset) -> Result<Dataset> {
    let Some(Subsampling::Survey(line)) = od.subsampling() else {
        return Err(ComputeError::NotSubsampled {
            method: "survey_stations",
        });
    };
    let ds = od.dataset();
    let (mut u, mut v) = centered_velocities(ds)?;

    if let (Ok(cs), Ok(sn)) = (ds.get("AngleCS"), ds.get("AngleSN")) {
        (u, v) = rotate_to_geographic(&u, &v, cs, sn)?;
    } else {
        warn!("`AngleCS` and `AngleSN` are not available, velocities are assumed grid-aligned");
    }

    let angles = survey_angles(&line.stations);
    let rot = Field::from_vec(Dim::Station, angles);
    let cos = rot.map(|a| a.to_radians().cos());
    let sin = rot.map(|a| a.to_radians().sin());

    let tangential = u.mul(&cos)?.add(&v.mul(&sin)?)?;
    let orthogonal = v.mul(&cos)?.sub(&u.mul(&sin)?)?;

    debug!(stations = line.stations.len(), "computed survey-aligned velocities");
    Dataset::new()
        .with(
            "rot_ang_Vel",
            rot.with_attrs(
                Attrs::new()
                    .with_units("deg")
                    .with_long_name("rotation angle")
                    .with_direction("positive: counterclockwise from east"),
            ),
        )?
        .with(
            "tan_Vel",
            tangential.with_attrs(
                Attrs::new()
                    .with_units("m/s")
                    .with_long_name("tangential velocity")
                    .with_direction("positive: along the survey"),
            ),
        )?
        .with(
            "ort_Vel",
            orthogonal.with_attrs(
                Attrs::new()
                    .with_units("m/s")
                    .with_long_name("orthogonal velocity")
                    .with_direction("positive: to the left of the survey"),
            ),
        )
}
