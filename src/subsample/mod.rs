//! Extraction of sections from a gridded ocean dataset.
//!
//! - [`Subsample::mooring_array`] snaps a list of mooring positions to a
//!   4-connected chain of tracer cells, keeping the full dataset so transports
//!   can use the surrounding faces.
//! - [`Subsample::survey_stations`] interpolates a ship-track onto evenly
//!   spaced stations and samples the requested variables there.

mod mooring;
mod survey;

pub use mooring::{MooringPath, mooring_array};
pub use survey::{Station, SurveyLine, survey_stations};

use crate::dataset::{Dataset, OceanDataset, great_circle_distance};
use crate::error::{ComputeError, Result};

/// How an ocean dataset has been subsampled.
#[derive(Clone, Debug, PartialEq)]
pub enum Subsampling {
    Mooring(MooringPath),
    Survey(SurveyLine),
}

/// Subsampling methods of an [`OceanDataset`].
///
/// Obtained through [`OceanDataset::subsample`].
#[derive(Clone, Copy, Debug)]
pub struct Subsample<'a> {
    od: &'a OceanDataset,
}

impl<'a> Subsample<'a> {
    pub(crate) fn new(od: &'a OceanDataset) -> Self {
        Self { od }
    }

    /// See [`mooring_array`].
    pub fn mooring_array(&self, xmoor: &[f64], ymoor: &[f64]) -> Result<OceanDataset> {
        mooring_array(self.od, xmoor, ymoor)
    }

    /// See [`survey_stations`].
    pub fn survey_stations(
        &self,
        xsurv: &[f64],
        ysurv: &[f64],
        delta_km: Option<f64>,
        var_list: &[&str],
    ) -> Result<OceanDataset> {
        survey_stations(self.od, xsurv, ysurv, delta_km, var_list)
    }
}

/// Check a list of (lon, lat) positions.
fn check_positions(xs: &[f64], ys: &[f64], min_len: usize) -> Result<()> {
    if xs.len() != ys.len() {
        return Err(ComputeError::InvalidInput(format!(
            "{} longitudes but {} latitudes",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < min_len {
        return Err(ComputeError::InvalidInput(format!(
            "at least {min_len} position(s) needed, got {}",
            xs.len()
        )));
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(ComputeError::InvalidInput(
            "positions must be finite".to_string(),
        ));
    }
    Ok(())
}

/// Index `(j, i)` of the tracer cell nearest to (`lon`, `lat`).
fn nearest_cell(ds: &Dataset, lon: f64, lat: f64) -> Result<(usize, usize)> {
    let xc = ds.get("XC")?;
    let yc = ds.get("YC")?;
    let layout = xc.layout();
    let [_, _, ny, nx] = layout.shape;
    let mut best = (0, 0);
    let mut best_dist = f64::INFINITY;
    for j in 0..ny {
        for i in 0..nx {
            let d = great_circle_distance(lon, lat, xc.at([0, 0, j, i]), yc.at([0, 0, j, i]));
            if d < best_dist {
                best_dist = d;
                best = (j, i);
            }
        }
    }
    if best_dist.is_finite() {
        Ok(best)
    } else {
        Err(ComputeError::InvalidInput(
            "no tracer cell with finite coordinates".to_string(),
        ))
    }
}

/// Cumulative great-circle distance (km) along a list of positions.
fn cumulative_distance(lons: &[f64], lats: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    let mut out = Vec::with_capacity(lons.len());
    for n in 0..lons.len() {
        if n > 0 {
            total += great_circle_distance(lons[n - 1], lats[n - 1], lons[n], lats[n]);
        }
        out.push(total);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_positions() {
        assert!(check_positions(&[0.0, 1.0], &[0.0, 1.0], 2).is_ok());
        assert!(matches!(
            check_positions(&[0.0, 1.0], &[0.0], 1),
            Err(ComputeError::InvalidInput(_))
        ));
        assert!(check_positions(&[0.0], &[0.0], 2).is_err());
        assert!(check_positions(&[], &[], 1).is_err());
        assert!(check_positions(&[f64::NAN], &[0.0], 1).is_err());
    }

    #[test]
    fn test_cumulative_distance_starts_at_zero() {
        let d = cumulative_distance(&[0.0, 0.0, 0.0], &[0.0, 1.0, 2.0]);
        assert_eq!(d[0], 0.0);
        assert!(d[1] > 110.0 && d[1] < 112.0);
        assert!((d[2] - 2.0 * d[1]).abs() < 1e-9);
    }
}
