//! Survey sections: stations spaced along great circles between survey points.

use tracing::{debug, warn};

use super::{Subsampling, check_positions, cumulative_distance, nearest_cell};
use crate::compute::grid_point;
use crate::dataset::{Dataset, OceanDataset};
use crate::error::{ComputeError, Result};
use crate::grid::{Attrs, Axis, Boundary, Dim, Field, GridPoint, interp};

/// A survey station snapped to the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Station {
    /// Station longitude (degrees east).
    pub lon: f64,
    /// Station latitude (degrees north).
    pub lat: f64,
    /// Row of the nearest tracer cell.
    pub j: usize,
    /// Column of the nearest tracer cell.
    pub i: usize,
    /// Distance from the first station along the survey (km).
    pub distance_km: f64,
}

/// Stations of a survey and the spacing used to place them.
#[derive(Clone, Debug, PartialEq)]
pub struct SurveyLine {
    pub stations: Vec<Station>,
    /// Maximum distance between consecutive stations (km).
    pub delta_km: f64,
}

fn to_unit_vector(lon: f64, lat: f64) -> [f64; 3] {
    let (lon, lat) = (lon.to_radians(), lat.to_radians());
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

fn to_lon_lat(p: [f64; 3]) -> (f64, f64) {
    let lat = p[2].clamp(-1.0, 1.0).asin().to_degrees();
    let lon = p[1].atan2(p[0]).to_degrees();
    (lon, lat)
}

/// Positions along the great circle from `a` to `b` at fractions `0, 1/n, ..., (n-1)/n`.
fn great_circle_points(a: (f64, f64), b: (f64, f64), n: usize) -> Vec<(f64, f64)> {
    let pa = to_unit_vector(a.0, a.1);
    let pb = to_unit_vector(b.0, b.1);
    let dot: f64 = pa.iter().zip(&pb).map(|(x, y)| x * y).sum();
    let theta = dot.clamp(-1.0, 1.0).acos();
    (0..n)
        .map(|m| {
            if m == 0 || theta < 1e-12 {
                return a;
            }
            let f = m as f64 / n as f64;
            let wa = ((1.0 - f) * theta).sin() / theta.sin();
            let wb = (f * theta).sin() / theta.sin();
            to_lon_lat([
                wa * pa[0] + wb * pb[0],
                wa * pa[1] + wb * pb[1],
                wa * pa[2] + wb * pb[2],
            ])
        })
        .collect()
}

/// Densify a track so consecutive positions are at most `delta_km` apart.
pub(crate) fn densify(xs: &[f64], ys: &[f64], delta_km: f64) -> (Vec<f64>, Vec<f64>) {
    let mut lons = Vec::new();
    let mut lats = Vec::new();
    for n in 1..xs.len() {
        let a = (xs[n - 1], ys[n - 1]);
        let b = (xs[n], ys[n]);
        let d = crate::dataset::great_circle_distance(a.0, a.1, b.0, b.1);
        let steps = ((d / delta_km).ceil() as usize).max(1);
        for (lon, lat) in great_circle_points(a, b, steps) {
            lons.push(lon);
            lats.push(lat);
        }
    }
    if let (Some(&x), Some(&y)) = (xs.last(), ys.last()) {
        lons.push(x);
        lats.push(y);
    }
    (lons, lats)
}

/// Mean horizontal grid spacing (km).
fn mean_spacing(ds: &Dataset) -> Result<f64> {
    let (sum, n) = ds
        .get("rA")?
        .data()
        .iter()
        .filter(|a| a.is_finite() && **a > 0.0)
        .fold((0.0, 0usize), |(s, n), a| (s + a.sqrt(), n + 1));
    if n == 0 {
        return Err(ComputeError::InvalidInput(
            "`rA` has no positive cell area".to_string(),
        ));
    }
    Ok(sum / n as f64 / 1000.0)
}

/// `field` moved to tracer points, or `None` for fields without horizontal dims.
fn to_tracer_point(name: &str, field: &Field) -> Result<Option<Field>> {
    let has_horizontal =
        field.dim_at_slot(Axis::Y.slot()).is_some() || field.dim_at_slot(Axis::X.slot()).is_some();
    if !has_horizontal {
        return Ok(None);
    }
    let centered = match grid_point(field)? {
        GridPoint::C => field.clone(),
        GridPoint::U => interp(field, Axis::X, Boundary::default())?,
        GridPoint::V => interp(field, Axis::Y, Boundary::default())?,
        GridPoint::G => {
            let on_v = interp(field, Axis::X, Boundary::default())?;
            interp(&on_v, Axis::Y, Boundary::default())?
        }
    };
    if grid_point(field)? != GridPoint::C {
        warn!(variable = name, "variable has been interpolated to cell centers");
    }
    Ok(Some(centered.with_attrs(field.attrs.clone())))
}

/// Value of a tracer-point field at each station.
fn sample(field: &Field, stations: &[Station]) -> Result<Field> {
    let mut dims: Vec<Dim> = field
        .dims()
        .iter()
        .copied()
        .filter(|d| d.slot() < Axis::Y.slot())
        .collect();
    let mut shape: Vec<usize> = dims.iter().filter_map(|&d| field.size_of(d)).collect();
    dims.push(Dim::Station);
    shape.push(stations.len());
    let sampled = Field::from_fn(&dims, &shape, |[t, k, s, _]| {
        let st = &stations[s];
        field.at([t, k, st.j, st.i])
    })?;
    Ok(sampled.with_attrs(field.attrs.clone()))
}

/// Subsample along a survey track.
///
/// Stations are placed along the great circles joining consecutive
/// (`xsurv`, `ysurv`) points, at most `delta_km` apart (default: the mean
/// horizontal grid spacing). Each variable of `var_list` (every variable
/// when empty) is sampled at the tracer cell nearest to each station; face
/// and corner variables are first averaged to cell centers. Variables without
/// horizontal dims are copied unchanged.
pub fn survey_stations(
    od: &OceanDataset,
    xsurv: &[f64],
    ysurv: &[f64],
    delta_km: Option<f64>,
    var_list: &[&str],
) -> Result<OceanDataset> {
    check_positions(xsurv, ysurv, 2)?;
    let ds = od.dataset();
    let delta_km = match delta_km {
        Some(d) if d.is_finite() && d > 0.0 => d,
        Some(d) => {
            return Err(ComputeError::invalid_parameter(
                "delta_km",
                format!("must be positive, got {d}"),
            ));
        }
        None => mean_spacing(ds)?,
    };

    let (lons, lats) = densify(xsurv, ysurv, delta_km);
    let distances = cumulative_distance(&lons, &lats);
    let mut stations = Vec::with_capacity(lons.len());
    for ((&lon, &lat), &distance_km) in lons.iter().zip(&lats).zip(&distances) {
        let (j, i) = nearest_cell(ds, lon, lat)?;
        stations.push(Station {
            lon,
            lat,
            j,
            i,
            distance_km,
        });
    }

    let mut out = Dataset::new();
    for (dim, coord) in ds.coords() {
        out.set_coord(dim, coord.data().to_vec())?;
    }

    let names: Vec<&str> = if var_list.is_empty() {
        ds.names().collect()
    } else {
        var_list.to_vec()
    };
    for name in names {
        let field = ds.get(name)?;
        if field.dims().iter().any(|d| matches!(d, Dim::Mooring | Dim::Path | Dim::Station)) {
            continue;
        }
        match to_tracer_point(name, field)? {
            Some(centered) => out.insert(name, sample(&centered, &stations)?)?,
            None => out.insert(name, field.clone())?,
        }
    }

    out.insert(
        "lon_station",
        Field::from_vec(Dim::Station, lons).with_attrs(
            Attrs::new()
                .with_units("degrees_east")
                .with_long_name("station longitude"),
        ),
    )?;
    out.insert(
        "lat_station",
        Field::from_vec(Dim::Station, lats).with_attrs(
            Attrs::new()
                .with_units("degrees_north")
                .with_long_name("station latitude"),
        ),
    )?;
    out.insert(
        "station_dist",
        Field::from_vec(Dim::Station, distances).with_attrs(
            Attrs::new()
                .with_units("km")
                .with_long_name("distance from first station"),
        ),
    )?;

    debug!(stations = stations.len(), delta_km, "subsampled survey stations");
    let line = SurveyLine { stations, delta_km };
    Ok(OceanDataset::new(out)
        .with_name(od.name.clone())
        .with_parameters(od.parameters().clone())?
        .with_subsampling(Subsampling::Survey(line)))
}
