//! Construction of rectilinear C-grids with MITgcm metric names.
//!
//! Grids are either spherical-polar (coordinates in degrees, metrics from the
//! Earth radius) or Cartesian (coordinates and constant spacings in metres on
//! an f- or β-plane). The builder produces a [`Dataset`] holding every
//! coordinate, metric and mask the diagnostics need:
//!
//! | variable | dims | meaning |
//! |---|---|---|
//! | `XC`, `YC` | (Y, X) | tracer-point longitude/latitude |
//! | `XG`, `YG` | (Yp1, Xp1) | corner longitude/latitude |
//! | `dxF`, `dyF`, `rA` | (Y, X) | cell widths and area through the center |
//! | `dxC`, `dyG`, `rAw` | (Y, Xp1) | center-to-center x spacing, west-face length, U-cell area |
//! | `dyC`, `dxG`, `rAs` | (Yp1, X) | center-to-center y spacing, south-face length, V-cell area |
//! | `dxV`, `dyU`, `rAz` | (Yp1, Xp1) | V-to-V x spacing, U-to-U y spacing, vorticity-cell area |
//! | `drF` / `drC` | (Z) / (Zp1) | cell thickness / center-to-center distance |
//! | `HFacC`, `HFacW`, `HFacS` | (Z, ·, ·) | open fraction of cells and faces |
//! | `fCori`, `fCoriG` | (Y, X) / (Yp1, Xp1) | Coriolis parameter |
//! | `AngleCS`, `AngleSN` | (Y, X) | cosine/sine of the grid orientation |
//! | `Depth` | (Y, X) | water column depth |

use std::f64::consts::PI;

use tracing::debug;

use super::Dataset;
use crate::dataset::parameters::OMEGA;
use crate::error::{ComputeError, Result};
use crate::grid::{Attrs, Axis, Dim, Field};

/// Mean Earth radius (m).
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Default Coriolis parameter of Cartesian grids (s⁻¹).
pub const F_PLANE_F0: f64 = 1.0e-4;

type DepthFn = Box<dyn Fn(f64, f64) -> f64>;

/// Horizontal geometry of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Geometry {
    /// Coordinates in degrees on a sphere of radius [`EARTH_RADIUS`].
    Spherical,
    /// Coordinates in metres.
    Cartesian,
}

/// Builder for a rectilinear C-grid.
///
/// # Example
///
/// ```
/// use oceandiag_rs::dataset::GridBuilder;
/// use oceandiag_rs::grid::Dim;
///
/// let ds = GridBuilder::spherical(-30.0, 60.0, 0.5, 0.25, 8, 6)
///     .with_uniform_levels(4, 25.0)
///     .with_times(vec![0.0, 3600.0])
///     .build()
///     .unwrap();
///
/// assert_eq!(ds.size_of(Dim::Xp1), Some(9));
/// assert_eq!(ds.size_of(Dim::Zp1), Some(5));
/// assert!(ds.contains("rAz"));
/// ```
pub struct GridBuilder {
    x0: f64,
    y0: f64,
    dx: f64,
    dy: f64,
    nx: usize,
    ny: usize,
    geometry: Geometry,
    dr_f: Vec<f64>,
    times: Vec<f64>,
    depth: Option<DepthFn>,
    angle_deg: f64,
    omega: f64,
    f0: f64,
    beta: f64,
}

impl GridBuilder {
    fn with_geometry(
        geometry: Geometry,
        origin: (f64, f64),
        spacing: (f64, f64),
        cells: (usize, usize),
    ) -> Self {
        Self {
            x0: origin.0,
            y0: origin.1,
            dx: spacing.0,
            dy: spacing.1,
            nx: cells.0,
            ny: cells.1,
            geometry,
            dr_f: vec![10.0],
            times: vec![0.0],
            depth: None,
            angle_deg: 0.0,
            omega: OMEGA,
            f0: F_PLANE_F0,
            beta: 0.0,
        }
    }

    /// Grid whose south-west corner is at (`lon0`, `lat0`) with `nx` × `ny`
    /// cells of `dlon` × `dlat` degrees.
    pub fn spherical(lon0: f64, lat0: f64, dlon: f64, dlat: f64, nx: usize, ny: usize) -> Self {
        Self::with_geometry(Geometry::Spherical, (lon0, lat0), (dlon, dlat), (nx, ny))
    }

    /// Grid whose south-west corner is at (`x0`, `y0`) with `nx` × `ny` cells
    /// of `dx` × `dy` metres, on an f-plane with `f` = [`F_PLANE_F0`].
    pub fn cartesian(x0: f64, y0: f64, dx: f64, dy: f64, nx: usize, ny: usize) -> Self {
        Self::with_geometry(Geometry::Cartesian, (x0, y0), (dx, dy), (nx, ny))
    }

    /// Vertical cell thicknesses, surface first (m).
    pub fn with_levels(mut self, dr_f: Vec<f64>) -> Self {
        self.dr_f = dr_f;
        self
    }

    /// `nz` levels of equal thickness `dz` (m).
    pub fn with_uniform_levels(mut self, nz: usize, dz: f64) -> Self {
        self.dr_f = vec![dz; nz];
        self
    }

    /// Snapshot times (s).
    pub fn with_times(mut self, times: Vec<f64>) -> Self {
        self.times = times;
        self
    }

    /// Water depth (m, positive) as a function of the (x, y) coordinates of
    /// tracer points.
    ///
    /// Defaults to the full column everywhere.
    pub fn with_depth(mut self, depth: impl Fn(f64, f64) -> f64 + 'static) -> Self {
        self.depth = Some(Box::new(depth));
        self
    }

    /// Orientation of the grid x axis, degrees counter-clockwise from east.
    ///
    /// Only `AngleCS`/`AngleSN` are affected; metrics stay those of the
    /// unrotated grid.
    pub fn with_grid_angle(mut self, degrees: f64) -> Self {
        self.angle_deg = degrees;
        self
    }

    /// Rotation rate (rad/s) giving `f = 2Ω sin(lat)` on spherical grids.
    pub fn with_omega(mut self, omega: f64) -> Self {
        self.omega = omega;
        self
    }

    /// Coriolis parameter `f = f0 + beta * y` on Cartesian grids.
    pub fn with_beta_plane(mut self, f0: f64, beta: f64) -> Self {
        self.f0 = f0;
        self.beta = beta;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.nx == 0 || self.ny == 0 || self.dr_f.is_empty() || self.times.is_empty() {
            return Err(ComputeError::InvalidInput(
                "grid needs at least one cell in X, Y, Z and one snapshot".to_string(),
            ));
        }
        if !(self.dx > 0.0 && self.dy > 0.0) {
            return Err(ComputeError::InvalidInput(format!(
                "grid spacing must be positive, got dx={} dy={}",
                self.dx, self.dy
            )));
        }
        let y_max = self.y0 + self.ny as f64 * self.dy;
        if self.geometry == Geometry::Spherical && (self.y0 < -90.0 || y_max > 90.0) {
            return Err(ComputeError::InvalidInput(format!(
                "latitudes [{}, {y_max}] fall outside [-90, 90]",
                self.y0
            )));
        }
        if self.dr_f.iter().any(|&dz| !(dz > 0.0)) {
            return Err(ComputeError::InvalidInput(
                "level thicknesses must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn x_center(&self, i: usize) -> f64 {
        self.x0 + (i as f64 + 0.5) * self.dx
    }

    fn y_center(&self, j: usize) -> f64 {
        self.y0 + (j as f64 + 0.5) * self.dy
    }

    fn x_corner(&self, i: usize) -> f64 {
        self.x0 + i as f64 * self.dx
    }

    fn y_corner(&self, j: usize) -> f64 {
        self.y0 + j as f64 * self.dy
    }

    /// Zonal length (m) of one cell at y coordinate `y`.
    fn dx_at(&self, y: f64) -> f64 {
        match self.geometry {
            Geometry::Spherical => EARTH_RADIUS * y.to_radians().cos() * self.dx.to_radians(),
            Geometry::Cartesian => self.dx,
        }
    }

    /// Meridional length (m) of one cell.
    fn dy_metres(&self) -> f64 {
        match self.geometry {
            Geometry::Spherical => EARTH_RADIUS * self.dy.to_radians(),
            Geometry::Cartesian => self.dy,
        }
    }

    /// Area (m²) of a one-cell-wide band between y coordinates `south` and `north`.
    fn band_area(&self, south: f64, north: f64) -> f64 {
        match self.geometry {
            Geometry::Spherical => {
                let south = south.clamp(-90.0, 90.0).to_radians();
                let north = north.clamp(-90.0, 90.0).to_radians();
                EARTH_RADIUS * EARTH_RADIUS * self.dx.to_radians() * (north.sin() - south.sin())
            }
            Geometry::Cartesian => self.dx * (north - south),
        }
    }

    fn coriolis(&self, y: f64) -> f64 {
        match self.geometry {
            Geometry::Spherical => 2.0 * self.omega * y.to_radians().sin(),
            Geometry::Cartesian => self.f0 + self.beta * y,
        }
    }

    fn coordinate_attrs(&self, axis: Axis) -> Attrs {
        let (units, long_name) = match (self.geometry, axis) {
            (Geometry::Spherical, Axis::X) => ("degrees_east", "longitude"),
            (Geometry::Spherical, _) => ("degrees_north", "latitude"),
            (Geometry::Cartesian, Axis::X) => ("m", "x coordinate"),
            (Geometry::Cartesian, _) => ("m", "y coordinate"),
        };
        Attrs::new().with_units(units).with_long_name(long_name)
    }

    /// Assemble the dataset.
    pub fn build(self) -> Result<Dataset> {
        self.validate()?;

        let (nx, ny, nz) = (self.nx, self.ny, self.dr_f.len());
        let c = [Dim::Y, Dim::X];
        let cs = [ny, nx];
        let u = [Dim::Y, Dim::Xp1];
        let us = [ny, nx + 1];
        let v = [Dim::Yp1, Dim::X];
        let vs = [ny + 1, nx];
        let g = [Dim::Yp1, Dim::Xp1];
        let gs = [ny + 1, nx + 1];

        let mut ds = Dataset::new();
        let metre = |name: &str| Attrs::new().with_units("m").with_long_name(name);
        let area = |name: &str| Attrs::new().with_units("m^2").with_long_name(name);

        let xc = Field::from_fn(&c, &cs, |[_, _, _, i]| self.x_center(i))?;
        let yc = Field::from_fn(&c, &cs, |[_, _, j, _]| self.y_center(j))?;
        let xg = Field::from_fn(&g, &gs, |[_, _, _, i]| self.x_corner(i))?;
        let yg = Field::from_fn(&g, &gs, |[_, _, j, _]| self.y_corner(j))?;
        ds.insert("XC", xc.with_attrs(self.coordinate_attrs(Axis::X)))?;
        ds.insert("YC", yc.with_attrs(self.coordinate_attrs(Axis::Y)))?;
        ds.insert("XG", xg.with_attrs(self.coordinate_attrs(Axis::X)))?;
        ds.insert("YG", yg.with_attrs(self.coordinate_attrs(Axis::Y)))?;

        let dy = self.dy_metres();
        let half = 0.5 * self.dy;
        let center_band = |j: usize| self.band_area(self.y_corner(j), self.y_corner(j + 1));
        let corner_band = |j: usize| {
            let y = self.y_corner(j);
            self.band_area(y - half, y + half)
        };

        // Tracer points
        let dx_f = Field::from_fn(&c, &cs, |[_, _, j, _]| self.dx_at(self.y_center(j)))?;
        let r_a = Field::from_fn(&c, &cs, |[_, _, j, _]| center_band(j))?;
        ds.insert("dxF", dx_f.with_attrs(metre("x cell width")))?;
        ds.insert("dyF", Field::filled(&c, &cs, dy)?.with_attrs(metre("y cell width")))?;
        ds.insert("rA", r_a.with_attrs(area("cell area")))?;

        // U points
        let dx_c = Field::from_fn(&u, &us, |[_, _, j, _]| self.dx_at(self.y_center(j)))?;
        let r_aw = Field::from_fn(&u, &us, |[_, _, j, _]| center_band(j))?;
        ds.insert("dxC", dx_c.with_attrs(metre("x spacing between cell centers")))?;
        ds.insert("dyG", Field::filled(&u, &us, dy)?.with_attrs(metre("west face length")))?;
        ds.insert("rAw", r_aw.with_attrs(area("U cell area")))?;

        // V points
        let dx_g = Field::from_fn(&v, &vs, |[_, _, j, _]| self.dx_at(self.y_corner(j)))?;
        let r_as = Field::from_fn(&v, &vs, |[_, _, j, _]| corner_band(j))?;
        let dy_c = Field::filled(&v, &vs, dy)?;
        ds.insert("dyC", dy_c.with_attrs(metre("y spacing between cell centers")))?;
        ds.insert("dxG", dx_g.with_attrs(metre("south face length")))?;
        ds.insert("rAs", r_as.with_attrs(area("V cell area")))?;

        // Corner points
        let dx_v = Field::from_fn(&g, &gs, |[_, _, j, _]| self.dx_at(self.y_corner(j)))?;
        let r_az = Field::from_fn(&g, &gs, |[_, _, j, _]| corner_band(j))?;
        let dy_u = Field::filled(&g, &gs, dy)?;
        ds.insert("dxV", dx_v.with_attrs(metre("x spacing between V points")))?;
        ds.insert("dyU", dy_u.with_attrs(metre("y spacing between U points")))?;
        ds.insert("rAz", r_az.with_attrs(area("vorticity cell area")))?;

        let coriolis = || Attrs::new().with_units("s^-1").with_long_name("Coriolis parameter");
        let f_c = Field::from_fn(&c, &cs, |[_, _, j, _]| self.coriolis(self.y_center(j)))?;
        let f_g = Field::from_fn(&g, &gs, |[_, _, j, _]| self.coriolis(self.y_corner(j)))?;
        ds.insert("fCori", f_c.with_attrs(coriolis()))?;
        ds.insert("fCoriG", f_g.with_attrs(coriolis()))?;

        let angle = self.angle_deg.to_radians();
        let angle_cs = Field::filled(&c, &cs, angle.cos())?;
        let angle_sn = Field::filled(&c, &cs, angle.sin())?;
        let orientation = |name: &str| Attrs::new().with_long_name(name);
        ds.insert("AngleCS", angle_cs.with_attrs(orientation("cosine of grid orientation angle")))?;
        ds.insert("AngleSN", angle_sn.with_attrs(orientation("sine of grid orientation angle")))?;

        // Vertical
        let mut zp1 = Vec::with_capacity(nz + 1);
        zp1.push(0.0);
        for dz in &self.dr_f {
            let last = zp1[zp1.len() - 1];
            zp1.push(last - dz);
        }
        let z: Vec<f64> = (0..nz).map(|k| 0.5 * (zp1[k] + zp1[k + 1])).collect();
        let zl: Vec<f64> = zp1[..nz].to_vec();
        let mut dr_c = Vec::with_capacity(nz + 1);
        dr_c.push(-z[0]);
        for k in 1..nz {
            dr_c.push(z[k - 1] - z[k]);
        }
        dr_c.push(z[nz - 1] - zp1[nz]);

        ds.set_coord(Dim::Z, z)?;
        ds.set_coord(Dim::Zl, zl)?;
        ds.set_coord(Dim::Zp1, zp1.clone())?;
        ds.set_coord(Dim::Time, self.times.clone())?;
        let dr_f = Field::from_vec(Dim::Z, self.dr_f.clone());
        ds.insert("drF", dr_f.with_attrs(metre("cell thickness")))?;
        let dr_c = Field::from_vec(Dim::Zp1, dr_c);
        ds.insert("drC", dr_c.with_attrs(metre("distance between cell centers")))?;

        let full_depth = -zp1[nz];
        let depth_at = |i: usize, j: usize| match &self.depth {
            Some(f) => f(self.x_center(i), self.y_center(j)).max(0.0),
            None => full_depth,
        };
        let depth = Field::from_fn(&c, &cs, |[_, _, j, i]| depth_at(i, j))?;

        let hfac_c = Field::from_fn(&[Dim::Z, Dim::Y, Dim::X], &[nz, ny, nx], |[_, k, j, i]| {
            let top = -zp1[k];
            let bottom = -zp1[k + 1];
            let h = depth.at([0, 0, j, i]);
            ((h.min(bottom) - top) / (bottom - top)).clamp(0.0, 1.0)
        })?;
        let hfac_w = Field::from_fn(&[Dim::Z, Dim::Y, Dim::Xp1], &[nz, ny, nx + 1], |[_, k, j, i]| {
            if i == 0 || i == nx {
                0.0
            } else {
                hfac_c.at([0, k, j, i - 1]).min(hfac_c.at([0, k, j, i]))
            }
        })?;
        let hfac_s = Field::from_fn(&[Dim::Z, Dim::Yp1, Dim::X], &[nz, ny + 1, nx], |[_, k, j, i]| {
            if j == 0 || j == ny {
                0.0
            } else {
                hfac_c.at([0, k, j - 1, i]).min(hfac_c.at([0, k, j, i]))
            }
        })?;

        let fraction = |name: &str| Attrs::new().with_long_name(name);
        ds.insert("HFacC", hfac_c.with_attrs(fraction("open fraction of tracer cell")))?;
        ds.insert("HFacW", hfac_w.with_attrs(fraction("open fraction of west face")))?;
        ds.insert("HFacS", hfac_s.with_attrs(fraction("open fraction of south face")))?;
        ds.insert("Depth", depth.with_attrs(metre("ocean depth")))?;

        debug!(nx, ny, nz, nt = self.times.len(), geometry = ?self.geometry, "built C-grid");
        Ok(ds)
    }
}

/// Great-circle distance (km) between two (lon, lat) points in degrees.
pub fn great_circle_distance(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dphi = phi2 - phi1;
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let central = 2.0 * a.sqrt().min(1.0).asin();
    central * EARTH_RADIUS / 1000.0
}

/// Convert degrees of latitude to km along a meridian.
#[inline]
pub fn meridian_km(dlat_deg: f64) -> f64 {
    dlat_deg * PI / 180.0 * EARTH_RADIUS / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn small_grid() -> Dataset {
        GridBuilder::spherical(0.0, 10.0, 1.0, 1.0, 4, 3)
            .with_levels(vec![10.0, 20.0, 30.0])
            .build()
            .unwrap()
    }

    #[test]
    fn test_shapes() {
        let ds = small_grid();
        assert_eq!(ds.get("dxC").unwrap().dims(), &[Dim::Y, Dim::Xp1]);
        assert_eq!(ds.get("dyC").unwrap().shape(), &[4, 4]);
        assert_eq!(ds.get("rAz").unwrap().shape(), &[4, 5]);
        assert_eq!(ds.get("HFacW").unwrap().shape(), &[3, 3, 5]);
        assert_eq!(ds.get("drC").unwrap().shape(), &[4]);
    }

    #[test]
    fn test_vertical_coordinates() {
        let ds = small_grid();
        assert_eq!(ds.coord(Dim::Zp1).unwrap().data(), &[0.0, -10.0, -30.0, -60.0]);
        assert_eq!(ds.coord(Dim::Z).unwrap().data(), &[-5.0, -20.0, -45.0]);
        assert_eq!(ds.coord(Dim::Zl).unwrap().data(), &[0.0, -10.0, -30.0]);
        assert_eq!(ds.get("drC").unwrap().data(), &[5.0, 15.0, 25.0, 15.0]);
    }

    #[test]
    fn test_areas_sum_to_band() {
        let ds = small_grid();
        let total: f64 = ds.get("rA").unwrap().data().iter().sum();
        let expected = EARTH_RADIUS.powi(2)
            * 4.0f64.to_radians()
            * (13.0f64.to_radians().sin() - 10.0f64.to_radians().sin());
        assert_relative_eq!(total, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_closed_boundaries() {
        let ds = small_grid();
        let hw = ds.get("HFacW").unwrap();
        assert_eq!(hw.get(&[0, 1, 0]), Some(0.0));
        assert_eq!(hw.get(&[0, 1, 4]), Some(0.0));
        assert_eq!(hw.get(&[0, 1, 2]), Some(1.0));
        let hs = ds.get("HFacS").unwrap();
        assert_eq!(hs.get(&[0, 0, 1]), Some(0.0));
        assert_eq!(hs.get(&[0, 3, 1]), Some(0.0));
    }

    #[test]
    fn test_partial_cells_from_depth() {
        let ds = GridBuilder::spherical(0.0, 0.0, 1.0, 1.0, 2, 1)
            .with_levels(vec![10.0, 10.0, 10.0])
            .with_depth(|lon, _| if lon < 1.0 { 15.0 } else { 30.0 })
            .build()
            .unwrap();
        let hc = ds.get("HFacC").unwrap();
        assert_eq!(hc.get(&[0, 0, 0]), Some(1.0));
        assert_eq!(hc.get(&[1, 0, 0]), Some(0.5));
        assert_eq!(hc.get(&[2, 0, 0]), Some(0.0));
        assert_eq!(hc.get(&[2, 0, 1]), Some(1.0));
        // Face between the two columns takes the shallower cell
        assert_eq!(ds.get("HFacW").unwrap().get(&[1, 0, 1]), Some(0.5));
    }

    #[test]
    fn test_invalid_grids() {
        assert!(GridBuilder::spherical(0.0, 0.0, 1.0, 1.0, 0, 2).build().is_err());
        assert!(GridBuilder::spherical(0.0, 85.0, 1.0, 1.0, 2, 10).build().is_err());
        assert!(GridBuilder::spherical(0.0, 0.0, -1.0, 1.0, 2, 2).build().is_err());
        assert!(GridBuilder::spherical(0.0, 0.0, 1.0, 1.0, 2, 2)
            .with_levels(vec![10.0, 0.0])
            .build()
            .is_err());
    }

    #[test]
    fn test_cartesian_metrics() {
        let ds = GridBuilder::cartesian(0.0, 0.0, 2000.0, 1000.0, 3, 2)
            .with_beta_plane(1.0e-4, 2.0e-11)
            .build()
            .unwrap();
        let xc = ds.get("XC").unwrap();
        assert_eq!(xc.data(), &[1000.0, 3000.0, 5000.0, 1000.0, 3000.0, 5000.0]);
        assert_eq!(ds.get("XC").unwrap().attrs.units.as_deref(), Some("m"));
        for name in ["rA", "rAw", "rAs", "rAz"] {
            assert!(ds.get(name).unwrap().data().iter().all(|&a| a == 2.0e6), "{name}");
        }
        for name in ["dxF", "dxC", "dxG", "dxV"] {
            assert!(ds.get(name).unwrap().data().iter().all(|&d| d == 2000.0), "{name}");
        }
        assert!(ds.get("dyC").unwrap().data().iter().all(|&d| d == 1000.0));
        let f = ds.get("fCori").unwrap();
        assert_relative_eq!(f.get(&[0, 0]).unwrap(), 1.0e-4 + 2.0e-11 * 500.0);
        assert_relative_eq!(f.get(&[1, 2]).unwrap(), 1.0e-4 + 2.0e-11 * 1500.0);
        assert_relative_eq!(ds.get("fCoriG").unwrap().get(&[0, 0]).unwrap(), 1.0e-4);
    }

    #[test]
    fn test_cartesian_f_plane_ignores_latitude_bounds() {
        let ds = GridBuilder::cartesian(0.0, 5.0e5, 1.0e4, 1.0e4, 2, 2).build().unwrap();
        assert!(ds.get("fCori").unwrap().data().iter().all(|&f| f == F_PLANE_F0));
    }

    #[test]
    fn test_great_circle_distance() {
        // One degree along the equator
        let d = great_circle_distance(0.0, 0.0, 1.0, 0.0);
        assert_relative_eq!(d, meridian_km(1.0), max_relative = 1e-12);
        assert_eq!(great_circle_distance(5.0, 5.0, 5.0, 5.0), 0.0);
    }
}
