//! Equation of State for seawater density.
//!
//! Computes seawater density ρ(S, θ, p) from salinity, potential temperature
//! and pressure. Two formulations are available, matching the options of
//! MITgcm-style ocean models:
//!
//! - [`EqState::Jmd95`]: Jackett & McDougall (1995) refit of the UNESCO
//!   polynomials to potential temperature, ρ = ρ(S, θ, 0) / (1 − p/K) with
//!   the secant bulk modulus K(S, θ, p)
//! - [`EqState::Mdjwf`]: McDougall, Jackett, Wright & Feistel (2003) rational
//!   function of (S, θ, p)
//!
//! # References
//!
//! - UNESCO (1981): Tenth report of the joint panel on oceanographic tables and standards.
//! - Jackett & McDougall (1995): Minimal adjustment of hydrographic profiles to
//!   achieve static stability.
//! - McDougall et al. (2003): Accurate and computationally efficient algorithms
//!   for potential temperature and density of seawater.
//!
//! # Units
//!
//! - Temperature: °C (potential temperature)
//! - Salinity: PSU (practical salinity units)
//! - Pressure: dbar (decibars), where 1 dbar ≈ 1 m depth
//! - Density: kg/m³

use std::fmt;
use std::str::FromStr;

use crate::error::{ComputeError, Result};
use crate::grid::Field;

/// Equation of state formulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EqState {
    /// Jackett & McDougall (1995)
    #[default]
    Jmd95,
    /// McDougall, Jackett, Wright & Feistel (2003)
    Mdjwf,
}

impl EqState {
    pub const fn as_str(self) -> &'static str {
        match self {
            EqState::Jmd95 => "jmd95",
            EqState::Mdjwf => "mdjwf",
        }
    }
}

impl fmt::Display for EqState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EqState {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "jmd95" => Ok(EqState::Jmd95),
            "mdjwf" => Ok(EqState::Mdjwf),
            other => Err(ComputeError::invalid_parameter(
                "eq_state",
                format!("`{other}` is not one of: jmd95, mdjwf"),
            )),
        }
    }
}

/// Equation of State calculator for seawater.
#[derive(Clone, Copy, Debug, Default)]
pub struct EquationOfState {
    /// Formulation used by [`density`](Self::density).
    pub eq_state: EqState,
}

impl EquationOfState {
    pub fn new(eq_state: EqState) -> Self {
        Self { eq_state }
    }

    /// Compute seawater density.
    ///
    /// # Arguments
    /// * `salinity` - Salinity in PSU
    /// * `temperature` - Potential temperature in °C
    /// * `pressure` - Pressure in dbar (0 gives potential density)
    ///
    /// # Returns
    /// Density in kg/m³
    ///
    /// # Example
    /// ```
    /// use oceandiag_rs::equations::{EqState, EquationOfState};
    ///
    /// let eos = EquationOfState::new(EqState::Jmd95);
    ///
    /// // Standard seawater at 10°C
    /// let rho = eos.density(35.0, 10.0, 0.0);
    /// assert!((rho - 1026.95).abs() < 0.01);
    ///
    /// // Fresh water near its density maximum
    /// let rho_fresh = eos.density(0.0, 4.0, 0.0);
    /// assert!((rho_fresh - 1000.0).abs() < 0.1);
    /// ```
    #[inline]
    pub fn density(&self, salinity: f64, temperature: f64, pressure: f64) -> f64 {
        match self.eq_state {
            EqState::Jmd95 => density_jmd95(salinity, temperature, pressure),
            EqState::Mdjwf => density_mdjwf(salinity, temperature, pressure),
        }
    }

    /// Potential density anomaly σ₀ = ρ(S, θ, 0) − 1000 kg/m³.
    #[inline]
    pub fn sigma0(&self, salinity: f64, temperature: f64) -> f64 {
        self.density(salinity, temperature, 0.0) - 1000.0
    }

    /// Evaluate the density over whole salinity and temperature fields.
    ///
    /// Fields are aligned by dimension name. With the `parallel` feature the
    /// pointwise evaluation is spread over the rayon thread pool.
    pub fn density_field(
        &self,
        salinity: &Field,
        temperature: &Field,
        pressure: f64,
    ) -> Result<Field> {
        if salinity.dims() != temperature.dims() || salinity.shape() != temperature.shape() {
            return salinity.zip_with(temperature, |s, t| self.density(s, t, pressure));
        }

        #[cfg(feature = "parallel")]
        let data: Vec<f64> = {
            use rayon::prelude::*;
            salinity
                .data()
                .par_iter()
                .zip(temperature.data().par_iter())
                .map(|(&s, &t)| self.density(s, t, pressure))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let data: Vec<f64> = salinity
            .data()
            .iter()
            .zip(temperature.data())
            .map(|(&s, &t)| self.density(s, t, pressure))
            .collect();

        Field::new(salinity.dims(), salinity.shape(), data)
    }

    /// Thermal expansion coefficient α = -(1/ρ)(∂ρ/∂θ)|_{S,p}.
    ///
    /// Units: 1/°C
    ///
    /// Typical value: ~2×10⁻⁴ /°C for seawater at 10°C, 35 PSU
    pub fn thermal_expansion(&self, salinity: f64, temperature: f64, pressure: f64) -> f64 {
        let dt = 0.01;
        let rho = self.density(salinity, temperature, pressure);
        let rho_plus = self.density(salinity, temperature + dt, pressure);
        let rho_minus = self.density(salinity, temperature - dt, pressure);

        -((rho_plus - rho_minus) / (2.0 * dt)) / rho
    }

    /// Haline contraction coefficient β = (1/ρ)(∂ρ/∂S)|_{θ,p}.
    ///
    /// Units: 1/PSU
    pub fn haline_contraction(&self, salinity: f64, temperature: f64, pressure: f64) -> f64 {
        let ds = 0.01;
        let rho = self.density(salinity, temperature, pressure);
        let rho_plus = self.density(salinity + ds, temperature, pressure);
        let rho_minus = self.density(salinity - ds, temperature, pressure);

        ((rho_plus - rho_minus) / (2.0 * ds)) / rho
    }
}

/// Fresh water density at p = 0.
const JMD95_FW: [f64; 6] = [
    999.842594,
    6.793952e-02,
    -9.095290e-03,
    1.001685e-04,
    -1.120083e-06,
    6.536332e-09,
];

/// Salinity terms of the density at p = 0.
const JMD95_SW: [f64; 9] = [
    8.244930e-01,
    -4.089900e-03,
    7.643800e-05,
    -8.246700e-07,
    5.387500e-09,
    -5.724660e-03,
    1.022700e-04,
    -1.654600e-06,
    4.831400e-04,
];

/// Secant bulk modulus of fresh water at p = 0.
const JMD95_KFW: [f64; 5] = [
    1.965933e+04,
    1.444304e+02,
    -1.706103e+00,
    9.648704e-03,
    -4.190253e-05,
];

/// Salinity terms of the secant bulk modulus at p = 0.
const JMD95_KSW: [f64; 7] = [
    5.284855e+01,
    -3.101089e-01,
    6.283263e-03,
    -5.084188e-05,
    3.886640e-01,
    9.085835e-03,
    -4.619924e-04,
];

/// Pressure terms of the secant bulk modulus.
const JMD95_KP: [f64; 14] = [
    3.186519e+00,
    2.212276e-02,
    -2.984642e-04,
    1.956415e-06,
    6.704388e-03,
    -1.847318e-04,
    2.059331e-07,
    1.480266e-04,
    2.102898e-04,
    -1.202016e-05,
    1.394680e-07,
    -2.040237e-06,
    6.128773e-08,
    6.207323e-10,
];

/// One-atmosphere density ρ(S, θ, 0).
fn density_surface(salinity: f64, temperature: f64) -> f64 {
    let fw = &JMD95_FW;
    let sw = &JMD95_SW;
    let t = temperature;
    let s = salinity;
    let s3o2 = s * s.sqrt();

    let rho_w = fw[0] + t * (fw[1] + t * (fw[2] + t * (fw[3] + t * (fw[4] + t * fw[5]))));

    rho_w
        + s * (sw[0] + t * (sw[1] + t * (sw[2] + t * (sw[3] + t * sw[4]))))
        + s3o2 * (sw[5] + t * (sw[6] + t * sw[7]))
        + sw[8] * s * s
}

/// Secant bulk modulus K(S, θ, p) in bar, with `p` in bar.
fn secant_bulk_modulus(salinity: f64, temperature: f64, p: f64) -> f64 {
    let kfw = &JMD95_KFW;
    let ksw = &JMD95_KSW;
    let kp = &JMD95_KP;
    let t = temperature;
    let s = salinity;
    let s3o2 = s * s.sqrt();

    let k_fresh = kfw[0] + t * (kfw[1] + t * (kfw[2] + t * (kfw[3] + t * kfw[4])));
    let k_surface = k_fresh
        + s * (ksw[0] + t * (ksw[1] + t * (ksw[2] + t * ksw[3])))
        + s3o2 * (ksw[4] + t * (ksw[5] + t * ksw[6]));

    k_surface
        + p * (kp[0] + t * (kp[1] + t * (kp[2] + t * kp[3])))
        + p * s * (kp[4] + t * (kp[5] + t * kp[6]))
        + p * s3o2 * kp[7]
        + p * p * (kp[8] + t * (kp[9] + t * kp[10]))
        + p * p * s * (kp[11] + t * (kp[12] + t * kp[13]))
}

fn density_jmd95(salinity: f64, temperature: f64, pressure: f64) -> f64 {
    let rho_surface = density_surface(salinity, temperature);
    if pressure == 0.0 {
        return rho_surface;
    }
    // dbar to bar
    let p = pressure / 10.0;
    rho_surface / (1.0 - p / secant_bulk_modulus(salinity, temperature, p))
}

const MDJWF_NUM: [f64; 12] = [
    9.99843699e+02,
    7.35212840e+00,
    -5.45928211e-02,
    3.98476704e-04,
    2.96938239e+00,
    -7.23268813e-03,
    2.12382341e-03,
    1.04004591e-02,
    1.03970529e-07,
    5.18761880e-06,
    -3.24041825e-08,
    -1.23869360e-11,
];

const MDJWF_DEN: [f64; 13] = [
    1.00000000e+00,
    7.28606739e-03,
    -4.60835542e-05,
    3.68390573e-07,
    1.80809186e-10,
    2.14691708e-03,
    -9.27062484e-06,
    -1.78343643e-10,
    4.76534122e-06,
    1.63410736e-09,
    5.30848875e-06,
    -3.03175128e-16,
    -1.27934137e-17,
];

fn density_mdjwf(salinity: f64, temperature: f64, pressure: f64) -> f64 {
    let n = &MDJWF_NUM;
    let d = &MDJWF_DEN;

    let t1 = temperature;
    let t2 = t1 * t1;
    let s1 = salinity;
    let p1 = pressure;
    let sp5 = s1.sqrt();
    let p1t1 = p1 * t1;

    let num = n[0]
        + t1 * (n[1] + t1 * (n[2] + n[3] * t1))
        + s1 * (n[4] + n[5] * t1 + n[6] * s1)
        + p1 * (n[7] + n[8] * t2 + n[9] * s1 + p1 * (n[10] + n[11] * t2));

    let den = d[0]
        + t1 * (d[1] + t1 * (d[2] + t1 * (d[3] + t1 * d[4])))
        + s1 * (d[5] + t1 * (d[6] + d[7] * t2) + sp5 * (d[8] + d[9] * t2))
        + p1 * (d[10] + p1t1 * (d[11] * t2 + d[12] * p1));

    num / den
}

/// Freezing point of seawater in °C (UNESCO).
///
/// # Arguments
/// * `salinity` - Salinity in PSU
/// * `pressure` - Pressure in dbar
pub fn freezing_point(salinity: f64, pressure: f64) -> f64 {
    let s = salinity;
    -0.0575 * s + 1.710523e-3 * s.powf(1.5) - 2.154996e-4 * s.powi(2) - 7.53e-4 * pressure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Dim;

    const TOL: f64 = 0.05;

    #[test]
    fn test_pure_water_density() {
        for eq in [EqState::Jmd95, EqState::Mdjwf] {
            let eos = EquationOfState::new(eq);
            assert!((eos.density(0.0, 4.0, 0.0) - 1000.0).abs() < 0.1);
            assert!((eos.density(0.0, 0.0, 0.0) - 999.84).abs() < TOL);
        }
    }

    #[test]
    fn test_seawater_density() {
        // Reference values from the UNESCO tables
        for eq in [EqState::Jmd95, EqState::Mdjwf] {
            let eos = EquationOfState::new(eq);
            assert!((eos.density(35.0, 10.0, 0.0) - 1026.95).abs() < TOL);
            assert!((eos.density(35.0, 0.0, 0.0) - 1028.11).abs() < TOL);
            assert!((eos.density(35.0, 25.0, 0.0) - 1023.34).abs() < TOL);
        }
    }

    #[test]
    fn test_formulations_agree_at_depth() {
        let jmd = EquationOfState::new(EqState::Jmd95);
        let mdj = EquationOfState::new(EqState::Mdjwf);
        let rho_jmd = jmd.density(35.0, 10.0, 1000.0);
        let rho_mdj = mdj.density(35.0, 10.0, 1000.0);
        assert!((rho_jmd - rho_mdj).abs() < 0.1);
    }

    #[test]
    fn test_published_check_values() {
        let jmd = EquationOfState::new(EqState::Jmd95);
        assert!((jmd.density(35.5, 3.0, 3000.0) - 1041.83267).abs() < 1e-4);
        let mdj = EquationOfState::new(EqState::Mdjwf);
        assert!((mdj.density(35.0, 25.0, 2000.0) - 1031.65056056576).abs() < 1e-6);
    }

    #[test]
    fn test_compression_increases_density() {
        let eos = EquationOfState::default();
        assert!(eos.density(35.0, 5.0, 2000.0) > eos.density(35.0, 5.0, 0.0));
    }

    #[test]
    fn test_sigma0() {
        let eos = EquationOfState::default();
        assert!((eos.sigma0(35.0, 10.0) - 26.95).abs() < TOL);
    }

    #[test]
    fn test_expansion_coefficients() {
        let eos = EquationOfState::new(EqState::Mdjwf);
        let alpha = eos.thermal_expansion(35.0, 10.0, 0.0);
        assert!(alpha > 1e-4 && alpha < 3e-4);
        let beta = eos.haline_contraction(35.0, 10.0, 0.0);
        assert!(beta > 5e-4 && beta < 1e-3);
    }

    #[test]
    fn test_freezing_point() {
        assert!(freezing_point(0.0, 0.0).abs() < 1e-12);
        let tf = freezing_point(35.0, 0.0);
        assert!(tf < -1.8 && tf > -2.0);
    }

    #[test]
    fn test_eq_state_parsing() {
        assert_eq!("jmd95".parse::<EqState>().unwrap(), EqState::Jmd95);
        assert_eq!("MDJWF".parse::<EqState>().unwrap(), EqState::Mdjwf);
        assert!("teos10".parse::<EqState>().is_err());
        assert_eq!(EqState::Mdjwf.to_string(), "mdjwf");
    }

    #[test]
    fn test_density_field_matches_scalar() {
        let dims = [Dim::Z, Dim::X];
        let s = Field::from_fn(&dims, &[2, 3], |[_, k, _, i]| 30.0 + (k + i) as f64).unwrap();
        let t = Field::from_fn(&dims, &[2, 3], |[_, k, _, i]| 5.0 + (2 * k + i) as f64).unwrap();
        let eos = EquationOfState::new(EqState::Jmd95);
        let rho = eos.density_field(&s, &t, 0.0).unwrap();
        for ((r, &sv), &tv) in rho.data().iter().zip(s.data()).zip(t.data()) {
            assert_eq!(*r, eos.density(sv, tv, 0.0));
        }
    }

    #[test]
    fn test_density_field_broadcasts() {
        let s = Field::filled(&[Dim::X], &[3], 35.0).unwrap();
        let t = Field::filled(&[Dim::Z, Dim::X], &[2, 3], 10.0).unwrap();
        let rho = EquationOfState::default().density_field(&s, &t, 0.0).unwrap();
        assert_eq!(rho.dims(), &[Dim::Z, Dim::X]);
    }
}
