//! Physical parameters carried by an ocean dataset.

use crate::equations::EqState;
use crate::error::{ComputeError, Result};

/// Default reference density (kg/m³).
pub const RHO_0: f64 = 1027.0;

/// Default gravitational acceleration (m/s²).
pub const G: f64 = 9.81;

/// Earth's angular velocity (rad/s).
pub const OMEGA: f64 = 7.292123516990375e-05;

/// Specific heat capacity of seawater (J/kg/K).
pub const C_P: f64 = 3.986e3;

/// Physical constants used by the diagnostics.
///
/// # Example
///
/// ```
/// use oceandiag_rs::dataset::Parameters;
/// use oceandiag_rs::equations::EqState;
///
/// let params = Parameters::new()
///     .with_rho0(1025.0)
///     .with_eq_state(EqState::Mdjwf);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Parameters {
    /// Reference density (kg/m³)
    pub rho0: f64,
    /// Gravitational acceleration (m/s²)
    pub g: f64,
    /// Equation of state
    pub eq_state: EqState,
    /// Non-hydrostatic switch: 0 hydrostatic, 1 non-hydrostatic
    pub eps_nh: f64,
    /// Earth's angular velocity (rad/s)
    pub omega: f64,
    /// Specific heat capacity (J/kg/K)
    pub c_p: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self::new()
    }
}

impl Parameters {
    pub fn new() -> Self {
        Self {
            rho0: RHO_0,
            g: G,
            eq_state: EqState::default(),
            eps_nh: 0.0,
            omega: OMEGA,
            c_p: C_P,
        }
    }

    pub fn with_rho0(mut self, rho0: f64) -> Self {
        self.rho0 = rho0;
        self
    }

    pub fn with_g(mut self, g: f64) -> Self {
        self.g = g;
        self
    }

    pub fn with_eq_state(mut self, eq_state: EqState) -> Self {
        self.eq_state = eq_state;
        self
    }

    /// Enable (1) or disable (0) the non-hydrostatic terms.
    pub fn with_eps_nh(mut self, eps_nh: f64) -> Self {
        self.eps_nh = eps_nh;
        self
    }

    pub fn with_omega(mut self, omega: f64) -> Self {
        self.omega = omega;
        self
    }

    pub fn with_c_p(mut self, c_p: f64) -> Self {
        self.c_p = c_p;
        self
    }

    /// Check every parameter is physically meaningful.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("rho0", self.rho0), ("g", self.g), ("c_p", self.c_p)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ComputeError::invalid_parameter(
                    name,
                    format!("must be positive and finite, got {value}"),
                ));
            }
        }
        if !(self.omega.is_finite() && self.omega >= 0.0) {
            return Err(ComputeError::invalid_parameter(
                "omega",
                format!("must be non-negative, got {}", self.omega),
            ));
        }
        if self.eps_nh != 0.0 && self.eps_nh != 1.0 {
            return Err(ComputeError::invalid_parameter(
                "eps_nh",
                format!("must be 0 or 1, got {}", self.eps_nh),
            ));
        }
        Ok(())
    }

    /// Value of a parameter by name, formatted for variable attributes.
    pub fn value_of(&self, name: &str) -> Option<String> {
        Some(match name {
            "rho0" => self.rho0.to_string(),
            "g" => self.g.to_string(),
            "eq_state" => self.eq_state.to_string(),
            "eps_nh" => self.eps_nh.to_string(),
            "omega" => self.omega.to_string(),
            "c_p" => self.c_p.to_string(),
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let p = Parameters::default();
        assert!(p.validate().is_ok());
        assert_eq!(p.eq_state, EqState::Jmd95);
        assert_eq!(p.eps_nh, 0.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Parameters::new().with_rho0(0.0).validate().is_err());
        assert!(Parameters::new().with_g(f64::NAN).validate().is_err());
        assert!(Parameters::new().with_eps_nh(0.5).validate().is_err());
        assert!(Parameters::new().with_omega(-1.0).validate().is_err());
        assert!(Parameters::new().with_eps_nh(1.0).validate().is_ok());
    }

    #[test]
    fn test_value_of() {
        let p = Parameters::new().with_eq_state(EqState::Mdjwf);
        assert_eq!(p.value_of("eq_state").as_deref(), Some("mdjwf"));
        assert_eq!(p.value_of("g").as_deref(), Some("9.81"));
        assert_eq!(p.value_of("unknown"), None);
    }
}
