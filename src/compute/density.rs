//! Density and stratification.

use tracing::debug;

use super::calculus::derivative;
use super::parameter_attrs;
use crate::dataset::{Dataset, OceanDataset};
use crate::equations::EquationOfState;
use crate::error::Result;
use crate::grid::{Axis, Field};

/// `Sigma0` from the dataset when present, otherwise computed from `S` and `Temp`.
pub(crate) fn sigma0(od: &OceanDataset) -> Result<Field> {
    if let Ok(existing) = od.dataset().get("Sigma0") {
        return Ok(existing.clone());
    }
    let ds = potential_density_anomaly(od)?;
    Ok(ds.get("Sigma0")?.clone())
}

/// Potential density anomaly `Sigma0` = ρ(S, θ, 0) − 1000 kg/m³.
///
/// Requires `S` and `Temp`; the formulation follows the `eq_state` parameter.
pub fn potential_density_anomaly(od: &OceanDataset) -> Result<Dataset> {
    let ds = od.dataset();
    let params = od.parameters();
    let salinity = ds.get("S")?;
    let temperature = ds.get("Temp")?;

    let eos = EquationOfState::new(params.eq_state);
    let rho = eos.density_field(salinity, temperature, 0.0)?;
    let attrs = parameter_attrs(params, &["eq_state"])
        .with_units("kg/m^3")
        .with_long_name("potential density anomaly");
    let sigma0 = rho.map(|r| r - 1000.0).with_attrs(attrs);

    debug!(eq_state = %params.eq_state, "computed Sigma0");
    Dataset::new().with("Sigma0", sigma0)
}

/// Squared Brunt-Väisälä frequency `N2` = −(g/ρ₀)·∂σ₀/∂z on `Zl` interfaces.
///
/// The surface interface is undefined (NaN).
pub fn brunt_vaisala_frequency(od: &OceanDataset) -> Result<Dataset> {
    let params = od.parameters();
    let sigma0 = sigma0(od)?;
    let dsigma_dz = derivative(od.dataset(), &sigma0, Axis::Z)?;

    let factor = -params.g / params.rho0;
    let attrs = parameter_attrs(params, &["g", "rho0"])
        .with_units("s^-2")
        .with_long_name("Brunt-Väisälä Frequency");
    let n2 = dsigma_dz.scale(factor).with_attrs(attrs);

    debug!(g = params.g, rho0 = params.rho0, "computed N2");
    Dataset::new().with("N2", n2)
}
