//! NetCDF I/O for MITgcm-style output.
//!
//! Variables are matched to [`Dim`]s by their dimension names (`time`, `Z`,
//! `Zl`, `Zp1`, `Y`, `Yp1`, `X`, `Xp1`, ...). Packed data (`scale_factor`,
//! `add_offset`) is unpacked and fill values become NaN.
//!
//! # Example
//!
//! ```rust,ignore
//! use oceandiag_rs::io::{read_dataset, write_dataset, NetCDFWriterConfig};
//!
//! let ds = read_dataset("mitgcm_output.nc")?;
//! let od = OceanDataset::new(ds).compute().kinetic_energy()?;
//!
//! let config = NetCDFWriterConfig::new("diagnostics.nc").with_title("KE");
//! write_dataset(od.dataset(), &config)?;
//! ```

use std::path::Path;

use chrono::Utc;
use netcdf::AttributeValue;
use tracing::{debug, warn};

use crate::dataset::Dataset;
use crate::error::{ComputeError, Result};
use crate::grid::{Attrs, Dim, Field};

/// Fill value for missing data (CF-conventions standard).
pub const FILL_VALUE_F64: f64 = 9.96920996838687e+36;

/// Prefix of the attributes holding the parameters a variable was computed with.
const PARAMETER_PREFIX: &str = "param_";

/// Check if a value is valid (not a fill value).
#[inline]
pub fn is_valid_f64(v: f64) -> bool {
    v.is_finite() && v.abs() < 1.0e+30
}

/// Configuration for NetCDF output.
#[derive(Debug, Clone)]
pub struct NetCDFWriterConfig {
    /// Output file path
    pub path: String,
    /// Title attribute (CF-conventions)
    pub title: Option<String>,
    /// Source attribute (model name/version)
    pub source: Option<String>,
    /// Comment attribute
    pub comment: Option<String>,
}

impl NetCDFWriterConfig {
    /// Create a new configuration with the given output path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: None,
            source: Some("oceandiag-rs".to_string()),
            comment: None,
        }
    }

    /// Set the title attribute.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the source attribute.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the comment attribute.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Dimension for a NetCDF dimension name; `T` is MITgcm's name for time.
fn dim_from_name(name: &str) -> Option<Dim> {
    match name {
        "T" => Some(Dim::Time),
        other => other.parse().ok(),
    }
}

fn attr_f64(var: &netcdf::Variable, name: &str) -> Option<f64> {
    var.attribute_value(name)
        .and_then(|r| r.ok())
        .and_then(|v| match v {
            AttributeValue::Double(d) => Some(d),
            AttributeValue::Float(f) => Some(f as f64),
            AttributeValue::Int(i) => Some(i as f64),
            AttributeValue::Short(s) => Some(s as f64),
            _ => None,
        })
}

fn attr_str(var: &netcdf::Variable, name: &str) -> Option<String> {
    var.attribute_value(name)
        .and_then(|r| r.ok())
        .and_then(|v| match v {
            AttributeValue::Str(s) => Some(s),
            _ => None,
        })
}

/// Attributes of a variable mapped onto [`Attrs`].
fn read_attrs(var: &netcdf::Variable) -> Attrs {
    let mut attrs = Attrs::new();
    attrs.units = attr_str(var, "units");
    attrs.long_name = attr_str(var, "long_name");
    attrs.direction = attr_str(var, "direction");
    for attr in var.attributes() {
        let name = attr.name();
        if let Some(param) = name.strip_prefix(PARAMETER_PREFIX)
            && let Some(value) = attr_str(var, &name)
        {
            attrs.parameters.insert(param.to_string(), value);
        }
    }
    attrs
}

/// Unpacked values of a variable with fill values replaced by NaN.
fn read_values(var: &netcdf::Variable) -> Result<Vec<f64>> {
    let scale = attr_f64(var, "scale_factor").unwrap_or(1.0);
    let offset = attr_f64(var, "add_offset").unwrap_or(0.0);
    let fill = attr_f64(var, "_FillValue");
    let raw: Vec<f64> = var.get_values::<f64, _>(..)?;
    Ok(raw
        .into_iter()
        .map(|v| {
            if !is_valid_f64(v) || fill.is_some_and(|f| v == f) {
                f64::NAN
            } else {
                v * scale + offset
            }
        })
        .collect())
}

/// Read every variable of a NetCDF file whose dimensions are known.
///
/// One-dimensional variables named after their own dimension become
/// coordinates. Variables with unknown or non-canonical dimensions are
/// skipped with a warning.
pub fn read_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let file = netcdf::open(path)?;
    let mut ds = Dataset::new();

    for var in file.variables() {
        let name = var.name();
        let nc_dims = var.dimensions();
        let dims: Option<Vec<Dim>> = nc_dims.iter().map(|d| dim_from_name(&d.name())).collect();
        let Some(dims) = dims else {
            warn!(variable = %name, "skipping variable with unknown dimensions");
            continue;
        };
        let shape: Vec<usize> = nc_dims.iter().map(|d| d.len()).collect();
        let values = read_values(&var)?;

        if let [dim] = dims.as_slice()
            && dim_from_name(&name) == Some(*dim)
        {
            ds.set_coord(*dim, values)?;
            continue;
        }

        match Field::new(&dims, &shape, values) {
            Ok(field) => ds.insert(name, field.with_attrs(read_attrs(&var)))?,
            Err(ComputeError::DimensionMismatch(reason)) => {
                warn!(variable = %name, %reason, "skipping variable");
            }
            Err(e) => return Err(e),
        }
    }

    debug!(path = %path.display(), variables = ds.len(), "read dataset");
    Ok(ds)
}

fn put_attrs(var: &mut netcdf::VariableMut, attrs: &Attrs) -> Result<()> {
    if let Some(units) = &attrs.units {
        var.put_attribute("units", units.as_str())?;
    }
    if let Some(long_name) = &attrs.long_name {
        var.put_attribute("long_name", long_name.as_str())?;
    }
    if let Some(direction) = &attrs.direction {
        var.put_attribute("direction", direction.as_str())?;
    }
    for (name, value) in &attrs.parameters {
        var.put_attribute(&format!("{PARAMETER_PREFIX}{name}"), value.as_str())?;
    }
    Ok(())
}

/// Write all coordinates and variables of a dataset to a new NetCDF file.
pub fn write_dataset(ds: &Dataset, config: &NetCDFWriterConfig) -> Result<()> {
    let mut file = netcdf::create(&config.path)?;

    for (&dim, &len) in ds.sizes() {
        file.add_dimension(dim.name(), len)?;
    }

    for (dim, coord) in ds.coords() {
        let mut var = file.add_variable::<f64>(dim.name(), &[dim.name()])?;
        if dim == Dim::Time {
            var.put_attribute("units", "seconds")?;
        } else {
            var.put_attribute("units", "m")?;
            var.put_attribute("positive", "up")?;
        }
        var.put_values(coord.data(), ..)?;
    }

    for (name, field) in ds.data_vars() {
        let dim_names: Vec<&str> = field.dims().iter().map(|d| d.name()).collect();
        let mut var = file.add_variable::<f64>(name, &dim_names)?;
        var.put_attribute("_FillValue", FILL_VALUE_F64)?;
        put_attrs(&mut var, &field.attrs)?;
        let data: Vec<f64> = field
            .data()
            .iter()
            .map(|&v| if v.is_finite() { v } else { FILL_VALUE_F64 })
            .collect();
        var.put_values(&data, ..)?;
    }

    if let Some(title) = &config.title {
        file.add_attribute("title", title.as_str())?;
    }
    if let Some(source) = &config.source {
        file.add_attribute("source", source.as_str())?;
    }
    if let Some(comment) = &config.comment {
        file.add_attribute("comment", comment.as_str())?;
    }
    let now = Utc::now();
    file.add_attribute(
        "history",
        format!("{}: Created by oceandiag-rs", now.format("%Y-%m-%d %H:%M:%S UTC")).as_str(),
    )?;

    debug!(path = %config.path, variables = ds.len(), "wrote dataset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_value_check() {
        assert!(is_valid_f64(1.0));
        assert!(!is_valid_f64(FILL_VALUE_F64));
        assert!(!is_valid_f64(f64::NAN));
    }

    #[test]
    fn test_dim_names() {
        assert_eq!(dim_from_name("T"), Some(Dim::Time));
        assert_eq!(dim_from_name("Zp1"), Some(Dim::Zp1));
        assert_eq!(dim_from_name("nodes"), None);
    }

    #[test]
    fn test_netcdf_config() {
        let config = NetCDFWriterConfig::new("out.nc")
            .with_title("Diagnostics")
            .with_comment("test");
        assert_eq!(config.path, "out.nc");
        assert_eq!(config.title.as_deref(), Some("Diagnostics"));
        assert_eq!(config.source.as_deref(), Some("oceandiag-rs"));
    }
}
