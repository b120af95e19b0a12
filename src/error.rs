//! Error types for dataset access and derived-quantity computations.

use thiserror::Error;

/// Errors that can occur while building datasets or computing diagnostics.
#[derive(Debug, Error)]
pub enum ComputeError {
    /// A variable required by the computation is not in the dataset.
    #[error("Missing variable: {0}")]
    MissingVariable(String),

    /// A coordinate required by the computation is not in the dataset.
    #[error("Missing coordinate: {0}")]
    MissingCoordinate(String),

    /// Two fields (or a field and its declared dims) disagree on shape.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// A field is not located where the operation expects it.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A physical parameter is out of range.
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The dataset has not gone through the required subsampling step.
    #[error("ocean dataset must be subsampled using `subsample.{method}`")]
    NotSubsampled { method: &'static str },

    /// Invalid user input (coordinates, names, axes).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// NetCDF library error
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCDF(#[from] netcdf::Error),
}

impl ComputeError {
    /// Create a shape mismatch error.
    pub fn shape_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ComputeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_subsampled_message() {
        let err = ComputeError::NotSubsampled {
            method: "mooring_array",
        };
        assert_eq!(
            err.to_string(),
            "ocean dataset must be subsampled using `subsample.mooring_array`"
        );
    }

    #[test]
    fn test_invalid_parameter_message() {
        let err = ComputeError::invalid_parameter("rho0", "must be positive");
        assert_eq!(err.to_string(), "Invalid parameter `rho0`: must be positive");
    }
}
