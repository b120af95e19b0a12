//! Reading and writing datasets (requires the `netcdf` feature).

#[cfg(feature = "netcdf")]
mod netcdf_io;

#[cfg(feature = "netcdf")]
pub use netcdf_io::{
    FILL_VALUE_F64, NetCDFWriterConfig, is_valid_f64, read_dataset, write_dataset,
};
