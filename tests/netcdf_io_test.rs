//! Round trip of a computed dataset through a NetCDF file.

#![cfg(feature = "netcdf")]

use oceandiag_rs::dataset::{GridBuilder, OceanDataset};
use oceandiag_rs::grid::{Dim, Field};
use oceandiag_rs::io::{NetCDFWriterConfig, read_dataset, write_dataset};

#[test]
fn test_write_then_read_dataset() {
    let mut ds = GridBuilder::spherical(0.0, 50.0, 0.5, 0.5, 4, 3)
        .with_uniform_levels(2, 15.0)
        .with_times(vec![0.0, 600.0])
        .build()
        .unwrap();
    let dims = [Dim::Time, Dim::Z, Dim::Y, Dim::X];
    ds.insert("S", Field::filled(&dims, &[2, 2, 3, 4], 35.0).unwrap()).unwrap();
    ds.insert(
        "Temp",
        Field::from_fn(&dims, &[2, 2, 3, 4], |[t, k, j, i]| 10.0 + (t + k + j + i) as f64).unwrap(),
    )
    .unwrap();
    let od = OceanDataset::new(ds).compute().brunt_vaisala_frequency().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diagnostics.nc");
    let config = NetCDFWriterConfig::new(path.to_string_lossy()).with_title("round trip");
    write_dataset(od.dataset(), &config).unwrap();

    let back = read_dataset(&path).unwrap();
    assert_eq!(back.size_of(Dim::Xp1), Some(5));
    assert_eq!(back.coord(Dim::Time).unwrap().data(), &[0.0, 600.0]);

    let n2 = back.get("N2").unwrap();
    let original = od.dataset().get("N2").unwrap();
    assert_eq!(n2.dims(), original.dims());
    assert_eq!(n2.attrs.units.as_deref(), Some("s^-2"));
    assert_eq!(n2.attrs.parameters["rho0"], "1027");
    for (a, b) in n2.data().iter().zip(original.data()) {
        // the undefined surface interface comes back as NaN
        assert!(a == b || (a.is_nan() && b.is_nan()));
    }
}
