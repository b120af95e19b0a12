//! Invariants that hold for arbitrary velocity and tracer values.

use oceandiag_rs::compute;
use oceandiag_rs::dataset::{GridBuilder, OceanDataset, Parameters};
use oceandiag_rs::equations::{EqState, EquationOfState};
use oceandiag_rs::grid::{Axis, Boundary, Dim, Field, diff, interp};
use proptest::prelude::*;

fn velocity_dataset(u: Vec<f64>, v: Vec<f64>, angle: f64) -> OceanDataset {
    let mut ds = GridBuilder::spherical(10.0, -5.0, 1.0, 1.0, 3, 3)
        .with_grid_angle(angle)
        .build()
        .unwrap();
    ds.insert("U", Field::new(&[Dim::Y, Dim::Xp1], &[3, 4], u).unwrap()).unwrap();
    ds.insert("V", Field::new(&[Dim::Yp1, Dim::X], &[4, 3], v).unwrap()).unwrap();
    OceanDataset::new(ds)
}

proptest! {
    #[test]
    fn kinetic_energy_is_non_negative(
        u in prop::collection::vec(-2.0f64..2.0, 12),
        v in prop::collection::vec(-2.0f64..2.0, 12),
    ) {
        let od = velocity_dataset(u, v, 0.0);
        let out = compute::kinetic_energy(&od).unwrap();
        for &ke in out.get("KE").unwrap().data() {
            prop_assert!(ke >= 0.0);
        }
    }

    #[test]
    fn geographic_rotation_preserves_speed(
        u in prop::collection::vec(-2.0f64..2.0, 12),
        v in prop::collection::vec(-2.0f64..2.0, 12),
        angle in -180.0f64..180.0,
    ) {
        let od = velocity_dataset(u, v, angle);
        let ke = compute::kinetic_energy(&od).unwrap();
        let geo = compute::geographical_aligned_velocities(&od).unwrap();
        let zonal = geo.get("U_zonal").unwrap().data();
        let merid = geo.get("V_merid").unwrap().data();
        for ((&ue, &vn), &ke) in zonal.iter().zip(merid).zip(ke.get("KE").unwrap().data()) {
            let rotated = 0.5 * (ue * ue + vn * vn);
            prop_assert!((rotated - ke).abs() <= 1e-12 * (1.0 + ke));
        }
    }

    #[test]
    fn survey_rotation_preserves_speed(
        u in -1.0f64..1.0,
        v in -1.0f64..1.0,
        lon_end in 10.5f64..12.5,
        lat_end in -4.5f64..-2.5,
    ) {
        let u_field = vec![u; 12];
        let v_field = vec![v; 12];
        let od = velocity_dataset(u_field, v_field, 0.0);
        let survey = od
            .subsample()
            .survey_stations(&[10.5, lon_end], &[-4.5, lat_end], Some(40.0), &["U", "V"])
            .unwrap();
        let out = compute::survey_aligned_velocities(&survey).unwrap();
        let tan = out.get("tan_Vel").unwrap().data();
        let ort = out.get("ort_Vel").unwrap().data();
        let speed = u.hypot(v);
        for (&t, &o) in tan.iter().zip(ort) {
            prop_assert!((t.hypot(o) - speed).abs() <= 1e-12);
        }
    }

    #[test]
    fn interpolation_lies_between_neighbors(
        values in prop::collection::vec(-1.0e3f64..1.0e3, 2..12),
    ) {
        let field = Field::from_vec(Dim::X, values.clone());
        let faces = interp(&field, Axis::X, Boundary::Extend).unwrap();
        prop_assert_eq!(faces.len(), values.len() + 1);
        for i in 1..values.len() {
            let (lo, hi) = (values[i - 1].min(values[i]), values[i - 1].max(values[i]));
            let f = faces.data()[i];
            prop_assert!(f >= lo && f <= hi);
        }
        // a difference of the interpolated field telescopes back to the ends
        let back = diff(&faces, Axis::X, Boundary::default()).unwrap();
        let total: f64 = back.data().iter().sum();
        let expected = values[values.len() - 1] - values[0];
        prop_assert!((total - expected).abs() <= 1e-9 * (1.0 + expected.abs()));
    }

    #[test]
    fn density_increases_with_salinity(
        s in 30.0f64..38.0,
        t in 0.0f64..28.0,
        p in 0.0f64..2000.0,
    ) {
        for eq_state in [EqState::Jmd95, EqState::Mdjwf] {
            let eos = EquationOfState::new(eq_state);
            prop_assert!(eos.density(s + 0.5, t, p) > eos.density(s, t, p));
            prop_assert!(eos.haline_contraction(s, t, p) > 0.0);
        }
    }
}

#[test]
fn parameters_flow_into_attributes() {
    let od = velocity_dataset(vec![0.1; 12], vec![0.1; 12], 0.0)
        .with_parameters(Parameters::new().with_eps_nh(0.0).with_rho0(1025.0))
        .unwrap();
    assert_eq!(od.parameters().rho0, 1025.0);
    let out = od.compute().kinetic_energy().unwrap();
    assert_eq!(out.dataset().get("KE").unwrap().attrs.parameters["eps_nh"], "0");
}
