//! Benchmarks for the diagnostic computations.
//!
//! Run with: `cargo bench --bench compute_bench`
//!
//! Measures how the staggered-grid diagnostics scale with horizontal grid size.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use oceandiag_rs::compute;
use oceandiag_rs::dataset::{GridBuilder, OceanDataset};
use oceandiag_rs::grid::{Dim, Field};

const NZ: usize = 10;
const NT: usize = 2;

/// Build an ocean of `n × n` cells with smooth velocity, temperature and salinity fields.
fn generate_ocean(n: usize) -> OceanDataset {
    let mut ds = GridBuilder::spherical(-30.0, 30.0, 0.25, 0.25, n, n)
        .with_uniform_levels(NZ, 20.0)
        .with_times(vec![0.0, 86400.0])
        .build()
        .unwrap();

    let pattern = |seed: f64, [t, k, j, i]: [usize; 4]| {
        (seed + 0.3 * t as f64 + 0.2 * k as f64 + 0.11 * j as f64 + 0.07 * i as f64).sin()
    };

    let fields = [
        ("U", Dim::Z, Dim::Y, Dim::Xp1, 0.0, 0.3),
        ("V", Dim::Z, Dim::Yp1, Dim::X, 1.0, 0.2),
        ("W", Dim::Zl, Dim::Y, Dim::X, 2.0, 1.0e-3),
    ];
    for (name, z, y, x, seed, amplitude) in fields {
        let ny = if y == Dim::Yp1 { n + 1 } else { n };
        let nx = if x == Dim::Xp1 { n + 1 } else { n };
        let field = Field::from_fn(&[Dim::Time, z, y, x], &[NT, NZ, ny, nx], |idx| {
            amplitude * pattern(seed, idx)
        })
        .unwrap();
        ds.insert(name, field).unwrap();
    }

    let tracer_dims = [Dim::Time, Dim::Z, Dim::Y, Dim::X];
    let temp = Field::from_fn(&tracer_dims, &[NT, NZ, n, n], |idx| {
        20.0 - 0.8 * idx[1] as f64 + pattern(3.0, idx)
    })
    .unwrap();
    let salt = Field::from_fn(&tracer_dims, &[NT, NZ, n, n], |idx| 35.0 + 0.2 * pattern(4.0, idx))
        .unwrap();
    ds.insert("Temp", temp).unwrap();
    ds.insert("S", salt).unwrap();

    OceanDataset::new(ds)
}

/// Benchmark the per-point diagnostics against grid size.
fn bench_diagnostics(c: &mut Criterion) {
    let mut group = c.benchmark_group("diagnostics");

    for n in [16, 32, 64] {
        let od = generate_ocean(n);

        group.bench_with_input(BenchmarkId::new("kinetic_energy", n), &od, |b, od| {
            b.iter(|| compute::kinetic_energy(black_box(od)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("vertical_relative_vorticity", n), &od, |b, od| {
            b.iter(|| compute::vertical_relative_vorticity(black_box(od)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("potential_density_anomaly", n), &od, |b, od| {
            b.iter(|| compute::potential_density_anomaly(black_box(od)).unwrap())
        });
    }

    group.finish();
}

/// Benchmark the composite potential vorticity, which chains density and vorticity.
fn bench_ertel_potential_vorticity(c: &mut Criterion) {
    let mut group = c.benchmark_group("ertel_potential_vorticity");
    group.sample_size(20);

    let od = generate_ocean(32);

    group.bench_function("vertical_only", |b| {
        b.iter(|| compute::ertel_potential_vorticity(black_box(&od), false).unwrap())
    });

    group.bench_function("full", |b| {
        b.iter(|| compute::ertel_potential_vorticity(black_box(&od), true).unwrap())
    });

    group.finish();
}

/// Benchmark extracting and integrating a mooring section.
fn bench_mooring_transport(c: &mut Criterion) {
    let od = generate_ocean(32);
    let xs = [-29.0, -24.0, -23.0];
    let ys = [31.0, 33.0, 37.0];

    c.bench_function("mooring_transport", |b| {
        b.iter(|| {
            let moor = od.subsample().mooring_array(black_box(&xs), black_box(&ys)).unwrap();
            compute::mooring_horizontal_volume_transport(&moor).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_diagnostics,
    bench_ertel_potential_vorticity,
    bench_mooring_transport
);
criterion_main!(benches);
