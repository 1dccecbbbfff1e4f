//! Benchmarks for the CFL monitor and SDC node updates.
//!
//! Run with: `cargo bench --bench cfl_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use amr_hydro::{
    CellSize, CflMonitor, ExecutionStrategy, HydroConfig, Level, MultiField, SdcScheme, SpaceDim,
    StateLayout,
};

fn level(n: i32) -> Level {
    Level::uniform([n, n, n], [16, 16, 16], CellSize::uniform(1.0 / n as f64), SpaceDim::Three)
}

/// Benchmark the reduced Courant number under each execution strategy.
fn bench_cfl_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("cfl_check");

    let level = level(64);
    let layout = StateLayout::new(1, 0);
    let mut q = MultiField::new(&level, layout.n_primitive(), 0);
    let mut qaux = MultiField::new(&level, layout.n_aux(), 0);
    q.fill_with(|iv, cell| {
        cell.fill(0.0);
        cell[StateLayout::QRHO] = 1.0;
        cell[StateLayout::QU] = (0.05 * iv[0] as f64).sin();
        cell[StateLayout::QV] = (0.07 * iv[1] as f64).cos();
        cell[StateLayout::QW] = 0.1;
    });
    qaux.fill_with(|iv, cell| {
        cell.fill(0.0);
        cell[StateLayout::QC] = 1.0 + 0.1 * (0.03 * iv[2] as f64).sin();
    });

    for strategy in [
        ExecutionStrategy::Serial,
        ExecutionStrategy::Threaded,
        ExecutionStrategy::Accelerator,
    ] {
        let config = HydroConfig::new().with_execution(strategy);
        let monitor = CflMonitor::new(&level, &config);
        group.bench_function(strategy.name(), |b| {
            b.iter(|| monitor.check(black_box(&q), black_box(&qaux), 1e-3).unwrap())
        });
    }

    group.finish();
}

/// Benchmark one node update per SDC scheme.
fn bench_sdc_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("sdc_update_advection");
    group.sample_size(30);

    let level = level(32);
    let n_comp = StateLayout::new(3, 0).n_conserved();
    let field = |seed: f64| {
        let mut f = MultiField::new(&level, n_comp, 0);
        f.fill_with(|iv, cell| {
            for (n, v) in cell.iter_mut().enumerate() {
                *v = seed + 0.01 * (iv[0] + iv[1] + iv[2]) as f64 + n as f64;
            }
        });
        f
    };
    let k_m = field(1.0);
    let a_m = field(2.0);
    let olds: Vec<MultiField> = (0..4).map(|j| field(3.0 + j as f64)).collect();

    for scheme in [
        SdcScheme::lobatto2(),
        SdcScheme::radau2(),
        SdcScheme::lobatto4(),
        SdcScheme::radau4(),
    ] {
        let a_old: Vec<&MultiField> = olds.iter().take(scheme.n_nodes()).collect();
        let dt = 1e-3;
        let dt_m = scheme.node_dt(0, dt).unwrap();
        let mut k_n = MultiField::like(&k_m, n_comp);
        group.bench_with_input(BenchmarkId::new("threaded", scheme.to_string()), &scheme, |b, s| {
            b.iter(|| {
                s.update_advection(
                    ExecutionStrategy::Threaded,
                    black_box(&k_m),
                    &mut k_n,
                    black_box(&a_m),
                    &a_old,
                    dt_m,
                    dt,
                    0,
                )
                .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cfl_check, bench_sdc_update);
criterion_main!(benches);
