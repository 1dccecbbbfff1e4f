//! Integration tests for the CFL monitor.
//!
//! These tests verify:
//! - Exactly 1.0 is accepted, anything above it or NaN is flagged
//! - The reduced maximum ignores block order and execution strategy
//! - The cross-rank reduction sees the local maximum
//! - CTU and method-of-lines combine the axes differently

use std::sync::Mutex;

use amr_hydro::{
    BlockIndex, CellSize, CflMonitor, ExecutionStrategy, HydroConfig, IntVect, Level, LevelIndex,
    MultiField, RankReduce, SpaceDim, StateLayout, TimeIntegrationMethod,
};
use approx::assert_relative_eq;

/// Primitive and auxiliary fields with velocity and sound speed given per
/// cell.
fn wave_fields<F>(level: &Level, f: F) -> (MultiField, MultiField)
where
    F: Fn(IntVect) -> ([f64; 3], f64),
{
    let layout = StateLayout::new(1, 0);
    let mut q = MultiField::new(level, layout.n_primitive(), 0);
    let mut qaux = MultiField::new(level, layout.n_aux(), 0);
    q.fill_with(|iv, cell| {
        let (vel, _) = f(iv);
        cell.fill(0.0);
        cell[StateLayout::QRHO] = 1.0;
        cell[StateLayout::QU] = vel[0];
        cell[StateLayout::QV] = vel[1];
        cell[StateLayout::QW] = vel[2];
    });
    qaux.fill_with(|iv, cell| {
        cell.fill(0.0);
        cell[StateLayout::QC] = f(iv).1;
    });
    (q, qaux)
}

/// Irregular wave speeds so the maximum sits in one interior cell.
fn bumpy(iv: IntVect) -> ([f64; 3], f64) {
    let x = iv[0] as f64;
    let y = iv[1] as f64;
    let z = iv[2] as f64;
    let vel = [(1.3 * x + 0.2 * y).sin(), -(0.7 * y).cos(), 0.1 * z];
    let c = 1.0 + 0.25 * (x * y + z).sin();
    (vel, c)
}

#[test]
fn test_threshold_boundary() {
    // dt / dx = 1 exactly, so courno = |u| + c
    let level = Level::uniform([4, 4, 1], [2, 2, 1], CellSize::uniform(0.1), SpaceDim::Two);
    let config = HydroConfig::new();
    let monitor = CflMonitor::new(&level, &config);

    let (q, qaux) = wave_fields(&level, |_| ([0.5, 0.0, 0.0], 0.5));
    let report = monitor.check(&q, &qaux, 0.1).unwrap();
    assert_eq!(report.courant.value(), 1.0);
    assert!(!report.violated);

    let (q, qaux) = wave_fields(&level, |iv| {
        if iv == [3, 1, 0] {
            ([0.5, 0.0, 0.0], 0.500_000_1)
        } else {
            ([0.5, 0.0, 0.0], 0.5)
        }
    });
    let report = monitor.check(&q, &qaux, 0.1).unwrap();
    assert!(report.courant.value() > 1.0);
    assert!(report.violated);
}

#[test]
fn test_nan_wave_speed_is_a_violation() {
    let level = Level::uniform([4, 4, 1], [2, 2, 1], CellSize::uniform(0.1), SpaceDim::Two);
    let config = HydroConfig::new();

    let nan_velocity = wave_fields(&level, |iv| {
        if iv == [2, 3, 0] {
            ([f64::NAN, 0.0, 0.0], 0.5)
        } else {
            ([0.0, 0.0, 0.0], 0.5)
        }
    });
    let nan_sound_speed = wave_fields(&level, |iv| {
        if iv == [0, 0, 0] {
            ([0.0, 0.0, 0.0], f64::NAN)
        } else {
            ([0.0, 0.0, 0.0], 0.5)
        }
    });

    for (q, qaux) in [&nan_velocity, &nan_sound_speed] {
        for strategy in [
            ExecutionStrategy::Serial,
            ExecutionStrategy::Threaded,
            ExecutionStrategy::Accelerator,
        ] {
            let report = CflMonitor::new(&level, &config)
                .with_execution(strategy)
                .check(q, qaux, 0.1)
                .unwrap();
            assert!(report.courant.value().is_nan(), "{}", strategy.name());
            assert!(report.violated, "{}", strategy.name());
        }
    }
}

#[test]
fn test_order_independent_reduction() {
    let level = Level::uniform([8, 8, 8], [4, 4, 4], CellSize::new([0.1, 0.2, 0.05]), SpaceDim::Three);
    let config = HydroConfig::new();
    let (q, qaux) = wave_fields(&level, bumpy);
    let reference = CflMonitor::new(&level, &config)
        .with_execution(ExecutionStrategy::Serial)
        .check(&q, &qaux, 0.01)
        .unwrap();

    let orders: [[usize; 8]; 3] = [
        [7, 6, 5, 4, 3, 2, 1, 0],
        [3, 0, 6, 1, 7, 2, 5, 4],
        [1, 3, 5, 7, 0, 2, 4, 6],
    ];
    for order in &orders {
        let permuted = level.permute_blocks(order);
        let (q, qaux) = wave_fields(&permuted, bumpy);
        for strategy in [
            ExecutionStrategy::Serial,
            ExecutionStrategy::Threaded,
            ExecutionStrategy::Accelerator,
        ] {
            let report = CflMonitor::new(&permuted, &config)
                .with_execution(strategy)
                .check(&q, &qaux, 0.01)
                .unwrap();
            assert_eq!(report.courant, reference.courant, "{:?} {}", order, strategy.name());
            assert_eq!(report.violated, reference.violated);
        }
    }
}

/// Two-rank stand-in: this rank's value is max-combined with a fixed peer
/// value, and every call is recorded.
struct PeerRank {
    peer: f64,
    seen: Mutex<Vec<f64>>,
}

impl RankReduce for PeerRank {
    fn max(&self, local: f64) -> f64 {
        self.seen.lock().unwrap().push(local);
        local.max(self.peer)
    }
}

#[test]
fn test_cross_rank_reduction() {
    let level = Level::uniform([4, 4, 1], [4, 4, 1], CellSize::uniform(1.0), SpaceDim::Two)
        .with_index(LevelIndex::new(2));
    let config = HydroConfig::new();
    let (q, qaux) = wave_fields(&level, |_| ([0.0, 0.0, 0.0], 1.0));

    let peer = PeerRank {
        peer: 1.5,
        seen: Mutex::new(Vec::new()),
    };
    let report = CflMonitor::new(&level, &config)
        .with_reducer(&peer)
        .check(&q, &qaux, 0.5)
        .unwrap();

    assert_eq!(*peer.seen.lock().unwrap(), vec![0.5]);
    assert_eq!(report.courant.value(), 1.5);
    assert!(report.violated);
    assert_eq!(report.level, LevelIndex::new(2));
}

#[test]
fn test_ctu_versus_method_of_lines() {
    let level = Level::uniform([4, 4, 4], [4, 4, 4], CellSize::uniform(1.0), SpaceDim::Three);
    let (q, qaux) = wave_fields(&level, |_| ([0.1, 0.2, 0.3], 0.1));
    let dt = 0.5;

    let ctu = CflMonitor::new(&level, &HydroConfig::new().with_time_integration(TimeIntegrationMethod::Ctu))
        .check(&q, &qaux, dt)
        .unwrap();
    let mol = CflMonitor::new(
        &level,
        &HydroConfig::new().with_time_integration(TimeIntegrationMethod::MethodOfLines),
    )
    .check(&q, &qaux, dt)
    .unwrap();

    // Per axis: 0.1, 0.15, 0.2
    assert_relative_eq!(ctu.courant.value(), 0.2, epsilon = 1e-15);
    assert_relative_eq!(mol.courant.value(), 0.45, epsilon = 1e-15);
    assert!(!ctu.violated && !mol.violated);
}

#[test]
fn test_inactive_axes_are_ignored() {
    // Tiny dy and dz would dominate if the inactive axes were counted
    let level = Level::uniform([8, 1, 1], [4, 1, 1], CellSize::new([0.5, 1e-12, 1e-12]), SpaceDim::One);
    let (q, qaux) = wave_fields(&level, |_| ([1.0, 50.0, 50.0], 1.0));
    let config = HydroConfig::new().with_time_integration(TimeIntegrationMethod::MethodOfLines);
    let report = CflMonitor::new(&level, &config).check(&q, &qaux, 0.1).unwrap();
    assert_relative_eq!(report.courant.value(), 0.4, epsilon = 1e-15);
    assert_eq!(level.n_blocks(), 2);
    assert_eq!(q.fab(BlockIndex::new(1)).valid().lo, [4, 0, 0]);
}
