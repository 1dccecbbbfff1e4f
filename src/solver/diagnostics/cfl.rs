//! CFL violation monitor.
//!
//! After a trial step the monitor reduces the largest local Courant
//! number over a level and flags the step when it exceeds 1.0. A
//! violation is not an error: the caller retries with a smaller dt.
//!
//! # Example
//!
//! ```
//! use amr_hydro::config::TimeIntegrationMethod;
//! use amr_hydro::solver::cell_courant;
//!
//! let dtdx = [0.1, 0.1, 0.0];
//! // (|u| + c) dt/dx per axis: 0.3 and 0.2
//! let ctu = cell_courant([1.0, 0.0, 5.0], 2.0, dtdx, TimeIntegrationMethod::Ctu);
//! let mol = cell_courant([1.0, 0.0, 5.0], 2.0, dtdx, TimeIntegrationMethod::MethodOfLines);
//! assert!((ctu - 0.3).abs() < 1e-15);
//! assert!((mol - 0.5).abs() < 1e-15);
//! ```

use crate::config::{HydroConfig, TimeIntegrationMethod};
use crate::error::{HydroError, Result};
use crate::field::MultiField;
use crate::grid::Level;
use crate::solver::ExecutionStrategy;
use crate::state::StateLayout;
use crate::types::{CourantNumber, LevelIndex};

/// Cross-rank max reduction, invoked once per check.
pub trait RankReduce: Send + Sync {
    /// Global max of every rank's `local` value.
    ///
    /// A NaN on any rank must make the result NaN.
    fn max(&self, local: f64) -> f64;
}

/// Reduction for a single-process run: the local value is global.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleRank;

impl RankReduce for SingleRank {
    #[inline]
    fn max(&self, local: f64) -> f64 {
        local
    }
}

static SINGLE_RANK: SingleRank = SingleRank;

/// Outcome of one CFL check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CflReport {
    /// Level that was checked
    pub level: LevelIndex,
    /// Largest Courant number over the level and all ranks
    pub courant: CourantNumber,
    /// `courant > 1.0`, or `courant` is NaN
    pub violated: bool,
}

/// Courant number of one cell.
///
/// `dtdx` holds `dt / dx_d` on active axes and zero elsewhere, so inactive
/// axes contribute nothing under either policy.
#[inline]
pub fn cell_courant(vel: [f64; 3], c: f64, dtdx: [f64; 3], method: TimeIntegrationMethod) -> f64 {
    let courx = (c + vel[0].abs()) * dtdx[0];
    let coury = (c + vel[1].abs()) * dtdx[1];
    let courz = (c + vel[2].abs()) * dtdx[2];
    match method {
        TimeIntegrationMethod::Ctu => courx.max(coury).max(courz),
        TimeIntegrationMethod::MethodOfLines => courx + coury + courz,
    }
}

/// Per-level CFL checker.
pub struct CflMonitor<'a> {
    level: &'a Level,
    method: TimeIntegrationMethod,
    execution: ExecutionStrategy,
    verbose: u8,
    reducer: &'a dyn RankReduce,
}

impl<'a> CflMonitor<'a> {
    /// Monitor for `level` with the policy and strategy from `config`.
    pub fn new(level: &'a Level, config: &HydroConfig) -> Self {
        Self {
            level,
            method: config.time_integration,
            execution: config.execution,
            verbose: config.verbose,
            reducer: &SINGLE_RANK,
        }
    }

    /// Use a different cross-rank reduction.
    pub fn with_reducer(mut self, reducer: &'a dyn RankReduce) -> Self {
        self.reducer = reducer;
        self
    }

    /// Override the execution strategy.
    pub fn with_execution(mut self, execution: ExecutionStrategy) -> Self {
        self.execution = execution;
        self
    }

    /// Check `dt` against the wave speeds in `q` and `qaux` over every
    /// valid cell of the level.
    pub fn check(&self, q: &MultiField, qaux: &MultiField, dt: f64) -> Result<CflReport> {
        if q.n_comp() <= StateLayout::QW {
            return Err(HydroError::component_mismatch(
                "primitive state",
                StateLayout::QW + 1,
                q.n_comp(),
            ));
        }
        if qaux.n_comp() <= StateLayout::QC {
            return Err(HydroError::component_mismatch(
                "auxiliary state",
                StateLayout::QC + 1,
                qaux.n_comp(),
            ));
        }
        if q.n_blocks() != self.level.n_blocks() {
            return Err(HydroError::BlockMismatch("primitive state"));
        }
        if !q.same_blocks(qaux) {
            return Err(HydroError::BlockMismatch("auxiliary state"));
        }

        let dtdx = self.level.cell_size.dt_over_dx(dt, self.level.dim);
        let method = self.method;
        let report_cells = self.verbose >= 1 && self.execution.audits_enabled();
        let level_index = self.level.index;
        let regions: Vec<_> = q.fabs().iter().map(|f| f.valid()).collect();

        let local = self.execution.max_over(&regions, |b, iv| {
            let qf = q.fab(b);
            let vel = [
                qf.get(iv, StateLayout::QU),
                qf.get(iv, StateLayout::QV),
                qf.get(iv, StateLayout::QW),
            ];
            let c = qaux.fab(b).get(iv, StateLayout::QC);
            let courno = cell_courant(vel, c, dtdx, method);
            if report_cells && (courno.is_nan() || courno > CourantNumber::LIMIT) {
                log::warn!(
                    "CFL violation at {} cell {:?}: courant = {}, u = {:?}, c = {}, density = {}",
                    level_index,
                    iv,
                    courno,
                    vel,
                    c,
                    qf.get(iv, StateLayout::QRHO)
                );
            }
            courno
        });

        let courant = CourantNumber::new(self.reducer.max(local));
        let violated = courant.exceeds_limit();
        if courant.value().is_nan() {
            log::error!(
                "non-finite wave speed at level {}: CFL check cannot pass",
                self.level.index
            );
        } else if violated {
            log::warn!(
                "effective CFL at level {} is {} ({})",
                self.level.index,
                courant,
                self.method
            );
        } else {
            log::debug!("CFL at level {} is {}", self.level.index, courant);
        }

        Ok(CflReport {
            level: self.level.index,
            courant,
            violated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellSize, SpaceDim};

    fn fields(level: &Level, vel: [f64; 3], c: f64) -> (MultiField, MultiField) {
        let layout = StateLayout::new(1, 0);
        let mut q = MultiField::new(level, layout.n_primitive(), 0);
        let mut qaux = MultiField::new(level, layout.n_aux(), 0);
        q.fill_with(|_, cell| {
            cell.fill(0.0);
            cell[StateLayout::QRHO] = 1.0;
            cell[StateLayout::QU] = vel[0];
            cell[StateLayout::QV] = vel[1];
            cell[StateLayout::QW] = vel[2];
        });
        qaux.fill_with(|_, cell| {
            cell.fill(0.0);
            cell[StateLayout::QC] = c;
        });
        (q, qaux)
    }

    #[test]
    fn test_policies_in_2d() {
        let level = Level::uniform([4, 4, 1], [2, 2, 1], CellSize::uniform(0.5), SpaceDim::Two);
        // w would dominate if the inactive axis counted
        let (q, qaux) = fields(&level, [1.0, 0.5, 100.0], 1.0);

        let ctu = CflMonitor::new(&level, &HydroConfig::new()).check(&q, &qaux, 0.1).unwrap();
        assert!((ctu.courant.value() - 0.4).abs() < 1e-14);
        assert!(!ctu.violated);

        let config = HydroConfig::new().with_time_integration(TimeIntegrationMethod::MethodOfLines);
        let mol = CflMonitor::new(&level, &config).check(&q, &qaux, 0.1).unwrap();
        assert!((mol.courant.value() - 0.7).abs() < 1e-14);
    }

    #[test]
    fn test_rank_reduce_is_applied() {
        struct Inflate;
        impl RankReduce for Inflate {
            fn max(&self, local: f64) -> f64 {
                local.max(2.0)
            }
        }

        let level = Level::uniform([4, 4, 4], [4, 4, 4], CellSize::uniform(1.0), SpaceDim::Three);
        let (q, qaux) = fields(&level, [0.0; 3], 1.0);
        let report = CflMonitor::new(&level, &HydroConfig::new())
            .with_reducer(&Inflate)
            .check(&q, &qaux, 0.1)
            .unwrap();
        assert_eq!(report.courant.value(), 2.0);
        assert!(report.violated);
    }

    #[test]
    fn test_missing_components_rejected() {
        let level = Level::uniform([4, 4, 4], [4, 4, 4], CellSize::uniform(1.0), SpaceDim::Three);
        let q = MultiField::new(&level, 2, 0);
        let qaux = MultiField::new(&level, 4, 0);
        let err = CflMonitor::new(&level, &HydroConfig::new())
            .check(&q, &qaux, 0.1)
            .unwrap_err();
        assert!(matches!(err, HydroError::ComponentMismatch { .. }));
    }
}
