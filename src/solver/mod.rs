//! Level-wide hydrodynamics operations.
//!
//! # Submodules
//!
//! - [`execution`]: serial, threaded and lane-parallel dispatch
//! - [`cons_to_prim`]: conservative→primitive driver, standard and
//!   fourth-order paths
//! - [`fourth_order`]: cell-average ↔ cell-centre Laplacian corrections
//! - [`repair`]: density floor and internal-energy reset
//! - [`diagnostics`]: CFL monitor and NaN audit

pub mod cons_to_prim;
pub mod diagnostics;
pub mod execution;
pub mod fourth_order;
pub mod repair;

pub use cons_to_prim::{ConsToPrim, FourthOrderPrimitive, PrimitiveFields};
pub use diagnostics::{
    CflMonitor, CflReport, RankReduce, SingleRank, cell_courant, check_for_nan,
};
pub use execution::ExecutionStrategy;
pub use fourth_order::{make_cell_center, make_fourth_average, undivided_laplacian};
pub use repair::{enforce_minimum_density, reset_internal_energy};
