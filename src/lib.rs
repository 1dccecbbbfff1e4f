//! # amr-hydro
//!
//! State reconstruction and stability monitoring for block-structured
//! AMR compressible hydrodynamics.
//!
//! This crate provides the core building blocks between the conserved
//! state of a level and the flux stage:
//! - Conservative→primitive conversion over ghost-extended sub-blocks
//! - Fourth-order cell-average ↔ cell-centre corrections for SDC
//! - Optional radiation coupling (group energies and flux limiters)
//! - SDC node-update kernels for Gauss-Lobatto and Radau nodes
//! - CFL violation monitoring with an order-independent max reduction
//!
//! Minimal box, field, EOS and radiation collaborators are included so
//! the kernels can run standalone.

pub mod config;
pub mod equations;
pub mod error;
pub mod field;
pub mod grid;
pub mod radiation;
pub mod solver;
pub mod state;
pub mod time;
pub mod types;

// Re-export main types for convenience
pub use config::{HydroConfig, IntegrationMode, PhysicsMode, TimeIntegrationMethod};
pub use equations::{EosState, EquationOfState, GammaLaw, KernelContext, conserved_to_primitive};
pub use error::{HydroError, Result};
pub use field::{FieldBox, MultiField};
pub use grid::{IndexBox, IntVect, Level};
pub use radiation::{RadiationCell, RadiationCoupling, RadiationFields, StaticRadiation};
pub use solver::{
    CflMonitor, CflReport, ConsToPrim, ExecutionStrategy, FourthOrderPrimitive, PrimitiveFields,
    RankReduce, SingleRank,
};
pub use state::StateLayout;
pub use time::{NodeUpdate, SdcOrder, SdcQuadrature, SdcScheme};
pub use types::{BlockIndex, CellSize, CourantNumber, LevelIndex, SpaceDim};
