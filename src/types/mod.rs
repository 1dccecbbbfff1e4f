//! Strongly-typed domain types for safer APIs.
//!
//! This module provides newtypes and small enums that keep kernel
//! signatures self-documenting and prevent parameter mix-ups.
//!
//! # Example
//!
//! ```
//! use amr_hydro::types::{BlockIndex, CellSize, CourantNumber, SpaceDim};
//!
//! let dx = CellSize::uniform(0.1);
//! let dtdx = dx.dt_over_dx(0.01, SpaceDim::Two);
//! assert_eq!(dtdx[2], 0.0);
//!
//! let c = CourantNumber::new(0.8);
//! assert!(!c.exceeds_limit());
//! assert_eq!(BlockIndex::new(1).get(), 1);
//! ```

mod dimension;
mod indices;
mod physical;

pub use dimension::SpaceDim;
pub use indices::{BlockIndex, LevelIndex};
pub use physical::{CellSize, CourantNumber};
