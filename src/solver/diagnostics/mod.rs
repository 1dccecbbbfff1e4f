//! Runtime diagnostics on the primitive state.
//!
//! - [`CflMonitor`]: level-wide Courant number reduction and violation flag
//! - [`check_for_nan`]: audit for NaN/Inf after a conversion

mod cfl;
mod nan;

pub use cfl::{CflMonitor, CflReport, RankReduce, SingleRank, cell_courant};
pub use nan::check_for_nan;
