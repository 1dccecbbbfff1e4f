//! Block-structured grid description.
//!
//! Provides the box/iteration model the kernels run on:
//! - [`IndexBox`]: inclusive integer cell ranges with grow/chop/iterate
//! - [`Level`]: one refinement level split into sub-blocks, with cell size
//!   and dimensionality

mod index_box;
mod level;

pub use index_box::{IndexBox, IntVect};
pub use level::Level;
