//! Execution strategies for block- and cell-parallel traversal.
//!
//! The per-cell math is written once as a plain function; a strategy only
//! decides how sub-blocks and the cells inside them are scheduled.
//!
//! - [`ExecutionStrategy::Serial`]: one block after another, cells in order
//! - [`ExecutionStrategy::Threaded`]: blocks spread over the rayon pool
//! - [`ExecutionStrategy::Accelerator`]: blocks in order, cells of each
//!   block spread over the pool as independent lanes
//!
//! Each block owns its output boxes exclusively, so no strategy needs
//! locks. Reductions use [`max_propagating_nan`], which is exact and
//! order-free.

use rayon::prelude::*;

use crate::error::Result;
use crate::grid::{IndexBox, IntVect};
use crate::types::BlockIndex;

/// How blocks and cells are dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ExecutionStrategy {
    /// Single thread
    Serial,
    /// One rayon task per sub-block
    #[default]
    Threaded,
    /// Lane-parallel cells inside each sub-block
    Accelerator,
}

impl ExecutionStrategy {
    /// Whether best-effort audits (NaN scan, per-cell CFL reports) run.
    ///
    /// Lane-parallel execution skips them.
    #[inline]
    pub fn audits_enabled(self) -> bool {
        !matches!(self, Self::Accelerator)
    }

    /// Short name for log lines.
    pub fn name(self) -> &'static str {
        match self {
            Self::Serial => "serial",
            Self::Threaded => "threaded",
            Self::Accelerator => "accelerator",
        }
    }

    /// Run `f` once per block item, stopping at the first error.
    ///
    /// `items[b]` is block `b`'s exclusive working set (typically its
    /// output boxes).
    pub fn for_each_block<T, F>(self, items: &mut [T], f: F) -> Result<()>
    where
        T: Send,
        F: Fn(BlockIndex, &mut T) -> Result<()> + Sync + Send,
    {
        match self {
            Self::Serial | Self::Accelerator => items
                .iter_mut()
                .enumerate()
                .try_for_each(|(b, item)| f(BlockIndex::new(b), item)),
            Self::Threaded => items
                .par_iter_mut()
                .enumerate()
                .try_for_each(|(b, item)| f(BlockIndex::new(b), item)),
        }
    }

    /// Evaluate `f` on every cell of `region`, each call writing `width`
    /// values, and return them cell-major in [`IndexBox::offset`] order.
    ///
    /// Under [`Self::Accelerator`] the cells run as parallel lanes;
    /// otherwise in order.
    pub fn map_cells<F>(self, region: &IndexBox, width: usize, f: F) -> Result<Vec<f64>>
    where
        F: Fn(IntVect, &mut [f64]) -> Result<()> + Sync + Send,
    {
        self.map_cells_with(region, width, || (), |_, iv, lane| f(iv, lane))
    }

    /// [`Self::map_cells`] with a scratch value built by `init`, once per
    /// worker rather than once per cell.
    pub fn map_cells_with<S, I, F>(self, region: &IndexBox, width: usize, init: I, f: F) -> Result<Vec<f64>>
    where
        I: Fn() -> S + Sync + Send,
        F: Fn(&mut S, IntVect, &mut [f64]) -> Result<()> + Sync + Send,
    {
        let mut out = vec![0.0; region.num_cells() * width];
        if width == 0 {
            return Ok(out);
        }
        match self {
            Self::Accelerator => out
                .par_chunks_mut(width)
                .enumerate()
                .try_for_each_init(&init, |scratch, (n, lane)| f(scratch, region.cell_at(n), lane))?,
            Self::Serial | Self::Threaded => {
                let mut scratch = init();
                out.chunks_mut(width)
                    .enumerate()
                    .try_for_each(|(n, lane)| f(&mut scratch, region.cell_at(n), lane))?
            }
        }
        Ok(out)
    }

    /// Max of `f` over every cell of every block region.
    ///
    /// `f` must return non-negative values; an empty level reduces to 0.
    /// A NaN from any cell makes the result NaN.
    pub fn max_over<F>(self, regions: &[IndexBox], f: F) -> f64
    where
        F: Fn(BlockIndex, IntVect) -> f64 + Sync + Send,
    {
        match self {
            Self::Serial => regions
                .iter()
                .enumerate()
                .map(|(b, r)| block_max(BlockIndex::new(b), r, &f))
                .fold(0.0, max_propagating_nan),
            Self::Threaded => regions
                .par_iter()
                .enumerate()
                .map(|(b, r)| block_max(BlockIndex::new(b), r, &f))
                .reduce(|| 0.0, max_propagating_nan),
            Self::Accelerator => regions
                .iter()
                .enumerate()
                .map(|(b, r)| {
                    let block = BlockIndex::new(b);
                    (0..r.num_cells())
                        .into_par_iter()
                        .map(|n| f(block, r.cell_at(n)))
                        .reduce(|| 0.0, max_propagating_nan)
                })
                .fold(0.0, max_propagating_nan),
        }
    }
}

fn block_max<F>(block: BlockIndex, region: &IndexBox, f: &F) -> f64
where
    F: Fn(BlockIndex, IntVect) -> f64,
{
    region.cells().map(|iv| f(block, iv)).fold(0.0, max_propagating_nan)
}

/// `f64::max` that returns NaN when either side is NaN.
///
/// Commutative and associative, so any reduction order gives the same
/// result.
#[inline]
pub fn max_propagating_nan(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}
