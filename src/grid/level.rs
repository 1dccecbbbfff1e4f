//! One refinement level of a block-structured grid.

use crate::types::{BlockIndex, CellSize, LevelIndex, SpaceDim};

use super::index_box::{IndexBox, IntVect};

/// A uniform AMR level decomposed into disjoint sub-blocks.
///
/// The sub-blocks tile (part of) the level's problem domain. Each block
/// is the unit of parallel work; the grown region of a block is its valid
/// region plus `n_grow` ghost cells on every active axis.
#[derive(Clone, Debug)]
pub struct Level {
    /// Refinement level in the hierarchy
    pub index: LevelIndex,
    /// Full problem domain at this level's resolution
    pub domain: IndexBox,
    /// Valid region of each sub-block
    pub blocks: Vec<IndexBox>,
    /// Uniform cell widths
    pub cell_size: CellSize,
    /// Number of active axes
    pub dim: SpaceDim,
    /// Periodicity of the domain on each axis
    pub periodic: [bool; 3],
}

impl Level {
    /// Create a level from an explicit block list.
    ///
    /// # Panics
    ///
    /// Panics if a block lies outside the domain or two blocks overlap.
    pub fn new(
        index: LevelIndex,
        domain: IndexBox,
        blocks: Vec<IndexBox>,
        cell_size: CellSize,
        dim: SpaceDim,
    ) -> Self {
        for (n, b) in blocks.iter().enumerate() {
            assert!(
                domain.contains_box(b),
                "block {} {} lies outside domain {}",
                n,
                b,
                domain
            );
            for other in &blocks[n + 1..] {
                assert!(b.intersect(other).is_none(), "blocks {} and {} overlap", b, other);
            }
        }
        Self {
            index,
            domain,
            blocks,
            cell_size,
            dim,
            periodic: [false; 3],
        }
    }

    /// Uniform level covering `n_cells` with blocks of at most
    /// `max_block` cells per axis.
    ///
    /// # Example
    ///
    /// ```
    /// use amr_hydro::grid::Level;
    /// use amr_hydro::types::{CellSize, SpaceDim};
    ///
    /// let level = Level::uniform([8, 8, 8], [4, 4, 4], CellSize::uniform(0.125), SpaceDim::Three);
    /// assert_eq!(level.n_blocks(), 8);
    /// ```
    pub fn uniform(n_cells: [i32; 3], max_block: [i32; 3], cell_size: CellSize, dim: SpaceDim) -> Self {
        let domain = IndexBox::from_extent(n_cells, dim);
        let blocks = domain.chop(max_block);
        Self::new(LevelIndex::ZERO, domain, blocks, cell_size, dim)
    }

    /// Builder-style periodicity.
    pub fn with_periodic(mut self, periodic: [bool; 3]) -> Self {
        self.periodic = periodic;
        self
    }

    /// Builder-style level index.
    pub fn with_index(mut self, index: LevelIndex) -> Self {
        self.index = index;
        self
    }

    /// Number of sub-blocks.
    #[inline]
    pub fn n_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Valid region of block `b`.
    #[inline]
    pub fn block(&self, b: BlockIndex) -> IndexBox {
        self.blocks[b]
    }

    /// Block `b` grown by `n_grow` ghost cells on active axes.
    #[inline]
    pub fn grown_block(&self, b: BlockIndex, n_grow: usize) -> IndexBox {
        self.blocks[b].grow(n_grow as i32, self.dim)
    }

    /// Block whose valid region contains `iv`, if any.
    pub fn owner_of(&self, iv: IntVect) -> Option<BlockIndex> {
        self.blocks
            .iter()
            .position(|b| b.contains(iv))
            .map(BlockIndex::new)
    }

    /// Map a cell index outside the domain back inside along periodic axes.
    pub fn periodic_image(&self, iv: IntVect) -> IntVect {
        let mut out = iv;
        for d in 0..self.dim.count() {
            if !self.periodic[d] {
                continue;
            }
            let lo = self.domain.lo[d];
            let n = self.domain.length(d) as i32;
            out[d] = lo + (iv[d] - lo).rem_euclid(n);
        }
        out
    }

    /// Reorder the sub-blocks; the covered cells are unchanged.
    pub fn permute_blocks(&self, order: &[usize]) -> Self {
        assert_eq!(order.len(), self.blocks.len(), "permutation length mismatch");
        let mut level = self.clone();
        level.blocks = order.iter().map(|&n| self.blocks[n]).collect();
        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_level() -> Level {
        Level::uniform([8, 4, 1], [4, 4, 1], CellSize::uniform(1.0), SpaceDim::Two)
    }

    #[test]
    fn test_uniform_decomposition() {
        let level = small_level();
        assert_eq!(level.n_blocks(), 2);
        assert_eq!(level.block(BlockIndex::new(1)), IndexBox::new([4, 0, 0], [7, 3, 0]));
    }

    #[test]
    fn test_grown_block_only_active_axes() {
        let level = small_level();
        let g = level.grown_block(BlockIndex::ZERO, 2);
        assert_eq!(g.lo, [-2, -2, 0]);
        assert_eq!(g.hi, [5, 5, 0]);
    }

    #[test]
    fn test_owner_and_periodic_image() {
        let level = small_level().with_periodic([true, false, false]);
        assert_eq!(level.owner_of([5, 1, 0]), Some(BlockIndex::new(1)));
        assert_eq!(level.owner_of([9, 1, 0]), None);
        assert_eq!(level.periodic_image([-1, 1, 0]), [7, 1, 0]);
        assert_eq!(level.periodic_image([8, -1, 0]), [0, -1, 0]);
    }

    #[test]
    #[should_panic]
    fn test_overlapping_blocks_rejected() {
        let domain = IndexBox::from_extent([4, 4, 1], SpaceDim::Two);
        let _ = Level::new(
            LevelIndex::ZERO,
            domain,
            vec![IndexBox::new([0, 0, 0], [2, 3, 0]), IndexBox::new([2, 0, 0], [3, 3, 0])],
            CellSize::uniform(1.0),
            SpaceDim::Two,
        );
    }
}
