//! Level-wide field storage: one [`FieldBox`] per sub-block.

use crate::grid::{IndexBox, IntVect, Level};
use crate::types::{BlockIndex, SpaceDim};

use super::field_box::FieldBox;

/// Multi-component field over every sub-block of a level.
///
/// All boxes share the same component count and ghost width. Block `b`
/// of the field corresponds to block `b` of the [`Level`] it was built
/// from.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiField {
    fabs: Vec<FieldBox>,
    n_comp: usize,
    n_grow: usize,
    dim: SpaceDim,
}

impl MultiField {
    /// Allocate a zeroed field on `level`.
    pub fn new(level: &Level, n_comp: usize, n_grow: usize) -> Self {
        let fabs = level
            .blocks
            .iter()
            .map(|b| FieldBox::new(*b, n_grow, level.dim, n_comp))
            .collect();
        Self {
            fabs,
            n_comp,
            n_grow,
            dim: level.dim,
        }
    }

    /// Allocate a field with the same blocks and ghost width as `other`.
    pub fn like(other: &MultiField, n_comp: usize) -> Self {
        let fabs = other
            .fabs
            .iter()
            .map(|f| FieldBox::new(f.valid(), other.n_grow, other.dim, n_comp))
            .collect();
        Self {
            fabs,
            n_comp,
            n_grow: other.n_grow,
            dim: other.dim,
        }
    }

    /// Components per cell.
    #[inline]
    pub fn n_comp(&self) -> usize {
        self.n_comp
    }

    /// Ghost width.
    #[inline]
    pub fn n_grow(&self) -> usize {
        self.n_grow
    }

    /// Number of sub-blocks.
    #[inline]
    pub fn n_blocks(&self) -> usize {
        self.fabs.len()
    }

    /// Box of block `b`.
    #[inline]
    pub fn fab(&self, b: BlockIndex) -> &FieldBox {
        &self.fabs[b]
    }

    /// Mutable box of block `b`.
    #[inline]
    pub fn fab_mut(&mut self, b: BlockIndex) -> &mut FieldBox {
        &mut self.fabs[b]
    }

    /// All boxes.
    #[inline]
    pub fn fabs(&self) -> &[FieldBox] {
        &self.fabs
    }

    /// All boxes, mutably.
    #[inline]
    pub fn fabs_mut(&mut self) -> &mut [FieldBox] {
        &mut self.fabs
    }

    /// Block `b`'s valid region grown by `n_grow` (active axes only).
    #[inline]
    pub fn grown_box(&self, b: BlockIndex, n_grow: usize) -> IndexBox {
        self.fabs[b].valid().grow(n_grow as i32, self.dim)
    }

    /// Whether both fields are defined on the same sub-blocks.
    pub fn same_blocks(&self, other: &MultiField) -> bool {
        self.fabs.len() == other.fabs.len()
            && self
                .fabs
                .iter()
                .zip(&other.fabs)
                .all(|(a, b)| a.valid() == b.valid())
    }

    /// Set every value, ghost cells included.
    pub fn set_val(&mut self, value: f64) {
        self.fabs.iter_mut().for_each(|f| f.fill(value));
    }

    /// Fill every cell of the grown region from a function of the cell
    /// index; `f` writes all components of one cell.
    pub fn fill_with<F>(&mut self, f: F)
    where
        F: Fn(IntVect, &mut [f64]),
    {
        let mut buf = vec![0.0; self.n_comp];
        for fab in &mut self.fabs {
            for iv in fab.region().cells() {
                f(iv, &mut buf);
                fab.set_cell_values(iv, &buf);
            }
        }
    }

    /// Copy `n_comp` components from `src` on the valid region grown by
    /// `n_grow`.
    ///
    /// # Panics
    ///
    /// Panics if the fields do not share blocks or either lacks the halo.
    pub fn copy_components(
        &mut self,
        src: &MultiField,
        src_comp: usize,
        dst_comp: usize,
        n_comp: usize,
        n_grow: usize,
    ) {
        assert!(self.same_blocks(src), "copy between fields on different blocks");
        assert!(n_grow <= self.n_grow && n_grow <= src.n_grow, "copy halo too wide");
        let dim = self.dim;
        for (dst, s) in self.fabs.iter_mut().zip(&src.fabs) {
            let region = dst.valid().grow(n_grow as i32, dim);
            dst.copy_from(s, src_comp, dst_comp, n_comp, &region);
        }
    }

    /// Fill ghost cells from neighbouring blocks on the same level.
    ///
    /// Ghost cells are mapped through periodic axes, then clamped into
    /// the domain (first-order extrapolation at physical boundaries). The
    /// value is taken from the block owning the mapped cell; cells no
    /// block covers fall back to the nearest valid cell of the block
    /// itself.
    pub fn fill_ghost_cells(&mut self, level: &Level) {
        let mut updates: Vec<(usize, IntVect, Vec<f64>)> = Vec::new();
        let mut buf = vec![0.0; self.n_comp];

        for (b, fab) in self.fabs.iter().enumerate() {
            let valid = fab.valid();
            for iv in fab.region().cells() {
                if valid.contains(iv) {
                    continue;
                }
                let image = clamp_into(level.periodic_image(iv), &level.domain);
                let (src, src_iv) = match level.owner_of(image) {
                    Some(owner) => (owner.get(), image),
                    None => (b, clamp_into(iv, &valid)),
                };
                self.fabs[src].cell_values(src_iv, &mut buf);
                updates.push((b, iv, buf.clone()));
            }
        }

        for (b, iv, values) in updates {
            self.fabs[b].set_cell_values(iv, &values);
        }
    }

    /// Maximum absolute value of component `n` over valid cells.
    pub fn max_abs_component(&self, n: usize) -> f64 {
        let mut out: f64 = 0.0;
        for fab in &self.fabs {
            for iv in fab.valid().cells() {
                out = out.max(fab.get(iv, n).abs());
            }
        }
        out
    }
}

fn clamp_into(iv: IntVect, region: &IndexBox) -> IntVect {
    [
        iv[0].clamp(region.lo[0], region.hi[0]),
        iv[1].clamp(region.lo[1], region.hi[1]),
        iv[2].clamp(region.lo[2], region.hi[2]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellSize;

    fn ramp_level() -> Level {
        Level::uniform([8, 1, 1], [4, 1, 1], CellSize::uniform(1.0), SpaceDim::One)
    }

    fn fill_valid_with_i(mf: &mut MultiField) {
        for fab in mf.fabs_mut() {
            for iv in fab.valid().cells() {
                fab.set(iv, 0, iv[0] as f64);
            }
        }
    }

    #[test]
    fn test_ghosts_copy_from_neighbour_block() {
        let level = ramp_level();
        let mut mf = MultiField::new(&level, 1, 2);
        fill_valid_with_i(&mut mf);
        mf.fill_ghost_cells(&level);

        let left = mf.fab(BlockIndex::new(0));
        assert_eq!(left.get([4, 0, 0], 0), 4.0);
        assert_eq!(left.get([5, 0, 0], 0), 5.0);
        let right = mf.fab(BlockIndex::new(1));
        assert_eq!(right.get([2, 0, 0], 0), 2.0);
    }

    #[test]
    fn test_ghosts_extrapolate_at_physical_boundary() {
        let level = ramp_level();
        let mut mf = MultiField::new(&level, 1, 2);
        fill_valid_with_i(&mut mf);
        mf.fill_ghost_cells(&level);

        let left = mf.fab(BlockIndex::new(0));
        assert_eq!(left.get([-1, 0, 0], 0), 0.0);
        assert_eq!(left.get([-2, 0, 0], 0), 0.0);
        let right = mf.fab(BlockIndex::new(1));
        assert_eq!(right.get([9, 0, 0], 0), 7.0);
    }

    #[test]
    fn test_ghosts_wrap_periodic() {
        let level = ramp_level().with_periodic([true, false, false]);
        let mut mf = MultiField::new(&level, 1, 2);
        fill_valid_with_i(&mut mf);
        mf.fill_ghost_cells(&level);

        assert_eq!(mf.fab(BlockIndex::new(0)).get([-1, 0, 0], 0), 7.0);
        assert_eq!(mf.fab(BlockIndex::new(1)).get([9, 0, 0], 0), 1.0);
    }

    #[test]
    fn test_copy_components_and_like() {
        let level = ramp_level();
        let mut src = MultiField::new(&level, 3, 1);
        src.set_val(2.5);
        let mut dst = MultiField::like(&src, 1);
        assert!(dst.same_blocks(&src));
        dst.copy_components(&src, 2, 0, 1, 1);
        assert_eq!(dst.max_abs_component(0), 2.5);
    }
}
