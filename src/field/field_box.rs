//! Multi-component cell data for one sub-block.

use crate::grid::{IndexBox, IntVect};
use crate::types::SpaceDim;

/// Cell data for one sub-block, including its ghost halo.
///
/// Stores `n_comp` components over `region` (the valid box grown by the
/// ghost width) in component-major layout:
/// `data[n * num_cells + offset(i, j, k)]` with i fastest.
///
/// This layout keeps each component contiguous, which is what the
/// stencil passes (Laplacian, re-averaging) sweep over.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldBox {
    /// Values in component-major layout
    pub data: Vec<f64>,
    /// Valid (owned) cells
    valid: IndexBox,
    /// Valid cells plus ghost halo; the allocated region
    region: IndexBox,
    /// Number of components per cell
    n_comp: usize,
}

impl FieldBox {
    /// Allocate a zeroed box over `valid` grown by `n_grow` ghost cells.
    pub fn new(valid: IndexBox, n_grow: usize, dim: SpaceDim, n_comp: usize) -> Self {
        let region = valid.grow(n_grow as i32, dim);
        Self {
            data: vec![0.0; region.num_cells() * n_comp],
            valid,
            region,
            n_comp,
        }
    }

    /// Valid (owned) cells.
    #[inline]
    pub fn valid(&self) -> IndexBox {
        self.valid
    }

    /// Allocated region: valid cells plus halo.
    #[inline]
    pub fn region(&self) -> IndexBox {
        self.region
    }

    /// Number of components.
    #[inline]
    pub fn n_comp(&self) -> usize {
        self.n_comp
    }

    #[inline(always)]
    fn index(&self, iv: IntVect, n: usize) -> usize {
        debug_assert!(self.region.contains(iv), "{:?} outside {}", iv, self.region);
        debug_assert!(n < self.n_comp, "component {} >= {}", n, self.n_comp);
        n * self.region.num_cells() + self.region.offset(iv)
    }

    /// Value of component `n` at cell `iv`.
    #[inline(always)]
    pub fn get(&self, iv: IntVect, n: usize) -> f64 {
        self.data[self.index(iv, n)]
    }

    /// Set component `n` at cell `iv`.
    #[inline(always)]
    pub fn set(&mut self, iv: IntVect, n: usize, value: f64) {
        let idx = self.index(iv, n);
        self.data[idx] = value;
    }

    /// Gather all components at `iv` into `out` (length `n_comp`).
    #[inline]
    pub fn cell_values(&self, iv: IntVect, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.n_comp);
        let stride = self.region.num_cells();
        let base = self.region.offset(iv);
        for (n, o) in out.iter_mut().enumerate() {
            *o = self.data[n * stride + base];
        }
    }

    /// Scatter `values` (length `n_comp`) into cell `iv`.
    #[inline]
    pub fn set_cell_values(&mut self, iv: IntVect, values: &[f64]) {
        debug_assert_eq!(values.len(), self.n_comp);
        let stride = self.region.num_cells();
        let base = self.region.offset(iv);
        for (n, v) in values.iter().enumerate() {
            self.data[n * stride + base] = *v;
        }
    }

    /// Set every value (valid and ghost) to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.iter_mut().for_each(|v| *v = value);
    }

    /// Copy `n_comp` components over `region` from `src`.
    ///
    /// # Panics
    ///
    /// Panics if `region` is not covered by both boxes.
    pub fn copy_from(
        &mut self,
        src: &FieldBox,
        src_comp: usize,
        dst_comp: usize,
        n_comp: usize,
        region: &IndexBox,
    ) {
        assert!(self.region.contains_box(region), "copy region outside destination");
        assert!(src.region.contains_box(region), "copy region outside source");
        for n in 0..n_comp {
            for iv in region.cells() {
                self.set(iv, dst_comp + n, src.get(iv, src_comp + n));
            }
        }
    }

    /// Maximum absolute value over all components and cells.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().map(|&x| x.abs()).fold(0.0, f64::max)
    }

    /// First non-finite value inside `region`, as `(cell, component, value)`.
    pub fn find_non_finite(&self, region: &IndexBox) -> Option<(IntVect, usize, f64)> {
        for n in 0..self.n_comp {
            for iv in region.cells() {
                let v = self.get(iv, n);
                if !v.is_finite() {
                    return Some((iv, n, v));
                }
            }
        }
        None
    }
}
