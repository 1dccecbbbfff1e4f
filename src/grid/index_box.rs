//! Integer cell boxes.
//!
//! An [`IndexBox`] is an inclusive range of cell indices `lo..=hi` on each
//! of three axes. Lower-dimensional runs use boxes with `lo == hi == 0` on
//! the inactive axes.

use std::fmt;

use crate::types::SpaceDim;

/// Three-component integer cell index `(i, j, k)`.
pub type IntVect = [i32; 3];

/// Inclusive rectangular range of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IndexBox {
    /// Lowest cell index on each axis
    pub lo: IntVect,
    /// Highest cell index on each axis (inclusive)
    pub hi: IntVect,
}

impl IndexBox {
    /// Create a box from inclusive corners.
    ///
    /// # Panics
    ///
    /// Panics if `hi < lo` on any axis.
    pub fn new(lo: IntVect, hi: IntVect) -> Self {
        for d in 0..3 {
            assert!(
                hi[d] >= lo[d],
                "box hi ({:?}) must not be below lo ({:?}) on axis {}",
                hi,
                lo,
                d
            );
        }
        Self { lo, hi }
    }

    /// Box of `n` cells per axis starting at the origin, flattened on
    /// inactive axes.
    pub fn from_extent(n: [i32; 3], dim: SpaceDim) -> Self {
        let mut hi = [0; 3];
        for d in 0..dim.count() {
            hi[d] = n[d] - 1;
        }
        Self::new([0; 3], hi)
    }

    /// Number of cells along `axis`.
    #[inline]
    pub fn length(&self, axis: usize) -> usize {
        (self.hi[axis] - self.lo[axis] + 1) as usize
    }

    /// Total number of cells.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.length(0) * self.length(1) * self.length(2)
    }

    /// Grow by `n` cells on every active axis (shrink for negative `n`).
    pub fn grow(&self, n: i32, dim: SpaceDim) -> Self {
        let mask = dim.mask();
        let mut lo = self.lo;
        let mut hi = self.hi;
        for d in 0..3 {
            lo[d] -= n * mask[d];
            hi[d] += n * mask[d];
        }
        Self::new(lo, hi)
    }

    /// Whether `iv` lies inside the box.
    #[inline]
    pub fn contains(&self, iv: IntVect) -> bool {
        (0..3).all(|d| iv[d] >= self.lo[d] && iv[d] <= self.hi[d])
    }

    /// Whether `other` lies entirely inside the box.
    #[inline]
    pub fn contains_box(&self, other: &IndexBox) -> bool {
        self.contains(other.lo) && self.contains(other.hi)
    }

    /// Intersection of two boxes, `None` if disjoint.
    pub fn intersect(&self, other: &IndexBox) -> Option<IndexBox> {
        let mut lo = [0; 3];
        let mut hi = [0; 3];
        for d in 0..3 {
            lo[d] = self.lo[d].max(other.lo[d]);
            hi[d] = self.hi[d].min(other.hi[d]);
            if hi[d] < lo[d] {
                return None;
            }
        }
        Some(IndexBox { lo, hi })
    }

    /// Row-major offset of `iv` inside the box (i fastest).
    #[inline(always)]
    pub fn offset(&self, iv: IntVect) -> usize {
        let nx = self.length(0);
        let ny = self.length(1);
        let i = (iv[0] - self.lo[0]) as usize;
        let j = (iv[1] - self.lo[1]) as usize;
        let k = (iv[2] - self.lo[2]) as usize;
        (k * ny + j) * nx + i
    }

    /// Cell at row-major `offset`; inverse of [`IndexBox::offset`].
    #[inline]
    pub fn cell_at(&self, offset: usize) -> IntVect {
        let nx = self.length(0);
        let ny = self.length(1);
        let i = offset % nx;
        let j = (offset / nx) % ny;
        let k = offset / (nx * ny);
        [
            self.lo[0] + i as i32,
            self.lo[1] + j as i32,
            self.lo[2] + k as i32,
        ]
    }

    /// Iterate all cells, i fastest then j then k.
    pub fn cells(&self) -> impl Iterator<Item = IntVect> + '_ {
        let (lo, hi) = (self.lo, self.hi);
        (lo[2]..=hi[2]).flat_map(move |k| {
            (lo[1]..=hi[1]).flat_map(move |j| (lo[0]..=hi[0]).map(move |i| [i, j, k]))
        })
    }

    /// Split into sub-boxes of at most `max_size` cells per axis.
    ///
    /// Used to decompose a level's domain into sub-blocks.
    pub fn chop(&self, max_size: [i32; 3]) -> Vec<IndexBox> {
        let ranges: Vec<Vec<(i32, i32)>> = (0..3)
            .map(|d| {
                let step = max_size[d].max(1);
                let mut out = Vec::new();
                let mut start = self.lo[d];
                while start <= self.hi[d] {
                    let end = (start + step - 1).min(self.hi[d]);
                    out.push((start, end));
                    start = end + 1;
                }
                out
            })
            .collect();

        let mut boxes = Vec::new();
        for &(klo, khi) in &ranges[2] {
            for &(jlo, jhi) in &ranges[1] {
                for &(ilo, ihi) in &ranges[0] {
                    boxes.push(IndexBox::new([ilo, jlo, klo], [ihi, jhi, khi]));
                }
            }
        }
        boxes
    }
}

impl fmt::Display for IndexBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(({},{},{}) ({},{},{}))",
            self.lo[0], self.lo[1], self.lo[2], self.hi[0], self.hi[1], self.hi[2]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_respects_dimensionality() {
        let b = IndexBox::new([0, 0, 0], [3, 3, 0]);
        let g = b.grow(2, SpaceDim::Two);
        assert_eq!(g.lo, [-2, -2, 0]);
        assert_eq!(g.hi, [5, 5, 0]);
        assert_eq!(g.grow(-2, SpaceDim::Two), b);
    }

    #[test]
    fn test_cells_order_matches_offset() {
        let b = IndexBox::new([1, -1, 2], [3, 0, 3]);
        for (n, iv) in b.cells().enumerate() {
            assert_eq!(b.offset(iv), n);
            assert_eq!(b.cell_at(n), iv);
        }
        assert_eq!(b.cells().count(), b.num_cells());
    }

    #[test]
    fn test_chop_covers_domain() {
        let domain = IndexBox::from_extent([10, 7, 1], SpaceDim::Two);
        let parts = domain.chop([4, 4, 4]);
        assert_eq!(parts.len(), 3 * 2);
        let total: usize = parts.iter().map(|b| b.num_cells()).sum();
        assert_eq!(total, domain.num_cells());
        for p in &parts {
            assert!(domain.contains_box(p));
        }
    }

    #[test]
    fn test_intersect() {
        let a = IndexBox::new([0, 0, 0], [4, 4, 4]);
        let b = IndexBox::new([3, 3, 3], [8, 8, 8]);
        assert_eq!(a.intersect(&b), Some(IndexBox::new([3, 3, 3], [4, 4, 4])));
        let c = IndexBox::new([5, 0, 0], [6, 1, 1]);
        assert_eq!(a.intersect(&c), None);
    }
}
