//! Index newtypes for the block-structured hierarchy.
//!
//! A sub-block index and a refinement-level index are both plain `usize`
//! values underneath; wrapping them keeps a block from being passed where
//! a level is expected.

use std::fmt;
use std::ops::{Index, IndexMut};

macro_rules! hierarchy_index {
    (
        $(#[$meta:meta])*
        $name:ident => $tag:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Index zero.
            pub const ZERO: Self = Self(0);

            /// Wrap a raw index.
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Raw index.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// Indices `0..n` in ascending order.
            pub fn iter(n: usize) -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator {
                (0..n).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "{}"), self.0)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(index: $name) -> usize {
                index.0
            }
        }

        // Per-block vectors are indexed directly by the newtype
        impl<T> Index<$name> for [T] {
            type Output = T;
            #[inline]
            fn index(&self, index: $name) -> &T {
                &self[index.0]
            }
        }

        impl<T> IndexMut<$name> for [T] {
            #[inline]
            fn index_mut(&mut self, index: $name) -> &mut T {
                &mut self[index.0]
            }
        }

        impl<T> Index<$name> for Vec<T> {
            type Output = T;
            #[inline]
            fn index(&self, index: $name) -> &T {
                &self.as_slice()[index]
            }
        }

        impl<T> IndexMut<$name> for Vec<T> {
            #[inline]
            fn index_mut(&mut self, index: $name) -> &mut T {
                &mut self.as_mut_slice()[index]
            }
        }
    };
}

hierarchy_index!(
    /// Sub-block of one AMR level; the unit of parallel work.
    ///
    /// # Example
    ///
    /// ```
    /// use amr_hydro::types::BlockIndex;
    ///
    /// let block = BlockIndex::new(7);
    /// assert_eq!(block.get(), 7);
    /// assert_eq!(block.to_string(), "B7");
    /// ```
    BlockIndex => "B"
);

hierarchy_index!(
    /// Refinement level, 0 being the coarsest.
    LevelIndex => "L"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_tags() {
        assert_eq!(BlockIndex::new(3).to_string(), "B3");
        assert_eq!(LevelIndex::new(0).to_string(), "L0");
    }

    #[test]
    fn test_indexes_per_block_vectors() {
        let mut widths = vec![4, 8, 16];
        widths[BlockIndex::new(1)] += 1;
        let collected: Vec<i32> = BlockIndex::iter(widths.len()).rev().map(|b| widths[b]).collect();
        assert_eq!(collected, vec![16, 9, 4]);
        assert_eq!(widths.as_slice()[BlockIndex::ZERO], 4);
    }

    #[test]
    fn test_raw_conversions() {
        let b: BlockIndex = 4usize.into();
        let raw: usize = b.into();
        assert_eq!(raw, b.get());
        assert_eq!(LevelIndex::default(), LevelIndex::ZERO);
    }
}
