//! Spatial dimensionality of a run.

use std::fmt;

/// Number of active spatial axes.
///
/// Lower-dimensional runs still store three velocity components and
/// three-component cell indices; the inactive axes have extent one and
/// no ghost cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SpaceDim {
    /// x only
    One,
    /// x and y
    Two,
    /// x, y and z
    #[default]
    Three,
}

impl SpaceDim {
    /// Number of active axes.
    #[inline]
    pub const fn count(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Whether `axis` (0, 1 or 2) takes part in the discretization.
    #[inline]
    pub const fn is_active(self, axis: usize) -> bool {
        axis < self.count()
    }

    /// Per-axis 0/1 mask, used to grow boxes only along active axes.
    #[inline]
    pub const fn mask(self) -> [i32; 3] {
        match self {
            Self::One => [1, 0, 0],
            Self::Two => [1, 1, 0],
            Self::Three => [1, 1, 1],
        }
    }
}

impl fmt::Display for SpaceDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.count())
    }
}
