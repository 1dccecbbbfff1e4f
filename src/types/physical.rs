//! Physical quantity newtypes for grid geometry and stability.
//!
//! These types prevent mixing up quantities that all share the
//! same underlying type (f64).

use std::fmt;

use super::SpaceDim;

// =============================================================================
// CellSize (uniform cell widths per axis)
// =============================================================================

/// Cell widths `(dx, dy, dz)` of a uniform level.
///
/// Axes beyond the level's dimensionality keep a width (usually 1.0) but
/// never contribute to directional quantities.
///
/// # Example
///
/// ```
/// use amr_hydro::types::CellSize;
///
/// let dx = CellSize::uniform(0.25);
/// assert_eq!(dx.axis(1), 0.25);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSize([f64; 3]);

impl CellSize {
    /// Create from per-axis widths.
    ///
    /// # Panics
    ///
    /// Panics if any width is not strictly positive.
    pub fn new(widths: [f64; 3]) -> Self {
        for (axis, w) in widths.iter().enumerate() {
            assert!(*w > 0.0, "cell width on axis {} must be positive, got {}", axis, w);
        }
        Self(widths)
    }

    /// Same width on every axis.
    pub fn uniform(width: f64) -> Self {
        Self::new([width; 3])
    }

    /// Width along `axis` (0 = x, 1 = y, 2 = z).
    #[inline]
    pub fn axis(&self, axis: usize) -> f64 {
        self.0[axis]
    }

    /// `dt / dx_d` on active axes, zero on inactive ones.
    #[inline]
    pub fn dt_over_dx(&self, dt: f64, dim: SpaceDim) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (d, o) in out.iter_mut().enumerate().take(dim.count()) {
            *o = dt / self.0[d];
        }
        out
    }
}

impl fmt::Display for CellSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3e}, {:.3e}, {:.3e})", self.0[0], self.0[1], self.0[2])
    }
}

// =============================================================================
// CourantNumber
// =============================================================================

/// Dimensionless Courant number `(|u| + c) dt / dx`.
///
/// Values above 1.0 violate the explicit stability limit.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct CourantNumber(f64);

impl CourantNumber {
    /// Largest Courant number an explicit update tolerates.
    pub const LIMIT: f64 = 1.0;

    /// Wrap a raw value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Raw value.
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Strictly above [`Self::LIMIT`], or NaN; exactly 1.0 is still stable.
    #[inline]
    pub fn exceeds_limit(self) -> bool {
        self.0.is_nan() || self.0 > Self::LIMIT
    }
}

impl fmt::Display for CourantNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

impl From<CourantNumber> for f64 {
    #[inline]
    fn from(c: CourantNumber) -> f64 {
        c.0
    }
}
