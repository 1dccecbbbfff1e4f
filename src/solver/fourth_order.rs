//! Fourth-order conversion between cell averages and cell centres.
//!
//! For a smooth field the cell average and the point value at the cell
//! centre differ by `h²/24 ∇²` to fourth order:
//!
//! ```text
//! u_cc  = <u> - (1/24) Σ_d (<u>_{i+1} - 2<u>_i + <u>_{i-1})
//! <q>   = q_cc + (1/24) Σ_d (q_{i+1} - 2q_i + q_{i-1})
//! ```
//!
//! Both operators use the centred three-point Laplacian along each active
//! axis, so the result is valid on a region one cell narrower than the
//! input.

use crate::field::FieldBox;
use crate::grid::{IndexBox, IntVect};
use crate::types::SpaceDim;

const ONE_24TH: f64 = 1.0 / 24.0;

/// Undivided three-point Laplacian of component `n` at `iv`, summed over
/// active axes.
#[inline]
pub fn undivided_laplacian(fab: &FieldBox, iv: IntVect, n: usize, dim: SpaceDim) -> f64 {
    let centre = fab.get(iv, n);
    let mut lap = 0.0;
    for d in 0..dim.count() {
        let mut lo = iv;
        let mut hi = iv;
        lo[d] -= 1;
        hi[d] += 1;
        lap += fab.get(hi, n) - 2.0 * centre + fab.get(lo, n);
    }
    lap
}

/// Deconvolve cell averages `u_avg` into cell-centred values `u_cc` over
/// `region`.
///
/// # Panics
///
/// Panics if `u_avg` does not cover `region` grown by one cell or
/// `u_cc` does not cover `region`.
pub fn make_cell_center(u_avg: &FieldBox, u_cc: &mut FieldBox, region: &IndexBox, dim: SpaceDim) {
    assert!(
        u_avg.region().contains_box(&region.grow(1, dim)),
        "cell-average input does not cover the stencil of {}",
        region
    );
    debug_assert_eq!(u_avg.n_comp(), u_cc.n_comp());
    for n in 0..u_avg.n_comp() {
        for iv in region.cells() {
            let lap = undivided_laplacian(u_avg, iv, n, dim);
            u_cc.set(iv, n, u_avg.get(iv, n) - ONE_24TH * lap);
        }
    }
}

/// Convert cell-centred `q` into fourth-order cell averages in place,
/// taking the Laplacian from the cell-average-derived `q_bar`.
///
/// # Panics
///
/// Panics if `q_bar` does not cover `region` grown by one cell.
pub fn make_fourth_average(q: &mut FieldBox, q_bar: &FieldBox, region: &IndexBox, dim: SpaceDim) {
    assert!(
        q_bar.region().contains_box(&region.grow(1, dim)),
        "bar field does not cover the stencil of {}",
        region
    );
    debug_assert_eq!(q.n_comp(), q_bar.n_comp());
    for n in 0..q.n_comp() {
        for iv in region.cells() {
            let lap = undivided_laplacian(q_bar, iv, n, dim);
            q.set(iv, n, q.get(iv, n) + ONE_24TH * lap);
        }
    }
}
