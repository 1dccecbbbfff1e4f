//! Spectral deferred correction node updates.
//!
//! An SDC step visits a fixed set of quadrature nodes in `[t^n, t^{n+1}]`.
//! Moving from node `m` to `m + 1`, the conserved state is advanced by
//!
//! ```text
//! k_{m+1} = k_m + dt_m (A_m - A_m^old) + dt Σ_j w_{m,j} A_j^old
//! ```
//!
//! where `A_j^old` are the advective sources of the previous sweep and
//! `w_{m,j}` integrates their interpolant over `[t_m, t_{m+1}]`. The
//! weights depend only on the quadrature family, the order and the
//! starting node.
//!
//! | Scheme            | Nodes on [0, 1]                      | Valid `m_start` |
//! |-------------------|--------------------------------------|-----------------|
//! | 2nd Gauss-Lobatto | 0, 1                                 | 0               |
//! | 2nd Radau         | 0, 1/3, 1                            | 0, 1            |
//! | 4th Gauss-Lobatto | 0, 1/2, 1                            | 0, 1            |
//! | 4th Radau         | 0, (4 - √6)/10, (4 + √6)/10, 1       | 0, 1, 2         |
//!
//! The second-order Lobatto update is the trapezoid rule and has no
//! `dt_m` correction term.

use std::fmt;

use crate::error::{HydroError, Result};
use crate::field::{FieldBox, MultiField};
use crate::grid::IndexBox;
use crate::solver::ExecutionStrategy;
use crate::state::StateLayout;

/// Formal order of the SDC scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SdcOrder {
    /// Second order
    Second,
    /// Fourth order
    Fourth,
}

/// Quadrature node family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SdcQuadrature {
    /// Gauss-Lobatto (both endpoints are nodes)
    GaussLobatto,
    /// Radau IIA (right endpoint is a node)
    Radau,
}

/// An SDC scheme: order plus node family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SdcScheme {
    /// Formal order
    pub order: SdcOrder,
    /// Node family
    pub quadrature: SdcQuadrature,
}

/// Weights of one node-to-node update.
///
/// `k_n = k_m + dt_m (A_m - A_{correction}) + dt / denominator * Σ_j numerators[j] A_j`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeUpdate {
    /// Starting node
    pub m_start: usize,
    /// Node whose old source the `dt_m` term corrects, if any
    pub correction_node: Option<usize>,
    /// Common denominator of the quadrature weights
    pub denominator: f64,
    /// Weight numerators for `A_0^old..A_3^old`
    pub numerators: [f64; 4],
}

impl NodeUpdate {
    /// Updated value of one component in one cell.
    ///
    /// `a_old` holds the previous-sweep sources of every node.
    #[inline]
    pub fn apply(&self, k_m: f64, a_m: f64, a_old: &[f64], dt_m: f64, dt: f64) -> f64 {
        let mut quad = 0.0;
        for (w, a) in self.numerators.iter().zip(a_old) {
            if *w != 0.0 {
                quad += w * a;
            }
        }
        let k = match self.correction_node {
            Some(c) => k_m + dt_m * (a_m - a_old[c]),
            None => k_m,
        };
        k + dt / self.denominator * quad
    }
}

impl SdcScheme {
    /// Scheme from order and family.
    pub const fn new(order: SdcOrder, quadrature: SdcQuadrature) -> Self {
        Self { order, quadrature }
    }

    /// Second-order Gauss-Lobatto (trapezoid).
    pub const fn lobatto2() -> Self {
        Self::new(SdcOrder::Second, SdcQuadrature::GaussLobatto)
    }

    /// Fourth-order Gauss-Lobatto (Simpson).
    pub const fn lobatto4() -> Self {
        Self::new(SdcOrder::Fourth, SdcQuadrature::GaussLobatto)
    }

    /// Second-order Radau.
    pub const fn radau2() -> Self {
        Self::new(SdcOrder::Second, SdcQuadrature::Radau)
    }

    /// Fourth-order Radau.
    pub const fn radau4() -> Self {
        Self::new(SdcOrder::Fourth, SdcQuadrature::Radau)
    }

    /// Number of time nodes, including `t^n`.
    pub const fn n_nodes(&self) -> usize {
        match (self.order, self.quadrature) {
            (SdcOrder::Second, SdcQuadrature::GaussLobatto) => 2,
            (SdcOrder::Second, SdcQuadrature::Radau) => 3,
            (SdcOrder::Fourth, SdcQuadrature::GaussLobatto) => 3,
            (SdcOrder::Fourth, SdcQuadrature::Radau) => 4,
        }
    }

    /// Largest starting node with a defined update.
    pub const fn max_start_node(&self) -> usize {
        match (self.order, self.quadrature) {
            (SdcOrder::Second, SdcQuadrature::GaussLobatto) => 0,
            (SdcOrder::Second, SdcQuadrature::Radau) => 1,
            (SdcOrder::Fourth, SdcQuadrature::GaussLobatto) => 1,
            (SdcOrder::Fourth, SdcQuadrature::Radau) => 2,
        }
    }

    /// Node locations as fractions of the step.
    pub fn node_times(&self) -> Vec<f64> {
        let sqrt6 = 6.0_f64.sqrt();
        match (self.order, self.quadrature) {
            (SdcOrder::Second, SdcQuadrature::GaussLobatto) => vec![0.0, 1.0],
            (SdcOrder::Second, SdcQuadrature::Radau) => vec![0.0, 1.0 / 3.0, 1.0],
            (SdcOrder::Fourth, SdcQuadrature::GaussLobatto) => vec![0.0, 0.5, 1.0],
            (SdcOrder::Fourth, SdcQuadrature::Radau) => {
                vec![0.0, (4.0 - sqrt6) / 10.0, (4.0 + sqrt6) / 10.0, 1.0]
            }
        }
    }

    /// Sub-step `dt_m` from node `m` to node `m + 1` of a step of `dt`.
    pub fn node_dt(&self, m: usize, dt: f64) -> Result<f64> {
        if m > self.max_start_node() {
            return Err(self.invalid_node(m));
        }
        let t = self.node_times();
        Ok(dt * (t[m + 1] - t[m]))
    }

    fn invalid_node(&self, m_start: usize) -> HydroError {
        HydroError::InvalidNodeIndex {
            m_start,
            max_valid: self.max_start_node(),
            scheme: self.to_string(),
        }
    }

    /// Update weights for starting node `m_start`.
    ///
    /// # Errors
    ///
    /// [`HydroError::InvalidNodeIndex`] when `m_start` has no update in
    /// this scheme.
    pub fn node_update(&self, m_start: usize) -> Result<NodeUpdate> {
        if m_start > self.max_start_node() {
            return Err(self.invalid_node(m_start));
        }
        let sqrt6 = 6.0_f64.sqrt();
        let (correction_node, denominator, numerators) = match (self.order, self.quadrature) {
            (SdcOrder::Second, SdcQuadrature::GaussLobatto) => (None, 2.0, [1.0, 1.0, 0.0, 0.0]),
            (SdcOrder::Second, SdcQuadrature::Radau) => match m_start {
                0 => (Some(0), 12.0, [0.0, 5.0, -1.0, 0.0]),
                _ => (Some(1), 3.0, [0.0, 1.0, 1.0, 0.0]),
            },
            (SdcOrder::Fourth, SdcQuadrature::GaussLobatto) => match m_start {
                0 => (Some(0), 24.0, [5.0, 8.0, -1.0, 0.0]),
                _ => (Some(1), 24.0, [-1.0, 8.0, 5.0, 0.0]),
            },
            (SdcOrder::Fourth, SdcQuadrature::Radau) => match m_start {
                0 => (
                    Some(0),
                    1800.0,
                    [
                        0.0,
                        -35.0 * sqrt6 + 440.0,
                        -169.0 * sqrt6 + 296.0,
                        -16.0 + 24.0 * sqrt6,
                    ],
                ),
                1 => (
                    Some(1),
                    150.0,
                    [0.0, -12.0 + 17.0 * sqrt6, 12.0 + 17.0 * sqrt6, -4.0 * sqrt6],
                ),
                _ => (
                    Some(2),
                    600.0,
                    [
                        0.0,
                        168.0 - 73.0 * sqrt6,
                        120.0 + 5.0 * sqrt6,
                        72.0 + 8.0 * sqrt6,
                    ],
                ),
            },
        };
        Ok(NodeUpdate {
            m_start,
            correction_node,
            denominator,
            numerators,
        })
    }

    /// Advance `k_m` to `k_n` over the valid cells of every block.
    ///
    /// `a_old` must hold one previous-sweep source per node. Every field
    /// must share `k_n`'s blocks and component count.
    #[allow(clippy::too_many_arguments)]
    pub fn update_advection(
        &self,
        strategy: ExecutionStrategy,
        k_m: &MultiField,
        k_n: &mut MultiField,
        a_m: &MultiField,
        a_old: &[&MultiField],
        dt_m: f64,
        dt: f64,
        m_start: usize,
    ) -> Result<()> {
        let update = self.node_update(m_start)?;
        if a_old.len() != self.n_nodes() {
            return Err(HydroError::NodeCountMismatch {
                scheme: self.to_string(),
                expected: self.n_nodes(),
                actual: a_old.len(),
            });
        }
        let n_comp = k_n.n_comp();
        check_alike(k_n, k_m, "k_m")?;
        check_alike(k_n, a_m, "A_m")?;
        for a in a_old {
            check_alike(k_n, a, "A_old")?;
        }

        let n_nodes = self.n_nodes();
        let mut fabs: Vec<_> = k_n.fabs_mut().iter_mut().collect();
        strategy.for_each_block(&mut fabs, |b, out| {
            let region = out.valid();
            let (km, am) = (k_m.fab(b), a_m.fab(b));
            let values = strategy.map_cells(&region, n_comp, |iv, lane| {
                let mut olds = [0.0; 4];
                for (n, v) in lane.iter_mut().enumerate() {
                    for (j, a) in a_old.iter().enumerate() {
                        olds[j] = a.fab(b).get(iv, n);
                    }
                    *v = update.apply(km.get(iv, n), am.get(iv, n), &olds[..n_nodes], dt_m, dt);
                }
                Ok(())
            })?;
            scatter(out, &region, &values, n_comp);
            Ok(())
        })?;

        log::trace!("SDC {} update from node {}", self, m_start);
        Ok(())
    }
}

impl fmt::Display for SdcScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = match self.order {
            SdcOrder::Second => "2nd-order",
            SdcOrder::Fourth => "4th-order",
        };
        let family = match self.quadrature {
            SdcQuadrature::GaussLobatto => "Gauss-Lobatto",
            SdcQuadrature::Radau => "Radau",
        };
        write!(f, "{} {}", order, family)
    }
}

/// Initial guess for the implicit reaction solve at the next node.
///
/// On the first sweep (`iteration == 0`) this is the explicit predictor
/// `U_old + dt_m A_old + dt_m R_old`; later sweeps reuse `U_new` as is.
#[allow(clippy::too_many_arguments)]
pub fn compute_initial_guess(
    strategy: ExecutionStrategy,
    u_old: &MultiField,
    u_new: &MultiField,
    a_old: &MultiField,
    r_old: &MultiField,
    u_guess: &mut MultiField,
    dt_m: f64,
    iteration: usize,
) -> Result<()> {
    let n_comp = u_guess.n_comp();
    check_alike(u_guess, u_new, "U_new")?;
    if iteration == 0 {
        check_alike(u_guess, u_old, "U_old")?;
        check_alike(u_guess, a_old, "A_old")?;
        check_alike(u_guess, r_old, "R_old")?;
    }

    let mut fabs: Vec<_> = u_guess.fabs_mut().iter_mut().collect();
    strategy.for_each_block(&mut fabs, |b, out| {
        let region = out.valid();
        if iteration > 0 {
            out.copy_from(u_new.fab(b), 0, 0, n_comp, &region);
            return Ok(());
        }
        let (uo, ao, ro) = (u_old.fab(b), a_old.fab(b), r_old.fab(b));
        let values = strategy.map_cells(&region, n_comp, |iv, lane| {
            for (n, v) in lane.iter_mut().enumerate() {
                *v = uo.get(iv, n) + dt_m * ao.get(iv, n) + dt_m * ro.get(iv, n);
            }
            Ok(())
        })?;
        scatter(out, &region, &values, n_comp);
        Ok(())
    })
}

/// Repack the last node's reactive source into specific rates.
///
/// With `nspec = r_store.n_comp() - 2`: species rates
/// `R[UFS + n] / rho`, then the specific energy rate `R[UEDEN] / rho`, then
/// the raw energy rate `R[UEDEN]`.
pub fn store_reaction_state(
    strategy: ExecutionStrategy,
    r_old: &MultiField,
    state: &MultiField,
    r_store: &mut MultiField,
) -> Result<()> {
    let n_comp = r_store.n_comp();
    if n_comp < 2 {
        return Err(HydroError::component_mismatch("reaction store", 2, n_comp));
    }
    let nspec = n_comp - 2;
    if r_old.n_comp() < StateLayout::UFS + nspec {
        return Err(HydroError::component_mismatch(
            "reactive source",
            StateLayout::UFS + nspec,
            r_old.n_comp(),
        ));
    }
    if state.n_comp() <= StateLayout::URHO {
        return Err(HydroError::component_mismatch("state", StateLayout::URHO + 1, state.n_comp()));
    }
    if !r_store.same_blocks(r_old) {
        return Err(HydroError::BlockMismatch("reactive source"));
    }
    if !r_store.same_blocks(state) {
        return Err(HydroError::BlockMismatch("state"));
    }

    let mut fabs: Vec<_> = r_store.fabs_mut().iter_mut().collect();
    strategy.for_each_block(&mut fabs, |b, out| {
        let region = out.valid();
        let (r, s) = (r_old.fab(b), state.fab(b));
        let values = strategy.map_cells(&region, n_comp, |iv, lane| {
            let rho = s.get(iv, StateLayout::URHO);
            for (n, v) in lane.iter_mut().take(nspec).enumerate() {
                *v = r.get(iv, StateLayout::UFS + n) / rho;
            }
            let eden = r.get(iv, StateLayout::UEDEN);
            lane[nspec] = eden / rho;
            lane[nspec + 1] = eden;
            Ok(())
        })?;
        scatter(out, &region, &values, n_comp);
        Ok(())
    })
}

fn check_alike(reference: &MultiField, other: &MultiField, name: &'static str) -> Result<()> {
    if other.n_comp() != reference.n_comp() {
        return Err(HydroError::component_mismatch(name, reference.n_comp(), other.n_comp()));
    }
    if !other.same_blocks(reference) {
        return Err(HydroError::BlockMismatch(name));
    }
    Ok(())
}

fn scatter(out: &mut FieldBox, region: &IndexBox, values: &[f64], n_comp: usize) {
    for (n, iv) in region.cells().enumerate() {
        out.set_cell_values(iv, &values[n * n_comp..(n + 1) * n_comp]);
    }
}
