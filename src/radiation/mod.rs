//! Radiation coupling consumed by the conservative→primitive driver.
//!
//! Radiation transport itself lives elsewhere; the driver only needs the
//! ghost-filled group energy densities and a flux-limiter field. In a
//! pure-hydro configuration of a radiation run the limiter is zero
//! everywhere.
//!
//! [`StaticRadiation`] is a reference coupling holding a fixed energy
//! field and computing the Levermore–Pomraning limiter from local
//! gradients.

use crate::field::MultiField;
use crate::grid::{IndexBox, IntVect, Level};
use crate::state::StateLayout;

/// One cell's radiation inputs to the transform kernel.
#[derive(Clone, Copy, Debug)]
pub struct RadiationCell<'a> {
    /// Energy density of each group
    pub energy: &'a [f64],
    /// Flux limiter of each group
    pub limiter: &'a [f64],
}

/// Source of radiation energy and flux-limiter fields.
pub trait RadiationCoupling: Send + Sync {
    /// Number of radiation groups.
    fn n_groups(&self) -> usize;

    /// Whether radiation is carried passively (zero limiter).
    fn pure_hydro(&self) -> bool;

    /// Group energy densities with `n_grow` ghost cells, filled at `time`.
    fn fill_energy(&self, level: &Level, n_grow: usize, time: f64) -> MultiField;

    /// Flux limiter for every group on the grown region of `energy`.
    fn compute_limiter(&self, level: &Level, state: &MultiField, energy: &MultiField) -> MultiField;
}

/// Ghost-filled radiation energy and limiter for one conversion call.
#[derive(Clone, Debug)]
pub struct RadiationFields {
    /// Group energy densities
    pub energy: MultiField,
    /// Group flux limiters
    pub limiter: MultiField,
}

impl RadiationFields {
    /// Refresh the energy halo and derive the limiter, or zero it when
    /// the coupling is pure hydro.
    pub fn prepare(
        coupling: &dyn RadiationCoupling,
        level: &Level,
        state: &MultiField,
        n_grow: usize,
        time: f64,
    ) -> Self {
        let energy = coupling.fill_energy(level, n_grow, time);
        let limiter = if coupling.pure_hydro() {
            let mut lam = MultiField::new(level, coupling.n_groups(), n_grow);
            lam.set_val(0.0);
            lam
        } else {
            coupling.compute_limiter(level, state, &energy)
        };
        log::trace!(
            "radiation fields prepared: {} groups, pure_hydro={}",
            coupling.n_groups(),
            coupling.pure_hydro()
        );
        Self { energy, limiter }
    }
}

/// Levermore–Pomraning flux limiter `λ(R) = (2 + R) / (6 + 3R + R²)`.
///
/// Tends to 1/3 in the optically thick limit (R → 0) and to 1/R in the
/// free-streaming limit.
#[inline]
pub fn levermore_pomraning(r: f64) -> f64 {
    (2.0 + r) / (6.0 + 3.0 * r + r * r)
}

/// Reference coupling with a prescribed energy field and constant
/// per-group opacities.
#[derive(Clone, Debug)]
pub struct StaticRadiation {
    energy: MultiField,
    /// Opacity κ_g (cm²/g) of each group
    pub opacity: Vec<f64>,
    /// Carry radiation passively
    pub pure_hydro: bool,
}

impl StaticRadiation {
    /// Wrap a valid-region energy field (one component per group).
    ///
    /// # Panics
    ///
    /// Panics if `opacity` does not have one entry per group.
    pub fn new(energy: MultiField, opacity: Vec<f64>, pure_hydro: bool) -> Self {
        assert_eq!(
            energy.n_comp(),
            opacity.len(),
            "one opacity per radiation group required"
        );
        Self {
            energy,
            opacity,
            pure_hydro,
        }
    }
}

impl RadiationCoupling for StaticRadiation {
    fn n_groups(&self) -> usize {
        self.opacity.len()
    }

    fn pure_hydro(&self) -> bool {
        self.pure_hydro
    }

    fn fill_energy(&self, level: &Level, n_grow: usize, _time: f64) -> MultiField {
        let mut out = MultiField::new(level, self.n_groups(), n_grow);
        out.copy_components(&self.energy, 0, 0, self.n_groups(), 0);
        out.fill_ghost_cells(level);
        out
    }

    fn compute_limiter(&self, level: &Level, state: &MultiField, energy: &MultiField) -> MultiField {
        let mut lam = MultiField::like(energy, self.n_groups());
        let inv_dx: Vec<f64> = (0..3).map(|d| 1.0 / level.cell_size.axis(d)).collect();

        for ((lam_fab, e_fab), u_fab) in lam
            .fabs_mut()
            .iter_mut()
            .zip(energy.fabs())
            .zip(state.fabs())
        {
            let region = e_fab.region();
            for iv in region.cells() {
                let rho = if u_fab.region().contains(iv) {
                    u_fab.get(iv, StateLayout::URHO)
                } else {
                    u_fab.get(clamp(iv, &u_fab.region()), StateLayout::URHO)
                };
                for (g, kappa) in self.opacity.iter().enumerate() {
                    let er = e_fab.get(iv, g);
                    let mut grad2 = 0.0;
                    for d in 0..level.dim.count() {
                        let dedx = one_axis_gradient(e_fab, &region, iv, g, d) * inv_dx[d];
                        grad2 += dedx * dedx;
                    }
                    let chi = kappa * rho;
                    let r = if er > 0.0 && chi > 0.0 {
                        grad2.sqrt() / (chi * er)
                    } else {
                        0.0
                    };
                    lam_fab.set(iv, g, levermore_pomraning(r));
                }
            }
        }
        lam
    }
}

/// Centred difference along `axis`, one-sided where the region ends.
fn one_axis_gradient(
    fab: &crate::field::FieldBox,
    region: &IndexBox,
    iv: IntVect,
    n: usize,
    axis: usize,
) -> f64 {
    let mut lo = iv;
    let mut hi = iv;
    lo[axis] -= 1;
    hi[axis] += 1;
    match (region.contains(lo), region.contains(hi)) {
        (true, true) => 0.5 * (fab.get(hi, n) - fab.get(lo, n)),
        (false, true) => fab.get(hi, n) - fab.get(iv, n),
        (true, false) => fab.get(iv, n) - fab.get(lo, n),
        (false, false) => 0.0,
    }
}

fn clamp(iv: IntVect, region: &IndexBox) -> IntVect {
    [
        iv[0].clamp(region.lo[0], region.hi[0]),
        iv[1].clamp(region.lo[1], region.hi[1]),
        iv[2].clamp(region.lo[2], region.hi[2]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockIndex, CellSize, SpaceDim};
    use approx::assert_relative_eq;

    fn level() -> Level {
        Level::uniform([4, 4, 1], [4, 4, 1], CellSize::uniform(1.0), SpaceDim::Two)
    }

    fn uniform_state(level: &Level, n_grow: usize) -> MultiField {
        let layout = StateLayout::new(1, 0);
        let mut u = MultiField::new(level, layout.n_conserved(), n_grow);
        u.fill_with(|_, cell| {
            cell.fill(0.0);
            cell[StateLayout::URHO] = 1.0;
        });
        u
    }

    #[test]
    fn test_limiter_limits() {
        assert_relative_eq!(levermore_pomraning(0.0), 1.0 / 3.0);
        assert_relative_eq!(levermore_pomraning(1.0e8) * 1.0e8, 1.0, max_relative = 1e-6);
    }

    #[test]
    fn test_uniform_energy_gives_diffusion_limit() {
        let level = level();
        let mut er = MultiField::new(&level, 1, 0);
        er.set_val(2.0);
        let coupling = StaticRadiation::new(er, vec![1.0], false);
        let u = uniform_state(&level, 2);

        let fields = RadiationFields::prepare(&coupling, &level, &u, 2, 0.0);
        assert_eq!(fields.energy.n_grow(), 2);
        let lam = fields.limiter.fab(BlockIndex::ZERO);
        for iv in lam.region().cells() {
            assert_relative_eq!(lam.get(iv, 0), 1.0 / 3.0, epsilon = 1e-14);
        }
        // Ghosts were extrapolated from the valid region
        assert_eq!(fields.energy.fab(BlockIndex::ZERO).get([-2, -2, 0], 0), 2.0);
    }

    #[test]
    fn test_pure_hydro_zero_limiter() {
        let level = level();
        let mut er = MultiField::new(&level, 2, 0);
        er.set_val(1.0);
        let coupling = StaticRadiation::new(er, vec![1.0, 2.0], true);
        let u = uniform_state(&level, 1);

        let fields = RadiationFields::prepare(&coupling, &level, &u, 1, 0.0);
        assert_eq!(fields.limiter.n_comp(), 2);
        assert_eq!(fields.limiter.fab(BlockIndex::ZERO).max_abs(), 0.0);
    }
}
