//! Density floor and internal-energy reset on a conserved box.
//!
//! Applied to the cell-centred reconstruction of the fourth-order path,
//! where the deconvolution can undershoot near steep gradients.

use crate::equations::EquationOfState;
use crate::field::FieldBox;
use crate::grid::IndexBox;
use crate::state::StateLayout;

/// Raise density to `small_dens` wherever it falls below.
///
/// A positive density below the floor has every density-weighted
/// component rescaled by `small_dens / rho`, keeping velocities, specific
/// energies and mass fractions. A non-positive density carries no usable
/// composition, so the cell is replaced by a floor-density fluid at rest
/// with equal mass fractions and zero energy (left for
/// [`reset_internal_energy`] to raise). NaN densities are left for the
/// primitive-state audit.
///
/// Returns the number of cells changed.
pub fn enforce_minimum_density(
    u: &mut FieldBox,
    region: &IndexBox,
    layout: &StateLayout,
    small_dens: f64,
    verbose: u8,
) -> usize {
    let n_species = layout.n_species();
    let mut fixed = 0;

    for iv in region.cells() {
        let rho = u.get(iv, StateLayout::URHO);
        if rho.is_nan() || rho >= small_dens {
            continue;
        }
        fixed += 1;
        if verbose > 1 {
            log::warn!("density floor at cell {:?}: rho = {:e} < {:e}", iv, rho, small_dens);
        }

        if rho > 0.0 {
            let factor = small_dens / rho;
            for n in 0..layout.n_conserved() {
                if n != StateLayout::UTEMP {
                    u.set(iv, n, u.get(iv, n) * factor);
                }
            }
        } else {
            u.set(iv, StateLayout::URHO, small_dens);
            u.set(iv, StateLayout::UMX, 0.0);
            u.set(iv, StateLayout::UMY, 0.0);
            u.set(iv, StateLayout::UMZ, 0.0);
            u.set(iv, StateLayout::UEDEN, 0.0);
            u.set(iv, StateLayout::UEINT, 0.0);
            for n in 0..n_species {
                u.set(iv, layout.ufs(n), small_dens / n_species as f64);
            }
        }
    }

    if fixed > 0 {
        log::debug!("density floor applied to {} cells in {}", fixed, region);
    }
    fixed
}

/// Make the internal energy consistent and positive.
///
/// Where the total energy is trustworthy (`ρE - ke > η₂ ρE`) the internal
/// energy is resynchronised to `ρE - ke`. Where `ρe` is then negative or
/// the specific energy falls below the energy of `small_temp`, both
/// energies are raised to the floor.
///
/// Returns the number of cells floored.
pub fn reset_internal_energy<E: EquationOfState + ?Sized>(
    u: &mut FieldBox,
    region: &IndexBox,
    layout: &StateLayout,
    eos: &E,
    small_temp: f64,
    dual_energy_eta2: f64,
) -> usize {
    let n_species = layout.n_species();
    let mut x = vec![0.0; n_species];
    let mut fixed = 0;

    for iv in region.cells() {
        let rho = u.get(iv, StateLayout::URHO);
        if !(rho > 0.0) {
            continue;
        }
        let rhoinv = 1.0 / rho;
        let mx = u.get(iv, StateLayout::UMX);
        let my = u.get(iv, StateLayout::UMY);
        let mz = u.get(iv, StateLayout::UMZ);
        let ke = 0.5 * (mx * mx + my * my + mz * mz) * rhoinv;

        let eden = u.get(iv, StateLayout::UEDEN);
        if eden - ke > dual_energy_eta2 * eden {
            u.set(iv, StateLayout::UEINT, eden - ke);
        }

        for (n, xn) in x.iter_mut().enumerate() {
            *xn = u.get(iv, layout.ufs(n)) * rhoinv;
        }
        let small_e = eos.internal_energy(rho, small_temp, &x);

        let rhoe = u.get(iv, StateLayout::UEINT);
        if rhoe < 0.0 || rhoe * rhoinv < small_e {
            let floored = rho * small_e;
            u.set(iv, StateLayout::UEINT, floored);
            u.set(iv, StateLayout::UEDEN, floored + ke);
            fixed += 1;
        }
    }

    if fixed > 0 {
        log::debug!("internal energy reset in {} cells of {}", fixed, region);
    }
    fixed
}
