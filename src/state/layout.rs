//! Component layouts of the conserved, primitive and auxiliary vectors.
//!
//! Fixed components come first; species and radiation groups follow.
//!
//! Conserved `U`: `rho, rho u, rho v, rho w, rho E, rho e, T, rho X_0..`
//!
//! Primitive `Q`: `rho, u, v, w, game, p, rho e, T, X_0..`, then for
//! radiation-coupled runs `p_tot, (rho e)_tot, Er_0..`
//!
//! Auxiliary: `gamma_1, c, dp/drho|e, dp/de|rho`, then for
//! radiation-coupled runs `gamma_g, c_g, lambda_0..`

/// Conserved, primitive and auxiliary component indices for a run with a
/// given species count and radiation group count.
///
/// # Example
///
/// ```
/// use amr_hydro::state::StateLayout;
///
/// let layout = StateLayout::new(2, 0);
/// assert_eq!(layout.n_conserved(), 9);
/// assert_eq!(layout.ufs(1), 8);
/// assert_eq!(layout.n_primitive(), 10);
/// assert_eq!(layout.n_aux(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateLayout {
    n_species: usize,
    n_groups: usize,
}

impl StateLayout {
    /// Density
    pub const URHO: usize = 0;
    /// x-momentum
    pub const UMX: usize = 1;
    /// y-momentum
    pub const UMY: usize = 2;
    /// z-momentum
    pub const UMZ: usize = 3;
    /// Total energy density
    pub const UEDEN: usize = 4;
    /// Internal energy density
    pub const UEINT: usize = 5;
    /// Temperature (carried for EOS guesses)
    pub const UTEMP: usize = 6;
    /// First species partial density
    pub const UFS: usize = 7;

    /// Density
    pub const QRHO: usize = 0;
    /// x-velocity
    pub const QU: usize = 1;
    /// y-velocity
    pub const QV: usize = 2;
    /// z-velocity
    pub const QW: usize = 3;
    /// `p / (rho e) + 1`
    pub const QGAME: usize = 4;
    /// Gas pressure
    pub const QPRES: usize = 5;
    /// Internal energy density
    pub const QREINT: usize = 6;
    /// Temperature
    pub const QTEMP: usize = 7;
    /// First species mass fraction
    pub const QFS: usize = 8;

    /// First adiabatic index
    pub const QGAMC: usize = 0;
    /// Sound speed
    pub const QC: usize = 1;
    /// `dp/drho` at constant e
    pub const QDPDR: usize = 2;
    /// `dp/de` at constant rho
    pub const QDPDE: usize = 3;

    const N_FIXED_U: usize = 7;
    const N_FIXED_Q: usize = 8;
    const N_FIXED_AUX: usize = 4;

    /// Layout for `n_species` species and `n_groups` radiation groups
    /// (zero for pure hydrodynamics).
    pub fn new(n_species: usize, n_groups: usize) -> Self {
        Self { n_species, n_groups }
    }

    /// Number of species.
    #[inline]
    pub fn n_species(&self) -> usize {
        self.n_species
    }

    /// Number of radiation groups (zero when pure hydro).
    #[inline]
    pub fn n_groups(&self) -> usize {
        self.n_groups
    }

    /// Whether the primitive/aux vectors carry radiation components.
    #[inline]
    pub fn has_radiation(&self) -> bool {
        self.n_groups > 0
    }

    /// Species `n` partial density in `U`.
    #[inline]
    pub fn ufs(&self, n: usize) -> usize {
        debug_assert!(n < self.n_species);
        Self::UFS + n
    }

    /// Species `n` mass fraction in `Q`.
    #[inline]
    pub fn qfs(&self, n: usize) -> usize {
        debug_assert!(n < self.n_species);
        Self::QFS + n
    }

    /// Components in the conserved vector.
    #[inline]
    pub fn n_conserved(&self) -> usize {
        Self::N_FIXED_U + self.n_species
    }

    /// Total pressure (gas + radiation) in `Q`.
    #[inline]
    pub fn qptot(&self) -> usize {
        debug_assert!(self.has_radiation());
        Self::N_FIXED_Q + self.n_species
    }

    /// Total internal energy (gas + radiation) in `Q`.
    #[inline]
    pub fn qreitot(&self) -> usize {
        self.qptot() + 1
    }

    /// Radiation energy density of group `g` in `Q`.
    #[inline]
    pub fn qrad(&self, g: usize) -> usize {
        debug_assert!(g < self.n_groups);
        self.qptot() + 2 + g
    }

    /// Components in the primitive vector.
    #[inline]
    pub fn n_primitive(&self) -> usize {
        let base = Self::N_FIXED_Q + self.n_species;
        if self.has_radiation() {
            base + 2 + self.n_groups
        } else {
            base
        }
    }

    /// Gray adiabatic index in the aux vector.
    #[inline]
    pub fn qgamcg(&self) -> usize {
        debug_assert!(self.has_radiation());
        Self::N_FIXED_AUX
    }

    /// Gray sound speed (gas + radiation) in the aux vector.
    #[inline]
    pub fn qcg(&self) -> usize {
        self.qgamcg() + 1
    }

    /// Flux limiter of group `g` in the aux vector.
    #[inline]
    pub fn qlams(&self, g: usize) -> usize {
        debug_assert!(g < self.n_groups);
        self.qgamcg() + 2 + g
    }

    /// Components in the auxiliary vector.
    #[inline]
    pub fn n_aux(&self) -> usize {
        if self.has_radiation() {
            Self::N_FIXED_AUX + 2 + self.n_groups
        } else {
            Self::N_FIXED_AUX
        }
    }

    /// Components of the stored reaction state: species rates, specific
    /// energy rate, raw energy rate.
    #[inline]
    pub fn n_reaction_store(&self) -> usize {
        self.n_species + 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_hydro_counts() {
        let layout = StateLayout::new(3, 0);
        assert_eq!(layout.n_conserved(), 10);
        assert_eq!(layout.n_primitive(), 11);
        assert_eq!(layout.n_aux(), 4);
        assert_eq!(layout.qfs(2), 10);
        assert_eq!(layout.n_reaction_store(), 5);
        assert!(!layout.has_radiation());
    }

    #[test]
    fn test_radiation_components_follow_species() {
        let layout = StateLayout::new(1, 2);
        assert_eq!(layout.qptot(), 9);
        assert_eq!(layout.qreitot(), 10);
        assert_eq!(layout.qrad(0), 11);
        assert_eq!(layout.qrad(1), 12);
        assert_eq!(layout.n_primitive(), 13);

        assert_eq!(layout.qgamcg(), 4);
        assert_eq!(layout.qcg(), 5);
        assert_eq!(layout.qlams(1), 7);
        assert_eq!(layout.n_aux(), 8);
    }
}
