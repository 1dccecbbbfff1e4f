//! Equation of state interface and the gamma-law reference gas.
//!
//! The transform kernel only needs the `(rho, e) -> (T, p, c, ...)` call
//! and the inverse `(rho, T) -> e` used by the energy floor. Any tabulated
//! or stellar EOS can sit behind [`EquationOfState`].
//!
//! # Units
//!
//! CGS throughout: density g/cm³, specific energy erg/g, pressure
//! dyn/cm², temperature K.

/// Boltzmann constant (erg/K).
pub const K_BOLTZMANN: f64 = 1.380_649e-16;

/// Atomic mass unit (g).
pub const M_U: f64 = 1.660_539_066_60e-24;

/// Thermodynamic state returned by an EOS evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EosState {
    /// Temperature
    pub temperature: f64,
    /// Gas pressure
    pub pressure: f64,
    /// Specific internal energy
    pub e: f64,
    /// Adiabatic sound speed
    pub sound_speed: f64,
    /// First adiabatic index Γ₁
    pub gamma1: f64,
    /// ∂p/∂ρ at constant e
    pub dpdr_e: f64,
    /// ∂p/∂e at constant ρ
    pub dpde: f64,
}

/// Equation of state used by the conservative→primitive kernel.
///
/// Implementations must be pure: the same inputs give the same state.
pub trait EquationOfState: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Evaluate from density and specific internal energy.
    ///
    /// `t_guess` seeds iterative inversions; `x` holds mass fractions.
    fn from_density_energy(&self, rho: f64, e: f64, t_guess: f64, x: &[f64]) -> EosState;

    /// Specific internal energy at density and temperature.
    fn internal_energy(&self, rho: f64, temperature: f64, x: &[f64]) -> f64;
}

/// Ideal gas with constant adiabatic index: `p = (γ - 1) ρ e`.
///
/// # Example
///
/// ```
/// use amr_hydro::equations::{EquationOfState, GammaLaw};
///
/// let eos = GammaLaw::new(1.4);
/// // rho = 1, p = 1  =>  e = p / ((γ - 1) ρ) = 2.5
/// let state = eos.from_density_energy(1.0, 2.5, 0.0, &[1.0]);
/// assert!((state.pressure - 1.0).abs() < 1e-14);
/// assert!((state.sound_speed - 1.4_f64.sqrt()).abs() < 1e-14);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GammaLaw {
    /// Adiabatic index γ
    pub gamma: f64,
    /// Mean molecular weight μ
    pub mu: f64,
}

impl GammaLaw {
    /// Gamma-law gas with μ = 1.
    ///
    /// # Panics
    ///
    /// Panics if `gamma <= 1`.
    pub fn new(gamma: f64) -> Self {
        Self::with_mu(gamma, 1.0)
    }

    /// Gamma-law gas with explicit mean molecular weight.
    pub fn with_mu(gamma: f64, mu: f64) -> Self {
        assert!(gamma > 1.0, "gamma must exceed 1, got {}", gamma);
        assert!(mu > 0.0, "mu must be positive, got {}", mu);
        Self { gamma, mu }
    }
}

impl Default for GammaLaw {
    fn default() -> Self {
        Self::new(5.0 / 3.0)
    }
}

impl EquationOfState for GammaLaw {
    fn name(&self) -> &'static str {
        "gamma-law"
    }

    #[inline]
    fn from_density_energy(&self, rho: f64, e: f64, _t_guess: f64, _x: &[f64]) -> EosState {
        let gm1 = self.gamma - 1.0;
        let pressure = gm1 * rho * e;
        EosState {
            temperature: gm1 * e * self.mu * M_U / K_BOLTZMANN,
            pressure,
            e,
            sound_speed: (self.gamma * pressure / rho).sqrt(),
            gamma1: self.gamma,
            dpdr_e: gm1 * e,
            dpde: gm1 * rho,
        }
    }

    #[inline]
    fn internal_energy(&self, _rho: f64, temperature: f64, _x: &[f64]) -> f64 {
        K_BOLTZMANN * temperature / ((self.gamma - 1.0) * self.mu * M_U)
    }
}
