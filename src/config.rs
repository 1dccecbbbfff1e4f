//! Run configuration, resolved once at startup.
//!
//! Runtime enums select the physics and integration variants; kernels
//! branch on these rather than on build-time switches.
//!
//! # Example
//!
//! ```
//! use amr_hydro::config::{HydroConfig, IntegrationMode, TimeIntegrationMethod};
//! use amr_hydro::solver::ExecutionStrategy;
//! use amr_hydro::time::SdcScheme;
//!
//! let config = HydroConfig::new()
//!     .with_species(2)
//!     .with_integration(IntegrationMode::FourthOrderSdc(SdcScheme::radau4()))
//!     .with_time_integration(TimeIntegrationMethod::MethodOfLines)
//!     .with_execution(ExecutionStrategy::Serial);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.layout().n_conserved(), 9);
//! ```

use std::fmt;

use crate::error::{HydroError, Result};
use crate::solver::ExecutionStrategy;
use crate::state::StateLayout;
use crate::time::SdcScheme;

/// Physics variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PhysicsMode {
    /// Hydrodynamics only
    #[default]
    PureHydro,
    /// Hydrodynamics coupled to grouped radiation energy
    RadiationCoupled {
        /// Number of radiation groups
        groups: usize,
    },
}

impl PhysicsMode {
    /// Number of radiation groups (zero for pure hydro).
    pub fn n_groups(&self) -> usize {
        match self {
            Self::PureHydro => 0,
            Self::RadiationCoupled { groups } => *groups,
        }
    }

    /// Whether radiation is coupled.
    pub fn is_radiation_coupled(&self) -> bool {
        matches!(self, Self::RadiationCoupled { .. })
    }
}

/// Spatial/temporal accuracy variant of the conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IntegrationMode {
    /// Second-order cell-centred conversion
    #[default]
    Standard,
    /// Fourth-order cell-average conversion for SDC time integration
    FourthOrderSdc(SdcScheme),
}

impl IntegrationMode {
    /// SDC scheme when fourth-order mode is active.
    pub fn sdc_scheme(&self) -> Option<SdcScheme> {
        match self {
            Self::Standard => None,
            Self::FourthOrderSdc(scheme) => Some(*scheme),
        }
    }
}

/// Time integration method, which selects the CFL combination policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TimeIntegrationMethod {
    /// Corner-transport-upwind: per-cell Courant number is the max over axes
    #[default]
    Ctu,
    /// Method of lines: per-cell Courant number is the sum over axes
    MethodOfLines,
}

impl fmt::Display for TimeIntegrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ctu => write!(f, "CTU"),
            Self::MethodOfLines => write!(f, "method-of-lines"),
        }
    }
}

/// Hydrodynamics core configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct HydroConfig {
    /// Physics variant
    pub physics: PhysicsMode,
    /// Conversion accuracy variant
    pub integration: IntegrationMode,
    /// Time integration method (CFL policy)
    pub time_integration: TimeIntegrationMethod,
    /// How blocks and cells are dispatched
    pub execution: ExecutionStrategy,
    /// Ghost width of the conserved state (`NUM_GROW`)
    pub num_grow: usize,
    /// Number of species
    pub n_species: usize,
    /// Density floor
    ///
    /// Both floors default to 1e-200, below any physical state in any unit
    /// system.
    pub small_dens: f64,
    /// Temperature floor
    pub small_temp: f64,
    /// Dual-energy switch for deriving e from total energy
    pub dual_energy_eta1: f64,
    /// Dual-energy switch for resynchronising rho e with total energy
    pub dual_energy_eta2: f64,
    /// Keep the cell-centred temperature for thermal diffusion
    pub diffusion: bool,
    /// Diagnostic verbosity (0 = quiet)
    pub verbose: u8,
}

impl Default for HydroConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl HydroConfig {
    /// Default configuration: pure hydro, standard order, CTU, threaded,
    /// four ghost cells, one species.
    pub fn new() -> Self {
        Self {
            physics: PhysicsMode::PureHydro,
            integration: IntegrationMode::Standard,
            time_integration: TimeIntegrationMethod::Ctu,
            execution: ExecutionStrategy::Threaded,
            num_grow: 4,
            n_species: 1,
            small_dens: 1.0e-200,
            small_temp: 1.0e-200,
            dual_energy_eta1: 1.0,
            dual_energy_eta2: 1.0e-4,
            diffusion: false,
            verbose: 0,
        }
    }

    /// Set the physics variant.
    pub fn with_physics(mut self, physics: PhysicsMode) -> Self {
        self.physics = physics;
        self
    }

    /// Set the integration variant.
    pub fn with_integration(mut self, integration: IntegrationMode) -> Self {
        self.integration = integration;
        self
    }

    /// Set the time integration method.
    pub fn with_time_integration(mut self, method: TimeIntegrationMethod) -> Self {
        self.time_integration = method;
        self
    }

    /// Set the execution strategy.
    pub fn with_execution(mut self, execution: ExecutionStrategy) -> Self {
        self.execution = execution;
        self
    }

    /// Set the ghost width.
    pub fn with_num_grow(mut self, num_grow: usize) -> Self {
        self.num_grow = num_grow;
        self
    }

    /// Set the species count.
    pub fn with_species(mut self, n_species: usize) -> Self {
        self.n_species = n_species;
        self
    }

    /// Set density and temperature floors.
    pub fn with_floors(mut self, small_dens: f64, small_temp: f64) -> Self {
        self.small_dens = small_dens;
        self.small_temp = small_temp;
        self
    }

    /// Set the dual-energy switches.
    pub fn with_dual_energy(mut self, eta1: f64, eta2: f64) -> Self {
        self.dual_energy_eta1 = eta1;
        self.dual_energy_eta2 = eta2;
        self
    }

    /// Enable keeping the cell-centred temperature for diffusion.
    pub fn with_diffusion(mut self, enabled: bool) -> Self {
        self.diffusion = enabled;
        self
    }

    /// Set diagnostic verbosity.
    pub fn with_verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }

    /// Component layout implied by species and radiation groups.
    pub fn layout(&self) -> StateLayout {
        StateLayout::new(self.n_species, self.physics.n_groups())
    }

    /// Check the configuration for inconsistent values.
    pub fn validate(&self) -> Result<()> {
        if self.num_grow == 0 {
            return Err(HydroError::invalid_config("num_grow must be at least 1"));
        }
        if self.integration.sdc_scheme().is_some() && self.num_grow < 2 {
            return Err(HydroError::invalid_config(
                "fourth-order conversion needs num_grow >= 2",
            ));
        }
        if let PhysicsMode::RadiationCoupled { groups: 0 } = self.physics {
            return Err(HydroError::invalid_config(
                "radiation-coupled physics needs at least one group",
            ));
        }
        if !(self.small_dens > 0.0) {
            return Err(HydroError::invalid_config(format!(
                "small_dens must be positive, got {}",
                self.small_dens
            )));
        }
        if !(self.small_temp > 0.0) {
            return Err(HydroError::invalid_config(format!(
                "small_temp must be positive, got {}",
                self.small_temp
            )));
        }
        if !(self.dual_energy_eta1 >= 0.0) || !(self.dual_energy_eta2 >= 0.0) {
            return Err(HydroError::invalid_config(
                "dual energy switches must be non-negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = HydroConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.num_grow, 4);
        assert_eq!(config.small_dens, 1.0e-200);
        assert_eq!(config.small_temp, 1.0e-200);
        assert_eq!(config.layout(), StateLayout::new(1, 0));
    }

    #[test]
    fn test_radiation_layout() {
        let config = HydroConfig::new().with_physics(PhysicsMode::RadiationCoupled { groups: 3 });
        assert!(config.physics.is_radiation_coupled());
        assert_eq!(config.layout().n_groups(), 3);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(HydroConfig::new().with_num_grow(0).validate().is_err());
        assert!(
            HydroConfig::new()
                .with_physics(PhysicsMode::RadiationCoupled { groups: 0 })
                .validate()
                .is_err()
        );
        assert!(HydroConfig::new().with_floors(0.0, 1.0).validate().is_err());
        assert!(
            HydroConfig::new()
                .with_integration(IntegrationMode::FourthOrderSdc(SdcScheme::lobatto4()))
                .with_num_grow(1)
                .validate()
                .is_err()
        );
    }
}
