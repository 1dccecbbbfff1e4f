//! Error type for the reconstruction and SDC kernels.
//!
//! Every variant is fatal for the step that raised it: callers propagate
//! it with `?` and abort the run. A CFL violation is deliberately not an
//! error; it is reported through [`CflReport`](crate::solver::CflReport).

use thiserror::Error;

use crate::grid::IntVect;
use crate::types::BlockIndex;

/// Errors raised by the conversion, audit and SDC operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HydroError {
    /// A field does not carry the component count its layout requires.
    #[error("{field} has {actual} components, layout expects {expected}")]
    ComponentMismatch {
        /// Which field was checked
        field: &'static str,
        /// Component count the layout requires
        expected: usize,
        /// Component count found
        actual: usize,
    },

    /// Output ghost width exceeds the input's.
    #[error("output ghost width {output} exceeds input ghost width {input}")]
    GhostWidth {
        /// Ghost width of the conserved input
        input: usize,
        /// Requested ghost width of the output
        output: usize,
    },

    /// Auxiliary output is narrower than the primitive output it pairs with.
    #[error("auxiliary output ghost width {aux} is narrower than primitive output ghost width {primitive}")]
    AuxGhostWidth {
        /// Ghost width of the auxiliary output
        aux: usize,
        /// Ghost width of the primitive output
        primitive: usize,
    },

    /// Fields are defined on different sub-block lists.
    #[error("{0} is not defined on the same sub-blocks as the conserved state")]
    BlockMismatch(&'static str),

    /// `m_start` is not a valid starting node for the chosen SDC scheme.
    #[error("SDC node index {m_start} is invalid for {scheme} (valid: 0..={max_valid})")]
    InvalidNodeIndex {
        /// Requested starting node
        m_start: usize,
        /// Largest valid starting node
        max_valid: usize,
        /// Scheme description
        scheme: String,
    },

    /// Wrong number of node snapshots handed to an SDC kernel.
    #[error("SDC scheme {scheme} needs {expected} advective source snapshots, got {actual}")]
    NodeCountMismatch {
        /// Scheme description
        scheme: String,
        /// Number of nodes the scheme has
        expected: usize,
        /// Number supplied
        actual: usize,
    },

    /// The fourth-order path has no radiation formulation.
    #[error("radiation-coupled physics is not supported by the fourth-order conversion")]
    RadiationUnsupported,

    /// Radiation-coupled physics was configured without a radiation collaborator.
    #[error("radiation-coupled physics requires a radiation coupling")]
    MissingRadiation,

    /// Operation requires a different integration mode.
    #[error("operation requires {required} integration")]
    IntegrationModeMismatch {
        /// Mode the operation needs
        required: &'static str,
    },

    /// Density or internal energy is not positive on entry to the kernel.
    #[error("non-positive {quantity} = {value:e} at cell {cell:?}")]
    NonPositiveState {
        /// `"density"` or `"internal energy"`
        quantity: &'static str,
        /// Offending value
        value: f64,
        /// Cell index
        cell: IntVect,
    },

    /// NaN or Inf found during the primitive-state audit.
    #[error("non-finite value {value} in {field} component {component} at {block} cell {cell:?}")]
    NonFinite {
        /// Audited field
        field: &'static str,
        /// Block containing the cell
        block: BlockIndex,
        /// Cell index
        cell: IntVect,
        /// Component index
        component: usize,
        /// Offending value
        value: f64,
    },

    /// Configuration values are inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl HydroError {
    /// Create a component-count mismatch error.
    pub fn component_mismatch(field: &'static str, expected: usize, actual: usize) -> Self {
        Self::ComponentMismatch {
            field,
            expected,
            actual,
        }
    }

    /// Create an invalid-configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HydroError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = HydroError::component_mismatch("q", 10, 9);
        assert_eq!(e.to_string(), "q has 9 components, layout expects 10");

        let e = HydroError::GhostWidth { input: 3, output: 4 };
        assert!(e.to_string().contains("exceeds"));

        let e = HydroError::AuxGhostWidth { aux: 1, primitive: 2 };
        assert_eq!(
            e.to_string(),
            "auxiliary output ghost width 1 is narrower than primitive output ghost width 2"
        );

        let e = HydroError::InvalidNodeIndex {
            m_start: 3,
            max_valid: 2,
            scheme: "4th-order Radau".into(),
        };
        assert!(e.to_string().contains("0..=2"));
    }
}
