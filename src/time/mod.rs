//! Time integration kernels.
//!
//! Only the spectral deferred correction node updates live here; the
//! sweep controller that calls them belongs to the enclosing driver.

mod sdc;

pub use sdc::{
    NodeUpdate, SdcOrder, SdcQuadrature, SdcScheme, compute_initial_guess, store_reaction_state,
};
