//! Equation of state and the per-cell conservative→primitive transform.
//!
//! The transform maps one cell's conserved vector
//!
//! U = (ρ, ρu, ρv, ρw, ρE, ρe, T, ρX₀..)
//!
//! to its primitive vector Q = (ρ, u, v, w, Γₑ, p, ρe, T, X₀..) and the
//! auxiliary EOS scalars (Γ₁, c, ∂p/∂ρ, ∂p/∂e), plus radiation totals when
//! groups are coupled.

mod ctoprim;
mod equation_of_state;

pub use ctoprim::{KernelContext, conserved_to_primitive};
pub use equation_of_state::{EosState, EquationOfState, GammaLaw, K_BOLTZMANN, M_U};
