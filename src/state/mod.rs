//! Fluid state layouts.
//!
//! The conserved, primitive and auxiliary vectors are stored as plain
//! components of a [`MultiField`](crate::field::MultiField); [`StateLayout`]
//! names the component indices and counts for a given species and
//! radiation-group configuration.

mod layout;

pub use layout::StateLayout;
