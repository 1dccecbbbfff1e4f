//! Ghost-cell-aware field containers.
//!
//! - [`FieldBox`]: one sub-block's multi-component array over its valid
//!   region plus halo
//! - [`MultiField`]: one [`FieldBox`] per sub-block of a level, with ghost
//!   filling and component-range copies

mod field_box;
mod multi_field;

pub use field_box::FieldBox;
pub use multi_field::MultiField;
