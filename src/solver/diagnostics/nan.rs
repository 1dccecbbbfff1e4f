//! Non-finite value audit.

use crate::error::{HydroError, Result};
use crate::field::MultiField;
use crate::types::BlockIndex;

/// Scan every block of `field` over its valid region grown by `n_grow`
/// and fail on the first NaN or infinity.
///
/// Blocks are scanned in order, so the reported cell is deterministic.
pub fn check_for_nan(field: &MultiField, name: &'static str, n_grow: usize) -> Result<()> {
    for (b, fab) in field.fabs().iter().enumerate() {
        let block = BlockIndex::new(b);
        let region = field.grown_box(block, n_grow);
        if let Some((cell, component, value)) = fab.find_non_finite(&region) {
            log::error!(
                "non-finite {} in {} component {} at {} cell {:?}",
                value,
                name,
                component,
                block,
                cell
            );
            return Err(HydroError::NonFinite {
                field: name,
                block,
                cell,
                component,
                value,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Level;
    use crate::types::{CellSize, SpaceDim};

    #[test]
    fn test_finds_nan_in_second_block() {
        let level = Level::uniform([8, 4, 1], [4, 4, 1], CellSize::uniform(1.0), SpaceDim::Two);
        let mut field = MultiField::new(&level, 2, 1);
        field.set_val(1.0);
        assert!(check_for_nan(&field, "q", 1).is_ok());

        field.fab_mut(BlockIndex::new(1)).set([5, 2, 0], 1, f64::INFINITY);
        let err = check_for_nan(&field, "q", 0).unwrap_err();
        match err {
            HydroError::NonFinite {
                field,
                block,
                cell,
                component,
                ..
            } => {
                assert_eq!(field, "q");
                assert_eq!(block, BlockIndex::new(1));
                assert_eq!(cell, [5, 2, 0]);
                assert_eq!(component, 1);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_ghost_cells_outside_audit_region_ignored() {
        let level = Level::uniform([4, 4, 1], [4, 4, 1], CellSize::uniform(1.0), SpaceDim::Two);
        let mut field = MultiField::new(&level, 1, 2);
        field.set_val(0.0);
        field.fab_mut(BlockIndex::ZERO).set([-2, -2, 0], 0, f64::NAN);

        assert!(check_for_nan(&field, "q_bar", 1).is_ok());
        assert!(check_for_nan(&field, "q_bar", 2).is_err());
    }
}
