//! Anti-diagonal sweep over an 8x8 grid
//!
//! Slice `s` holds every cell with `x + (7 - y) == s`, so slice 0 is the
//! single gravity corner `(0, 7)` and slice 14 the far corner `(7, 0)`.
//! Both the initial fill and the gravity pass walk the grid slice by slice
//! from the gravity corner outward.

use crate::traits::{MatrixId, MatrixPair, MATRIX_SIZE};

/// Number of anti-diagonal slices (2 * 8 - 1)
pub const SLICES: u8 = 2 * MATRIX_SIZE - 1;

/// Order in which the cells of one slice are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SweepDirection {
    /// From the bottom edge (`y = 7`) towards the left edge (`x = 0`)
    Ascending,
    /// From the left edge (`x = 0`) towards the bottom edge (`y = 7`)
    Descending,
}

/// Cells of one anti-diagonal slice, in the requested order
pub fn diagonal(slice: u8, direction: SweepDirection) -> impl Iterator<Item = (u8, u8)> {
    const MAX: u8 = MATRIX_SIZE - 1;
    let z = slice.saturating_sub(MAX);
    let last = slice.saturating_sub(z);
    (z..=last).map(move |j| match direction {
        SweepDirection::Ascending => (slice - j, MAX - j),
        SweepDirection::Descending => (j, MAX - (slice - j)),
    })
}

/// Every cell of the grid in fill order
pub fn sweep() -> impl Iterator<Item = (u8, u8)> {
    (0..SLICES).flat_map(|slice| diagonal(slice, SweepDirection::Ascending))
}

/// Light the first `count` cells of the sweep and clear the rest
///
/// Deterministic: the same count always produces the same wedge, piled
/// against the gravity corner.
pub fn fill<M: MatrixPair>(matrices: &mut M, matrix: MatrixId, count: u8) {
    for (visited, (x, y)) in sweep().enumerate() {
        matrices.set(matrix, x, y, visited < count as usize);
    }
}
