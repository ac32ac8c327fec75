//! In-memory particle field
//!
//! The union of both grids plus the current display rotation. This is the
//! frame the engine simulates on; display drivers wrap it and push its raw
//! rows to the panels.

use super::grid::{Grid, Rotation};
use crate::traits::{MatrixId, MatrixPair, MATRIX_SIZE};

/// Occupancy of both matrices, stored in raw panel coordinates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticleField {
    grids: [Grid; 2],
    rotation: Rotation,
}

impl ParticleField {
    /// Create an empty field with no rotation
    pub const fn new() -> Self {
        Self {
            grids: [Grid::new(), Grid::new()],
            rotation: Rotation::Deg0,
        }
    }

    /// Raw grid of one matrix
    pub fn grid(&self, matrix: MatrixId) -> &Grid {
        &self.grids[matrix.index()]
    }

    /// Current rotation
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Total particles across both matrices
    pub fn total(&self) -> u8 {
        self.grids[0].count() + self.grids[1].count()
    }
}

impl MatrixPair for ParticleField {
    fn get(&self, matrix: MatrixId, x: u8, y: u8) -> bool {
        if x >= MATRIX_SIZE || y >= MATRIX_SIZE {
            return false;
        }
        let (rx, ry) = self.rotation.to_raw(x, y);
        self.grids[matrix.index()].get(rx, ry)
    }

    fn set(&mut self, matrix: MatrixId, x: u8, y: u8, on: bool) {
        if x >= MATRIX_SIZE || y >= MATRIX_SIZE {
            return;
        }
        let (rx, ry) = self.rotation.to_raw(x, y);
        self.grids[matrix.index()].set(rx, ry, on);
    }

    fn clear(&mut self, matrix: MatrixId) {
        self.grids[matrix.index()].clear();
    }

    fn raw_get(&self, matrix: MatrixId, x: u8, y: u8) -> bool {
        self.grids[matrix.index()].get(x, y)
    }

    fn raw_invert(&mut self, matrix: MatrixId, x: u8, y: u8) {
        self.grids[matrix.index()].toggle(x, y);
    }

    fn set_rotation(&mut self, degrees: u16) {
        self.rotation = Rotation::from_degrees(degrees);
    }

    fn count(&self, matrix: MatrixId) -> u8 {
        self.grids[matrix.index()].count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_write_lands_on_rotated_raw_cell() {
        let mut field = ParticleField::new();
        field.set_rotation(90);
        field.set(MatrixId::B, 0, 7, true);

        assert!(field.get(MatrixId::B, 0, 7));
        assert!(field.raw_get(MatrixId::B, 7, 7));
        assert!(!field.raw_get(MatrixId::B, 0, 7));
        assert_eq!(field.count(MatrixId::A), 0);
    }

    #[test]
    fn test_rotation_keeps_contents() {
        let mut field = ParticleField::new();
        field.set(MatrixId::A, 1, 2, true);
        field.set_rotation(180);

        assert_eq!(field.count(MatrixId::A), 1);
        assert!(field.get(MatrixId::A, 6, 5));
    }

    #[test]
    fn test_raw_invert() {
        let mut field = ParticleField::new();
        field.raw_invert(MatrixId::A, 0, 0);
        assert!(field.raw_get(MatrixId::A, 0, 0));
        field.raw_invert(MatrixId::A, 0, 0);
        assert!(!field.raw_get(MatrixId::A, 0, 0));
    }

    #[test]
    fn test_out_of_range_logical_access() {
        let mut field = ParticleField::new();
        field.set_rotation(90);
        field.set(MatrixId::A, 8, 0, true);
        assert_eq!(field.total(), 0);
        assert!(!field.get(MatrixId::A, 0, 8));
    }
}
