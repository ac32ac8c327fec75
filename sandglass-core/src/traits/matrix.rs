//! Bitmap matrix pair trait
//!
//! The hourglass is drawn on two 8x8 single-colour matrices. Each matrix is
//! addressed in *logical* coordinates that follow the display rotation, and
//! in *raw* coordinates that are fixed to the physical panel.

/// Width and height of one matrix
pub const MATRIX_SIZE: u8 = 8;

/// Identity of one of the two matrices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatrixId {
    A,
    B,
}

impl MatrixId {
    /// Both matrices, in a fixed order
    pub const ALL: [MatrixId; 2] = [MatrixId::A, MatrixId::B];

    /// The other matrix of the pair
    pub const fn other(self) -> Self {
        match self {
            MatrixId::A => MatrixId::B,
            MatrixId::B => MatrixId::A,
        }
    }

    /// Storage index (A = 0, B = 1)
    pub const fn index(self) -> usize {
        match self {
            MatrixId::A => 0,
            MatrixId::B => 1,
        }
    }

    /// Single-letter name used in status reports
    pub const fn as_str(self) -> &'static str {
        match self {
            MatrixId::A => "A",
            MatrixId::B => "B",
        }
    }
}

/// Trait for a pair of 8x8 bit matrices
///
/// Coordinates outside `0..8` read as empty and writes to them are ignored.
/// Implementations never fail at this boundary: a driver that loses its bus
/// keeps the in-memory frame and reports the fault through its own API.
pub trait MatrixPair {
    /// Read a cell in logical (rotated) coordinates
    fn get(&self, matrix: MatrixId, x: u8, y: u8) -> bool;

    /// Write a cell in logical (rotated) coordinates
    fn set(&mut self, matrix: MatrixId, x: u8, y: u8, on: bool);

    /// Clear every cell of one matrix
    fn clear(&mut self, matrix: MatrixId);

    /// Read a cell in raw panel coordinates, ignoring rotation
    fn raw_get(&self, matrix: MatrixId, x: u8, y: u8) -> bool;

    /// Invert a cell in raw panel coordinates, ignoring rotation
    fn raw_invert(&mut self, matrix: MatrixId, x: u8, y: u8);

    /// Set the display-wide rotation in degrees
    fn set_rotation(&mut self, degrees: u16);

    /// Count lit cells of one matrix
    fn count(&self, matrix: MatrixId) -> u8 {
        let mut count = 0;
        for y in 0..MATRIX_SIZE {
            for x in 0..MATRIX_SIZE {
                if self.raw_get(matrix, x, y) {
                    count += 1;
                }
            }
        }
        count
    }
}
