//! Flat 8x8 occupancy grid and quarter-turn rotation

use crate::traits::MATRIX_SIZE;

/// Number of cells in one grid
pub const CELLS: usize = (MATRIX_SIZE as usize) * (MATRIX_SIZE as usize);

/// One 8x8 occupancy grid, stored row-major
///
/// A cell is either empty or holds exactly one particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    cells: [bool; CELLS],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Create an empty grid
    pub const fn new() -> Self {
        Self {
            cells: [false; CELLS],
        }
    }

    fn index(x: u8, y: u8) -> Option<usize> {
        if x < MATRIX_SIZE && y < MATRIX_SIZE {
            Some(y as usize * MATRIX_SIZE as usize + x as usize)
        } else {
            None
        }
    }

    /// Read a cell; out-of-range reads are empty
    pub fn get(&self, x: u8, y: u8) -> bool {
        Self::index(x, y).map_or(false, |i| self.cells[i])
    }

    /// Write a cell; out-of-range writes are ignored
    pub fn set(&mut self, x: u8, y: u8, on: bool) {
        if let Some(i) = Self::index(x, y) {
            self.cells[i] = on;
        }
    }

    /// Invert a cell
    pub fn toggle(&mut self, x: u8, y: u8) {
        if let Some(i) = Self::index(x, y) {
            self.cells[i] = !self.cells[i];
        }
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells = [false; CELLS];
    }

    /// Number of occupied cells
    pub fn count(&self) -> u8 {
        self.cells.iter().filter(|&&c| c).count() as u8
    }

    /// Check if no cell is occupied
    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    /// Row `y` packed into a byte, bit `x` set for an occupied cell
    pub fn row_bits(&self, y: u8) -> u8 {
        (0..MATRIX_SIZE).fold(0u8, |bits, x| {
            if self.get(x, y) {
                bits | (1 << x)
            } else {
                bits
            }
        })
    }
}

/// Display rotation in quarter turns
///
/// Maps logical coordinates (the frame gravity is computed in) to raw panel
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Round any angle to the nearest quarter turn
    pub fn from_degrees(degrees: u16) -> Self {
        match ((degrees as u32 + 45) / 90) % 4 {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    /// Rotation angle in degrees
    pub const fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Map logical coordinates to raw panel coordinates
    ///
    /// Coordinates must already be in range.
    pub const fn to_raw(self, x: u8, y: u8) -> (u8, u8) {
        const MAX: u8 = MATRIX_SIZE - 1;
        match self {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (y, MAX - x),
            Rotation::Deg180 => (MAX - x, MAX - y),
            Rotation::Deg270 => (MAX - y, x),
        }
    }
}
