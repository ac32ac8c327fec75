//! Falling-sand simulation
//!
//! Occupancy grids, the quarter-turn display rotation, the diagonal sweep
//! order shared by the fill and the gravity pass, and the gravity pass itself.

pub mod field;
pub mod gravity;
pub mod grid;
pub mod sweep;

pub use field::ParticleField;
pub use gravity::{move_particle, plan_move, step, Move};
pub use grid::{Grid, Rotation, CELLS};
pub use sweep::{diagonal, fill, sweep, SweepDirection, SLICES};
