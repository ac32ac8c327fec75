//! Hardware abstraction traits
//!
//! These traits define the interface between the hourglass engine
//! and hardware-specific implementations.

pub mod buzzer;
pub mod clock;
pub mod matrix;
pub mod orientation;

pub use buzzer::Buzzer;
pub use clock::Clock;
pub use matrix::{MatrixId, MatrixPair, MATRIX_SIZE};
pub use orientation::OrientationSource;
