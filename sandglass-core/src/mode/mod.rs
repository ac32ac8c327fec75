//! Display modes
//!
//! Only the hourglass mode exists today.

pub mod hourglass;

pub use hourglass::{Hourglass, HourglassStatus, TickOutcome, PARTICLE_COUNT};
