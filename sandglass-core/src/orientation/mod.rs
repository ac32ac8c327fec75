//! Orientation classification
//!
//! Turns a gravity angle into the facts the engine acts on: which matrix is
//! on top, whether the glass lies flat enough for a grain to cross the neck,
//! and the rotation to apply to the display.

pub mod pose;

pub use pose::Pose;
