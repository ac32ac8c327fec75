//! Board-agnostic core logic for the Sandglass hourglass
//!
//! This crate contains everything that does not depend on specific
//! hardware:
//!
//! - Collaborator traits (matrix pair, orientation, buzzer, clock)
//! - Falling-sand simulation over two 8x8 grids
//! - Duration and cross-neck drop timing
//! - Depletion alarm sequencer
//! - Orientation classification
//! - Hourglass mode engine
//! - Configuration types and the config-file parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod alarm;
pub mod config;
pub mod mode;
pub mod orientation;
pub mod sim;
pub mod timing;
pub mod traits;

pub use mode::{Hourglass, HourglassStatus, TickOutcome};
