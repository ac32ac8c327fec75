//! Hardware driver implementations
//!
//! Concrete implementations of the collaborator traits defined in
//! sandglass-core:
//!
//! - Matrix display (two daisy-chained MAX7219)
//! - Orientation sensor (MPU-6050 accelerometer)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod sensor;
