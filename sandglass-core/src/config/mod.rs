//! Configuration types and the config-file parser

pub mod calibration;
pub mod toml;
pub mod types;

pub use calibration::OrientationCalibration;
pub use toml::{parse_config, ParseError};
pub use types::*;
