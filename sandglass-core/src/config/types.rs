//! Configuration type definitions
//!
//! Defaults reproduce the stock hardware: two daisy-chained MAX7219 panels,
//! a 440 Hz piezo and a 100 ms animation tick.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::calibration::OrientationCalibration;
use crate::alarm::AlarmPattern;
use crate::timing::DurationSetting;

/// Highest MAX7219 intensity step
pub const MAX_INTENSITY: u8 = 15;

/// Hourglass engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HourglassConfig {
    /// Angle at which matrix A is the top matrix
    pub reference_angle: u16,
    /// Added to the gravity angle before it is applied as display rotation
    pub rotation_offset: u16,
    /// Buzzer frequency for the drop tick and the alarm (Hz)
    pub tone_hz: u16,
    /// Length of the tick played on each drop (ms)
    pub drop_tone_ms: u16,
    /// Depletion alarm pattern
    pub alarm: AlarmPattern,
    /// Duration set at `init()`
    pub duration: DurationSetting,
    /// Animation tick period (ms)
    pub tick_interval_ms: u32,
}

impl Default for HourglassConfig {
    fn default() -> Self {
        Self {
            reference_angle: 90,
            rotation_offset: 90,
            tone_hz: 440,
            drop_tone_ms: 10,
            alarm: AlarmPattern::default(),
            duration: DurationSetting::default(),
            tick_interval_ms: 100,
        }
    }
}

/// Matrix display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Brightness step, 0-15
    pub intensity: u8,
    /// Position of matrix A in the daisy chain (0 = nearest the MCU)
    pub device_a: u8,
    /// Position of matrix B in the daisy chain
    pub device_b: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            intensity: 8,
            device_a: 1,
            device_b: 0,
        }
    }
}

impl DisplayConfig {
    /// Check the chain positions are distinct and fit a two-device chain
    pub fn is_valid(&self) -> bool {
        self.intensity <= MAX_INTENSITY
            && self.device_a < 2
            && self.device_b < 2
            && self.device_a != self.device_b
    }
}

/// Serial console configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SerialConfig {
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baud_rate: 9600 }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SandglassConfig {
    pub hourglass: HourglassConfig,
    pub orientation: OrientationCalibration,
    pub display: DisplayConfig,
    pub serial: SerialConfig,
}
