//! Orientation calibration
//!
//! Corrections applied by the orientation sensor to its raw tilt angle
//! before the engine sees it. Boards mount the accelerometer in different
//! positions, so the correction lives with the sensor, not the engine.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw angle correction
///
/// Applied in order: inversion, offset, then the optional snap to the
/// nearest quarter pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrientationCalibration {
    /// Degrees added to the raw angle (may be negative)
    pub offset_degrees: i16,
    /// Mirror the angle (sensor mounted upside down)
    pub invert: bool,
    /// Snap the result to 0, 90, 180 or 270
    pub snap: bool,
}

impl OrientationCalibration {
    /// Correct a raw angle, returning a value in `0..360`
    pub fn apply(&self, raw_degrees: u16) -> u16 {
        let mut angle = i32::from(raw_degrees % 360);
        if self.invert {
            angle = 360 - angle;
        }
        angle = (angle + i32::from(self.offset_degrees)).rem_euclid(360);

        if self.snap {
            angle = ((angle + 45) / 90 % 4) * 90;
        }
        angle as u16
    }

    /// Check whether this calibration changes anything
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}
