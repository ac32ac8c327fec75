//! Pose of the glass for one tick

use crate::traits::MatrixId;

/// Angles at which the neck is level
pub const FLAT_ANGLES: [u16; 2] = [0, 180];

/// Classified orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pose {
    /// Gravity angle in degrees
    pub angle: u16,
    /// Matrix holding the sand that is still to run
    pub top: MatrixId,
    /// Neck is level, grains may cross
    pub flat: bool,
}

impl Pose {
    /// Classify an angle against the reference angle
    ///
    /// Only the exact reference angle puts A on top; every other reading,
    /// including out-of-range ones, puts B on top.
    pub fn classify(angle: u16, reference_angle: u16) -> Self {
        let top = if angle == reference_angle {
            MatrixId::A
        } else {
            MatrixId::B
        };
        Self {
            angle,
            top,
            flat: FLAT_ANGLES.contains(&angle),
        }
    }

    /// Matrix collecting the sand
    pub fn bottom(&self) -> MatrixId {
        self.top.other()
    }

    /// Display rotation for this pose, in degrees
    pub fn display_rotation(&self, rotation_offset: u16) -> u16 {
        ((u32::from(rotation_offset) + u32::from(self.angle)) % 360) as u16
    }
}
