//! Orientation (gravity direction) source

/// Trait for anything that reports which way is down
///
/// The reported angle is already calibrated: 0 and 180 are the two poses in
/// which the hourglass neck is horizontal. A source that cannot reach its
/// sensor must still return a sane angle (typically the last good reading).
pub trait OrientationSource {
    /// Current gravity angle in degrees, `0..360`
    ///
    /// Takes `&mut self` because reading the sensor requires bus access.
    fn angle_degrees(&mut self) -> u16;
}
