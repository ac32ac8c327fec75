//! User-set hourglass duration
//!
//! The duration fixes the drop cadence: one grain crosses the neck every
//! `total_minutes` seconds, so a full glass of 60 grains drains in
//! `total_minutes` minutes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest accepted hour value
pub const MAX_HOURS: u8 = 23;

/// Largest accepted minute value
pub const MAX_MINUTES: u8 = 59;

/// Hourglass duration in hours and minutes
///
/// Never zero: with no hours the minutes are held at one or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawDuration"))]
pub struct DurationSetting {
    hours: u8,
    minutes: u8,
}

/// Unchecked wire form, clamped on the way in
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawDuration {
    hours: i32,
    minutes: i32,
}

#[cfg(feature = "serde")]
impl From<RawDuration> for DurationSetting {
    fn from(raw: RawDuration) -> Self {
        Self::new_clamped(raw.hours, raw.minutes)
    }
}

impl Default for DurationSetting {
    fn default() -> Self {
        Self {
            hours: 0,
            minutes: 1,
        }
    }
}

impl DurationSetting {
    /// Build a duration, clamping both fields into range
    ///
    /// Hours are clamped to `0..=23`, minutes to `0..=59`, and minutes to at
    /// least 1 when hours is 0.
    pub fn new_clamped(hours: i32, minutes: i32) -> Self {
        let hours = hours.clamp(0, MAX_HOURS as i32) as u8;
        let min_minutes = if hours == 0 { 1 } else { 0 };
        let minutes = minutes.clamp(min_minutes, MAX_MINUTES as i32) as u8;
        Self { hours, minutes }
    }

    pub const fn hours(&self) -> u8 {
        self.hours
    }

    pub const fn minutes(&self) -> u8 {
        self.minutes
    }

    /// `hours * 60 + minutes`
    pub const fn total_minutes(&self) -> u32 {
        self.hours as u32 * 60 + self.minutes as u32
    }

    /// Time between two drops in milliseconds
    pub const fn drop_interval_ms(&self) -> u64 {
        self.total_minutes() as u64 * 1000
    }
}
