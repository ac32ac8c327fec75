//! Minimal TOML parser for the device configuration
//!
//! Handles only the subset `sandglass.toml` uses:
//!
//! - `[section]` headers
//! - `key = value` pairs with integer or boolean values
//! - Comments (`# ...`), whole-line or trailing
//!
//! Unknown keys are ignored so older firmware accepts newer files. Unknown
//! sections are rejected.

use super::types::SandglassConfig;
use crate::timing::DurationSetting;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Value is not of the expected type
    InvalidValue,
    /// Value parsed but is outside its allowed range
    OutOfRange,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Hourglass,
    Alarm,
    Orientation,
    Display,
    Serial,
}

/// Parse TOML text into a `SandglassConfig`
///
/// Keys that are absent keep their defaults.
pub fn parse_config(input: &str) -> Result<SandglassConfig, ParseError> {
    let mut config = SandglassConfig::default();
    let mut section = Section::Root;
    let mut hours = i32::from(config.hourglass.duration.hours());
    let mut minutes = i32::from(config.hourglass.duration.minutes());

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = header.strip_suffix(']').ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(header)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;

        match section {
            Section::Hourglass => {
                let h = &mut config.hourglass;
                match key {
                    "reference_angle" => h.reference_angle = parse_angle(value)?,
                    "rotation_offset" => h.rotation_offset = parse_angle(value)?,
                    "tone_hz" => h.tone_hz = parse_int(value)?,
                    "drop_tone_ms" => h.drop_tone_ms = parse_int(value)?,
                    "tick_interval_ms" => h.tick_interval_ms = parse_nonzero(value)?,
                    "hours" => hours = parse_int(value)?,
                    "minutes" => minutes = parse_int(value)?,
                    _ => {}
                }
            }
            Section::Alarm => {
                let a = &mut config.hourglass.alarm;
                match key {
                    "cycle_ms" => a.cycle_ms = parse_nonzero(value)?,
                    "on_ms" => a.on_ms = parse_int(value)?,
                    "cycles" => a.cycles = parse_int(value)?,
                    _ => {}
                }
            }
            Section::Orientation => {
                let o = &mut config.orientation;
                match key {
                    "offset_degrees" => o.offset_degrees = parse_int(value)?,
                    "invert" => o.invert = parse_bool(value)?,
                    "snap" => o.snap = parse_bool(value)?,
                    _ => {}
                }
            }
            Section::Display => {
                let d = &mut config.display;
                match key {
                    "intensity" => d.intensity = parse_int(value)?,
                    "device_a" => d.device_a = parse_int(value)?,
                    "device_b" => d.device_b = parse_int(value)?,
                    _ => {}
                }
            }
            Section::Serial => {
                if key == "baud_rate" || key == "baud" {
                    config.serial.baud_rate = parse_nonzero(value)?;
                }
            }
            Section::Root => {}
        }
    }

    config.hourglass.duration = DurationSetting::new_clamped(hours, minutes);

    if !config.display.is_valid() {
        return Err(ParseError::OutOfRange);
    }
    if config.hourglass.alarm.on_ms > config.hourglass.alarm.cycle_ms {
        return Err(ParseError::OutOfRange);
    }
    // Drops are due on whole seconds; any other tick makes every drop late
    if 1000 % config.hourglass.tick_interval_ms != 0 {
        return Err(ParseError::OutOfRange);
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "hourglass" => Ok(Section::Hourglass),
        "hourglass.alarm" | "alarm" => Ok(Section::Alarm),
        "orientation" => Ok(Section::Orientation),
        "display" => Ok(Section::Display),
        "serial" => Ok(Section::Serial),
        _ => Err(ParseError::InvalidSection),
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_nonzero<T>(value: &str) -> Result<T, ParseError>
where
    T: core::str::FromStr + Default + PartialEq,
{
    let parsed: T = parse_int(value)?;
    if parsed == T::default() {
        return Err(ParseError::OutOfRange);
    }
    Ok(parsed)
}

fn parse_angle(value: &str) -> Result<u16, ParseError> {
    let angle: u16 = parse_int(value)?;
    if angle >= 360 {
        return Err(ParseError::OutOfRange);
    }
    Ok(angle)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}
