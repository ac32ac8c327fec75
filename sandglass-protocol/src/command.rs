//! Console commands
//!
//! A line is trimmed and upper-cased; the first space separates the command
//! word from its arguments.

use heapless::String;

use crate::line::LINE_CAPACITY;

/// Parsed console command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `GET_STATUS`
    GetStatus,
    /// `GET_ORIENTATION`
    GetOrientation,
    /// `GET_DISPLAY`
    GetDisplay,
    /// `SET_HG HH MM`
    SetDuration { hours: u8, minutes: u8 },
    /// `RESET_HG`
    ResetHourglass,
    /// `SET_BRIGHTNESS N`
    SetBrightness(u8),
}

/// Rejected command, reported to the host as `ERR <message>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Line did not fit the receive buffer
    BufferOverflow,
    /// `SET_HG 0 0`
    ZeroDuration,
    /// `SET_HG` with hours or minutes out of range
    DurationOutOfRange,
    /// `SET_HG` without two numbers
    DurationUsage,
    /// `SET_BRIGHTNESS` missing, malformed or out of range
    BrightnessOutOfRange,
    /// Command word not recognised
    Unknown,
}

impl CommandError {
    /// Message text sent after `ERR `
    pub const fn message(self) -> &'static str {
        match self {
            CommandError::BufferOverflow => "Buffer overflow",
            CommandError::ZeroDuration => "Duration must be greater than 0",
            CommandError::DurationOutOfRange => "Duration out of range (HH: 0-23, MM: 0-59)",
            CommandError::DurationUsage => "Usage: SET_HG HH MM",
            CommandError::BrightnessOutOfRange => "Brightness must be 0-15",
            CommandError::Unknown => "Unknown command",
        }
    }
}

/// Parse one received line
///
/// Returns `Ok(None)` for a line that is blank after trimming.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut upper: String<LINE_CAPACITY> = String::new();
    for c in line.chars() {
        upper
            .push(c.to_ascii_uppercase())
            .map_err(|_| CommandError::BufferOverflow)?;
    }

    let (word, args) = match upper.split_once(' ') {
        Some((word, args)) => (word, args),
        None => (upper.as_str(), ""),
    };

    let command = match word {
        "GET_STATUS" => Command::GetStatus,
        "GET_ORIENTATION" => Command::GetOrientation,
        "GET_DISPLAY" => Command::GetDisplay,
        "SET_HG" => parse_set_duration(args)?,
        "RESET_HG" => Command::ResetHourglass,
        "SET_BRIGHTNESS" => parse_set_brightness(args)?,
        _ => return Err(CommandError::Unknown),
    };
    Ok(Some(command))
}

fn parse_set_duration(args: &str) -> Result<Command, CommandError> {
    let mut numbers = args.split_whitespace().map(str::parse::<i32>);
    let (Some(Ok(hours)), Some(Ok(minutes))) = (numbers.next(), numbers.next()) else {
        return Err(CommandError::DurationUsage);
    };

    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return Err(CommandError::DurationOutOfRange);
    }
    if hours == 0 && minutes == 0 {
        return Err(CommandError::ZeroDuration);
    }

    Ok(Command::SetDuration {
        hours: hours as u8,
        minutes: minutes as u8,
    })
}

fn parse_set_brightness(args: &str) -> Result<Command, CommandError> {
    match args.split_whitespace().next().map(str::parse::<i32>) {
        Some(Ok(level)) if (0..=15).contains(&level) => Ok(Command::SetBrightness(level as u8)),
        _ => Err(CommandError::BrightnessOutOfRange),
    }
}
