//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use sandglass_protocol::{Command, Response};

use crate::board::BuzzerCommand;

/// Channel capacity for parsed console commands
const COMMAND_CHANNEL_SIZE: usize = 4;

/// Channel capacity for console replies
const RESPONSE_CHANNEL_SIZE: usize = 4;

/// Commands parsed from the serial console
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, Command, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Replies waiting to be written to the serial console
pub static RESPONSE_CHANNEL: Channel<CriticalSectionRawMutex, Response, RESPONSE_CHANNEL_SIZE> =
    Channel::new();

/// Buzzer command signal (updated by the hourglass engine)
///
/// Only the latest command matters: a newer tone or a silence replaces
/// whatever is still pending.
pub static BUZZER_CMD: Signal<CriticalSectionRawMutex, BuzzerCommand> = Signal::new();
