//! Board glue
//!
//! Binds the hourglass engine's collaborator traits to RP2040 peripherals
//! and Embassy primitives.

use embassy_rp::gpio::Output;
use embassy_rp::i2c::{Blocking as I2cBlocking, I2c};
use embassy_rp::peripherals::{I2C0, SPI0};
use embassy_rp::spi::{Blocking as SpiBlocking, Spi};
use embassy_time::Instant;
use rand::rngs::SmallRng;

use sandglass_core::traits::{Buzzer, Clock};
use sandglass_core::Hourglass;
use sandglass_drivers::display::Max7219;
use sandglass_drivers::sensor::Mpu6050;

use crate::channels::BUZZER_CMD;

/// Two chained MAX7219 panels on SPI0
pub type Display = Max7219<Spi<'static, SPI0, SpiBlocking>, Output<'static>>;

/// MPU-6050 on I2C0
pub type Sensor = Mpu6050<I2c<'static, I2C0, I2cBlocking>>;

/// The engine as wired on this board
pub type Engine = Hourglass<Display, Sensor, SignalBuzzer, EmbassyClock, SmallRng>;

/// Request for the buzzer task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuzzerCommand {
    /// Play `frequency_hz`, for `duration_ms` or until silenced
    Tone {
        frequency_hz: u16,
        duration_ms: Option<u16>,
    },
    /// Stop any tone
    Silence,
}

/// Monotonic clock backed by the Embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

/// Buzzer that forwards requests to the buzzer task
///
/// The engine never waits on the PWM; timed tones are ended by the task.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalBuzzer;

impl Buzzer for SignalBuzzer {
    fn tone(&mut self, frequency_hz: u16, duration_ms: Option<u16>) {
        BUZZER_CMD.signal(BuzzerCommand::Tone {
            frequency_hz,
            duration_ms,
        });
    }

    fn silence(&mut self) {
        BUZZER_CMD.signal(BuzzerCommand::Silence);
    }
}
