//! MAX7219 8x8 LED matrix pair
//!
//! Two MAX7219 devices daisy-chained on one SPI bus with a shared LOAD
//! (chip-select) line. Every register write shifts one 16-bit word per
//! device; the word shifted out first lands in the device farthest from the
//! MCU, and all devices latch on the rising edge of LOAD.
//!
//! The driver keeps the frame in a [`ParticleField`] and implements
//! [`MatrixPair`] on top of it, so the engine never touches the bus.
//! [`Max7219::flush`] pushes the frame out, once per tick.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use sandglass_core::config::{DisplayConfig, MAX_INTENSITY};
use sandglass_core::sim::ParticleField;
use sandglass_core::traits::{MatrixId, MatrixPair, MATRIX_SIZE};

/// MAX7219 register addresses
pub mod reg {
    pub const NOOP: u8 = 0x00;
    /// Row 0; rows 1-7 follow consecutively
    pub const DIGIT0: u8 = 0x01;
    pub const DECODE_MODE: u8 = 0x09;
    pub const INTENSITY: u8 = 0x0A;
    pub const SCAN_LIMIT: u8 = 0x0B;
    pub const SHUTDOWN: u8 = 0x0C;
    pub const DISPLAY_TEST: u8 = 0x0F;
}

/// Devices in the chain
pub const CHAIN_LEN: usize = 2;

/// MAX7219 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Max7219Error {
    /// SPI transfer failed
    Spi,
    /// LOAD pin could not be driven
    ChipSelect,
}

/// Two daisy-chained MAX7219 matrices
pub struct Max7219<SPI, CS> {
    spi: SPI,
    cs: CS,
    config: DisplayConfig,
    field: ParticleField,
}

impl<SPI, CS> Max7219<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    /// Create the driver; call [`Max7219::init`] before the first flush
    ///
    /// An invalid chain layout falls back to the default one.
    pub fn new(spi: SPI, cs: CS, config: DisplayConfig) -> Self {
        let config = if config.is_valid() {
            config
        } else {
            DisplayConfig {
                intensity: config.intensity.min(MAX_INTENSITY),
                ..DisplayConfig::default()
            }
        };
        Self {
            spi,
            cs,
            config,
            field: ParticleField::new(),
        }
    }

    /// Bring both devices out of power-on state
    ///
    /// Leaves test mode, disables BCD decode, scans all 8 rows, applies the
    /// configured intensity, blanks the rows and finally exits shutdown.
    pub fn init(&mut self) -> Result<(), Max7219Error> {
        self.write_all(reg::DISPLAY_TEST, 0x00)?;
        self.write_all(reg::DECODE_MODE, 0x00)?;
        self.write_all(reg::SCAN_LIMIT, MATRIX_SIZE - 1)?;
        self.write_all(reg::INTENSITY, self.config.intensity.min(MAX_INTENSITY))?;
        for row in 0..MATRIX_SIZE {
            self.write_all(reg::DIGIT0 + row, 0x00)?;
        }
        self.write_all(reg::SHUTDOWN, 0x01)
    }

    /// Set brightness on both devices, clamped to 0-15
    pub fn set_intensity(&mut self, intensity: u8) -> Result<(), Max7219Error> {
        let intensity = intensity.min(MAX_INTENSITY);
        self.config.intensity = intensity;
        self.write_all(reg::INTENSITY, intensity)
    }

    pub fn intensity(&self) -> u8 {
        self.config.intensity
    }

    /// Push the raw frame of both matrices to the panels
    pub fn flush(&mut self) -> Result<(), Max7219Error> {
        for row in 0..MATRIX_SIZE {
            let a = Self::row_data(&self.field, MatrixId::A, row);
            let b = Self::row_data(&self.field, MatrixId::B, row);

            let mut data = [0u8; CHAIN_LEN];
            data[usize::from(self.config.device_a)] = a;
            data[usize::from(self.config.device_b)] = b;
            self.write(reg::DIGIT0 + row, data)?;
        }
        Ok(())
    }

    /// In-memory frame
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Release the bus and pin
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    /// Segment byte for one row; the MAX7219 drives column 0 from bit 7
    fn row_data(field: &ParticleField, matrix: MatrixId, row: u8) -> u8 {
        field.grid(matrix).row_bits(row).reverse_bits()
    }

    fn write_all(&mut self, register: u8, value: u8) -> Result<(), Max7219Error> {
        self.write(register, [value; CHAIN_LEN])
    }

    /// Write one register on every device; `data[n]` goes to chain position n
    fn write(&mut self, register: u8, data: [u8; CHAIN_LEN]) -> Result<(), Max7219Error> {
        let mut frame = [0u8; CHAIN_LEN * 2];
        for (device, value) in data.iter().enumerate() {
            // Farthest device first
            let slot = (CHAIN_LEN - 1 - device) * 2;
            frame[slot] = register;
            frame[slot + 1] = *value;
        }

        self.cs.set_low().map_err(|_| Max7219Error::ChipSelect)?;
        let result = self
            .spi
            .write(&frame)
            .and_then(|_| self.spi.flush())
            .map_err(|_| Max7219Error::Spi);
        // Latch even after a failed transfer so the chain is not left selected
        self.cs.set_high().map_err(|_| Max7219Error::ChipSelect)?;
        result
    }
}

impl<SPI, CS> MatrixPair for Max7219<SPI, CS> {
    fn get(&self, matrix: MatrixId, x: u8, y: u8) -> bool {
        self.field.get(matrix, x, y)
    }

    fn set(&mut self, matrix: MatrixId, x: u8, y: u8, on: bool) {
        self.field.set(matrix, x, y, on);
    }

    fn clear(&mut self, matrix: MatrixId) {
        self.field.clear(matrix);
    }

    fn raw_get(&self, matrix: MatrixId, x: u8, y: u8) -> bool {
        self.field.raw_get(matrix, x, y)
    }

    fn raw_invert(&mut self, matrix: MatrixId, x: u8, y: u8) {
        self.field.raw_invert(matrix, x, y);
    }

    fn set_rotation(&mut self, degrees: u16) {
        self.field.set_rotation(degrees);
    }

    fn count(&self, matrix: MatrixId) -> u8 {
        self.field.count(matrix)
    }
}
