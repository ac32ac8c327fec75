//! Line assembly for the serial console
//!
//! Bytes arrive one at a time. A line ends at `\n` or `\r`; empty lines are
//! dropped, so `\r\n` endings produce one line. Only printable ASCII is
//! kept; other bytes are skipped.

use heapless::String;

/// Size of the line buffer, including room for a terminator
pub const LINE_CAPACITY: usize = 32;

/// Longest line that fits
pub const MAX_LINE_LEN: usize = LINE_CAPACITY - 1;

/// A complete received line
pub type Line = String<LINE_CAPACITY>;

/// Line assembly errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line grew past [`MAX_LINE_LEN`]; what was buffered is discarded
    Overflow,
}

/// Byte-at-a-time line parser
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    buffer: Line,
}

impl LineParser {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Discard any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Number of bytes waiting for a line ending
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when a line is complete, `Ok(None)` when more
    /// bytes are needed, or `Err(Overflow)` when the line was too long.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        match byte {
            b'\n' | b'\r' => {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let line = self.buffer.clone();
                self.buffer.clear();
                Ok(Some(line))
            }
            32..=126 => {
                if self.buffer.len() >= MAX_LINE_LEN {
                    self.buffer.clear();
                    return Err(LineError::Overflow);
                }
                // Cannot fail: capacity checked above
                let _ = self.buffer.push(byte as char);
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}
