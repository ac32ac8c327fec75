//! Piezo buzzer trait

/// Trait for a simple tone generator
pub trait Buzzer {
    /// Start a tone at `frequency_hz`
    ///
    /// With `Some(ms)` the tone stops on its own after that many
    /// milliseconds; with `None` it plays until [`Buzzer::silence`].
    fn tone(&mut self, frequency_hz: u16, duration_ms: Option<u16>);

    /// Stop any tone
    fn silence(&mut self);
}
