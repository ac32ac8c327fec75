//! Depletion alarm
//!
//! A non-blocking beep pattern driven by elapsed time. The engine arms it
//! once per depletion episode and advances it every tick.

pub mod sequencer;

pub use sequencer::{AlarmPattern, AlarmSequencer, AlarmState, ToneAction};
