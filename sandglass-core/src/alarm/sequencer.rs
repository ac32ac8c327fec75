//! Alarm state machine
//!
//! The tone is on for the first `on_ms` of every `cycle_ms` cycle. After
//! `cycles` complete cycles the alarm returns to idle on its own. The
//! sequencer only reports edges; the caller owns the buzzer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Beep pattern parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlarmPattern {
    /// Length of one on/off cycle
    pub cycle_ms: u32,
    /// Tone-on window at the start of each cycle
    pub on_ms: u32,
    /// Number of cycles before the alarm stops
    pub cycles: u8,
}

impl Default for AlarmPattern {
    fn default() -> Self {
        Self {
            cycle_ms: 1000,
            on_ms: 200,
            cycles: 5,
        }
    }
}

impl AlarmPattern {
    /// Total time from arming to silence
    pub const fn total_ms(&self) -> u64 {
        self.cycle_ms as u64 * self.cycles as u64
    }
}

/// Alarm states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmState {
    /// Silent
    #[default]
    Idle,
    /// Beeping since `started_ms`
    Active { started_ms: u64 },
}

/// Buzzer change requested by the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToneAction {
    /// Start the continuous alarm tone
    Start,
    /// Silence the buzzer
    Stop,
}

/// Alarm sequencer with a one-shot latch
///
/// The latch is set when the alarm is armed and stays set after the pattern
/// finishes, so an empty glass sounds once until a grain drops or the glass
/// is reset.
#[derive(Debug, Clone, Default)]
pub struct AlarmSequencer {
    pattern: AlarmPattern,
    state: AlarmState,
    latched: bool,
    tone_on: bool,
}

impl AlarmSequencer {
    pub fn new(pattern: AlarmPattern) -> Self {
        Self {
            pattern,
            state: AlarmState::Idle,
            latched: false,
            tone_on: false,
        }
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    pub fn pattern(&self) -> &AlarmPattern {
        &self.pattern
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, AlarmState::Active { .. })
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Start the alarm unless it already fired this episode
    ///
    /// Returns true if the alarm was armed.
    pub fn arm(&mut self, now_ms: u64) -> bool {
        if self.latched {
            return false;
        }
        self.latched = true;
        self.state = AlarmState::Active { started_ms: now_ms };
        self.tone_on = false;
        true
    }

    /// Allow the next depletion to sound again
    pub fn clear_latch(&mut self) {
        self.latched = false;
    }

    /// Stop immediately and clear the latch
    pub fn cancel(&mut self) {
        self.state = AlarmState::Idle;
        self.latched = false;
        self.tone_on = false;
    }

    /// Whole cycles completed so far, or None when idle
    pub fn cycles_completed(&self, now_ms: u64) -> Option<u64> {
        match self.state {
            AlarmState::Idle => None,
            AlarmState::Active { started_ms } => {
                let cycle = u64::from(self.pattern.cycle_ms.max(1));
                Some(now_ms.saturating_sub(started_ms) / cycle)
            }
        }
    }

    /// Advance the pattern to `now_ms`
    ///
    /// Returns the buzzer change needed, if any. Finishing the pattern always
    /// requests `Stop`.
    pub fn advance(&mut self, now_ms: u64) -> Option<ToneAction> {
        let AlarmState::Active { started_ms } = self.state else {
            return None;
        };

        let elapsed = now_ms.saturating_sub(started_ms);
        let cycle = u64::from(self.pattern.cycle_ms.max(1));

        if elapsed / cycle >= u64::from(self.pattern.cycles) {
            self.state = AlarmState::Idle;
            self.tone_on = false;
            return Some(ToneAction::Stop);
        }

        let want_on = elapsed % cycle < u64::from(self.pattern.on_ms);
        if want_on == self.tone_on {
            return None;
        }
        self.tone_on = want_on;
        Some(if want_on {
            ToneAction::Start
        } else {
            ToneAction::Stop
        })
    }
}
