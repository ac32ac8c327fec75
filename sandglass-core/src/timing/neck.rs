//! Cross-neck drop timer
//!
//! The two matrices touch at one raw corner each. A drop moves a single grain
//! across that neck by inverting both corner cells when exactly one of them is
//! lit; any other combination is left alone.

use crate::traits::{MatrixId, MatrixPair};

/// Neck cell of matrix A in raw panel coordinates
pub const NECK_A: (u8, u8) = (0, 0);

/// Neck cell of matrix B in raw panel coordinates
pub const NECK_B: (u8, u8) = (7, 7);

/// Elapsed-time timer against a monotonic millisecond clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DropTimer {
    start_ms: u64,
    interval_ms: u64,
}

impl DropTimer {
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            start_ms: 0,
            interval_ms,
        }
    }

    /// Restart the timer at `now_ms`
    pub fn arm(&mut self, now_ms: u64) {
        self.start_ms = now_ms;
    }

    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    pub const fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Check whether the interval has elapsed
    ///
    /// A clock that reads earlier than the start never counts as elapsed.
    pub fn elapsed(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.interval_ms
    }

    /// Milliseconds until the next expiry
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.interval_ms
            .saturating_sub(now_ms.saturating_sub(self.start_ms))
    }
}

/// Move one grain across the neck if exactly one neck cell is lit
///
/// Returns true when a grain crossed.
pub fn transfer<M: MatrixPair>(matrices: &mut M) -> bool {
    let (ax, ay) = NECK_A;
    let (bx, by) = NECK_B;
    let a = matrices.raw_get(MatrixId::A, ax, ay);
    let b = matrices.raw_get(MatrixId::B, bx, by);

    if a == b {
        return false;
    }

    matrices.raw_invert(MatrixId::A, ax, ay);
    matrices.raw_invert(MatrixId::B, bx, by);
    true
}

/// Periodic drop attempt, gated on the glass lying flat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DropScheduler {
    timer: DropTimer,
}

impl DropScheduler {
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            timer: DropTimer::new(interval_ms),
        }
    }

    pub fn timer(&self) -> &DropTimer {
        &self.timer
    }

    /// Change the interval and restart the timer
    pub fn restart(&mut self, interval_ms: u64, now_ms: u64) {
        self.timer.set_interval(interval_ms);
        self.timer.arm(now_ms);
    }

    /// Run one scheduler tick
    ///
    /// Once the interval has elapsed the timer is re-armed whether or not the
    /// drop happens, so time spent tilted is not paid back later. Returns true
    /// if a grain crossed the neck.
    pub fn poll<M: MatrixPair>(&mut self, now_ms: u64, flat: bool, matrices: &mut M) -> bool {
        if !self.timer.elapsed(now_ms) {
            return false;
        }
        self.timer.arm(now_ms);

        flat && transfer(matrices)
    }
}
