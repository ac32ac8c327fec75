//! Monotonic time source

/// Trait for a monotonic millisecond clock
///
/// All engine timing is elapsed-time comparison against this clock, sampled
/// once per tick. Nothing in the engine sleeps.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;
}
