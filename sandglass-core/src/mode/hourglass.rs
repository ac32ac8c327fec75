//! Hourglass mode engine
//!
//! Owns the collaborators and runs one animation tick per `update()`:
//!
//! 1. Read the gravity angle and classify the pose
//! 2. Rotate the display to match
//! 3. Let the sand settle one step in both matrices
//! 4. Drop one grain across the neck when the timer is due and the glass is flat
//! 5. Arm the alarm when the top matrix has run dry
//! 6. Advance the alarm pattern

use rand::RngCore;

use crate::alarm::{AlarmSequencer, ToneAction};
use crate::config::HourglassConfig;
use crate::orientation::Pose;
use crate::sim::{fill, gravity};
use crate::timing::{DropScheduler, DurationSetting};
use crate::traits::{Buzzer, Clock, MatrixId, MatrixPair, OrientationSource};

/// Grains in a freshly reset glass
pub const PARTICLE_COUNT: u8 = 60;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutcome {
    /// At least one grain moved inside a matrix
    pub moved: bool,
    /// A grain crossed the neck
    pub dropped: bool,
    /// The depletion alarm started this tick
    pub alarm_armed: bool,
}

/// Snapshot of the engine for status reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HourglassStatus {
    /// Percentage of the glass that has run, 0-100
    pub progress: u8,
    pub duration: DurationSetting,
    pub angle: u16,
    pub top: MatrixId,
    pub flat: bool,
    pub alarm_active: bool,
}

/// Hourglass engine
///
/// Generic over its collaborators so the same engine drives the real panels
/// and sensor on the device and plain in-memory fakes in tests.
pub struct Hourglass<M, O, B, C, R> {
    config: HourglassConfig,
    matrices: M,
    orientation: O,
    buzzer: B,
    clock: C,
    rng: R,
    duration: DurationSetting,
    pose: Pose,
    drop: DropScheduler,
    alarm: AlarmSequencer,
}

impl<M, O, B, C, R> Hourglass<M, O, B, C, R>
where
    M: MatrixPair,
    O: OrientationSource,
    B: Buzzer,
    C: Clock,
    R: RngCore,
{
    /// Create the engine
    ///
    /// The glass starts empty; call [`Hourglass::enter`] to fill it.
    pub fn new(
        config: HourglassConfig,
        matrices: M,
        orientation: O,
        buzzer: B,
        clock: C,
        rng: R,
    ) -> Self {
        let duration = config.duration;
        Self {
            config,
            matrices,
            orientation,
            buzzer,
            clock,
            rng,
            duration,
            pose: Pose::classify(0, config.reference_angle),
            drop: DropScheduler::new(duration.drop_interval_ms()),
            alarm: AlarmSequencer::new(config.alarm),
        }
    }

    /// Restore the configured default duration
    pub fn init(&mut self) {
        self.duration = self.config.duration;
        self.alarm.clear_latch();
    }

    /// Activate the mode with a full glass
    pub fn enter(&mut self) {
        self.reset();
    }

    /// Deactivate the mode, stopping any alarm
    pub fn exit(&mut self) {
        self.alarm.cancel();
        self.buzzer.silence();
    }

    /// Run one animation tick
    pub fn update(&mut self) -> TickOutcome {
        let now = self.clock.now_ms();

        let angle = self.orientation.angle_degrees();
        self.pose = Pose::classify(angle, self.config.reference_angle);
        self.matrices
            .set_rotation(self.pose.display_rotation(self.config.rotation_offset));

        let moved = gravity::step(&mut self.matrices, &mut self.rng);

        let dropped = self.drop.poll(now, self.pose.flat, &mut self.matrices);
        if dropped {
            self.buzzer
                .tone(self.config.tone_hz, Some(self.config.drop_tone_ms));
            self.alarm.clear_latch();
        }

        let depleted = self.matrices.count(self.pose.top) == 0;
        let alarm_armed = !moved && !dropped && depleted && self.alarm.arm(now);

        match self.alarm.advance(now) {
            Some(ToneAction::Start) => self.buzzer.tone(self.config.tone_hz, None),
            Some(ToneAction::Stop) => self.buzzer.silence(),
            None => {}
        }

        TickOutcome {
            moved,
            dropped,
            alarm_armed,
        }
    }

    /// Change the duration and restart with a full glass
    ///
    /// Out-of-range values are clamped, see [`DurationSetting::new_clamped`].
    pub fn set_duration(&mut self, hours: i32, minutes: i32) {
        self.duration = DurationSetting::new_clamped(hours, minutes);
        self.reset();
    }

    /// Refill the top matrix, empty the bottom one and restart the timers
    pub fn reset(&mut self) {
        self.matrices
            .set_rotation(self.pose.display_rotation(self.config.rotation_offset));
        self.matrices.clear(MatrixId::A);
        self.matrices.clear(MatrixId::B);
        fill(&mut self.matrices, self.pose.top, PARTICLE_COUNT);

        let now = self.clock.now_ms();
        self.drop.restart(self.duration.drop_interval_ms(), now);

        self.alarm.cancel();
        self.buzzer.silence();
    }

    /// Share of the glass that has run, 0-100
    pub fn progress(&self) -> u8 {
        let top = self.matrices.count(self.pose.top).min(PARTICLE_COUNT);
        ((u16::from(PARTICLE_COUNT - top) * 100) / u16::from(PARTICLE_COUNT)) as u8
    }

    pub fn status(&self) -> HourglassStatus {
        HourglassStatus {
            progress: self.progress(),
            duration: self.duration,
            angle: self.pose.angle,
            top: self.pose.top,
            flat: self.pose.flat,
            alarm_active: self.alarm.is_active(),
        }
    }

    pub fn config(&self) -> &HourglassConfig {
        &self.config
    }

    pub fn duration(&self) -> DurationSetting {
        self.duration
    }

    /// Pose seen on the last tick
    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn alarm(&self) -> &AlarmSequencer {
        &self.alarm
    }

    pub fn matrices(&self) -> &M {
        &self.matrices
    }

    /// Mutable access to the display, e.g. to flush it or change brightness
    pub fn matrices_mut(&mut self) -> &mut M {
        &mut self.matrices
    }

    pub fn orientation_mut(&mut self) -> &mut O {
        &mut self.orientation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::AlarmState;
    use crate::sim::ParticleField;
    use crate::timing::{NECK_A, NECK_B};
    use core::cell::Cell;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    struct FakeClock<'a>(&'a Cell<u64>);

    impl Clock for FakeClock<'_> {
        fn now_ms(&self) -> u64 {
            self.0.get()
        }
    }

    struct FakeTilt<'a>(&'a Cell<u16>);

    impl OrientationSource for FakeTilt<'_> {
        fn angle_degrees(&mut self) -> u16 {
            self.0.get()
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Sound {
        Tone(u16, Option<u16>),
        Silence,
    }

    /// Records the last few buzzer calls and counts continuous tones
    #[derive(Default)]
    struct FakeBuzzer {
        last: Option<Sound>,
        alarm_tones: u32,
        ticks: u32,
        playing: bool,
    }

    impl Buzzer for FakeBuzzer {
        fn tone(&mut self, frequency_hz: u16, duration_ms: Option<u16>) {
            self.last = Some(Sound::Tone(frequency_hz, duration_ms));
            match duration_ms {
                Some(_) => self.ticks += 1,
                None => {
                    self.alarm_tones += 1;
                    self.playing = true;
                }
            }
        }

        fn silence(&mut self) {
            self.last = Some(Sound::Silence);
            self.playing = false;
        }
    }

    type TestGlass<'a> = Hourglass<ParticleField, FakeTilt<'a>, FakeBuzzer, FakeClock<'a>, SmallRng>;

    fn glass<'a>(time: &'a Cell<u64>, angle: &'a Cell<u16>) -> TestGlass<'a> {
        Hourglass::new(
            HourglassConfig::default(),
            ParticleField::new(),
            FakeTilt(angle),
            FakeBuzzer::default(),
            FakeClock(time),
            SmallRng::seed_from_u64(42),
        )
    }

    fn tick(glass: &mut TestGlass<'_>, time: &Cell<u64>) -> TickOutcome {
        time.set(time.get() + 100);
        glass.update()
    }

    #[test]
    fn test_enter_fills_top_matrix() {
        let (time, angle) = (Cell::new(0), Cell::new(0));
        let mut glass = glass(&time, &angle);
        glass.init();
        glass.enter();

        assert_eq!(glass.matrices().count(MatrixId::B), PARTICLE_COUNT);
        assert_eq!(glass.matrices().count(MatrixId::A), 0);
        assert_eq!(glass.progress(), 0);
        assert_eq!(glass.duration().total_minutes(), 1);
    }

    #[test]
    fn test_full_glass_is_at_rest() {
        let (time, angle) = (Cell::new(0), Cell::new(0));
        let mut glass = glass(&time, &angle);
        glass.enter();

        let outcome = tick(&mut glass, &time);
        assert!(!outcome.moved);
        assert!(!outcome.dropped);
    }

    #[test]
    fn test_conservation_without_drop() {
        let (time, angle) = (Cell::new(0), Cell::new(45));
        let mut glass = glass(&time, &angle);
        glass.set_duration(1, 0);

        for step in 0..200 {
            // Wobble between tilted poses; never flat so nothing drops
            angle.set(if step % 20 < 10 { 45 } else { 300 });
            let outcome = tick(&mut glass, &time);
            assert!(!outcome.dropped);
            assert_eq!(glass.matrices().count(MatrixId::B), PARTICLE_COUNT);
            assert_eq!(glass.matrices().count(MatrixId::A), 0);
        }
    }

    #[test]
    fn test_drop_flips_neck_and_ticks() {
        let (time, angle) = (Cell::new(0), Cell::new(0));
        let mut glass = glass(&time, &angle);
        glass.set_duration(0, 1);

        for _ in 0..9 {
            assert!(!tick(&mut glass, &time).dropped);
        }
        let before = glass.matrices().clone();
        let outcome = tick(&mut glass, &time);
        assert!(outcome.dropped);

        let after = glass.matrices();
        assert_eq!(after.total(), before.total());
        assert!(after.raw_get(MatrixId::A, NECK_A.0, NECK_A.1));
        assert!(!after.raw_get(MatrixId::B, NECK_B.0, NECK_B.1));
        assert_eq!(after.count(MatrixId::A), 1);
        assert_eq!(glass.buzzer.last, Some(Sound::Tone(440, Some(10))));
    }

    #[test]
    fn test_ten_minutes_drains_in_ten_minutes() {
        let (time, angle) = (Cell::new(0), Cell::new(0));
        let mut glass = glass(&time, &angle);
        glass.set_duration(0, 10);

        let mut drops = 0;
        let mut armed_at = None;
        while time.get() < 11 * 60 * 1000 {
            let outcome = tick(&mut glass, &time);
            if outcome.dropped {
                drops += 1;
            }
            if outcome.alarm_armed {
                armed_at = Some(time.get());
                break;
            }
        }

        assert_eq!(drops, u32::from(PARTICLE_COUNT));
        let armed_at = armed_at.unwrap();
        // Last grain crosses at 600 s; the alarm fires once the bottom settles
        assert!(armed_at >= 600_000);
        assert!(armed_at <= 600_000 + 100 * 16, "armed at {}", armed_at);
        assert_eq!(glass.matrices().count(MatrixId::B), 0);
        assert_eq!(glass.matrices().count(MatrixId::A), PARTICLE_COUNT);
        assert_eq!(glass.progress(), 100);
    }

    #[test]
    fn test_alarm_runs_five_cycles_once() {
        let (time, angle) = (Cell::new(0), Cell::new(0));
        let mut glass = glass(&time, &angle);
        glass.set_duration(0, 1);

        // One minute of drops plus settling
        let mut armed = 0;
        while time.get() < 70_000 {
            if tick(&mut glass, &time).alarm_armed {
                armed += 1;
            }
        }
        assert_eq!(armed, 1);
        assert_eq!(glass.buzzer.alarm_tones, 5);
        assert!(!glass.buzzer.playing);
        assert_eq!(glass.alarm().state(), AlarmState::Idle);
        assert!(glass.alarm().is_latched());

        // Still empty on top: no second alarm
        while time.get() < 90_000 {
            assert!(!tick(&mut glass, &time).alarm_armed);
        }
        assert_eq!(glass.buzzer.alarm_tones, 5);
    }

    /// Tick until `end`, returning (drops, alarms armed)
    fn run_until(glass: &mut TestGlass<'_>, time: &Cell<u64>, end: u64) -> (u32, u32) {
        let (mut drops, mut armed) = (0, 0);
        while time.get() < end {
            let outcome = tick(glass, time);
            drops += u32::from(outcome.dropped);
            armed += u32::from(outcome.alarm_armed);
        }
        (drops, armed)
    }

    #[test]
    fn test_drop_after_depletion_rearms_alarm() {
        let (time, angle) = (Cell::new(0), Cell::new(0));
        let mut glass = glass(&time, &angle);
        glass.set_duration(0, 1);

        // First episode drains B into A
        let (drops, armed) = run_until(&mut glass, &time, 70_000);
        assert_eq!(drops, u32::from(PARTICLE_COUNT));
        assert_eq!(armed, 1);
        assert!(glass.alarm().is_latched());

        // Upside down, the sand crosses back into B
        angle.set(180);
        let (drops, armed) = run_until(&mut glass, &time, 150_000);
        assert!(drops > 0);
        assert_eq!(armed, 0);
        assert!(!glass.alarm().is_latched());

        // Upright again, B drains a second time and the alarm sounds again
        angle.set(0);
        let (_, armed) = run_until(&mut glass, &time, 230_000);
        assert_eq!(armed, 1);
        assert_eq!(glass.buzzer.alarm_tones, 10);
        assert_eq!(glass.matrices().count(MatrixId::B), 0);
    }

    #[test]
    fn test_reset_clears_alarm() {
        let (time, angle) = (Cell::new(0), Cell::new(0));
        let mut glass = glass(&time, &angle);
        glass.set_duration(0, 1);

        while !tick(&mut glass, &time).alarm_armed {
            assert!(time.get() < 70_000);
        }
        tick(&mut glass, &time);
        assert!(glass.status().alarm_active);

        glass.reset();
        assert!(!glass.alarm().is_active());
        assert!(!glass.alarm().is_latched());
        assert_eq!(glass.buzzer.last, Some(Sound::Silence));
        assert_eq!(glass.progress(), 0);
    }

    #[test]
    fn test_exit_silences() {
        let (time, angle) = (Cell::new(0), Cell::new(0));
        let mut glass = glass(&time, &angle);
        glass.set_duration(0, 1);

        while !tick(&mut glass, &time).alarm_armed {}
        assert!(glass.buzzer.playing);

        glass.exit();
        assert!(!glass.buzzer.playing);
        assert!(!glass.alarm().is_active());
        assert!(!glass.alarm().is_latched());
    }

    #[test]
    fn test_tilted_never_drops() {
        let (time, angle) = (Cell::new(0), Cell::new(270));
        let mut glass = glass(&time, &angle);
        glass.set_duration(0, 1);

        for _ in 0..300 {
            assert!(!tick(&mut glass, &time).dropped);
        }
        assert_eq!(glass.matrices().total(), PARTICLE_COUNT);
        assert!(!glass.pose().flat);
    }

    #[test]
    fn test_reference_angle_selects_top() {
        let (time, angle) = (Cell::new(0), Cell::new(90));
        let mut glass = glass(&time, &angle);

        tick(&mut glass, &time);
        assert_eq!(glass.status().top, MatrixId::A);

        for near in [89, 91] {
            angle.set(near);
            tick(&mut glass, &time);
            assert_eq!(glass.status().top, MatrixId::B);
        }
    }

    #[test]
    fn test_reset_fills_new_top() {
        let (time, angle) = (Cell::new(0), Cell::new(90));
        let mut glass = glass(&time, &angle);

        tick(&mut glass, &time);
        glass.reset();
        assert_eq!(glass.matrices().count(MatrixId::A), PARTICLE_COUNT);
        assert_eq!(glass.matrices().count(MatrixId::B), 0);
        assert_eq!(glass.progress(), 0);
    }

    #[test]
    fn test_set_duration_clamps() {
        let (time, angle) = (Cell::new(0), Cell::new(0));
        let mut glass = glass(&time, &angle);

        glass.set_duration(0, 0);
        assert_eq!(glass.duration().total_minutes(), 1);

        glass.set_duration(30, 99);
        assert_eq!(glass.status().duration.hours(), 23);
        assert_eq!(glass.status().duration.minutes(), 59);
    }

    #[test]
    fn test_progress() {
        let (time, angle) = (Cell::new(0), Cell::new(0));
        let mut glass = glass(&time, &angle);
        glass.enter();

        // Move 30 grains by hand
        let mut moved = 0;
        for y in 0..8 {
            for x in 0..8 {
                if moved < 30 && glass.matrices().raw_get(MatrixId::B, x, y) {
                    glass.matrices_mut().raw_invert(MatrixId::B, x, y);
                    glass.matrices_mut().raw_invert(MatrixId::A, x, y);
                    moved += 1;
                }
            }
        }
        assert_eq!(glass.progress(), 50);
    }
}
